pub mod catalog_cache;
pub mod formatter;
pub mod message_source;
pub mod missing_translation;
pub mod translator;

pub use catalog_cache::{CatalogCache, CatalogEntry, CatalogKey, MessageCatalog, Messages};
pub use formatter::{MessageFormatter, Params, PlaceholderFormatter, params_from_pairs};
pub use message_source::{
    DbMessageLoader, FileMessageLoader, MemoryMessageLoader, MessageFileFormat, MessageLoader,
    MessageSource,
};
pub use missing_translation::{LogMissingTranslations, MissingTranslation, MissingTranslationHandler};
pub use translator::{Translator, candidate_languages};
