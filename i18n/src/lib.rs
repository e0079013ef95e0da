//! BCP 47 locale tags and message translation with language fallback.
//!
//! ```
//! use langtag_i18n::LocaleTag;
//!
//! let tag: LocaleTag = "zh-cmn-Hans-CN".parse().unwrap();
//! assert_eq!(tag.script(), Some("Hans"));
//! assert_eq!(tag.fallback().to_string(), "zh-cmn-Hans");
//! ```

pub mod app;
pub mod config;
pub mod handlers;
pub mod locale;
pub mod middleware;
pub mod models;
pub mod services;
pub mod utils;

#[cfg(test)]
mod tests;

pub use app::AppState;
pub use config::Config;
pub use locale::{LocaleTag, ParseError, parse, primary_language};
pub use services::{
    MessageLoader, MessageSource, MissingTranslation, MissingTranslationHandler, Params,
    Translator,
};
pub use utils::{I18nError, I18nResult};
