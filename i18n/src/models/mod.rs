pub mod locale;
pub mod translation;

pub use locale::LocaleResponse;
pub use translation::{CacheClearedResponse, MessagesResponse, TranslateQuery, TranslateResponse};
