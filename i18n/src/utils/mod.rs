pub mod accept_language;
pub mod error;
pub mod logging;

pub use accept_language::{negotiate_locale, parse_accept_language};
pub use error::{ErrorResponse, I18nError, I18nResult};
pub use logging::init_logging;
