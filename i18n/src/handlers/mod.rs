pub mod locale;
pub mod translation;
