//! Locale parse errors

use thiserror::Error;

/// Raised when a string does not match the BCP 47 grammar.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{input} is not valid BCP 47 formatted locale string")]
pub struct ParseError {
    pub input: String,
}

impl ParseError {
    pub fn new(input: impl Into<String>) -> Self {
        Self { input: input.into() }
    }
}

pub type ParseResult<T> = Result<T, ParseError>;
