//! Fatal pipeline errors.

use thiserror::Error;
use waymark_syntax::{ErrorCode, LexError, ParseError};

/// A failure that prevents any canonical outcome. Everything recoverable
/// (validation findings, declined repairs) travels in the outcome instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The input text could not be tokenized.
    #[error(transparent)]
    Lex(#[from] LexError),
    /// The token stream could not be parsed into a document.
    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl EngineError {
    /// Stable code of the underlying failure.
    pub fn code(&self) -> ErrorCode {
        match self {
            EngineError::Lex(e) => e.code(),
            EngineError::Parse(e) => e.code(),
        }
    }
}
