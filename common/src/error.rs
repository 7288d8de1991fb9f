//! Error types for monetary values.

use thiserror::Error;

/// Errors raised while constructing money values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MonetaryError {
    /// Text could not be parsed as a decimal amount.
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Amount does not fit the fixed-point representation.
    #[error("Amount out of range: {0}")]
    OutOfRange(String),
}

impl MonetaryError {
    /// Get error code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            MonetaryError::InvalidAmount(_) => "INVALID_AMOUNT",
            MonetaryError::OutOfRange(_) => "AMOUNT_OUT_OF_RANGE",
        }
    }
}
