//! FX engine error types.

use thiserror::Error;

/// Errors that can occur in the FX engine.
#[derive(Debug, Error)]
pub enum FxError {
    /// The rate feed could not be retrieved.
    #[error("Rate feed unavailable from {source_name}: {reason}")]
    FeedUnavailable { source_name: String, reason: String },

    /// The rate feed was retrieved but could not be decoded.
    #[error("Malformed rate feed: {0}")]
    FeedFormat(String),

    /// A single feed entry was rejected. Recovered locally by dropping the entry.
    #[error("Rejected rate entry for {currency}: {reason}")]
    EntryParse { currency: String, reason: String },

    /// A caller-supplied conversion request failed validation.
    #[error("Invalid conversion request: {0}")]
    InvalidConversionRequest(String),
}

impl FxError {
    /// Whether the host process must refuse to serve after this error.
    pub fn is_fatal(&self) -> bool {
        matches!(self, FxError::FeedUnavailable { .. } | FxError::FeedFormat(_))
    }

    /// Get error code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            FxError::FeedUnavailable { .. } => "FEED_UNAVAILABLE",
            FxError::FeedFormat(_) => "FEED_FORMAT",
            FxError::EntryParse { .. } => "ENTRY_PARSE",
            FxError::InvalidConversionRequest(_) => "INVALID_CONVERSION_REQUEST",
        }
    }
}

/// Result type for FX operations.
pub type FxResult<T> = Result<T, FxError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_errors() {
        assert!(FxError::FeedFormat("x".into()).is_fatal());
        assert!(FxError::FeedUnavailable {
            source_name: "ecb".into(),
            reason: "503".into()
        }
        .is_fatal());
        assert!(!FxError::InvalidConversionRequest("x".into()).is_fatal());
        assert!(!FxError::EntryParse {
            currency: "USD".into(),
            reason: "x".into()
        }
        .is_fatal());
    }
}
