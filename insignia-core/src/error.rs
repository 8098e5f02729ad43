//! Error taxonomy for the INSIGNIA badge store.

use thiserror::Error;

// ============================================================================
// ERROR TYPES
// ============================================================================

/// Persisted store errors.
///
/// Every keyed variant carries the encoded store key so a log line is enough
/// to locate the offending blob.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("store backend unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("read failed for {key}: {reason}")]
    ReadFailed { key: String, reason: String },

    #[error("write failed for {key}: {reason}")]
    WriteFailed { key: String, reason: String },

    #[error("delete failed for {key}: {reason}")]
    DeleteFailed { key: String, reason: String },

    #[error("malformed value under {key}: {reason}")]
    Malformed { key: String, reason: String },
}

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required configuration field: {field}")]
    MissingRequired { field: String },

    #[error("Invalid value for {field}: {value} - {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

/// Master error type for all INSIGNIA errors.
#[derive(Debug, Clone, Error)]
pub enum InsigniaError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type alias for INSIGNIA operations.
pub type InsigniaResult<T> = Result<T, InsigniaError>;

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_display_includes_key() {
        let err = StoreError::ReadFailed {
            key: "insignia/badge_records_all".to_string(),
            reason: "connection reset".to_string(),
        };
        let rendered = err.to_string();
        assert!(rendered.contains("insignia/badge_records_all"));
        assert!(rendered.contains("connection reset"));
    }

    #[test]
    fn test_store_error_converts_to_master() {
        let err: InsigniaError = StoreError::WriteFailed {
            key: "insignia/badge_records_all".to_string(),
            reason: "disk full".to_string(),
        }
        .into();
        assert!(matches!(err, InsigniaError::Store(_)));
        assert!(err.to_string().starts_with("Store error:"));
    }

    #[test]
    fn test_config_error_converts_to_master() {
        let err: InsigniaError = ConfigError::MissingRequired {
            field: "namespace".to_string(),
        }
        .into();
        assert!(matches!(err, InsigniaError::Config(_)));
    }

    #[test]
    fn test_malformed_display() {
        let err = StoreError::Malformed {
            key: "insignia/badge_records_42".to_string(),
            reason: "expected value at line 1 column 1".to_string(),
        };
        assert!(err.to_string().starts_with("malformed value under"));
    }
}
