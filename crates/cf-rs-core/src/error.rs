//! Core error types for cf-rs.
//!
//! [`CfError`] covers every failure the SQL compiler can report, plus the
//! configuration and I/O errors raised while loading settings. Errors are
//! always returned to the caller of the failing call; the compiler never
//! produces partially-built SQL.

use thiserror::Error;

/// The primary error type for cf-rs.
#[derive(Error, Debug)]
pub enum CfError {
    // ── Compiler errors ─────────────────────────────────────────────

    /// An atomic column type tag is absent from the dialect's type table.
    #[error("Unknown column type: {0}")]
    UnknownType(String),

    /// A column type references another entity whose identity column (or
    /// its type) cannot be determined.
    #[error("Type resolution failed: {0}")]
    Resolution(String),

    /// An operation or join tag lies outside the supported set.
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// A predicate key, operator, or operand cannot be interpreted.
    #[error("Malformed predicate: {0}")]
    MalformedPredicate(String),

    /// A query descriptor is inconsistent with its operation.
    #[error("Malformed query: {0}")]
    MalformedQuery(String),

    // ── Configuration ────────────────────────────────────────────────

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    // ── Serialization ────────────────────────────────────────────────

    /// An error occurred during serialization or deserialization.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    // ── IO ───────────────────────────────────────────────────────────

    /// An I/O error occurred.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl CfError {
    /// Returns `true` for errors caused by the shape of the compiler input,
    /// as opposed to configuration or I/O failures.
    pub const fn is_compile_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownType(_)
                | Self::Resolution(_)
                | Self::UnsupportedOperation(_)
                | Self::MalformedPredicate(_)
                | Self::MalformedQuery(_)
        )
    }
}

impl From<serde_json::Error> for CfError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

/// A convenience type alias for `Result<T, CfError>`.
pub type CfResult<T> = Result<T, CfError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CfError::UnknownType("blob".into());
        assert_eq!(err.to_string(), "Unknown column type: blob");

        let err = CfError::UnsupportedOperation("merge".into());
        assert_eq!(err.to_string(), "Unsupported operation: merge");
    }

    #[test]
    fn test_is_compile_error() {
        assert!(CfError::UnknownType("x".into()).is_compile_error());
        assert!(CfError::Resolution("x".into()).is_compile_error());
        assert!(CfError::UnsupportedOperation("x".into()).is_compile_error());
        assert!(CfError::MalformedPredicate("x".into()).is_compile_error());
        assert!(CfError::MalformedQuery("x".into()).is_compile_error());
        assert!(!CfError::ConfigurationError("x".into()).is_compile_error());
        assert!(!CfError::SerializationError("x".into()).is_compile_error());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: CfError = io_err.into();
        assert!(matches!(err, CfError::IoError(_)));
        assert!(err.to_string().contains("file missing"));
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
        let err: CfError = json_err.into();
        assert!(matches!(err, CfError::SerializationError(_)));
    }
}
