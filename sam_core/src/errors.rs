//! # Error Types
//!
//! Structured error types for sam_core. Every fallible operation in the
//! engine returns [`SamResult`], and each variant carries enough context to
//! tie the failure back to the offending wall, field, or option without
//! parsing message strings.
//!
//! Errors are per-wall and recoverable: a batch caller analyzing many walls
//! is expected to catch the error for one wall and keep going (see the
//! `sam_cli` batch runner).
//!
//! ## Example
//!
//! ```rust
//! use sam_core::errors::{SamError, SamResult};
//!
//! fn validate_thickness(thickness: f64) -> SamResult<()> {
//!     if thickness <= 0.0 {
//!         return Err(SamError::invalid_input(
//!             "thickness",
//!             thickness.to_string(),
//!             "Thickness must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for sam_core operations
pub type SamResult<T> = Result<T, SamError>;

/// Structured error type for the verification engine.
///
/// Serializes with a `type`/`details` envelope so downstream consumers
/// (batch runners, GUIs, report generators) can match on the kind
/// programmatically.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum SamError {
    /// An input value is invalid (out of range, wrong sign, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// The wall defines neither piers nor spandrels
    #[error("Wall has no structural components: at least one pier or spandrel is required")]
    EmptyWall,

    /// Masonry typology preset not found in the database
    #[error("Masonry typology not found: {name}")]
    TypologyNotFound { name: String },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },
}

impl SamError {
    /// Create an InvalidInput error
    pub fn invalid_input(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        SamError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a TypologyNotFound error
    pub fn typology_not_found(name: impl Into<String>) -> Self {
        SamError::TypologyNotFound { name: name.into() }
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            SamError::InvalidInput { .. } => "INVALID_INPUT",
            SamError::EmptyWall => "EMPTY_WALL",
            SamError::TypologyNotFound { .. } => "TYPOLOGY_NOT_FOUND",
            SamError::SerializationError { .. } => "SERIALIZATION_ERROR",
        }
    }
}

impl From<serde_json::Error> for SamError {
    fn from(err: serde_json::Error) -> Self {
        SamError::SerializationError {
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = SamError::invalid_input("gamma_m", "0.0", "gamma_m must be >= 1");
        let json = serde_json::to_string(&error).unwrap();
        let roundtrip: SamError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(SamError::EmptyWall.error_code(), "EMPTY_WALL");
        assert_eq!(
            SamError::typology_not_found("tuff").error_code(),
            "TYPOLOGY_NOT_FOUND"
        );
    }

    #[test]
    fn test_display_contains_context() {
        let error = SamError::invalid_input("FC", "-1", "FC must be >= 1");
        let msg = error.to_string();
        assert!(msg.contains("FC"));
        assert!(msg.contains("-1"));
    }
}
