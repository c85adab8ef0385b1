//! # Error Types
//!
//! Structured error types for pave_core. Every failure names the field or
//! operation involved so a caller (CLI, GUI, or an LLM driving the JSON API)
//! can report it without parsing message strings.
//!
//! ## Example
//!
//! ```rust
//! use pave_core::errors::{CalcError, CalcResult};
//!
//! fn validate_modulus(mr_psi: f64) -> CalcResult<()> {
//!     if mr_psi <= 0.0 {
//!         return Err(CalcError::invalid_input(
//!             "mr_psi",
//!             mr_psi.to_string(),
//!             "Resilient modulus must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//!
//! assert!(validate_modulus(-1.0).is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for pave_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for pavement design operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// An input value is invalid (outside its domain or its documented range)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A required field is missing
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// Calculation could not produce a result
    #[error("Calculation failed: {calculation_type} - {reason}")]
    CalculationFailed {
        calculation_type: String,
        reason: String,
    },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Generic internal error (should be rare)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl CalcError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        CalcError::MissingField {
            field: field.into(),
        }
    }

    /// Create a CalculationFailed error
    pub fn calculation_failed(calculation_type: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::CalculationFailed {
            calculation_type: calculation_type.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Name of the offending field, if the error concerns one
    pub fn field(&self) -> Option<&str> {
        match self {
            CalcError::InvalidInput { field, .. } | CalcError::MissingField { field } => Some(field),
            _ => None,
        }
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::MissingField { .. } => "MISSING_FIELD",
            CalcError::CalculationFailed { .. } => "CALCULATION_FAILED",
            CalcError::FileError { .. } => "FILE_ERROR",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
            CalcError::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

impl From<serde_json::Error> for CalcError {
    fn from(e: serde_json::Error) -> Self {
        CalcError::SerializationError { reason: e.to_string() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = CalcError::invalid_input("delta_psi", "-0.5", "Serviceability loss must be positive");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"type\":\"InvalidInput\""));
        let roundtrip: CalcError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(CalcError::missing_field("w18").error_code(), "MISSING_FIELD");
        assert_eq!(
            CalcError::calculation_failed("Sensitivity", "too few points").error_code(),
            "CALCULATION_FAILED"
        );
        assert_eq!(CalcError::file_error("open", "x.json", "not found").error_code(), "FILE_ERROR");
    }

    #[test]
    fn test_error_field() {
        let error = CalcError::invalid_input("mr_psi", "0", "must be positive");
        assert_eq!(error.field(), Some("mr_psi"));
        assert_eq!(CalcError::Internal { message: "x".into() }.field(), None);
    }

    #[test]
    fn test_display_message() {
        let error = CalcError::invalid_input("w18", "-1", "Design traffic must be positive");
        assert_eq!(
            error.to_string(),
            "Invalid input for 'w18': -1 - Design traffic must be positive"
        );
    }

    #[test]
    fn test_from_serde_error() {
        let parse: Result<f64, _> = serde_json::from_str::<f64>("not json");
        let error: CalcError = parse.unwrap_err().into();
        assert_eq!(error.error_code(), "SERIALIZATION_ERROR");
    }
}
