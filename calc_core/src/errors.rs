//! # Error Types
//!
//! Structured error types for calc_core. Validation and domain failures carry
//! one [`FieldIssue`] per offending field so a form can show every message at
//! once instead of making the user fix problems one round-trip at a time.
//!
//! ## Example
//!
//! ```rust
//! use calc_core::errors::{CalcError, CalcResult, FieldIssue};
//!
//! fn check_weight(weight_kg: f64) -> CalcResult<()> {
//!     if weight_kg <= 0.0 {
//!         return Err(CalcError::domain(
//!             "bmr",
//!             vec![FieldIssue::domain("weightKg", "Weight must be greater than zero")],
//!         ));
//!     }
//!     Ok(())
//! }
//!
//! let err = check_weight(-1.0).unwrap_err();
//! assert_eq!(err.error_code(), "DOMAIN_ERROR");
//! assert_eq!(err.field_issues()[0].field, "weightKg");
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for calc_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Why a single field was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// Required field absent or blank
    Missing,
    /// Value could not be coerced to the field's kind
    Malformed,
    /// Numeric value outside the field's declared min/max
    OutOfRange,
    /// Value is not one of the field's choices
    UnknownChoice,
    /// Text longer than the field allows
    TooLong,
    /// Well-typed value the formula itself cannot accept
    Domain,
}

/// A problem with one input field, suitable for an inline form message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldIssue {
    /// Field identifier the issue belongs to
    pub field: String,
    /// Category of the problem
    pub kind: IssueKind,
    /// Human-readable message
    pub reason: String,
}

impl FieldIssue {
    pub fn new(field: impl Into<String>, kind: IssueKind, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            kind,
            reason: reason.into(),
        }
    }

    /// Required field was not supplied
    pub fn missing(field: impl Into<String>) -> Self {
        Self::new(field, IssueKind::Missing, "This field is required")
    }

    /// Formula-specific range violation
    pub fn domain(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(field, IssueKind::Domain, reason)
    }
}

impl std::fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

/// Structured error type for calculator operations.
///
/// Each variant provides specific context about what went wrong,
/// enabling programmatic handling by front ends and other consumers.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// One or more fields are missing, malformed or outside their declared constraints
    #[error("Invalid input for '{calculator_id}': {}", join_issues(.issues))]
    Validation {
        calculator_id: String,
        issues: Vec<FieldIssue>,
    },

    /// Values are well-typed but outside the range the formula accepts
    #[error("Out of range for '{calculator_id}': {}", join_issues(.issues))]
    Domain {
        calculator_id: String,
        issues: Vec<FieldIssue>,
    },

    /// Unknown calculator identifier
    #[error("Calculator not found: {calculator_id}")]
    NotFound { calculator_id: String },

    /// A calculator with this identifier is already registered
    #[error("Calculator already registered: {calculator_id}")]
    DuplicateCalculator { calculator_id: String },

    /// A calculator definition is malformed (empty, duplicate field ids, ...)
    #[error("Invalid calculator definition '{calculator_id}': {reason}")]
    InvalidDefinition {
        calculator_id: String,
        reason: String,
    },

    /// An export was requested before a successful evaluation
    #[error("No calculation result available")]
    NoResult,

    /// Report compilation or PDF encoding failed
    #[error("Rendering failed during {stage}: {reason}")]
    RenderFailed { stage: String, reason: String },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Generic internal error (should be rare)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

fn join_issues(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(|issue| issue.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

impl CalcError {
    /// Create a Validation error
    pub fn validation(calculator_id: impl Into<String>, issues: Vec<FieldIssue>) -> Self {
        CalcError::Validation {
            calculator_id: calculator_id.into(),
            issues,
        }
    }

    /// Create a Domain error
    pub fn domain(calculator_id: impl Into<String>, issues: Vec<FieldIssue>) -> Self {
        CalcError::Domain {
            calculator_id: calculator_id.into(),
            issues,
        }
    }

    /// Create a NotFound error
    pub fn not_found(calculator_id: impl Into<String>) -> Self {
        CalcError::NotFound {
            calculator_id: calculator_id.into(),
        }
    }

    /// Create an InvalidDefinition error
    pub fn invalid_definition(calculator_id: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidDefinition {
            calculator_id: calculator_id.into(),
            reason: reason.into(),
        }
    }

    /// Create a RenderFailed error
    pub fn render_failed(stage: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::RenderFailed {
            stage: stage.into(),
            reason: reason.into(),
        }
    }

    /// True when the user can fix the problem by correcting form input
    pub fn is_user_correctable(&self) -> bool {
        matches!(self, CalcError::Validation { .. } | CalcError::Domain { .. })
    }

    /// Per-field issues for inline form messages (empty for non-field errors)
    pub fn field_issues(&self) -> &[FieldIssue] {
        match self {
            CalcError::Validation { issues, .. } | CalcError::Domain { issues, .. } => issues,
            _ => &[],
        }
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::Validation { .. } => "VALIDATION_ERROR",
            CalcError::Domain { .. } => "DOMAIN_ERROR",
            CalcError::NotFound { .. } => "NOT_FOUND",
            CalcError::DuplicateCalculator { .. } => "DUPLICATE_CALCULATOR",
            CalcError::InvalidDefinition { .. } => "INVALID_DEFINITION",
            CalcError::NoResult => "NO_RESULT",
            CalcError::RenderFailed { .. } => "RENDER_FAILED",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
            CalcError::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

impl From<serde_json::Error> for CalcError {
    fn from(err: serde_json::Error) -> Self {
        CalcError::SerializationError {
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = CalcError::validation(
            "bmr",
            vec![FieldIssue::missing("age"), FieldIssue::new("sex", IssueKind::UnknownChoice, "Pick one")],
        );
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"type\":\"Validation\""));
        assert!(json.contains("\"kind\":\"unknown_choice\""));
        let roundtrip: CalcError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(CalcError::not_found("x").error_code(), "NOT_FOUND");
        assert_eq!(CalcError::NoResult.error_code(), "NO_RESULT");
        assert_eq!(CalcError::domain("meal", vec![]).error_code(), "DOMAIN_ERROR");
    }

    #[test]
    fn test_display_lists_every_issue() {
        let error = CalcError::validation(
            "bmr",
            vec![FieldIssue::missing("age"), FieldIssue::missing("sex")],
        );
        let message = error.to_string();
        assert!(message.contains("age: This field is required"));
        assert!(message.contains("sex: This field is required"));
    }

    #[test]
    fn test_user_correctable() {
        assert!(CalcError::validation("bmr", vec![]).is_user_correctable());
        assert!(CalcError::domain("bmr", vec![]).is_user_correctable());
        assert!(!CalcError::not_found("bmr").is_user_correctable());
        assert!(CalcError::not_found("bmr").field_issues().is_empty());
    }
}
