// ============================================================
// Layer 3 — Domain Errors
// ============================================================
// ValidationError  → the caller sent a bad record (recoverable,
//                    reported with field-level detail)
// InferenceError   → the pipeline rejected a record that passed
//                    validation (per-request, never fatal)

use thiserror::Error;

/// A partial input could not be turned into a complete record.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("missing required field '{field}'")]
    MissingField { field: String },

    #[error("'{value}' is not an allowed value for '{field}'")]
    InvalidCategory { field: String, value: String },

    #[error("'{field}' must be {expected}, got {found}")]
    InvalidType {
        field:    String,
        expected: &'static str,
        found:    String,
    },
}

impl ValidationError {
    /// Name of the offending field.
    pub fn field(&self) -> &str {
        match self {
            Self::MissingField { field }
            | Self::InvalidCategory { field, .. }
            | Self::InvalidType { field, .. } => field,
        }
    }

    /// Stable, machine-readable error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingField { .. } => "missing_field",
            Self::InvalidCategory { .. } => "invalid_category",
            Self::InvalidType { .. } => "invalid_type",
        }
    }
}

/// The model could not score a record.
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("record has {found} fields, pipeline expects {expected}")]
    ShapeMismatch { expected: usize, found: usize },

    #[error("record field '{field}' sits where the pipeline expects '{column}'")]
    ColumnMismatch { field: String, column: String },

    #[error("field '{field}' holds a value the pipeline cannot encode as {expected}")]
    ValueKind { field: String, expected: &'static str },

    #[error("model backend failed: {0}")]
    Backend(String),

    #[error("model produced class index {index} but only {classes} classes are known")]
    UnknownClass { index: usize, classes: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_and_kind() {
        let err = ValidationError::InvalidCategory {
            field: "workclass".into(),
            value: "Retired".into(),
        };
        assert_eq!(err.field(), "workclass");
        assert_eq!(err.kind(), "invalid_category");
        assert_eq!(err.to_string(), "'Retired' is not an allowed value for 'workclass'");
    }

    #[test]
    fn test_missing_field_message() {
        let err = ValidationError::MissingField { field: "sex".into() };
        assert_eq!(err.kind(), "missing_field");
        assert_eq!(err.to_string(), "missing required field 'sex'");
    }
}
