//! Error types for the form builder core

use std::collections::BTreeMap;

use thiserror::Error;

/// Result type alias using FormsError
pub type Result<T> = std::result::Result<T, FormsError>;

/// Errors surfaced by core operations
///
/// Ownership mismatches are reported as `NotFound` so callers cannot probe
/// for the existence of other owners' forms.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormsError {
    /// The JSON document is not shaped like a form definition
    #[error("Malformed form schema: {0}")]
    SchemaShape(String),

    /// One field entry could not be interpreted
    #[error("Malformed field at {path}: {reason}")]
    SchemaField { path: String, reason: String },

    /// The text generator failed or returned unusable output
    #[error("Form generation failed: {0}")]
    Generation(String),

    #[error("Form not found")]
    NotFound,

    #[error("Form is not published")]
    NotPublished,

    /// A required argument was missing or empty
    #[error("{0}")]
    InvalidInput(String),

    /// Step navigation outside the form's steps
    #[error("Step {index} is out of range ({step_count} steps)")]
    InvalidStep { index: usize, step_count: usize },

    /// No authenticated identity was supplied for an owner-scoped operation
    #[error("Authentication required")]
    Unauthenticated,

    /// Per-field validation failures, keyed by field name
    #[error("Submission failed validation for {} field(s)", .0.len())]
    Validation(BTreeMap<String, String>),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl FormsError {
    /// Stable machine-readable code for API envelopes
    pub fn code(&self) -> &'static str {
        match self {
            Self::SchemaShape(_) => "schema_shape",
            Self::SchemaField { .. } => "schema_field",
            Self::Generation(_) => "generation_failed",
            Self::NotFound => "not_found",
            Self::NotPublished => "not_published",
            Self::InvalidInput(_) => "invalid_input",
            Self::InvalidStep { .. } => "invalid_step",
            Self::Unauthenticated => "unauthenticated",
            Self::Validation(_) => "validation_failed",
            Self::Storage(_) => "storage_error",
        }
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn schema_field(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::SchemaField {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_published_message() {
        let err = FormsError::NotPublished;
        assert!(err.to_string().contains("not published"));
        assert_eq!(err.code(), "not_published");
    }

    #[test]
    fn test_validation_message_counts_fields() {
        let mut errors = BTreeMap::new();
        errors.insert("email".to_string(), "Email is required".to_string());
        errors.insert("name".to_string(), "Name is required".to_string());
        let err = FormsError::Validation(errors);
        assert_eq!(err.to_string(), "Submission failed validation for 2 field(s)");
    }
}
