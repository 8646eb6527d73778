//! Record field access errors

/// Error returned by the typed getters on [`Record`](crate::model::Record).
///
/// A field that is present but null is not an error; getters report it as
/// `Ok(None)`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    /// The record has no field with this name.
    #[error("Field '{field}' not found in record")]
    Missing { field: String },

    /// The field holds a value of another kind.
    #[error("Field '{field}' type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        field: String,
        expected: &'static str,
        actual: &'static str,
    },
}

impl FieldError {
    pub fn missing(field: impl Into<String>) -> Self {
        Self::Missing {
            field: field.into(),
        }
    }

    pub fn type_mismatch(field: impl Into<String>, expected: &'static str, actual: &'static str) -> Self {
        Self::TypeMismatch {
            field: field.into(),
            expected,
            actual,
        }
    }

    /// Returns the name of the field the error refers to.
    pub fn field(&self) -> &str {
        match self {
            Self::Missing { field } | Self::TypeMismatch { field, .. } => field,
        }
    }
}
