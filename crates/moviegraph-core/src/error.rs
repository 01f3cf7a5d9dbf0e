use thiserror::Error;

/// Malformed or incomplete input, detected before any store access.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required field `{field}` is missing or empty")]
    MissingField { field: String },
}

impl ValidationError {
    pub fn missing(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }
}
