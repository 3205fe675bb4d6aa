use std::fmt;

use serde::Serialize;

use crate::fields::FieldName;

/// A single field-level rule violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: FieldName,
    pub message: String,
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field.as_str(), self.message)
    }
}

/// One or more passport fields failed validation.
///
/// Violations are kept in field order so the first entry is the first field
/// a user would see on the form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}", join_messages(.violations))]
pub struct ValidationError {
    pub violations: Vec<FieldViolation>,
}

impl ValidationError {
    /// Whether `field` is among the failing fields.
    pub fn names(&self, field: FieldName) -> bool {
        self.violations.iter().any(|v| v.field == field)
    }

    /// The message attached to `field`, if it failed.
    pub fn message_for(&self, field: FieldName) -> Option<&str> {
        self.violations
            .iter()
            .find(|v| v.field == field)
            .map(|v| v.message.as_str())
    }
}

fn join_messages(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|v| v.message.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Errors raised while parsing a `data:<mime>;base64,<payload>` string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DocumentError {
    #[error("Document must be a data URI starting with 'data:'")]
    MissingScheme,

    #[error("Document data URI must be Base64 encoded")]
    NotBase64,

    #[error("Unsupported document type '{0}' (expected an image or PDF)")]
    UnsupportedMimeType(String),

    #[error("Document payload is empty")]
    EmptyPayload,

    #[error("Document payload is not valid Base64: {0}")]
    InvalidPayload(String),
}

/// Domain-level errors surfaced across crate boundaries.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Invalid document: {0}")]
    Document(#[from] DocumentError),
}
