//! Extraction adapter: passport document in, five fields out.

use std::sync::Arc;

use passport_core::{DateConvention, FieldName, PassportDocument, PassportFields};
use serde_json::Value;

use crate::model::{GenerativeModel, ModelError, ModelRequest};
use crate::prompts::{extraction_instruction, PromptError};
use crate::schema::passport_fields_schema;

#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error(transparent)]
    Prompt(#[from] PromptError),

    #[error("Extraction model call failed: {0}")]
    Model(#[from] ModelError),

    #[error("Extraction model returned no output")]
    MissingOutput,

    #[error("Extraction output does not match the passport shape: {0}")]
    Shape(String),
}

/// Turns a passport document into [`PassportFields`] with one model call.
#[derive(Clone)]
pub struct PassportExtractor {
    model: Arc<dyn GenerativeModel>,
    convention: DateConvention,
}

impl PassportExtractor {
    pub fn new(model: Arc<dyn GenerativeModel>, convention: DateConvention) -> Self {
        Self { model, convention }
    }

    /// Ask the model to read the five fields from `document`.
    ///
    /// Fields the model could not read come back as empty strings. The
    /// result is not validated: an extraction with blank fields is still a
    /// successful extraction the user can complete by hand.
    pub async fn extract(
        &self,
        document: &PassportDocument,
    ) -> Result<PassportFields, ExtractionError> {
        let request = ModelRequest {
            instruction: extraction_instruction(self.convention)?,
            document: document.clone(),
            output_schema: passport_fields_schema(self.convention),
        };

        let output = self
            .model
            .generate(&request)
            .await?
            .ok_or(ExtractionError::MissingOutput)?;

        let fields = coerce_fields(&output)?;
        tracing::debug!(
            model = self.model.name(),
            blank_fields = FieldName::ALL.iter().filter(|f| fields.get(**f).is_empty()).count(),
            "Passport fields extracted"
        );
        Ok(fields)
    }
}

/// Coerce model output into [`PassportFields`].
///
/// The output must be a JSON object. Missing and `null` members become empty
/// strings; any other non-string member is a shape mismatch.
fn coerce_fields(output: &Value) -> Result<PassportFields, ExtractionError> {
    let object = output
        .as_object()
        .ok_or_else(|| ExtractionError::Shape(format!("expected an object, got {}", kind(output))))?;

    let mut fields = PassportFields::default();
    for field in FieldName::ALL {
        match object.get(field.as_str()) {
            None | Some(Value::Null) => {}
            Some(Value::String(s)) => fields.set(field, s.trim()),
            Some(other) => {
                return Err(ExtractionError::Shape(format!(
                    "{} must be a string, got {}",
                    field.as_str(),
                    kind(other)
                )))
            }
        }
    }
    Ok(fields)
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
