//! Correction adapter: current field values plus document in, per-field
//! suggestion lists out.

use std::sync::Arc;

use passport_core::error::ValidationError;
use passport_core::validation::validate;
use passport_core::{DateConvention, FieldName, PassportDocument, PassportFields, SuggestionSet};
use serde_json::Value;

use crate::model::{GenerativeModel, ModelError, ModelRequest};
use crate::prompts::{correction_instruction, PromptError};
use crate::schema::suggestion_set_schema;

#[derive(Debug, thiserror::Error)]
pub enum SuggestionError {
    /// The fields were rejected before any model call was made.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Prompt(#[from] PromptError),

    #[error("Suggestion model call failed: {0}")]
    Model(#[from] ModelError),

    #[error("Suggestion model returned no output")]
    MissingOutput,

    #[error("Suggestion output does not match the expected shape: {0}")]
    Shape(String),
}

/// Asks the model for alternative values for every field.
#[derive(Clone)]
pub struct CorrectionAdvisor {
    model: Arc<dyn GenerativeModel>,
    convention: DateConvention,
}

impl CorrectionAdvisor {
    pub fn new(model: Arc<dyn GenerativeModel>, convention: DateConvention) -> Self {
        Self { model, convention }
    }

    /// Request correction suggestions for `fields` as read from `document`.
    ///
    /// `fields` must pass validation; otherwise the call fails with
    /// [`SuggestionError::Validation`] and the model is never contacted.
    /// The returned lists are normalized: a non-empty input field always has
    /// at least one suggestion.
    pub async fn suggest(
        &self,
        fields: &PassportFields,
        document: &PassportDocument,
    ) -> Result<SuggestionSet, SuggestionError> {
        let fields = validate(fields, self.convention)?;

        let request = ModelRequest {
            instruction: correction_instruction(&fields, self.convention)?,
            document: document.clone(),
            output_schema: suggestion_set_schema(self.convention),
        };

        let output = self
            .model
            .generate(&request)
            .await?
            .ok_or(SuggestionError::MissingOutput)?;

        let raw = coerce_suggestions(output)?;
        let set = raw.normalized_against(&fields);

        tracing::debug!(
            model = self.model.name(),
            fields_with_alternatives = FieldName::ALL
                .iter()
                .filter(|f| set.get(**f).len() > 1)
                .count(),
            "Correction suggestions received"
        );
        Ok(set)
    }
}

fn coerce_suggestions(output: Value) -> Result<SuggestionSet, SuggestionError> {
    if !output.is_object() {
        return Err(SuggestionError::Shape("expected an object".to_string()));
    }
    serde_json::from_value(output).map_err(|e| SuggestionError::Shape(e.to_string()))
}
