//! Catch-and-wrap orchestration around the extraction and correction
//! adapters.

use std::sync::Arc;

use async_trait::async_trait;
use passport_core::validation::validate;
use passport_core::{
    DateConvention, PassportDocument, PassportFields, ResultEnvelope, SuggestionSet,
};
use passport_genai::{CorrectionAdvisor, GenerativeModel, PassportExtractor};

use crate::service::PassportService;

/// Message returned for every extraction failure.
pub const EXTRACTION_FAILED_MESSAGE: &str = "Failed to extract passport data. Please try again.";

/// Message returned for every suggestion failure, validation included.
pub const SUGGESTIONS_FAILED_MESSAGE: &str = "Failed to get suggestions. Please try again.";

/// Server-side entry points for the two passport operations.
///
/// Error details are logged and never returned; callers only ever see the
/// fixed messages above.
#[derive(Clone)]
pub struct PassportActions {
    extractor: PassportExtractor,
    advisor: CorrectionAdvisor,
    convention: DateConvention,
    model_name: String,
}

impl PassportActions {
    pub fn new(model: Arc<dyn GenerativeModel>, convention: DateConvention) -> Self {
        Self {
            model_name: model.name().to_string(),
            extractor: PassportExtractor::new(Arc::clone(&model), convention),
            advisor: CorrectionAdvisor::new(model, convention),
            convention,
        }
    }

    pub fn convention(&self) -> DateConvention {
        self.convention
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// Extract the passport fields from `document`.
    pub async fn request_extraction(
        &self,
        document: &PassportDocument,
    ) -> ResultEnvelope<PassportFields> {
        match self.extractor.extract(document).await {
            Ok(fields) => {
                tracing::info!(mime_type = document.mime_type(), "Passport extraction succeeded");
                ResultEnvelope::success(fields)
            }
            Err(e) => {
                tracing::error!(error = %e, mime_type = document.mime_type(), "Passport extraction failed");
                ResultEnvelope::failure(EXTRACTION_FAILED_MESSAGE)
            }
        }
    }

    /// Suggest corrections for `fields`.
    ///
    /// Invalid fields are rejected here without contacting the model.
    pub async fn request_suggestions(
        &self,
        fields: &PassportFields,
        document: &PassportDocument,
    ) -> ResultEnvelope<SuggestionSet> {
        let fields = match validate(fields, self.convention) {
            Ok(fields) => fields,
            Err(e) => {
                tracing::error!(error = %e, "Suggestion request rejected by validation");
                return ResultEnvelope::failure(SUGGESTIONS_FAILED_MESSAGE);
            }
        };

        match self.advisor.suggest(&fields, document).await {
            Ok(set) => {
                tracing::info!("Correction suggestions succeeded");
                ResultEnvelope::success(set)
            }
            Err(e) => {
                tracing::error!(error = %e, "Correction suggestions failed");
                ResultEnvelope::failure(SUGGESTIONS_FAILED_MESSAGE)
            }
        }
    }
}

#[async_trait]
impl PassportService for PassportActions {
    async fn request_extraction(
        &self,
        document: &PassportDocument,
    ) -> ResultEnvelope<PassportFields> {
        PassportActions::request_extraction(self, document).await
    }

    async fn request_suggestions(
        &self,
        fields: &PassportFields,
        document: &PassportDocument,
    ) -> ResultEnvelope<SuggestionSet> {
        PassportActions::request_suggestions(self, fields, document).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use passport_genai::{ModelError, ModelRequest};
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};

    enum Reply {
        Output(Value),
        NetworkError,
    }

    struct StubModel {
        reply: Reply,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl GenerativeModel for StubModel {
        fn name(&self) -> &str {
            "stub-model"
        }

        async fn generate(&self, _request: &ModelRequest) -> Result<Option<Value>, ModelError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.reply {
                Reply::Output(v) => Ok(Some(v.clone())),
                Reply::NetworkError => Err(ModelError::Unavailable("connection reset".into())),
            }
        }
    }

    fn actions(reply: Reply) -> (PassportActions, Arc<StubModel>) {
        let model = Arc::new(StubModel {
            reply,
            calls: AtomicUsize::new(0),
        });
        (PassportActions::new(model.clone(), DateConvention::Iso), model)
    }

    fn document() -> PassportDocument {
        PassportDocument::from_bytes("image/png", b"png").unwrap()
    }

    fn john() -> PassportFields {
        PassportFields {
            first_name: "JOHN".into(),
            last_name: "DOE".into(),
            date_of_birth: "1990-01-02".into(),
            passport_number: "A1234567".into(),
            expiration_date: "2030-01-02".into(),
        }
    }

    #[tokio::test]
    async fn extraction_success_is_wrapped() {
        let (actions, _) = actions(Reply::Output(serde_json::to_value(john()).unwrap()));
        let envelope = actions.request_extraction(&document()).await;
        assert_eq!(envelope, ResultEnvelope::success(john()));
        assert_eq!(actions.model_name(), "stub-model");
    }

    #[tokio::test]
    async fn extraction_network_error_becomes_fixed_message() {
        let (actions, _) = actions(Reply::NetworkError);
        let envelope = actions.request_extraction(&document()).await;
        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            json!({"ok": false, "error": "Failed to extract passport data. Please try again."})
        );
    }

    #[tokio::test]
    async fn extraction_shape_mismatch_becomes_fixed_message() {
        let (actions, _) = actions(Reply::Output(json!("JOHN DOE")));
        let envelope = actions.request_extraction(&document()).await;
        assert_eq!(envelope.error(), Some(EXTRACTION_FAILED_MESSAGE));
    }

    #[tokio::test]
    async fn invalid_date_short_circuits_suggestions() {
        let (actions, model) = actions(Reply::Output(json!({})));
        let mut fields = john();
        fields.date_of_birth = "1990-13-40".into();

        let envelope = actions.request_suggestions(&fields, &document()).await;

        assert_eq!(envelope.error(), Some(SUGGESTIONS_FAILED_MESSAGE));
        assert_eq!(model.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn suggestions_success_is_wrapped_and_normalized() {
        let (actions, model) = actions(Reply::Output(json!({
            "passportNumberSuggestions": ["A1234567", "A1234561"]
        })));

        let envelope = actions.request_suggestions(&john(), &document()).await;

        let set = envelope.value().expect("suggestions should succeed");
        assert_eq!(set.passport_number_suggestions, vec!["A1234567", "A1234561"]);
        assert_eq!(set.first_name_suggestions, vec!["JOHN"]);
        assert_eq!(model.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn suggestion_model_failure_becomes_fixed_message() {
        let (actions, _) = actions(Reply::NetworkError);
        let envelope = actions.request_suggestions(&john(), &document()).await;
        assert_eq!(envelope.error(), Some(SUGGESTIONS_FAILED_MESSAGE));
    }

    #[tokio::test]
    async fn usable_through_the_service_trait() {
        let (actions, _) = actions(Reply::Output(serde_json::to_value(john()).unwrap()));
        let service: Arc<dyn PassportService> = Arc::new(actions);
        assert_matches!(
            service.request_extraction(&document()).await,
            ResultEnvelope::Success { value } if value == john()
        );
    }
}
