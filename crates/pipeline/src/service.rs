use async_trait::async_trait;
use passport_core::{PassportDocument, PassportFields, ResultEnvelope, SuggestionSet};

/// The two externally-triggered passport operations.
///
/// Implementations never fail: every error is reported inside the envelope.
#[async_trait]
pub trait PassportService: Send + Sync {
    async fn request_extraction(
        &self,
        document: &PassportDocument,
    ) -> ResultEnvelope<PassportFields>;

    async fn request_suggestions(
        &self,
        fields: &PassportFields,
        document: &PassportDocument,
    ) -> ResultEnvelope<SuggestionSet>;
}
