//! Provider-independent seam between the adapters and a generative model.

use async_trait::async_trait;
use passport_core::PassportDocument;

/// One instruction-plus-document call with a constrained output shape.
#[derive(Debug, Clone)]
pub struct ModelRequest {
    /// Natural-language instruction, already rendered.
    pub instruction: String,
    /// The passport image or PDF to send inline.
    pub document: PassportDocument,
    /// JSON schema the output must follow.
    pub output_schema: serde_json::Value,
}

/// Errors from the model transport layer.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The model API returned a non-2xx status code.
    #[error("Model API error ({status}): {body}")]
    Api {
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The prompt or response was blocked by the provider.
    #[error("Model response blocked: {0}")]
    Blocked(String),

    /// The model produced text that is not JSON.
    #[error("Model output is not valid JSON: {0}")]
    InvalidJson(String),

    /// No model could be reached.
    #[error("Model unavailable: {0}")]
    Unavailable(String),
}

/// A hosted model that accepts an instruction, an inline document and an
/// output schema, and returns structured output.
///
/// `Ok(None)` means the call succeeded but produced no output; adapters treat
/// that as a contract violation rather than defaulting.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    /// Model identifier, for logs and the health route.
    fn name(&self) -> &str;

    async fn generate(
        &self,
        request: &ModelRequest,
    ) -> Result<Option<serde_json::Value>, ModelError>;
}
