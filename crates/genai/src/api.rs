//! REST client for the Generative Language `generateContent` endpoint.
//!
//! Wraps the HTTP API using [`reqwest`] and implements
//! [`GenerativeModel`] on top of it.

use std::time::Duration;

use async_trait::async_trait;

use crate::config::GenAiConfig;
use crate::messages::{parse_model_json, GenerateContentRequest, GenerateContentResponse};
use crate::model::{GenerativeModel, ModelError, ModelRequest};

/// HTTP client for one hosted model.
pub struct GeminiApi {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiApi {
    /// Create a client with its own connection pool and request timeout.
    pub fn new(config: &GenAiConfig) -> Result<Self, ModelError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self::with_client(client, config))
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, config: &GenAiConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
        }
    }

    /// Full URL of the `generateContent` method for the configured model.
    pub fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    /// Send a `generateContent` request and decode the response body.
    pub async fn generate_content(
        &self,
        body: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, ModelError> {
        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code, returning a
    /// [`ModelError::Api`] with the status and body text otherwise.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, ModelError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(ModelError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ModelError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl GenerativeModel for GeminiApi {
    fn name(&self) -> &str {
        &self.model
    }

    async fn generate(
        &self,
        request: &ModelRequest,
    ) -> Result<Option<serde_json::Value>, ModelError> {
        let body = GenerateContentRequest::from_model_request(request);

        tracing::debug!(
            model = %self.model,
            mime_type = request.document.mime_type(),
            payload_len = request.document.payload().len(),
            "Calling generateContent"
        );

        let response = self.generate_content(&body).await?;
        match response.output_text()? {
            Some(text) => parse_model_json(&text),
            None => Ok(None),
        }
    }
}
