//! HTTP client for the passport API.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use passport_core::{DateConvention, PassportDocument, PassportFields, ResultEnvelope, SuggestionSet};
use passport_pipeline::{PassportService, EXTRACTION_FAILED_MESSAGE, SUGGESTIONS_FAILED_MESSAGE};

use crate::config::ProcessorConfig;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Passport API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Passport API sent an unusable response: {0}")]
    InvalidResponse(String),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExtractRequest {
    passport_data_uri: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SuggestionsRequest<'a> {
    #[serde(flatten)]
    fields: &'a PassportFields,
    passport_image: String,
}

#[derive(Deserialize)]
struct DataEnvelope<T> {
    data: T,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FormConfig {
    date_format: String,
}

/// [`PassportService`] backed by a running `passport-api`.
///
/// Transport and protocol failures are logged and collapse to the same
/// fixed messages the server uses, so callers cannot tell a dropped
/// connection from a failed model call.
#[derive(Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &ProcessorConfig) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self::with_client(client, &config.api_url))
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Ask the server which date convention it validates with.
    pub async fn date_convention(&self) -> Result<DateConvention, ClientError> {
        let url = format!("{}/api/v1/passport/config", self.base_url);
        let response = self.client.get(&url).send().await?;
        let config: DataEnvelope<FormConfig> = Self::parse_response(response).await?;
        config
            .data
            .date_format
            .parse()
            .map_err(ClientError::InvalidResponse)
    }

    async fn post_envelope<B, T>(&self, path: &str, body: &B) -> Result<ResultEnvelope<T>, ClientError>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned + Send,
    {
        let url = format!("{}{path}", self.base_url);
        let response = self.client.post(&url).json(body).send().await?;
        Self::parse_response(response).await
    }

    /// Return the response unchanged on 2xx, or an [`ClientError::Api`]
    /// carrying the status and body text.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(ClientError::Api {
            status: status.as_u16(),
            body,
        })
    }

    async fn parse_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl PassportService for ApiClient {
    async fn request_extraction(
        &self,
        document: &PassportDocument,
    ) -> ResultEnvelope<PassportFields> {
        let body = ExtractRequest {
            passport_data_uri: document.to_data_uri(),
        };
        match self.post_envelope("/api/v1/passport/extract", &body).await {
            Ok(envelope) => envelope,
            Err(e) => {
                tracing::error!(error = %e, "Extraction request to passport API failed");
                ResultEnvelope::failure(EXTRACTION_FAILED_MESSAGE)
            }
        }
    }

    async fn request_suggestions(
        &self,
        fields: &PassportFields,
        document: &PassportDocument,
    ) -> ResultEnvelope<SuggestionSet> {
        let body = SuggestionsRequest {
            fields,
            passport_image: document.to_data_uri(),
        };
        match self.post_envelope("/api/v1/passport/suggestions", &body).await {
            Ok(envelope) => envelope,
            Err(e) => {
                tracing::error!(error = %e, "Suggestion request to passport API failed");
                ResultEnvelope::failure(SUGGESTIONS_FAILED_MESSAGE)
            }
        }
    }
}
