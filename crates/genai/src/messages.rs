//! Typed request and response bodies for the `generateContent` endpoint.
//!
//! Only the subset of the wire format this service uses is modelled;
//! unknown response fields are ignored.

use serde::{Deserialize, Serialize};

use crate::model::{ModelError, ModelRequest};

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// A single content part: either text or inline binary data.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: Blob,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blob {
    pub mime_type: String,
    /// Base64 payload.
    pub data: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub response_mime_type: String,
    pub response_schema: serde_json::Value,
    pub temperature: f32,
}

impl GenerateContentRequest {
    /// Build the wire body for a [`ModelRequest`]: the instruction followed
    /// by the document, with JSON output constrained to the request schema.
    pub fn from_model_request(request: &ModelRequest) -> Self {
        Self {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![
                    Part::Text {
                        text: request.instruction.clone(),
                    },
                    Part::InlineData {
                        inline_data: Blob {
                            mime_type: request.document.mime_type().to_string(),
                            data: request.document.payload().to_string(),
                        },
                    },
                ],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: request.output_schema.clone(),
                temperature: 0.0,
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Response
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    #[serde(default)]
    pub block_reason: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate, or `None` when the model
    /// produced no text.
    ///
    /// A prompt blocked before generation is reported as
    /// [`ModelError::Blocked`].
    pub fn output_text(&self) -> Result<Option<String>, ModelError> {
        if let Some(reason) = self
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_ref())
        {
            return Err(ModelError::Blocked(reason.clone()));
        }

        let Some(candidate) = self.candidates.first() else {
            return Ok(None);
        };

        let text: String = candidate
            .content
            .iter()
            .flat_map(|c| c.parts.iter())
            .filter_map(|part| match part {
                Part::Text { text } => Some(text.as_str()),
                Part::InlineData { .. } => None,
            })
            .collect();

        if text.trim().is_empty() {
            if let Some(reason) = candidate
                .finish_reason
                .as_deref()
                .filter(|r| matches!(*r, "SAFETY" | "RECITATION" | "PROHIBITED_CONTENT"))
            {
                return Err(ModelError::Blocked(reason.to_string()));
            }
            return Ok(None);
        }
        Ok(Some(text))
    }
}

/// Parse model text as JSON, tolerating a surrounding markdown code fence.
///
/// A literal `null` is reported as no output.
pub fn parse_model_json(text: &str) -> Result<Option<serde_json::Value>, ModelError> {
    let json_str = if text.contains("```json") {
        text.split("```json")
            .nth(1)
            .and_then(|s| s.split("```").next())
            .unwrap_or(text)
            .trim()
    } else if text.contains("```") {
        text.split("```").nth(1).unwrap_or(text).trim()
    } else {
        text.trim()
    };

    let value: serde_json::Value = serde_json::from_str(json_str).map_err(|e| {
        ModelError::InvalidJson(format!(
            "{e}: {}",
            json_str.chars().take(200).collect::<String>()
        ))
    })?;

    Ok((!value.is_null()).then_some(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use passport_core::PassportDocument;
    use serde_json::json;

    #[test]
    fn request_body_embeds_instruction_and_document() {
        let request = ModelRequest {
            instruction: "Extract.".into(),
            document: PassportDocument::from_data_uri("data:image/png;base64,AAAA").unwrap(),
            output_schema: json!({"type": "OBJECT"}),
        };

        let body = serde_json::to_value(GenerateContentRequest::from_model_request(&request)).unwrap();

        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "Extract.");
        assert_eq!(body["contents"][0]["parts"][1]["inlineData"]["mimeType"], "image/png");
        assert_eq!(body["contents"][0]["parts"][1]["inlineData"]["data"], "AAAA");
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(body["generationConfig"]["responseSchema"]["type"], "OBJECT");
    }

    #[test]
    fn output_text_joins_text_parts() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "{\"a\":"}, {"text": "1}"}]},
                "finishReason": "STOP"
            }]
        }))
        .unwrap();
        assert_eq!(response.output_text().unwrap().as_deref(), Some("{\"a\":1}"));
    }

    #[test]
    fn output_text_is_none_without_candidates() {
        let response: GenerateContentResponse = serde_json::from_value(json!({})).unwrap();
        assert_matches!(response.output_text(), Ok(None));
    }

    #[test]
    fn blocked_prompt_is_an_error() {
        let response: GenerateContentResponse =
            serde_json::from_value(json!({"promptFeedback": {"blockReason": "SAFETY"}})).unwrap();
        assert_matches!(response.output_text(), Err(ModelError::Blocked(r)) if r == "SAFETY");
    }

    #[test]
    fn parses_fenced_json() {
        let value = parse_model_json("```json\n{\"firstName\": \"JOHN\"}\n```").unwrap();
        assert_eq!(value.unwrap()["firstName"], "JOHN");
    }

    #[test]
    fn null_output_is_none_and_garbage_is_an_error() {
        assert_matches!(parse_model_json("null"), Ok(None));
        assert_matches!(parse_model_json("I could not read it"), Err(ModelError::InvalidJson(_)));
    }
}
