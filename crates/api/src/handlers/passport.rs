//! Handlers for passport extraction and correction suggestions.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use passport_core::document::ACCEPTED_MIME_TYPES;
use passport_core::error::CoreError;
use passport_core::{FieldName, PassportDocument, PassportFields};

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response bodies
// ---------------------------------------------------------------------------

/// Body for `POST /passport/extract`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractBody {
    pub passport_data_uri: String,
}

/// Body for `POST /passport/suggestions`: the current fields plus the
/// document they were read from.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionsBody {
    #[serde(flatten)]
    pub fields: PassportFields,
    pub passport_image: String,
}

/// One entry of the form description.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    pub key: FieldName,
    pub label: &'static str,
    pub placeholder: Option<&'static str>,
}

/// Everything a client needs to render the passport form.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormConfig {
    pub date_format: &'static str,
    pub accepted_mime_types: &'static str,
    pub fields: Vec<FieldDescriptor>,
}

fn parse_document(uri: &str) -> AppResult<PassportDocument> {
    PassportDocument::from_data_uri(uri).map_err(|e| {
        tracing::debug!(error = %e, "Rejected passport document");
        CoreError::from(e).into()
    })
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /passport/config
///
/// Describe the form: field order, labels, placeholders, the date format
/// the server validates against and the accepted upload types.
pub async fn form_config(State(state): State<AppState>) -> impl IntoResponse {
    let fields = FieldName::ALL
        .into_iter()
        .map(|key| FieldDescriptor {
            key,
            label: key.label(),
            placeholder: key.placeholder(),
        })
        .collect();

    Json(DataResponse {
        data: FormConfig {
            date_format: state.config.date_convention.pattern(),
            accepted_mime_types: ACCEPTED_MIME_TYPES,
            fields,
        },
    })
}

/// POST /passport/extract
///
/// Read the five passport fields from an uploaded document. Model failures
/// come back as `{ok: false, error}` with a `200` status.
pub async fn extract(
    State(state): State<AppState>,
    payload: Result<Json<ExtractBody>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(body) = payload?;
    let document = parse_document(&body.passport_data_uri)?;
    tracing::info!(mime_type = document.mime_type(), "Passport extraction requested");

    let envelope = state.actions.request_extraction(&document).await;
    Ok(Json(envelope))
}

/// POST /passport/suggestions
///
/// Suggest corrections for the submitted fields. Invalid fields and model
/// failures come back as `{ok: false, error}` with a `200` status.
pub async fn suggestions(
    State(state): State<AppState>,
    payload: Result<Json<SuggestionsBody>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(body) = payload?;
    let document = parse_document(&body.passport_image)?;
    tracing::info!(mime_type = document.mime_type(), "Correction suggestions requested");

    let envelope = state
        .actions
        .request_suggestions(&body.fields, &document)
        .await;
    Ok(Json(envelope))
}
