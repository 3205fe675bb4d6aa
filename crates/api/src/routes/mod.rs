pub mod health;

use axum::routing::{get, post};
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /passport/config                                 form description (GET)
/// /passport/extract                                extract fields from a document (POST)
/// /passport/suggestions                            suggest corrections (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/passport/config", get(handlers::passport::form_config))
        .route("/passport/extract", post(handlers::passport::extract))
        .route("/passport/suggestions", post(handlers::passport::suggestions))
}
