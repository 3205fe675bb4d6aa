#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use passport_api::config::ServerConfig;
use passport_api::router::build_app_router;
use passport_api::state::AppState;
use passport_core::DateConvention;
use passport_genai::{GenerativeModel, ModelError, ModelRequest};
use passport_pipeline::PassportActions;

/// A 1x1 PNG as a data URI.
pub const PNG_DATA_URI: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:9002".to_string()],
        request_timeout_secs: 30,
        max_upload_bytes: 64 * 1024,
        date_convention: DateConvention::Iso,
    }
}

/// What the stub model answers with.
pub enum StubReply {
    Output(Value),
    Failure,
}

/// Generative model stand-in that counts calls.
pub struct StubModel {
    reply: StubReply,
    pub calls: AtomicUsize,
}

impl StubModel {
    pub fn new(reply: StubReply) -> Arc<Self> {
        Arc::new(Self {
            reply,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GenerativeModel for StubModel {
    fn name(&self) -> &str {
        "stub-model"
    }

    async fn generate(&self, _request: &ModelRequest) -> Result<Option<Value>, ModelError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.reply {
            StubReply::Output(v) => Ok(Some(v.clone())),
            StubReply::Failure => Err(ModelError::Unavailable("stub failure".into())),
        }
    }
}

/// Build the full application router (same middleware stack as production)
/// backed by the given model.
pub fn build_test_app(model: Arc<StubModel>) -> Router {
    let config = test_config();
    let state = AppState {
        config: Arc::new(config.clone()),
        actions: Arc::new(PassportActions::new(model, config.date_convention)),
    };
    build_app_router(state, &config)
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Issue a GET request against the app.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Issue a POST request with a JSON body against the app.
pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}
