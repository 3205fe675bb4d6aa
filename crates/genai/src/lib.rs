//! Generative-model client and passport adapters.
//!
//! Provides the [`GenerativeModel`](model::GenerativeModel) seam, a REST
//! client for the Generative Language `generateContent` endpoint, the
//! instruction templates and output schemas, and the two adapters built on
//! top of them: [`PassportExtractor`] and [`CorrectionAdvisor`].

pub mod api;
pub mod config;
pub mod correction;
pub mod extraction;
pub mod messages;
pub mod model;
pub mod prompts;
pub mod schema;

pub use api::GeminiApi;
pub use config::GenAiConfig;
pub use correction::{CorrectionAdvisor, SuggestionError};
pub use extraction::{ExtractionError, PassportExtractor};
pub use model::{GenerativeModel, ModelError, ModelRequest};
