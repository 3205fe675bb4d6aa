//! Request orchestration for passport extraction and correction.
//!
//! [`PassportActions`] is the server-side entry point: it validates input,
//! calls the model adapters, and folds every failure into a
//! [`ResultEnvelope`](passport_core::ResultEnvelope) so callers never see a
//! raised error. [`PassportService`] is the seam the client-side processor
//! talks to, implemented in-process by [`PassportActions`] and remotely by
//! an HTTP client.

pub mod actions;
pub mod service;

pub use actions::{PassportActions, EXTRACTION_FAILED_MESSAGE, SUGGESTIONS_FAILED_MESSAGE};
pub use service::PassportService;
