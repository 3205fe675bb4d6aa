//! Client-side passport processing.
//!
//! [`PassportProcessor`] drives one upload-and-review session: it owns the
//! form state machine, the preview handle of the selected file and the
//! notifications each step emits. It talks to the server through any
//! [`PassportService`](passport_pipeline::PassportService), normally the HTTP
//! [`ApiClient`].

pub mod client;
pub mod config;
pub mod preview;
pub mod processor;

pub use client::ApiClient;
pub use config::ProcessorConfig;
pub use preview::{PreviewHandle, PreviewRegistry};
pub use processor::{Completion, PassportProcessor, ProcessorError};
