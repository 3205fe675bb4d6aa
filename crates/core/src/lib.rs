//! Passport extraction domain library.
//!
//! Pure logic shared by the server, the model adapters and the client-side
//! processor: the passport field schema and its validator, date conventions,
//! the data-URI document type, the result envelope, and the form state
//! machine. Nothing in this crate performs I/O.

pub mod dates;
pub mod document;
pub mod envelope;
pub mod error;
pub mod fields;
pub mod form;
pub mod validation;

pub use dates::DateConvention;
pub use document::PassportDocument;
pub use envelope::ResultEnvelope;
pub use fields::{FieldName, PassportFields, SuggestionSet};
