//! Shared response envelope types for API handlers.
//!
//! Descriptive endpoints use a `{ "data": ... }` envelope. The two passport
//! operations instead answer with a `ResultEnvelope` (`{ok, value}` or
//! `{ok, error}`), which callers branch on directly.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
///
/// # Example
///
/// ```ignore
/// Json(DataResponse { data: form_config })
/// ```
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
