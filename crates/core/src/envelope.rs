//! Uniform success/failure wrapper returned by every orchestration entry point.
//!
//! Serialized as `{ "ok": true, "value": ... }` or
//! `{ "ok": false, "error": "..." }` so callers branch on a tag instead of
//! handling raised errors.

use serde::de::{self, Deserializer};
use serde::ser::{SerializeStruct, Serializer};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultEnvelope<T> {
    Success { value: T },
    Failure { error: String },
}

impl<T> ResultEnvelope<T> {
    pub fn success(value: T) -> Self {
        ResultEnvelope::Success { value }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        ResultEnvelope::Failure {
            error: error.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, ResultEnvelope::Success { .. })
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            ResultEnvelope::Success { value } => Some(value),
            ResultEnvelope::Failure { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ResultEnvelope::Success { .. } => None,
            ResultEnvelope::Failure { error } => Some(error),
        }
    }
}

impl<T: Serialize> Serialize for ResultEnvelope<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ResultEnvelope", 2)?;
        match self {
            ResultEnvelope::Success { value } => {
                state.serialize_field("ok", &true)?;
                state.serialize_field("value", value)?;
            }
            ResultEnvelope::Failure { error } => {
                state.serialize_field("ok", &false)?;
                state.serialize_field("error", error)?;
            }
        }
        state.end()
    }
}

#[derive(Deserialize)]
struct RawEnvelope<T> {
    ok: bool,
    value: Option<T>,
    error: Option<String>,
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for ResultEnvelope<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawEnvelope::<T>::deserialize(deserializer)?;
        match (raw.ok, raw.value, raw.error) {
            (true, Some(value), _) => Ok(ResultEnvelope::Success { value }),
            (true, None, _) => Err(de::Error::missing_field("value")),
            (false, _, Some(error)) => Ok(ResultEnvelope::Failure { error }),
            (false, _, None) => Err(de::Error::missing_field("error")),
        }
    }
}
