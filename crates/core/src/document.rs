//! Passport documents carried as `data:<mimetype>;base64,<payload>` strings.

use std::fmt;
use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::error::DocumentError;

/// MIME types accepted besides the `image/*` family.
pub const PDF_MIME_TYPE: &str = "application/pdf";

/// `accept` attribute for a file picker offering the supported inputs.
pub const ACCEPTED_MIME_TYPES: &str = "image/*,application/pdf";

/// An uploaded passport image or PDF.
///
/// Holds the MIME type and the Base64 payload separately; converts to and
/// from the self-describing data-URI form at the edges.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PassportDocument {
    mime_type: String,
    payload: String,
}

impl PassportDocument {
    /// Parse a `data:<mimetype>;base64,<payload>` string.
    pub fn from_data_uri(uri: &str) -> Result<Self, DocumentError> {
        let rest = uri
            .trim()
            .strip_prefix("data:")
            .ok_or(DocumentError::MissingScheme)?;
        let (header, payload) = rest.split_once(',').ok_or(DocumentError::NotBase64)?;
        let mime_type = header
            .strip_suffix(";base64")
            .ok_or(DocumentError::NotBase64)?
            .to_ascii_lowercase();

        check_mime_type(&mime_type)?;

        if payload.is_empty() {
            return Err(DocumentError::EmptyPayload);
        }
        STANDARD
            .decode(payload)
            .map_err(|e| DocumentError::InvalidPayload(e.to_string()))?;

        Ok(Self {
            mime_type,
            payload: payload.to_string(),
        })
    }

    /// Encode raw file bytes as a document of the given MIME type.
    pub fn from_bytes(mime_type: &str, bytes: &[u8]) -> Result<Self, DocumentError> {
        let mime_type = mime_type.to_ascii_lowercase();
        check_mime_type(&mime_type)?;
        if bytes.is_empty() {
            return Err(DocumentError::EmptyPayload);
        }
        Ok(Self {
            mime_type,
            payload: STANDARD.encode(bytes),
        })
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// The Base64 payload, without the data-URI header.
    pub fn payload(&self) -> &str {
        &self.payload
    }

    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.payload)
    }
}

// Payloads run to megabytes; keep them out of logs.
impl fmt::Debug for PassportDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PassportDocument")
            .field("mime_type", &self.mime_type)
            .field("payload_len", &self.payload.len())
            .finish()
    }
}

impl TryFrom<String> for PassportDocument {
    type Error = DocumentError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_data_uri(&value)
    }
}

impl From<PassportDocument> for String {
    fn from(document: PassportDocument) -> Self {
        document.to_data_uri()
    }
}

fn check_mime_type(mime_type: &str) -> Result<(), DocumentError> {
    let is_image = mime_type
        .strip_prefix("image/")
        .is_some_and(|subtype| !subtype.is_empty());
    if is_image || mime_type == PDF_MIME_TYPE {
        Ok(())
    } else {
        Err(DocumentError::UnsupportedMimeType(mime_type.to_string()))
    }
}

/// Guess a supported MIME type from a file's extension.
pub fn mime_type_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "heic" => "image/heic",
        "heif" => "image/heif",
        "bmp" => "image/bmp",
        "tif" | "tiff" => "image/tiff",
        "pdf" => PDF_MIME_TYPE,
        _ => return None,
    };
    Some(mime)
}
