//! Landlord signature images

use base64::{engine::general_purpose::STANDARD, Engine};
use pdf_core::{detect_format, get_dimensions, ImageFormat};
use thiserror::Error;

/// Largest accepted signature file
pub const MAX_SIGNATURE_BYTES: usize = 800 * 1024;

/// MIME types accepted on upload
pub const ACCEPTED_MIME_TYPES: [&str; 3] = ["image/png", "image/jpeg", "image/gif"];

/// Reasons a signature file is refused
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
    #[error("Veuillez importer un fichier PNG, JPG ou GIF")]
    UnsupportedType(String),

    #[error("Le fichier doit peser moins de 800 KB")]
    TooLarge(usize),

    #[error("Invalid signature data URL: {0}")]
    InvalidDataUrl(String),

    #[error("Invalid signature image: {0}")]
    InvalidImage(String),
}

/// A validated signature image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    bytes: Vec<u8>,
    format: ImageFormat,
    width: u32,
    height: u32,
}

impl Signature {
    /// Accept an uploaded file given its declared MIME type
    ///
    /// The type is checked first, then the size, then the content itself.
    pub fn from_upload(bytes: Vec<u8>, mime_type: &str) -> Result<Self, SignatureError> {
        if !ACCEPTED_MIME_TYPES.contains(&mime_type) {
            return Err(SignatureError::UnsupportedType(mime_type.to_string()));
        }
        Self::from_bytes(bytes)
    }

    /// Accept raw image bytes, sniffing the format from the content
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, SignatureError> {
        if bytes.len() > MAX_SIGNATURE_BYTES {
            return Err(SignatureError::TooLarge(bytes.len()));
        }

        let format = detect_format(&bytes)
            .map_err(|_| SignatureError::UnsupportedType("unknown".to_string()))?;
        let dims =
            get_dimensions(&bytes).map_err(|e| SignatureError::InvalidImage(e.to_string()))?;

        Ok(Self {
            bytes,
            format,
            width: dims.width,
            height: dims.height,
        })
    }

    /// Decode a `data:<mime>;base64,<payload>` URL
    pub fn from_data_url(url: &str) -> Result<Self, SignatureError> {
        let invalid = |reason: &str| SignatureError::InvalidDataUrl(reason.to_string());

        let rest = url
            .trim()
            .strip_prefix("data:")
            .ok_or_else(|| invalid("missing data: prefix"))?;
        let (meta, payload) = rest
            .split_once(',')
            .ok_or_else(|| invalid("missing payload"))?;
        let mime_type = meta
            .strip_suffix(";base64")
            .ok_or_else(|| invalid("payload is not base64"))?;

        let bytes = STANDARD
            .decode(payload.trim())
            .map_err(|e| SignatureError::InvalidDataUrl(e.to_string()))?;

        Self::from_upload(bytes, mime_type)
    }

    /// Encode as a data URL, the form kept in saved state
    pub fn to_data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.format.mime_type(),
            STANDARD.encode(&self.bytes)
        )
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    /// Pixel size as (width, height)
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}
