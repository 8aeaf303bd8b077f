//! LLM Data Models
//!
//! Scenario selection, the provider-neutral request payload, and the error types
//! shared by the client and the gateway.

use image::{ImageError, ImageFormat};
use serde::{Deserialize, Serialize};
use std::io::Cursor;

// ============================================================================
// LLM Scenario Types
// ============================================================================

/// The four operations the gateway performs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LLMScenario {
    /// Diagnosis from vehicle + conversation history
    ConversationDiagnosis,
    /// Diagnosis from vehicle + question + photo
    ImageDiagnosis,
    /// Make/model/year from a photo of the VIN sticker
    VinIdentification,
    /// Make/model/year from free-form text
    TextIdentification,
}

impl LLMScenario {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ConversationDiagnosis => "conversation_diagnosis",
            Self::ImageDiagnosis => "image_diagnosis",
            Self::VinIdentification => "vin_identification",
            Self::TextIdentification => "text_identification",
        }
    }

    /// Message shown to the caller when the gateway produces no usable JSON
    pub fn failure_message(&self) -> &'static str {
        match self {
            Self::ConversationDiagnosis => {
                "The diagnostic assistant failed to generate a valid response. Please try again."
            },
            Self::ImageDiagnosis => {
                "The diagnostic assistant failed to generate a valid response from the image."
            },
            Self::VinIdentification => {
                "Could not identify the vehicle from the provided image. Please try again or enter manually."
            },
            Self::TextIdentification => {
                "Could not identify the vehicle from the provided text. Please try again."
            },
        }
    }
}

// ============================================================================
// LLM Request Payload
// ============================================================================

/// Fully rendered request: system directive plus ordered user content
#[derive(Debug, Clone)]
pub struct LLMRequest {
    pub scenario: LLMScenario,
    pub system_prompt: &'static str,
    pub parts: Vec<ContentPart>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentPart {
    Text(String),
    Image(ImageAttachment),
}

impl ContentPart {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(t) => Some(t),
            Self::Image(_) => None,
        }
    }
}

/// Uploaded image, decoded once on arrival so only intact pictures reach the provider
#[derive(Clone, PartialEq, Eq)]
pub struct ImageAttachment {
    mime_type: &'static str,
    data: Vec<u8>,
}

impl ImageAttachment {
    /// Decode `data` and keep it as-is when the provider accepts the format.
    ///
    /// Anything else the decoder understands (GIF, BMP, TIFF) is re-encoded to
    /// PNG. CPU bound; use [`ImageAttachment::decode`] from async code.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self, UnsupportedImage> {
        if data.is_empty() {
            return Err(UnsupportedImage::Empty);
        }

        let format = image::guess_format(&data).map_err(|_| UnsupportedImage::UnknownFormat)?;
        let decoded = image::load_from_memory_with_format(&data, format).map_err(|e| match e {
            ImageError::Unsupported(_) => UnsupportedImage::UnknownFormat,
            other => UnsupportedImage::Corrupt(other.to_string()),
        })?;

        let mime_type = match format {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::WebP => "image/webp",
            other => {
                tracing::debug!("Re-encoding {:?} upload as PNG", other);
                let mut png = Vec::new();
                decoded
                    .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
                    .map_err(|e| UnsupportedImage::Corrupt(e.to_string()))?;
                return Ok(Self { mime_type: "image/png", data: png });
            },
        };

        Ok(Self { mime_type, data })
    }

    /// [`ImageAttachment::from_bytes`] on the blocking pool
    pub async fn decode(data: Vec<u8>) -> Result<Self, UnsupportedImage> {
        tokio::task::spawn_blocking(move || Self::from_bytes(data))
            .await
            .map_err(|e| UnsupportedImage::Corrupt(format!("decoder task failed: {}", e)))?
    }

    pub fn mime_type(&self) -> &'static str {
        self.mime_type
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

// Image bytes are noise in logs
impl std::fmt::Debug for ImageAttachment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageAttachment")
            .field("mime_type", &self.mime_type)
            .field("len", &self.data.len())
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UnsupportedImage {
    #[error("Uploaded image is empty")]
    Empty,

    #[error("Uploaded file is not a supported image (PNG, JPEG, WebP, GIF, BMP or TIFF)")]
    UnknownFormat,

    #[error("Uploaded image could not be decoded: {0}")]
    Corrupt(String),
}

// ============================================================================
// LLM Error Types
// ============================================================================

/// Transport-level failures talking to the provider
#[derive(Debug, thiserror::Error)]
pub enum LLMError {
    #[error("LLM API key not configured")]
    NotConfigured,

    #[error("LLM API error: {0}")]
    ApiError(String),

    #[error("LLM response parsing error: {0}")]
    ParseError(String),

    #[error("LLM request timed out{}", .0.map(|s| format!(" after {}s", s)).unwrap_or_default())]
    Timeout(Option<u64>),

    #[error("LLM rate limited, retry after {0}s")]
    RateLimited(u64),

    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),
}

/// Why a gateway call produced no usable JSON
///
/// Callers only ever see [`LLMScenario::failure_message`]; the cause is kept
/// for operator logs.
#[derive(Debug, thiserror::Error)]
pub enum GatewayFailureCause {
    #[error("transport failure: {0}")]
    Transport(#[from] LLMError),

    #[error("response contained no text")]
    EmptyResponse,

    #[error("response was not valid JSON: {0}")]
    InvalidJson(String),
}

#[derive(Debug, thiserror::Error)]
#[error("{}", .scenario.failure_message())]
pub struct GatewayFailure {
    pub scenario: LLMScenario,
    #[source]
    pub cause: GatewayFailureCause,
}

impl GatewayFailure {
    pub fn new(scenario: LLMScenario, cause: impl Into<GatewayFailureCause>) -> Self {
        Self { scenario, cause: cause.into() }
    }
}
