//! JSON message types for the Gemini `generateContent` REST endpoint.
//!
//! Requests carry one user turn made of text and inline image parts, an
//! optional system instruction, and a generation config. Responses carry
//! candidates whose parts hold either text or base64 image data.

use anidirector_error::GenerationErrorKind;
use serde::{Deserialize, Serialize};

/// Body of a `generateContent` call.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    /// Conversation turns; this client always sends one user turn
    pub contents: Vec<Content>,

    /// System instruction for the model
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,

    /// Output format and image options
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

impl GenerateContentRequest {
    /// A single user turn made of `parts`.
    pub fn user(parts: Vec<Part>) -> Self {
        Self {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts,
            }],
            ..Default::default()
        }
    }

    /// Attach a system instruction.
    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(Content {
            role: None,
            parts: vec![Part::text(instruction)],
        });
        self
    }

    /// Attach a generation config.
    pub fn with_generation_config(mut self, config: GenerationConfig) -> Self {
        self.generation_config = Some(config);
        self
    }
}

/// One turn of content.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    /// Role ("user", "model")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    /// Content parts
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// Content part.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Part {
    /// Text content
    Text(TextPart),
    /// Inline data (images)
    InlineData(InlineDataPart),
    /// Any part kind this client does not use (thought signatures, function calls)
    Other(serde_json::Value),
}

impl Part {
    /// A text part.
    pub fn text(text: impl Into<String>) -> Self {
        Part::Text(TextPart { text: text.into() })
    }

    /// An inline base64 data part.
    pub fn inline_data(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Part::InlineData(InlineDataPart {
            inline_data: InlineData {
                mime_type: mime_type.into(),
                data: data.into(),
            },
        })
    }
}

/// Text content part.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextPart {
    /// The text
    pub text: String,
}

/// Inline data content part.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineDataPart {
    /// The payload
    pub inline_data: InlineData,
}

/// Inline data with MIME type.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    /// MIME type of the payload
    #[serde(default)]
    pub mime_type: String,
    /// Base64-encoded bytes
    pub data: String,
}

/// Generation configuration parameters.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    /// Response MIME type (`application/json` for structured text)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,

    /// Image output options
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_config: Option<ImageConfig>,
}

impl GenerationConfig {
    /// Ask for a JSON text answer.
    pub fn json() -> Self {
        Self {
            response_mime_type: Some("application/json".to_string()),
            ..Default::default()
        }
    }

    /// Ask for an image of the given shape.
    pub fn image(aspect_ratio: impl Into<String>, image_size: Option<String>) -> Self {
        Self {
            image_config: Some(ImageConfig {
                aspect_ratio: aspect_ratio.into(),
                image_size,
            }),
            ..Default::default()
        }
    }
}

/// Image output options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageConfig {
    /// Frame shape such as `16:9`
    pub aspect_ratio: String,

    /// Output resolution (`1K`), honoured by pro image models
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_size: Option<String>,
}

/// Body of a successful `generateContent` response.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    /// Generated candidates
    #[serde(default)]
    pub candidates: Vec<Candidate>,

    /// Present when the prompt itself was blocked
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_feedback: Option<PromptFeedback>,
}

impl GenerateContentResponse {
    fn first_parts(&self) -> &[Part] {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|c| c.parts.as_slice())
            .unwrap_or_default()
    }

    /// Text parts of the first candidate, joined.
    ///
    /// Returns `None` if the candidate carries no text.
    pub fn text(&self) -> Option<String> {
        let text: String = self
            .first_parts()
            .iter()
            .filter_map(|part| match part {
                Part::Text(t) => Some(t.text.as_str()),
                _ => None,
            })
            .collect();
        (!text.trim().is_empty()).then_some(text)
    }

    /// The first inline image of the first candidate.
    pub fn inline_image(&self) -> Option<&InlineData> {
        self.first_parts().iter().find_map(|part| match part {
            Part::InlineData(p) => Some(&p.inline_data),
            _ => None,
        })
    }

    /// Why the provider produced nothing, if it said.
    pub fn block_reason(&self) -> Option<&str> {
        self.prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_deref())
            .or_else(|| {
                self.candidates
                    .first()
                    .and_then(|c| c.finish_reason.as_deref())
                    .filter(|reason| *reason != "STOP")
            })
    }
}

/// One generated candidate.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// Generated content
    #[serde(default)]
    pub content: Option<Content>,

    /// Why generation stopped (`STOP`, `SAFETY`, ...)
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Feedback about the prompt.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    /// Why the prompt was blocked
    #[serde(default)]
    pub block_reason: Option<String>,
}

/// Error body returned with non-success statuses.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorEnvelope {
    /// The error
    pub error: ApiError,
}

/// Provider error details.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiError {
    /// HTTP status code echoed by the provider
    #[serde(default)]
    pub code: u16,
    /// Human-readable message
    #[serde(default)]
    pub message: String,
    /// Canonical status such as `RESOURCE_EXHAUSTED`
    #[serde(default)]
    pub status: String,
}

/// Classify a non-success response from its status and body.
///
/// The provider's canonical status is folded into the message so that
/// `RESOURCE_EXHAUSTED` and `PERMISSION_DENIED` classify even when the HTTP
/// status alone would not.
///
/// # Examples
///
/// ```
/// use anidirector_error::GenerationErrorKind;
/// use anidirector_models::classify_failure;
///
/// let body = r#"{"error":{"code":400,"message":"key revoked","status":"PERMISSION_DENIED"}}"#;
/// assert!(matches!(
///     classify_failure(400, body),
///     GenerationErrorKind::PermissionDenied(_)
/// ));
/// ```
pub fn classify_failure(status_code: u16, body: &str) -> GenerationErrorKind {
    let message = match serde_json::from_str::<ApiErrorEnvelope>(body) {
        Ok(envelope) if !envelope.error.status.is_empty() => {
            format!("{}: {}", envelope.error.status, envelope.error.message)
        }
        Ok(envelope) if !envelope.error.message.is_empty() => envelope.error.message,
        _ => body.trim().to_string(),
    };
    GenerationErrorKind::from_status(status_code, message)
}
