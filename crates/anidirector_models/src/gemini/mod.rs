//! Google Gemini provider.

mod client;
mod prompts;
mod protocol;

pub use client::{GeminiClient, decode_image, decode_json};
pub use protocol::{
    ApiError, ApiErrorEnvelope, Candidate, Content, GenerateContentRequest,
    GenerateContentResponse, GenerationConfig, ImageConfig, InlineData, InlineDataPart, Part,
    PromptFeedback, TextPart, classify_failure,
};
