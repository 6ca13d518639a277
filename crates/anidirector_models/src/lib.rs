//! Generative-media provider integrations for anidirector.
//!
//! Each provider lives behind its own feature flag and implements
//! [`MediaGenerator`](anidirector_interface::MediaGenerator).
//!
//! # Available Providers
//!
//! - **Gemini** (Google) - Enable with `gemini` feature (default)
//!
//! # Example
//!
//! ```no_run
//! # #[cfg(feature = "gemini")]
//! # {
//! use anidirector_interface::MediaGenerator;
//! use anidirector_models::GeminiClient;
//! use anidirector_rate_limit::AniDirectorConfig;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AniDirectorConfig::load()?;
//! let client = GeminiClient::from_config(&config, None)?;
//! let idea = client.generate_idea().await?;
//! println!("{:?}", idea.title);
//! # Ok(())
//! # }
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

#[cfg(feature = "gemini")]
mod gemini;

#[cfg(feature = "gemini")]
pub use gemini::{
    ApiError, ApiErrorEnvelope, Candidate, Content, GeminiClient, GenerateContentRequest,
    GenerateContentResponse, GenerationConfig, ImageConfig, InlineData, InlineDataPart, Part,
    PromptFeedback, TextPart, classify_failure, decode_image, decode_json,
};
