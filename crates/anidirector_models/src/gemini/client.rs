//! Gemini REST client.
//!
//! Every request waits on a [`RateLimiter`] built from the configured tier,
//! then posts to the `generateContent` endpoint of the chosen model. Failures
//! are classified into [`GenerationErrorKind`]s so the caller's retry policy
//! can tell a rate limit from a revoked key.

use super::prompts;
use super::protocol::{
    GenerateContentRequest, GenerateContentResponse, GenerationConfig, Part, classify_failure,
};
use anidirector_core::{GenerationSettings, ImageRef, StoryConfig, StoryIdea, StoryboardData};
use anidirector_error::{GenerationError, GenerationErrorKind, GenerationResult};
use anidirector_interface::{ImageQuality, ImageRequest, MediaGenerator};
use anidirector_rate_limit::{AniDirectorConfig, RateLimiter, Tier, TierConfig};
use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, error, instrument, warn};

const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);
const DEFAULT_IMAGE_MIME: &str = "image/png";

/// Client for the Google Gemini `generateContent` API.
///
/// Text calls (idea, story plan) ask for JSON answers from the text model;
/// image calls go to the standard or pro image model depending on the
/// request's [`ImageQuality`].
#[derive(Clone)]
pub struct GeminiClient {
    http: Client,
    api_key: String,
    base_url: String,
    settings: GenerationSettings,
    limiter: RateLimiter<TierConfig>,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("base_url", &self.base_url)
            .field("text_model", self.settings.text_model())
            .field("tier", &self.limiter.inner().name())
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    /// Create a client with an explicit key.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationErrorKind::MissingApiKey`] for an empty key and
    /// [`GenerationErrorKind::Request`] if the HTTP client cannot be built.
    #[instrument(name = "gemini_client_new", skip(api_key, settings, tier), fields(tier_name = %tier.name))]
    pub fn new(
        api_key: impl Into<String>,
        settings: GenerationSettings,
        tier: TierConfig,
    ) -> GenerationResult<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(GenerationError::new(GenerationErrorKind::MissingApiKey));
        }

        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| {
                GenerationError::new(GenerationErrorKind::Request(format!(
                    "Failed to build HTTP client: {}",
                    e
                )))
            })?;

        debug!("Creating new Gemini client");
        Ok(Self {
            http,
            api_key,
            base_url: GEMINI_API_URL.to_string(),
            settings,
            limiter: RateLimiter::new(tier),
        })
    }

    /// Create a client reading the key from `GEMINI_API_KEY`.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationErrorKind::MissingApiKey`] if the variable is unset.
    pub fn from_env(settings: GenerationSettings, tier: TierConfig) -> GenerationResult<Self> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .map_err(|_| GenerationError::new(GenerationErrorKind::MissingApiKey))?;
        Self::new(api_key, settings, tier)
    }

    /// Create a client from loaded configuration and `GEMINI_API_KEY`.
    ///
    /// Uses `tier_name` from `[providers.gemini]`, or the provider's default
    /// tier. Without a configured tier no quota is enforced.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use anidirector_models::GeminiClient;
    /// use anidirector_rate_limit::AniDirectorConfig;
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let config = AniDirectorConfig::load()?;
    /// let client = GeminiClient::from_config(&config, Some("tier1"))?;
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`GenerationErrorKind::MissingApiKey`] if the variable is unset.
    pub fn from_config(
        config: &AniDirectorConfig,
        tier_name: Option<&str>,
    ) -> GenerationResult<Self> {
        let tier = config.tier("gemini", tier_name).unwrap_or_else(|| {
            warn!(tier = ?tier_name, "No Gemini tier configured, requests are not rate limited");
            TierConfig {
                name: "Unlimited".to_string(),
                rpm: None,
                rpd: None,
                max_concurrent: None,
            }
        });
        Self::from_env(config.generation.clone(), tier)
    }

    /// Send requests to another endpoint root, such as a proxy.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// The tier being enforced.
    pub fn tier(&self) -> &TierConfig {
        self.limiter.inner()
    }

    fn model_url(&self, model: &str) -> String {
        let model = model.strip_prefix("models/").unwrap_or(model);
        format!("{}/models/{}:generateContent", self.base_url, model)
    }

    /// Send one `generateContent` request.
    #[instrument(skip(self, request), fields(model = %model))]
    pub async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> GenerationResult<GenerateContentResponse> {
        let _guard = self.limiter.acquire().await?;
        debug!("Sending request to Gemini API");

        let response = self
            .http
            .post(self.model_url(model))
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                error!(error = ?e, "Failed to send request to Gemini API");
                let kind = if e.is_timeout() {
                    GenerationErrorKind::Timeout(e.to_string())
                } else {
                    GenerationErrorKind::Request(e.to_string())
                };
                GenerationError::new(kind)
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, "Gemini API returned error");
            return Err(GenerationError::new(classify_failure(status.as_u16(), &body)));
        }

        let parsed: GenerateContentResponse = response.json().await.map_err(|e| {
            error!(error = ?e, "Failed to parse Gemini response");
            let kind = if e.is_timeout() {
                GenerationErrorKind::Timeout(e.to_string())
            } else {
                GenerationErrorKind::InvalidResponse(format!("Failed to parse response: {}", e))
            };
            GenerationError::new(kind)
        })?;

        debug!(candidates = parsed.candidates.len(), "Received response from Gemini");
        Ok(parsed)
    }

    async fn generate_json<T: DeserializeOwned>(
        &self,
        system: &str,
        prompt: String,
    ) -> GenerationResult<T> {
        let request = GenerateContentRequest::user(vec![Part::text(prompt)])
            .with_system_instruction(system)
            .with_generation_config(GenerationConfig::json());
        let response = self
            .generate_content(self.settings.text_model(), &request)
            .await?;
        decode_json(&response)
    }

    async fn generate_picture(
        &self,
        model: &str,
        parts: Vec<Part>,
        config: GenerationConfig,
    ) -> GenerationResult<ImageRef> {
        let request = GenerateContentRequest::user(parts).with_generation_config(config);
        let response = self.generate_content(model, &request).await?;
        decode_image(&response)
    }

    fn image_model(&self, quality: ImageQuality) -> &str {
        match quality {
            ImageQuality::Standard => self.settings.image_model(),
            ImageQuality::Pro => self.settings.pro_image_model(),
        }
    }
}

/// Parse the first candidate's text as JSON.
///
/// Tolerates a Markdown code fence around the object.
///
/// # Errors
///
/// [`GenerationErrorKind::EmptyResponse`] without text,
/// [`GenerationErrorKind::InvalidResponse`] if the text is not the expected JSON.
pub fn decode_json<T: DeserializeOwned>(response: &GenerateContentResponse) -> GenerationResult<T> {
    let Some(text) = response.text() else {
        warn!(reason = ?response.block_reason(), "Gemini returned no text");
        return Err(GenerationError::new(GenerationErrorKind::EmptyResponse));
    };
    let body = strip_code_fence(&text);
    serde_json::from_str(body).map_err(|e| {
        error!(error = %e, "Gemini text is not the expected JSON");
        GenerationError::new(GenerationErrorKind::InvalidResponse(format!(
            "Failed to parse JSON answer: {}",
            e
        )))
    })
}

/// Extract the first inline image as a data-URL reference.
///
/// # Errors
///
/// [`GenerationErrorKind::EmptyResponse`] without an image,
/// [`GenerationErrorKind::InvalidResponse`] if the payload is not base64.
pub fn decode_image(response: &GenerateContentResponse) -> GenerationResult<ImageRef> {
    let Some(image) = response.inline_image() else {
        warn!(reason = ?response.block_reason(), "Gemini returned no image");
        return Err(GenerationError::new(GenerationErrorKind::EmptyResponse));
    };
    let bytes = STANDARD.decode(image.data.as_bytes()).map_err(|e| {
        GenerationError::new(GenerationErrorKind::InvalidResponse(format!(
            "Image payload is not base64: {}",
            e
        )))
    })?;
    if bytes.is_empty() {
        return Err(GenerationError::new(GenerationErrorKind::EmptyResponse));
    }
    let mime_type = if image.mime_type.is_empty() {
        DEFAULT_IMAGE_MIME
    } else {
        image.mime_type.as_str()
    };
    Ok(ImageRef::from_base64(mime_type, &image.data))
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .map(str::trim)
        .unwrap_or(trimmed)
}

#[async_trait]
impl MediaGenerator for GeminiClient {
    #[instrument(skip(self))]
    async fn generate_idea(&self) -> GenerationResult<StoryIdea> {
        self.generate_json(prompts::IDEA_SYSTEM, prompts::idea_prompt())
            .await
    }

    #[instrument(skip(self, config), fields(title = %config.title))]
    async fn generate_storyboard_plan(
        &self,
        config: &StoryConfig,
    ) -> GenerationResult<StoryboardData> {
        let plan: StoryboardData = self
            .generate_json(prompts::PLAN_SYSTEM, prompts::storyboard_plan_prompt(config))
            .await?;
        if plan.scenes().is_empty() {
            return Err(GenerationError::new(GenerationErrorKind::EmptyResponse));
        }
        debug!(scenes = plan.scenes().len(), "Storyboard plan received");
        Ok(plan)
    }

    #[instrument(skip(self, description))]
    async fn generate_character_design(
        &self,
        name: &str,
        description: &str,
    ) -> GenerationResult<ImageRef> {
        let parts = vec![Part::text(prompts::character_design_prompt(name, description))];
        self.generate_picture(self.settings.image_model(), parts, GenerationConfig::default())
            .await
    }

    #[instrument(
        skip(self, request),
        fields(
            mode = ?request.mode(),
            quality = %request.quality(),
            references = request.reference_images().len()
        )
    )]
    async fn generate_image(&self, request: &ImageRequest) -> GenerationResult<ImageRef> {
        let mut parts: Vec<Part> = request
            .reference_images()
            .iter()
            .take(*self.settings.max_reference_images())
            .filter_map(|image| match image.data_url_parts() {
                Some((mime_type, data)) => Some(Part::inline_data(mime_type, data)),
                None => {
                    debug!("Skipping reference image that is not a base64 data URL");
                    None
                }
            })
            .collect();
        parts.push(Part::text(prompts::scene_image_prompt(request)));

        let image_size = match request.quality() {
            ImageQuality::Pro => Some("1K".to_string()),
            ImageQuality::Standard => None,
        };
        let config = GenerationConfig::image(request.aspect_ratio().to_string(), image_size);

        self.generate_picture(self.image_model(*request.quality()), parts, config)
            .await
    }

    fn provider_name(&self) -> &'static str {
        "gemini"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_fences_are_stripped() {
        assert_eq!(strip_code_fence("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fence("```\n[]\n```"), "[]");
        assert_eq!(strip_code_fence("  {} "), "{}");
    }

    #[test]
    fn model_names_accept_the_models_prefix() {
        let tier = TierConfig {
            name: "Test".into(),
            rpm: None,
            rpd: None,
            max_concurrent: None,
        };
        let client = GeminiClient::new("key", GenerationSettings::default(), tier)
            .unwrap()
            .with_base_url("http://localhost:9/v1beta/");
        assert_eq!(
            client.model_url("models/gemini-2.5-flash"),
            "http://localhost:9/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }
}
