//! Layered configuration.
//!
//! Sources, lowest precedence first:
//! - Bundled defaults (include_str! from anidirector.toml)
//! - `<config_dir>/anidirector/anidirector.toml`
//! - `./anidirector.toml`
//! - `ANIDIRECTOR_<SECTION>__<KEY>` environment variables

use crate::Tier;
use anidirector_core::GenerationSettings;
use anidirector_error::{AniDirectorResult, ConfigError};
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

/// Bundled default configuration.
const DEFAULT_CONFIG: &str = include_str!("../../../anidirector.toml");

/// Limits of one provider usage tier.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TierConfig {
    /// Display name
    pub name: String,

    /// Requests per minute
    #[serde(default)]
    pub rpm: Option<u32>,

    /// Requests per day
    #[serde(default)]
    pub rpd: Option<u32>,

    /// Requests in flight at once
    #[serde(default)]
    pub max_concurrent: Option<u32>,
}

impl Tier for TierConfig {
    fn rpm(&self) -> Option<u32> {
        self.rpm
    }

    fn rpd(&self) -> Option<u32> {
        self.rpd
    }

    fn max_concurrent(&self) -> Option<u32> {
        self.max_concurrent
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Tiers offered by one provider.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ProviderConfig {
    /// Tier used when none is requested
    pub default_tier: String,

    /// Tiers by key
    pub tiers: HashMap<String, TierConfig>,
}

/// Where the store keeps its collections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct StorageSettings {
    /// Explicit data directory; defaults to the platform data directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

impl StorageSettings {
    /// The directory the store should open.
    ///
    /// # Errors
    ///
    /// Returns error if no directory is configured and the platform has no
    /// data directory.
    pub fn resolve_data_dir(&self) -> AniDirectorResult<PathBuf> {
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }
        dirs::data_dir()
            .map(|dir| dir.join("anidirector"))
            .ok_or_else(|| ConfigError::new("No platform data directory; set storage.data_dir").into())
    }
}

/// Complete workspace configuration.
///
/// # Examples
///
/// ```
/// use anidirector_rate_limit::AniDirectorConfig;
///
/// let config = AniDirectorConfig::load().unwrap();
/// assert!(config.tier("gemini", None).is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
pub struct AniDirectorConfig {
    /// Provider tiers by provider name
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,

    /// Generation pacing, retry and model selection
    #[serde(default)]
    pub generation: GenerationSettings,

    /// Store location
    #[serde(default)]
    pub storage: StorageSettings,
}

impl AniDirectorConfig {
    /// Load bundled defaults overridden by a single file.
    ///
    /// # Errors
    ///
    /// Returns error if the file is missing or does not parse.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> AniDirectorResult<Self> {
        debug!("Loading configuration from file");

        Self::finish(Self::defaults().add_source(File::from(path.as_ref())))
    }

    /// Load configuration from every layer.
    ///
    /// # Errors
    ///
    /// Returns error if any present layer does not parse.
    #[instrument]
    pub fn load() -> AniDirectorResult<Self> {
        debug!("Loading configuration with precedence: env > current dir > user config > bundled defaults");

        let mut builder = Self::defaults();

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("anidirector").join("anidirector.toml");
            builder = builder.add_source(File::from(user_config).required(false));
        }

        builder = builder
            .add_source(File::with_name("anidirector").required(false))
            .add_source(
                Environment::with_prefix("ANIDIRECTOR")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        Self::finish(builder)
    }

    /// The requested tier of a provider, or its default tier.
    pub fn tier(&self, provider: &str, tier: Option<&str>) -> Option<TierConfig> {
        let provider = self.providers.get(provider)?;
        let key = tier.unwrap_or(&provider.default_tier);
        provider.tiers.get(key).cloned()
    }

    fn defaults() -> ConfigBuilder<DefaultState> {
        Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
    }

    fn finish(builder: ConfigBuilder<DefaultState>) -> AniDirectorResult<Self> {
        let config = builder
            .build()
            .map_err(|e| ConfigError::new(format!("Failed to build configuration: {}", e)))?
            .try_deserialize()
            .map_err(|e| ConfigError::new(format!("Failed to parse configuration: {}", e)))?;
        Ok(config)
    }
}
