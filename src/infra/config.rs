// src/infra/config.rs — Configuration loading (TOML)

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::infra::paths;
use crate::studio::scorer::ScoringPolicy;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub provider: ProviderConfig,

    #[serde(default)]
    pub studio: StudioConfig,

    #[serde(default)]
    pub retry: RetrySection,

    #[serde(default)]
    pub scoring: ScoringPolicy,

    #[serde(default)]
    pub server: ServerConfig,
}

/// Where completions come from and how the credential is found.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub base_url: String,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
    pub timeout_seconds: u64,
    pub max_tokens: u32,
    /// Sent as `X-Title` so the provider dashboard shows the app name.
    pub app_name: String,
    pub referer: Option<String>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://openrouter.ai/api/v1".into(),
            api_key_env: "OPENROUTER_API_KEY".into(),
            timeout_seconds: 60,
            max_tokens: 1024,
            app_name: "PromptStudio".into(),
            referer: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StudioConfig {
    /// Model preselected in the UI and used by `run` without `--model`.
    pub default_model: Option<String>,
    /// Model that writes and refines the variants. Falls back to the
    /// model the user picked for testing.
    pub authoring_model: Option<String>,
    pub creativity: u8,
    pub iterations: u8,
    /// Replaces the built-in model list when non-empty.
    pub models: Vec<String>,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            default_model: None,
            authoring_model: None,
            creativity: 5,
            iterations: 1,
            models: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrySection {
    pub max_retries: u32,
    pub initial_delay_ms: u64,
    pub backoff_factor: f64,
    pub max_delay_ms: u64,
}

impl Default for RetrySection {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay_ms: 2_000,
            backoff_factor: 2.0,
            max_delay_ms: 30_000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 8501,
        }
    }
}

impl Config {
    /// Load config from file, falling back to defaults.
    pub fn load() -> anyhow::Result<Self> {
        let path = paths::config_file_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the UI bounds would never produce.
    pub fn validate(&self) -> anyhow::Result<()> {
        if !(1..=10).contains(&self.studio.creativity) {
            anyhow::bail!(
                "studio.creativity must be between 1 and 10, got {}",
                self.studio.creativity
            );
        }
        if !(1..=3).contains(&self.studio.iterations) {
            anyhow::bail!(
                "studio.iterations must be between 1 and 3, got {}",
                self.studio.iterations
            );
        }
        if self.provider.base_url.trim().is_empty() {
            anyhow::bail!("provider.base_url cannot be empty");
        }
        Ok(())
    }
}
