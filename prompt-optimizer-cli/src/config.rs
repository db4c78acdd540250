//! Application configuration
//!
//! Sources, lowest precedence first: built-in defaults, a TOML file (the
//! `--config` path or `config.toml` in the platform config dir), then
//! `PROMPT_OPTIMIZER_*` environment variables with `__` between nested keys,
//! e.g. `PROMPT_OPTIMIZER_ORCHESTRATOR__VARIANT_COUNT=6`.

use anyhow::{Context as _, Result};
use config::{Config as ConfigLoader, Environment, File, FileFormat};
use directories::ProjectDirs;
use prompt_optimizer_client::{ClientConfig, API_KEY_ENV, DEFAULT_BASE_URL, DEFAULT_MODEL};
use prompt_optimizer_workflow::OrchestratorConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const ENV_PREFIX: &str = "PROMPT_OPTIMIZER";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Falls back to `GEMINI_API_KEY` when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
    /// Defaults to `history.jsonl` in the platform data dir
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history_path: Option<PathBuf>,
    pub orchestrator: OrchestratorConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout_secs: 60,
            history_path: None,
            orchestrator: OrchestratorConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load from `path` (must exist) or the default location (optional).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = ConfigLoader::builder();
        match path {
            Some(p) => {
                builder = builder.add_source(File::from(p).format(FileFormat::Toml).required(true));
            }
            None => {
                if let Some(default) = Self::config_path() {
                    builder = builder
                        .add_source(File::from(default).format(FileFormat::Toml).required(false));
                }
            }
        }

        let loaded = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to load configuration")?;

        let mut config: AppConfig = loaded
            .try_deserialize()
            .context("Invalid configuration")?;

        if config.api_key.is_none() {
            config.api_key = std::env::var(API_KEY_ENV)
                .ok()
                .filter(|key| !key.trim().is_empty());
        }

        Ok(config)
    }

    pub fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("com", "prompt-optimizer", "prompt-optimizer")
    }

    pub fn config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join("config.toml"))
    }

    pub fn history_path(&self) -> PathBuf {
        if let Some(path) = &self.history_path {
            return path.clone();
        }

        match Self::project_dirs() {
            Some(dirs) => dirs.data_dir().join("history.jsonl"),
            None => PathBuf::from(".prompt-optimizer").join("history.jsonl"),
        }
    }

    /// Generator client settings; fails when no API key is configured.
    pub fn client_config(&self, verbose: bool) -> Result<ClientConfig> {
        let api_key = self.api_key.clone().with_context(|| {
            format!(
                "No API key configured. Set {} or {}_API_KEY.",
                API_KEY_ENV, ENV_PREFIX
            )
        })?;

        Ok(ClientConfig::new(api_key)
            .with_base_url(self.base_url.clone())
            .with_model(self.model.clone())
            .with_timeout(Duration::from_secs(self.timeout_secs))
            .with_logging(verbose))
    }

    /// A copy with the API key masked, for display.
    pub fn redacted(&self) -> Self {
        let mut shown = self.clone();
        shown.api_key = shown.api_key.as_ref().map(|_| "********".to_string());
        shown
    }

    pub fn to_redacted_toml(&self) -> Result<String> {
        toml::to_string_pretty(&self.redacted()).context("Failed to serialize configuration")
    }
}
