//! CLI execution context

use anyhow::{Context as _, Result};
use prompt_optimizer_client::GeminiClient;
use prompt_optimizer_core::TextGenerator;
use prompt_optimizer_storage::JsonlResultStore;
use prompt_optimizer_workflow::OrchestratorConfig;
use std::sync::Arc;
use tracing::debug;

use crate::cli::Cli;
use crate::config::AppConfig;
use crate::output::{OutputFormat, OutputWriter};

/// Execution context for CLI commands
pub struct Context {
    pub config: AppConfig,
    pub output_format: OutputFormat,
    pub output: OutputWriter,
    pub verbose: bool,
}

impl Context {
    pub fn new(cli: &Cli) -> Result<Self> {
        let config = AppConfig::load(cli.config.as_deref())?;
        debug!(history = %config.history_path().display(), model = %config.model, "Configuration loaded");

        Ok(Self {
            config,
            output_format: cli.output,
            output: OutputWriter::new(cli.output, cli.no_color),
            verbose: cli.verbose,
        })
    }

    pub fn store(&self) -> JsonlResultStore {
        JsonlResultStore::new(self.config.history_path())
    }

    pub fn create_generator(&self) -> Result<Arc<dyn TextGenerator>> {
        let client_config = self.config.client_config(self.verbose)?;
        let client = GeminiClient::new(client_config).context("Failed to create generator client")?;
        Ok(Arc::new(client))
    }

    /// Orchestrator settings with command-line overrides applied.
    pub fn orchestrator_config(&self, variants: Option<usize>) -> Result<OrchestratorConfig> {
        let mut config = self.config.orchestrator.clone();
        if let Some(n) = variants {
            config = config.with_variant_count(n);
        }
        config.validated().context("Invalid orchestrator configuration")
    }
}
