use prompt_optimizer_core::{CoreError, GenerationSettings, Result};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::retry::RetryConfig;

/// Tunables of one optimization run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct OrchestratorConfig {
    /// Rewrites requested from the generator per run.
    #[validate(range(min = 1, max = 10))]
    pub variant_count: usize,
    #[validate(nested)]
    pub retry: RetryConfig,
    pub variation_settings: GenerationSettings,
    /// Shared by every candidate so responses stay comparable.
    pub response_settings: GenerationSettings,
    #[validate(range(min = 1, max = 64))]
    pub max_concurrency: usize,
    /// Add one templated rewrite when variation generation fails outright.
    pub fallback_variation: bool,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            variant_count: 4,
            retry: RetryConfig::default(),
            variation_settings: GenerationSettings::new(0.8, 1024),
            response_settings: GenerationSettings::new(0.7, 1024),
            max_concurrency: 5,
            fallback_variation: false,
        }
    }
}

impl OrchestratorConfig {
    pub fn with_variant_count(mut self, variant_count: usize) -> Self {
        self.variant_count = variant_count;
        self
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_fallback_variation(mut self, enabled: bool) -> Self {
        self.fallback_variation = enabled;
        self
    }

    pub fn validated(self) -> Result<Self> {
        self.validate().map_err(CoreError::from)?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = OrchestratorConfig::default();
        assert_eq!(config.variant_count, 4);
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.variation_settings.temperature, 0.8);
        assert_eq!(config.response_settings.temperature, 0.7);
        assert!(!config.fallback_variation);
        assert!(config.validated().is_ok());
    }

    #[test]
    fn test_rejects_zero_variants() {
        let config = OrchestratorConfig::default().with_variant_count(0);
        assert!(matches!(config.validated(), Err(CoreError::Validation(_))));
    }

    #[test]
    fn test_rejects_unbounded_retry_budget() {
        let mut config = OrchestratorConfig::default();
        config.retry.max_attempts = 50;
        assert!(config.validated().is_err());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: OrchestratorConfig =
            serde_json::from_str(r#"{"variant_count": 2, "retry": {"max_attempts": 1}}"#).unwrap();
        assert_eq!(config.variant_count, 2);
        assert_eq!(config.retry.max_attempts, 1);
        assert_eq!(config.max_concurrency, 5);
    }
}
