use async_trait::async_trait;

use crate::domain::{GenerationSettings, OptimizationRecord};
use crate::error::{GenerationError, Result};

/// The external text-generation service.
///
/// Implementations make a single attempt per call; retry and backoff are the
/// caller's concern.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(
        &self,
        prompt: &str,
        settings: &GenerationSettings,
    ) -> std::result::Result<String, GenerationError>;
}

/// Append-only sink for finished runs.
#[async_trait]
pub trait ResultSink: Send + Sync {
    async fn append(&self, record: &OptimizationRecord) -> Result<()>;
}

/// A pure scoring function over borrowed input.
pub trait MetricCalculator {
    type Input<'a>;
    type Output;

    fn calculate(&self, input: Self::Input<'_>) -> Self::Output;
}
