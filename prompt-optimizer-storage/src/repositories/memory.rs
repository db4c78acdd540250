use async_trait::async_trait;
use prompt_optimizer_core::{OptimizationRecord, Result, ResultSink};
use tokio::sync::RwLock;

use super::ResultRepository;

/// Process-local history, used when results should not outlive the process.
#[derive(Default)]
pub struct InMemoryResultStore {
    records: RwLock<Vec<OptimizationRecord>>,
}

impl InMemoryResultStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ResultSink for InMemoryResultStore {
    async fn append(&self, record: &OptimizationRecord) -> Result<()> {
        self.records.write().await.push(record.clone());
        Ok(())
    }
}

#[async_trait]
impl ResultRepository for InMemoryResultStore {
    async fn list(&self) -> Result<Vec<OptimizationRecord>> {
        Ok(self.records.read().await.clone())
    }

    async fn clear(&self) -> Result<usize> {
        let mut records = self.records.write().await;
        let removed = records.len();
        records.clear();
        Ok(removed)
    }
}
