pub mod jsonl;
pub mod memory;

pub use jsonl::*;
pub use memory::*;

use async_trait::async_trait;
use prompt_optimizer_core::{OptimizationRecord, Result, ResultSink, TaskCategory};

use crate::statistics::RunStatistics;

/// Queryable history of finished runs. Writes go through [`ResultSink`].
#[async_trait]
pub trait ResultRepository: ResultSink {
    /// All records in insertion order.
    async fn list(&self) -> Result<Vec<OptimizationRecord>>;

    /// Remove every record, returning how many were removed.
    async fn clear(&self) -> Result<usize>;

    async fn list_by_category(&self, category: TaskCategory) -> Result<Vec<OptimizationRecord>> {
        let records = self.list().await?;
        Ok(records
            .into_iter()
            .filter(|record| record.category == category)
            .collect())
    }

    /// At most `limit` records, newest first, optionally of one category.
    async fn recent(
        &self,
        category: Option<TaskCategory>,
        limit: usize,
    ) -> Result<Vec<OptimizationRecord>> {
        let records = match category {
            Some(category) => self.list_by_category(category).await?,
            None => self.list().await?,
        };
        Ok(records.into_iter().rev().take(limit).collect())
    }

    async fn statistics(&self) -> Result<RunStatistics> {
        Ok(RunStatistics::from_records(&self.list().await?))
    }
}
