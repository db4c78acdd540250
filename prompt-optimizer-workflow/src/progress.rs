use chrono::{DateTime, Utc};
use prompt_optimizer_core::PipelineState;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

const PROGRESS_CHANNEL_CAPACITY: usize = 64;

/// Published on every state transition of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageProgress {
    pub run_id: Uuid,
    pub state: PipelineState,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// Fan-out of progress events; publishing with no subscribers is a no-op.
#[derive(Debug, Clone)]
pub struct ProgressReporter {
    tx: broadcast::Sender<StageProgress>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(PROGRESS_CHANNEL_CAPACITY);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StageProgress> {
        self.tx.subscribe()
    }

    pub fn report(&self, run_id: Uuid, state: PipelineState, message: impl Into<String>) {
        let _ = self.tx.send(StageProgress {
            run_id,
            state,
            message: message.into(),
            timestamp: Utc::now(),
        });
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}
