use prompt_optimizer_core::{CoreError, GenerationErrorKind, PipelineState};
use thiserror::Error;
use uuid::Uuid;

/// A run that ended in `Failed`, with what a caller needs to report it.
#[derive(Error, Debug)]
#[error("Run failed during {stage}: {error}{}", last_error_suffix(.last_generation_error))]
pub struct PipelineError {
    pub run_id: Option<Uuid>,
    /// State the run was in when it failed.
    pub stage: PipelineState,
    #[source]
    pub error: CoreError,
    pub last_generation_error: Option<GenerationErrorKind>,
}

fn last_error_suffix(kind: &Option<GenerationErrorKind>) -> String {
    match kind {
        Some(kind) => format!(" (last generator error: {})", kind),
        None => String::new(),
    }
}

impl PipelineError {
    pub fn new(stage: PipelineState, error: CoreError) -> Self {
        Self {
            run_id: None,
            stage,
            error,
            last_generation_error: None,
        }
    }

    pub fn with_run_id(mut self, run_id: Uuid) -> Self {
        self.run_id = Some(run_id);
        self
    }

    pub fn with_last_generation_error(mut self, kind: Option<GenerationErrorKind>) -> Self {
        self.last_generation_error = kind;
        self
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self.error, CoreError::Cancelled(_))
    }
}
