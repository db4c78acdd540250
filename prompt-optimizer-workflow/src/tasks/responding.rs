use prompt_optimizer_core::{
    Candidate, CoreError, GenerationError, GenerationSettings, Result, TextGenerator,
};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::retry::{retry, ExponentialBackoff, RetryError};

/// Settled outcome of one candidate's response request.
#[derive(Debug, Clone)]
pub struct CandidateResponse {
    pub index: usize,
    pub outcome: std::result::Result<String, RetryError<GenerationError>>,
}

/// Requests a response for every candidate concurrently, each with its own
/// retry budget and the same generation settings.
pub struct ResponseStage {
    generator: Arc<dyn TextGenerator>,
    settings: GenerationSettings,
    policy: ExponentialBackoff,
    max_concurrency: usize,
}

impl ResponseStage {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        settings: GenerationSettings,
        policy: ExponentialBackoff,
        max_concurrency: usize,
    ) -> Self {
        Self {
            generator,
            settings,
            policy,
            max_concurrency: max_concurrency.max(1),
        }
    }

    /// Waits for every request to settle, in candidate order.
    ///
    /// The requests live in a `JoinSet`, so they are aborted both on
    /// cancellation and when this future is dropped.
    pub async fn run(
        &self,
        candidates: &[Candidate],
        cancel: &CancellationToken,
    ) -> Result<Vec<CandidateResponse>> {
        let semaphore = Arc::new(Semaphore::new(self.max_concurrency));
        let mut tasks = JoinSet::new();

        for candidate in candidates {
            let semaphore = Arc::clone(&semaphore);
            let generator = Arc::clone(&self.generator);
            let policy = self.policy.clone();
            let settings = self.settings;
            let index = candidate.index;
            let prompt = candidate.prompt_text.clone();

            tasks.spawn(async move {
                let _permit = semaphore.acquire_owned().await.ok();
                let operation = format!("response[{}]", index);
                let generator = generator.as_ref();
                let prompt = prompt.as_str();
                let settings = &settings;
                let outcome = retry(&policy, &operation, move || {
                    generator.generate(prompt, settings)
                })
                .await;
                CandidateResponse { index, outcome }
            });
        }

        let mut settled: Vec<Option<CandidateResponse>> =
            candidates.iter().map(|_| None).collect();

        loop {
            let next = tokio::select! {
                _ = cancel.cancelled() => {
                    tasks.abort_all();
                    debug!("Abandoned in-flight response requests");
                    return Err(CoreError::Cancelled("responding".to_string()));
                }
                next = tasks.join_next() => next,
            };

            match next {
                None => break,
                Some(Ok(response)) => {
                    if let Some(slot) = candidates
                        .iter()
                        .position(|c| c.index == response.index)
                        .and_then(|pos| settled.get_mut(pos))
                    {
                        *slot = Some(response);
                    }
                }
                Some(Err(e)) => warn!(error = %e, "Response task failed"),
            }
        }

        let responses = candidates
            .iter()
            .zip(settled)
            .map(|(candidate, slot)| {
                slot.unwrap_or_else(|| CandidateResponse {
                    index: candidate.index,
                    outcome: Err(RetryError {
                        error: GenerationError::service("response task did not complete"),
                        attempts: 0,
                    }),
                })
            })
            .collect();

        Ok(responses)
    }
}
