use prompt_optimizer_core::{
    CoreError, GenerationErrorKind, OptimizationRequest, PipelineRun, PipelineState, ResultSink,
    TaskProfileRegistry, TextGenerator,
};
use prompt_optimizer_metrics::{CandidateEvaluator, Selector};
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::config::OrchestratorConfig;
use crate::error::PipelineError;
use crate::progress::{ProgressReporter, StageProgress};
use crate::retry::ExponentialBackoff;
use crate::tasks::{fallback_variation, ResponseStage, VariationStage};

/// Drives one run through `Init -> Varying -> Responding -> Evaluating ->
/// Selecting -> Done`, owning the retry and degradation policy around the
/// generator.
///
/// The orchestrator holds no per-run state; every call to [`run`] threads a
/// fresh [`PipelineRun`] through the stages.
///
/// [`run`]: PipelineOrchestrator::run
pub struct PipelineOrchestrator {
    generator: Arc<dyn TextGenerator>,
    config: OrchestratorConfig,
    evaluator: CandidateEvaluator,
    selector: Selector,
    sink: Option<Arc<dyn ResultSink>>,
    progress: ProgressReporter,
}

/// Per-run bookkeeping that is not part of the run record itself.
struct RunContext<'a> {
    cancel: &'a CancellationToken,
    last_generation_error: Option<GenerationErrorKind>,
}

impl PipelineOrchestrator {
    pub fn new(generator: Arc<dyn TextGenerator>, config: OrchestratorConfig) -> Self {
        Self {
            generator,
            config,
            evaluator: CandidateEvaluator::new(),
            selector: Selector::new(),
            sink: None,
            progress: ProgressReporter::new(),
        }
    }

    pub fn with_sink(mut self, sink: Arc<dyn ResultSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StageProgress> {
        self.progress.subscribe()
    }

    /// Validate the raw inputs and run. Invalid input fails in `Init`
    /// before the generator is called.
    pub async fn run(
        &self,
        prompt: &str,
        category: &str,
        cancel: CancellationToken,
    ) -> Result<PipelineRun, PipelineError> {
        let request = OptimizationRequest::new(prompt, category)
            .map_err(|e| PipelineError::new(PipelineState::Init, e))?;
        self.run_request(request, cancel).await
    }

    pub async fn run_request(
        &self,
        request: OptimizationRequest,
        cancel: CancellationToken,
    ) -> Result<PipelineRun, PipelineError> {
        let profile = TaskProfileRegistry::profile(request.category).clone();
        let mut run = PipelineRun::new(profile, request.prompt);
        let mut ctx = RunContext {
            cancel: &cancel,
            last_generation_error: None,
        };

        info!(
            run_id = %run.id,
            category = %request.category,
            variants = self.config.variant_count,
            "Starting optimization run"
        );

        self.vary(&mut run, &mut ctx).await?;
        self.respond(&mut run, &mut ctx).await?;
        self.evaluate_and_select(&mut run, &mut ctx)?;
        self.finish(&mut run).await?;

        Ok(run)
    }

    async fn vary(
        &self,
        run: &mut PipelineRun,
        ctx: &mut RunContext<'_>,
    ) -> Result<(), PipelineError> {
        self.transition(run, PipelineState::Varying, "Generating prompt variations")?;
        self.check_cancelled(run, ctx)?;

        let stage = VariationStage::new(
            Arc::clone(&self.generator),
            self.config.variation_settings,
            self.policy(),
            self.config.variant_count,
        );
        let original = run.original().prompt_text.clone();
        let category = run.profile.category;

        let outcome = tokio::select! {
            _ = ctx.cancel.cancelled() => None,
            outcome = stage.run(&original, category) => Some(outcome),
        };

        match outcome {
            None => return Err(self.fail(run, ctx, CoreError::Cancelled("varying".to_string()))),
            Some(Ok(variants)) => {
                for variant in variants {
                    run.push_variant(variant);
                }
            }
            Some(Err(e)) => {
                ctx.last_generation_error = Some(e.error.kind());
                warn!(
                    run_id = %run.id,
                    attempts = e.attempts,
                    error = %e.error,
                    "Variation generation failed, continuing with the original prompt"
                );
                if self.config.fallback_variation {
                    run.push_variant(fallback_variation(&original, category));
                    debug!(run_id = %run.id, "Added templated fallback variation");
                }
            }
        }

        Ok(())
    }

    async fn respond(
        &self,
        run: &mut PipelineRun,
        ctx: &mut RunContext<'_>,
    ) -> Result<(), PipelineError> {
        let message = format!("Requesting responses for {} candidates", run.candidates.len());
        self.transition(run, PipelineState::Responding, message)?;
        self.check_cancelled(run, ctx)?;

        let stage = ResponseStage::new(
            Arc::clone(&self.generator),
            self.config.response_settings,
            self.policy(),
            self.config.max_concurrency,
        );

        let responses = match stage.run(&run.candidates, ctx.cancel).await {
            Ok(responses) => responses,
            Err(e) => return Err(self.fail(run, ctx, e)),
        };

        let mut baseline_error = None;
        for response in responses {
            match response.outcome {
                Ok(text) => {
                    if let Some(candidate) =
                        run.candidates.iter_mut().find(|c| c.index == response.index)
                    {
                        candidate.response_text = Some(text);
                    }
                }
                Err(e) => {
                    let kind = e.error.kind();
                    ctx.last_generation_error = Some(kind);
                    warn!(
                        run_id = %run.id,
                        candidate = response.index,
                        attempts = e.attempts,
                        error = %e.error,
                        "Dropping candidate without response"
                    );
                    if response.index == 0 {
                        baseline_error = Some(kind);
                    }
                }
            }
        }

        if let Some(last_error) = baseline_error {
            ctx.last_generation_error = Some(last_error);
            return Err(self.fail(run, ctx, CoreError::BaselineUnavailable { last_error }));
        }

        Ok(())
    }

    /// Selection runs while the run is still `Evaluating`, so that a
    /// `NoScoredCandidates` failure has a legal edge to `Failed`.
    fn evaluate_and_select(
        &self,
        run: &mut PipelineRun,
        ctx: &mut RunContext<'_>,
    ) -> Result<(), PipelineError> {
        self.transition(run, PipelineState::Evaluating, "Scoring candidates")?;
        self.check_cancelled(run, ctx)?;

        let results = match self.evaluator.evaluate(&run.profile, &run.candidates) {
            Ok(results) => results,
            Err(e) => return Err(self.fail(run, ctx, e)),
        };
        let outcome = match self.selector.select(&results) {
            Ok(outcome) => outcome,
            Err(e) => return Err(self.fail(run, ctx, e)),
        };
        run.results = results;

        info!(
            run_id = %run.id,
            winner = outcome.winner_index,
            winner_total = outcome.winner_total(),
            improvement = outcome.improvement,
            "Selected winning candidate"
        );

        let message = format!("Candidate {} selected", outcome.winner_index);
        run.outcome = Some(outcome);
        self.transition(run, PipelineState::Selecting, message)
    }

    async fn finish(&self, run: &mut PipelineRun) -> Result<(), PipelineError> {
        if let Some(sink) = &self.sink {
            match run.to_record() {
                Some(record) => {
                    if let Err(e) = sink.append(&record).await {
                        error!(run_id = %run.id, error = %e, "Failed to store run result");
                    }
                }
                None => warn!(run_id = %run.id, "Run has no storable record"),
            }
        }

        self.transition(run, PipelineState::Done, "Optimization complete")
    }

    fn policy(&self) -> ExponentialBackoff {
        ExponentialBackoff::new(self.config.retry.clone())
    }

    fn transition(
        &self,
        run: &mut PipelineRun,
        next: PipelineState,
        message: impl Into<String>,
    ) -> Result<(), PipelineError> {
        let stage = run.state;
        run.advance(next)
            .map_err(|e| PipelineError::new(stage, e).with_run_id(run.id))?;

        let message = message.into();
        debug!(run_id = %run.id, state = %next, "{}", message);
        self.progress.report(run.id, next, message);
        Ok(())
    }

    fn check_cancelled(
        &self,
        run: &mut PipelineRun,
        ctx: &RunContext<'_>,
    ) -> Result<(), PipelineError> {
        if ctx.cancel.is_cancelled() {
            let stage = run.state.to_string();
            return Err(self.fail(run, ctx, CoreError::Cancelled(stage)));
        }
        Ok(())
    }

    /// Move the run to `Failed` and build the caller-facing error.
    fn fail(
        &self,
        run: &mut PipelineRun,
        ctx: &RunContext<'_>,
        error: CoreError,
    ) -> PipelineError {
        let stage = run.state;

        if let Err(e) = run.advance(PipelineState::Failed) {
            warn!(run_id = %run.id, error = %e, "Could not mark run as failed");
        }

        error!(
            run_id = %run.id,
            stage = %stage,
            error = %error,
            last_generation_error = ?ctx.last_generation_error,
            "Optimization run failed"
        );
        self.progress.report(run.id, PipelineState::Failed, error.to_string());

        PipelineError::new(stage, error)
            .with_run_id(run.id)
            .with_last_generation_error(ctx.last_generation_error)
    }
}
