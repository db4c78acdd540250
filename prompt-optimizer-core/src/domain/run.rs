use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::{
    Candidate, EvaluationResult, OptimizationRecord, OptimizationReport, SelectionOutcome,
    TaskProfile,
};
use crate::error::{CoreError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineState {
    Init,
    Varying,
    Responding,
    Evaluating,
    Selecting,
    Done,
    Failed,
}

impl PipelineState {
    /// The only legal edges of the run state machine.
    pub fn can_transition_to(&self, next: PipelineState) -> bool {
        use PipelineState::*;

        matches!(
            (self, next),
            (Init, Varying)
                | (Varying, Responding)
                | (Responding, Evaluating)
                | (Evaluating, Selecting)
                | (Selecting, Done)
                | (Varying, Failed)
                | (Responding, Failed)
                | (Evaluating, Failed)
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, PipelineState::Done | PipelineState::Failed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineState::Init => "init",
            PipelineState::Varying => "varying",
            PipelineState::Responding => "responding",
            PipelineState::Evaluating => "evaluating",
            PipelineState::Selecting => "selecting",
            PipelineState::Done => "done",
            PipelineState::Failed => "failed",
        }
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything one optimization run produces, threaded through each stage.
///
/// Exactly one candidate is the original, at index 0; variants follow in
/// generation order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineRun {
    pub id: Uuid,
    pub profile: TaskProfile,
    pub state: PipelineState,
    pub candidates: Vec<Candidate>,
    pub results: Vec<EvaluationResult>,
    pub outcome: Option<SelectionOutcome>,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl PipelineRun {
    pub fn new(profile: TaskProfile, original_prompt: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            profile,
            state: PipelineState::Init,
            candidates: vec![Candidate::original(original_prompt)],
            results: Vec::new(),
            outcome: None,
            started_at: Utc::now(),
            completed_at: None,
        }
    }

    /// Move to `next`, rejecting edges the state machine does not allow.
    pub fn advance(&mut self, next: PipelineState) -> Result<()> {
        if !self.state.can_transition_to(next) {
            return Err(CoreError::InvalidState(format!(
                "Illegal pipeline transition {} -> {}",
                self.state, next
            )));
        }

        self.state = next;
        if next.is_terminal() {
            self.completed_at = Some(Utc::now());
        }
        Ok(())
    }

    /// Append a generated variant; returns its candidate index.
    pub fn push_variant(&mut self, prompt_text: impl Into<String>) -> usize {
        let index = self.candidates.len();
        self.candidates.push(Candidate::variant(index, prompt_text));
        index
    }

    pub fn original(&self) -> &Candidate {
        &self.candidates[0]
    }

    pub fn candidate(&self, index: usize) -> Option<&Candidate> {
        self.candidates.iter().find(|c| c.index == index)
    }

    pub fn variant_count(&self) -> usize {
        self.candidates.len() - 1
    }

    pub fn winner(&self) -> Option<&Candidate> {
        self.outcome
            .as_ref()
            .and_then(|outcome| self.candidate(outcome.winner_index))
    }

    /// The caller-facing record; present only once selection has happened.
    pub fn report(&self) -> Option<OptimizationReport> {
        let outcome = self.outcome.as_ref()?;
        let winner = self.winner()?;
        OptimizationReport::new(outcome, winner).ok()
    }

    /// The projection handed to the storage collaborator.
    pub fn to_record(&self) -> Option<OptimizationRecord> {
        let report = self.report()?;
        Some(OptimizationRecord::new(
            self.id,
            self.profile.category,
            self.original().prompt_text.clone(),
            report,
            self.candidates.len(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{TaskCategory, TaskProfileRegistry};

    fn new_run() -> PipelineRun {
        let profile = TaskProfileRegistry::profile(TaskCategory::Explanation).clone();
        PipelineRun::new(profile, "explain machine learning")
    }

    #[test]
    fn test_happy_path_transitions() {
        let mut run = new_run();
        for next in [
            PipelineState::Varying,
            PipelineState::Responding,
            PipelineState::Evaluating,
            PipelineState::Selecting,
            PipelineState::Done,
        ] {
            run.advance(next).unwrap();
        }
        assert_eq!(run.state, PipelineState::Done);
        assert!(run.completed_at.is_some());
    }

    #[test]
    fn test_failed_not_reachable_from_init_or_selecting() {
        assert!(!PipelineState::Init.can_transition_to(PipelineState::Failed));
        assert!(!PipelineState::Selecting.can_transition_to(PipelineState::Failed));
        assert!(PipelineState::Responding.can_transition_to(PipelineState::Failed));
    }

    #[test]
    fn test_skipping_a_stage_is_rejected() {
        let mut run = new_run();
        let err = run.advance(PipelineState::Responding).unwrap_err();
        assert!(matches!(err, CoreError::InvalidState(_)));
        assert_eq!(run.state, PipelineState::Init);
    }

    #[test]
    fn test_variants_are_indexed_in_generation_order() {
        let mut run = new_run();
        assert_eq!(run.push_variant("first rewrite"), 1);
        assert_eq!(run.push_variant("second rewrite"), 2);
        assert_eq!(run.variant_count(), 2);
        assert!(run.original().is_original());
        assert_eq!(
            run.candidates.iter().filter(|c| c.is_original()).count(),
            1
        );
    }
}
