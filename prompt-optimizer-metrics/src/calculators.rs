pub mod length;
pub mod keyword;
pub mod structure;
pub mod alignment;

pub use length::*;
pub use keyword::*;
pub use structure::*;
pub use alignment::*;

use prompt_optimizer_core::{TaskProfile, SUB_SCORE_MAX};

/// The borrowed (profile, prompt, response) triple every calculator consumes.
#[derive(Debug, Clone, Copy)]
pub struct MetricInput<'a> {
    pub profile: &'a TaskProfile,
    pub prompt: &'a str,
    pub response: &'a str,
}

impl<'a> MetricInput<'a> {
    pub fn new(profile: &'a TaskProfile, prompt: &'a str, response: &'a str) -> Self {
        Self {
            profile,
            prompt,
            response,
        }
    }
}

pub(crate) fn clamp_sub_score(score: f64) -> f64 {
    if score.is_nan() {
        return 0.0;
    }
    score.clamp(0.0, SUB_SCORE_MAX)
}
