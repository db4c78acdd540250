use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "n", rename_all = "snake_case")]
pub enum CandidateOrigin {
    Original,
    /// A generated rewrite, numbered from 1 in generation order.
    Variant(usize),
}

impl fmt::Display for CandidateOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CandidateOrigin::Original => write!(f, "original"),
            CandidateOrigin::Variant(n) => write!(f, "variant {}", n),
        }
    }
}

/// A prompt under evaluation and, once the response stage has run, its response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub index: usize,
    pub origin: CandidateOrigin,
    pub prompt_text: String,
    pub response_text: Option<String>,
}

impl Candidate {
    pub fn original(prompt_text: impl Into<String>) -> Self {
        Self {
            index: 0,
            origin: CandidateOrigin::Original,
            prompt_text: prompt_text.into(),
            response_text: None,
        }
    }

    pub fn variant(n: usize, prompt_text: impl Into<String>) -> Self {
        Self {
            index: n,
            origin: CandidateOrigin::Variant(n),
            prompt_text: prompt_text.into(),
            response_text: None,
        }
    }

    pub fn with_response(mut self, response: impl Into<String>) -> Self {
        self.response_text = Some(response.into());
        self
    }

    pub fn is_original(&self) -> bool {
        self.origin == CandidateOrigin::Original
    }

    pub fn has_response(&self) -> bool {
        self.response_text.is_some()
    }
}
