use serde::{Deserialize, Serialize};

/// Sampling settings passed to the generator with every request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationSettings {
    pub temperature: f32,
    /// Upper bound on generated tokens.
    pub max_length: u32,
}

impl GenerationSettings {
    pub fn new(temperature: f32, max_length: u32) -> Self {
        Self {
            temperature,
            max_length,
        }
    }
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_length: 1024,
        }
    }
}
