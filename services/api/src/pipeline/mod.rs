//! services/api/src/pipeline/mod.rs
//!
//! The content-generation pipeline: the four public operations the front end calls.
//! Each call owns its own accumulator state, so one `ContentPipeline` can serve any
//! number of concurrent callers.

pub mod analysis;
pub mod faqs;
pub mod gate;
pub mod questions;
pub mod thoughts;

#[cfg(test)]
pub(crate) mod testing;

pub use gate::CredentialGate;
pub use questions::{BatchProgress, BATCH_SIZE, MAX_QUESTION_COUNT};

use crate::config::Config;
use content_pipeline_core::ports::{PortError, PortResult};

/// The model used by each operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSettings {
    pub question_model: String,
    pub thought_model: String,
    pub analysis_model: String,
}

impl ModelSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            question_model: config.question_model.clone(),
            thought_model: config.thought_model.clone(),
            analysis_model: config.analysis_model.clone(),
        }
    }
}

/// Entry point for question, thought-chain, analysis and FAQ generation.
#[derive(Clone)]
pub struct ContentPipeline {
    gate: CredentialGate,
    models: ModelSettings,
}

impl ContentPipeline {
    pub fn new(gate: CredentialGate, models: ModelSettings) -> Self {
        Self { gate, models }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            CredentialGate::from_config(config),
            ModelSettings::from_config(config),
        )
    }

    pub fn is_live(&self) -> bool {
        self.gate.is_live()
    }
}

fn require_text(name: &str, value: &str) -> PortResult<()> {
    if value.trim().is_empty() {
        return Err(PortError::InvalidRequest(format!("{} must not be empty", name)));
    }
    Ok(())
}
