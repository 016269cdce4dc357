//! Errors raised while resolving a character model.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ResolutionError>;

/// Stage of resolution at which a reference failed to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionStage {
    PositiveTrait,
    NegativeTrait,
    OppositeTrait,
    ModelCondition,
    TraitCondition,
}

impl std::fmt::Display for ResolutionStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::PositiveTrait => "positive trait",
            Self::NegativeTrait => "negative trait",
            Self::OppositeTrait => "opposite trait",
            Self::ModelCondition => "model condition",
            Self::TraitCondition => "trait condition",
        };
        f.write_str(label)
    }
}

/// An unknown trait or condition reference. Resolution of the
/// offending model stops; other models are unaffected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("model '{model}': unknown {stage} reference '{reference}'")]
pub struct ResolutionError {
    pub model: String,
    pub reference: String,
    pub stage: ResolutionStage,
}

impl ResolutionError {
    pub fn new(model: &str, reference: &str, stage: ResolutionStage) -> Self {
        Self {
            model: model.to_string(),
            reference: reference.to_string(),
            stage,
        }
    }
}
