//! Declarative data: traits, interactions, and character models.

pub mod error;
pub mod model_store;
pub mod trait_store;
pub mod types;

pub use error::{DataError, Result};
pub use model_store::ModelStore;
pub use trait_store::TraitStore;
pub use types::{
    AiEffects, CharacterModel, InteractionKind, ModifierCondition, TraitDefinition,
    TraitInteraction, TraitSets, WeightModifier, MAX_ADJUSTMENT,
};
