//! Model resolution: archetypes plus traits into unified models.

pub mod error;
#[allow(clippy::module_inception)]
pub mod resolver;
pub mod unified;

pub use error::{ResolutionError, ResolutionStage, Result};
pub use resolver::{ModelResolver, OppositeConflict, ResolutionReport};
pub use unified::{Addend, AddendKind, TriggerNode, UnifiedModel};
