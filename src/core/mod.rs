//! Core subsystems of the weight generator.
//!
//! The pipeline wires these together: [`data`] and [`conditions`] load the
//! declarative inputs, [`resolver`] combines them into unified models,
//! [`render`] serializes those to trigger syntax, and [`rewrite`] splices
//! the result back into event files.

pub mod backup;
pub mod conditions;
pub mod data;
pub mod logging;
pub mod mods;
pub mod pipeline;
pub mod render;
pub mod resolver;
pub mod rewrite;
