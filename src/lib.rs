//! CK3 AI Weight Generator
//!
//! Core library for rewriting AI placeholder blocks in Crusader Kings 3
//! event files. Trait and character-model definitions are loaded from
//! declarative JSON, combined into unified weight models, and rendered
//! into the engine's `base` / `modifier` / `trigger` syntax.

pub mod config;
pub mod core;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
