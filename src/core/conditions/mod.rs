//! Condition catalog loading, lookup, and validation.

pub mod catalog;
pub mod error;
pub mod types;

pub use catalog::{ConditionCatalog, COMPARISON_OPERATORS};
pub use error::{Result, ValidationError};
pub use types::{ConditionCategory, ConditionDefinition, ConditionType, Relevance};
