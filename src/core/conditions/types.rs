//! Data model for the condition catalog.
//!
//! Catalog entries describe CK3 trigger conditions: a syntax template with
//! `$name` placeholders, the named inputs it expects, optional custom
//! trigger shortcuts, and classification metadata used for reporting.

use indexmap::IndexMap;
use serde::Deserialize;

/// How a condition's value is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConditionType {
    /// `yes`/`no` conditions.
    Boolean,
    /// `<`, `<=`, `=`, `!=`, `>`, `>=` conditions.
    Comparison,
    /// `has_trait`-style conditions.
    Trait,
    /// Claim conditions.
    Claim,
    /// Conditions with multiple parameters.
    #[default]
    Complex,
}

/// Relevance tier of a condition for AI weighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Relevance {
    High,
    #[default]
    Medium,
    Low,
}

/// A single condition definition from the catalog.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConditionDefinition {
    /// Identifier, filled in from the catalog map key.
    #[serde(skip)]
    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Syntax template with `$name` placeholders,
    /// e.g. `wealth $operator $wealth_threshold`.
    pub syntax: String,

    /// Named inputs the template expects, mapping placeholder name to a
    /// human-readable description of what it accepts.
    #[serde(default)]
    pub input_values: IndexMap<String, String>,

    /// Shortcut names expanding to a fixed rendered condition.
    #[serde(default)]
    pub custom_triggers: IndexMap<String, String>,

    /// Scopes in which the condition is valid (character, title, ...).
    #[serde(default)]
    pub supported_scopes: Vec<String>,

    #[serde(default)]
    pub ai_relevance: Relevance,

    #[serde(default)]
    pub condition_type: ConditionType,
}

/// A named group of conditions from the catalog file.
#[derive(Debug, Clone, Deserialize)]
pub struct ConditionCategory {
    #[serde(skip)]
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub conditions: IndexMap<String, ConditionDefinition>,
}
