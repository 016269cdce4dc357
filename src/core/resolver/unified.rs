//! Resolved weight expressions, ready for rendering.

// ============================================================================
// Trigger Trees
// ============================================================================

/// A condition tree for one modifier block. Kept deliberately small:
/// the engine syntax this feeds only needs presence checks, negation,
/// verbatim condition lines, and implicit-AND lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerNode {
    /// `has_trait = <name>`
    HasTrait(String),
    /// `NOT = { <inner> }`
    Not(Box<TriggerNode>),
    /// A literal condition line emitted verbatim.
    Raw(String),
    /// Sequential condition lines in one trigger block (implicit AND).
    All(Vec<TriggerNode>),
}

impl TriggerNode {
    pub fn has_trait(name: impl Into<String>) -> Self {
        Self::HasTrait(name.into())
    }

    pub fn not_trait(name: impl Into<String>) -> Self {
        Self::Not(Box::new(Self::HasTrait(name.into())))
    }

    pub fn raw(line: impl Into<String>) -> Self {
        Self::Raw(line.into())
    }
}

// ============================================================================
// Addends
// ============================================================================

/// Provenance of an addend, for the weight report and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddendKind {
    PositiveTrait,
    NegativeTrait,
    OppositeTrait,
    ModelModifier,
    TraitModifier,
    Interaction,
}

impl AddendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PositiveTrait => "positive trait",
            Self::NegativeTrait => "negative trait",
            Self::OppositeTrait => "opposite trait",
            Self::ModelModifier => "model modifier",
            Self::TraitModifier => "trait modifier",
            Self::Interaction => "interaction",
        }
    }
}

/// One conditional weight contribution of a unified model.
#[derive(Debug, Clone, PartialEq)]
pub struct Addend {
    pub weight: i32,
    pub condition: TriggerNode,
    pub kind: AddendKind,
    /// The trait, model, or interaction the addend came from.
    pub source: String,
}

// ============================================================================
// Unified Models
// ============================================================================

/// A fully resolved archetype: base weight plus every conditional
/// addend in resolution order. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct UnifiedModel {
    pub name: String,
    pub description: String,
    pub base_weight: i32,
    pub addends: Vec<Addend>,
}

impl UnifiedModel {
    /// Base weight plus every addend, as if every condition held.
    /// Used by the weight report, not by rendering.
    pub fn total_weight(&self) -> i64 {
        i64::from(self.base_weight) + self.addends.iter().map(|a| i64::from(a.weight)).sum::<i64>()
    }

    pub fn addends_of_kind(&self, kind: AddendKind) -> impl Iterator<Item = &Addend> {
        self.addends.iter().filter(move |a| a.kind == kind)
    }
}
