//! Declarative trait and archetype definitions.
//!
//! These types mirror the JSON data files one-to-one. They are loaded
//! once at startup, validated, and never mutated afterwards.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::conditions::ValidationError;

/// Largest magnitude a single weight adjustment may carry.
pub const MAX_ADJUSTMENT: i64 = 1000;

// ============================================================================
// Weight Modifiers
// ============================================================================

/// A conditional weight adjustment attached to a trait or archetype.
///
/// The condition is either a raw engine condition string or a catalog
/// identifier plus input values. Exactly one of the two forms must be
/// present; `validate` enforces this along with the adjustment bounds.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct WeightModifier {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition_identifier: Option<String>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub condition_values: IndexMap<String, String>,
    pub weight_adjustment: i32,
}

/// View of a modifier's condition once validated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ModifierCondition<'a> {
    /// Literal condition text passed through verbatim.
    Raw(&'a str),
    /// Catalog identifier resolved against the condition catalog.
    Catalog {
        identifier: &'a str,
        values: &'a IndexMap<String, String>,
    },
}

impl WeightModifier {
    pub fn validate(&self) -> Result<(), ValidationError> {
        match (&self.condition, &self.condition_identifier) {
            (Some(_), Some(_)) => return Err(ValidationError::AmbiguousCondition),
            (None, None) => return Err(ValidationError::EmptyCondition),
            (Some(raw), None) if raw.trim().is_empty() => {
                return Err(ValidationError::EmptyCondition)
            }
            (None, Some(id)) if id.trim().is_empty() => {
                return Err(ValidationError::EmptyCondition)
            }
            _ => {}
        }
        if self.weight_adjustment == 0 {
            return Err(ValidationError::ZeroAdjustment);
        }
        if i64::from(self.weight_adjustment).abs() > MAX_ADJUSTMENT {
            return Err(ValidationError::AdjustmentOutOfRange {
                value: i64::from(self.weight_adjustment),
                limit: MAX_ADJUSTMENT,
            });
        }
        Ok(())
    }

    /// Validated view of the condition. Callers must run `validate`
    /// first; an invalid modifier falls back to an empty raw condition.
    pub fn condition(&self) -> ModifierCondition<'_> {
        if let Some(identifier) = &self.condition_identifier {
            ModifierCondition::Catalog {
                identifier,
                values: &self.condition_values,
            }
        } else {
            ModifierCondition::Raw(self.condition.as_deref().unwrap_or(""))
        }
    }
}

// ============================================================================
// Traits
// ============================================================================

/// Weight contribution a trait makes to the archetypes that use it.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct AiEffects {
    #[serde(default)]
    pub base_weight: i32,
    #[serde(default)]
    pub modifiers: Vec<WeightModifier>,
}

/// One character trait as declared in a trait data file.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct TraitDefinition {
    #[serde(skip)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Informational display weight, not used in resolution.
    #[serde(default)]
    pub weight: i32,
    #[serde(default)]
    pub ai_effects: AiEffects,
    #[serde(default)]
    pub opposite_traits: Vec<String>,
}

impl TraitDefinition {
    pub fn validate(&self) -> Result<(), ValidationError> {
        for modifier in &self.ai_effects.modifiers {
            modifier.validate()?;
        }
        Ok(())
    }
}

// ============================================================================
// Trait Interactions
// ============================================================================

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum InteractionKind {
    Synergy,
    Antagonism,
    Conditional,
}

impl InteractionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Synergy => "synergy",
            Self::Antagonism => "antagonism",
            Self::Conditional => "conditional",
        }
    }
}

/// A declared effect of two or more traits appearing together.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct TraitInteraction {
    pub trait_combination: Vec<String>,
    pub interaction_type: InteractionKind,
    pub weight_modifier: i32,
    #[serde(default)]
    pub description: String,
    /// Raw gate conditions, required for `conditional` interactions and
    /// forbidden for the flat kinds.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<String>,
}

impl TraitInteraction {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.trait_combination.len() < 2 {
            return Err(ValidationError::InteractionTooSmall {
                description: self.description.clone(),
            });
        }
        match self.interaction_type {
            InteractionKind::Conditional if self.conditions.is_empty() => {
                Err(ValidationError::ConditionalWithoutConditions {
                    description: self.description.clone(),
                })
            }
            InteractionKind::Synergy | InteractionKind::Antagonism
                if !self.conditions.is_empty() =>
            {
                Err(ValidationError::UnexpectedConditions {
                    kind: self.interaction_type.as_str().to_string(),
                    description: self.description.clone(),
                })
            }
            _ => Ok(()),
        }
    }

    /// Whether every trait in the combination is present in `traits`.
    pub fn applies_to(&self, traits: &[&str]) -> bool {
        self.trait_combination
            .iter()
            .all(|t| traits.contains(&t.as_str()))
    }
}

// ============================================================================
// Character Models (archetypes)
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct TraitSets {
    #[serde(default)]
    pub positive: Vec<String>,
    #[serde(default)]
    pub negative: Vec<String>,
}

/// An AI behavior archetype: base weight plus the traits and modifiers
/// that shape it.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct CharacterModel {
    #[serde(skip)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub base_weight: i32,
    #[serde(default)]
    pub traits: TraitSets,
    /// Kept separate from `traits.negative` even though both render as
    /// an absence check; provenance matters for reporting.
    #[serde(default)]
    pub opposite_traits: Vec<String>,
    #[serde(default)]
    pub modifiers: Vec<WeightModifier>,
}

impl CharacterModel {
    pub fn validate(&self) -> Result<(), ValidationError> {
        for modifier in &self.modifiers {
            modifier.validate()?;
        }
        Ok(())
    }

    /// Every trait name the model references, in positive, negative,
    /// opposite order. Duplicates across categories are kept.
    pub fn referenced_traits(&self) -> Vec<&str> {
        self.traits
            .positive
            .iter()
            .chain(self.traits.negative.iter())
            .chain(self.opposite_traits.iter())
            .map(String::as_str)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_modifier(condition: &str, adjustment: i32) -> WeightModifier {
        WeightModifier {
            condition: Some(condition.to_string()),
            condition_identifier: None,
            condition_values: IndexMap::new(),
            weight_adjustment: adjustment,
        }
    }

    #[test]
    fn test_modifier_validate_accepts_raw() {
        assert!(raw_modifier("is_ruler = yes", 15).validate().is_ok());
    }

    #[test]
    fn test_modifier_rejects_zero_adjustment() {
        let err = raw_modifier("is_ruler = yes", 0).validate().unwrap_err();
        assert_eq!(err, ValidationError::ZeroAdjustment);
    }

    #[test]
    fn test_modifier_rejects_out_of_range() {
        let err = raw_modifier("is_ruler = yes", 1001).validate().unwrap_err();
        assert!(matches!(err, ValidationError::AdjustmentOutOfRange { .. }));
        assert!(raw_modifier("is_ruler = yes", -1000).validate().is_ok());
    }

    #[test]
    fn test_modifier_rejects_both_condition_forms() {
        let modifier = WeightModifier {
            condition: Some("is_ruler = yes".to_string()),
            condition_identifier: Some("IS_RULER".to_string()),
            condition_values: IndexMap::new(),
            weight_adjustment: 5,
        };
        assert_eq!(
            modifier.validate().unwrap_err(),
            ValidationError::AmbiguousCondition
        );
    }

    #[test]
    fn test_modifier_rejects_missing_condition() {
        let modifier = WeightModifier {
            condition: None,
            condition_identifier: None,
            condition_values: IndexMap::new(),
            weight_adjustment: 5,
        };
        assert_eq!(
            modifier.validate().unwrap_err(),
            ValidationError::EmptyCondition
        );
    }

    #[test]
    fn test_interaction_requires_two_traits() {
        let interaction = TraitInteraction {
            trait_combination: vec!["brave".to_string()],
            interaction_type: InteractionKind::Synergy,
            weight_modifier: 10,
            description: "lone trait".to_string(),
            conditions: Vec::new(),
        };
        assert!(matches!(
            interaction.validate().unwrap_err(),
            ValidationError::InteractionTooSmall { .. }
        ));
    }

    #[test]
    fn test_conditional_interaction_requires_conditions() {
        let mut interaction = TraitInteraction {
            trait_combination: vec!["brave".to_string(), "wrathful".to_string()],
            interaction_type: InteractionKind::Conditional,
            weight_modifier: 20,
            description: String::new(),
            conditions: Vec::new(),
        };
        assert!(interaction.validate().is_err());
        interaction.conditions.push("is_at_war = yes".to_string());
        assert!(interaction.validate().is_ok());
    }

    #[test]
    fn test_flat_interaction_forbids_conditions() {
        let interaction = TraitInteraction {
            trait_combination: vec!["brave".to_string(), "craven".to_string()],
            interaction_type: InteractionKind::Antagonism,
            weight_modifier: -30,
            description: String::new(),
            conditions: vec!["is_at_war = yes".to_string()],
        };
        assert!(matches!(
            interaction.validate().unwrap_err(),
            ValidationError::UnexpectedConditions { .. }
        ));
    }

    #[test]
    fn test_interaction_applies_to_subset() {
        let interaction = TraitInteraction {
            trait_combination: vec!["brave".to_string(), "ambitious".to_string()],
            interaction_type: InteractionKind::Synergy,
            weight_modifier: 10,
            description: String::new(),
            conditions: Vec::new(),
        };
        assert!(interaction.applies_to(&["ambitious", "brave", "greedy"]));
        assert!(!interaction.applies_to(&["brave", "greedy"]));
    }

    #[test]
    fn test_referenced_traits_keeps_duplicates() {
        let model = CharacterModel {
            name: "ambitious".to_string(),
            traits: TraitSets {
                positive: vec!["ambitious".to_string()],
                negative: vec!["content".to_string()],
            },
            opposite_traits: vec!["content".to_string()],
            ..Default::default()
        };
        assert_eq!(
            model.referenced_traits(),
            vec!["ambitious", "content", "content"]
        );
    }

    #[test]
    fn test_model_json_shape() {
        let json = r#"{
            "description": "Power seeker",
            "base_weight": 75,
            "traits": { "positive": ["ambitious"], "negative": ["content"] },
            "modifiers": [
                { "condition": "is_ruler = yes", "weight_adjustment": 15 }
            ]
        }"#;
        let model: CharacterModel = serde_json::from_str(json).unwrap();
        assert_eq!(model.base_weight, 75);
        assert_eq!(model.traits.positive, vec!["ambitious"]);
        assert_eq!(model.modifiers.len(), 1);
        assert!(model.validate().is_ok());
    }
}
