//! Combines an archetype with its traits into a unified model.
//!
//! Accumulation order is fixed and observable in the rendered output:
//! base weight, positive traits, negative traits, opposite traits,
//! model-level modifiers, trait-level modifiers per trait usage, then
//! interactions. Nothing is reordered or deduplicated.

use indexmap::IndexMap;

use super::error::{ResolutionError, ResolutionStage, Result};
use super::unified::{Addend, AddendKind, TriggerNode, UnifiedModel};
use crate::core::conditions::{ConditionCatalog, ValidationError};
use crate::core::data::{
    CharacterModel, InteractionKind, ModelStore, ModifierCondition, TraitDefinition, TraitStore,
    WeightModifier,
};

/// Two traits declared opposites of each other both appear in a
/// model's positive set. The model still resolves; the conflict is
/// reported so the data can be fixed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OppositeConflict {
    pub model: String,
    pub first: String,
    pub second: String,
}

impl std::fmt::Display for OppositeConflict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "model '{}': positive traits '{}' and '{}' are declared opposites",
            self.model, self.first, self.second
        )
    }
}

/// Outcome of resolving a whole model store. Per-model failures are
/// collected so one bad archetype never aborts the batch.
#[derive(Debug, Default)]
pub struct ResolutionReport {
    pub models: IndexMap<String, UnifiedModel>,
    pub errors: Vec<ResolutionError>,
    pub conflicts: Vec<OppositeConflict>,
    pub validation_warnings: usize,
}

pub struct ModelResolver<'a> {
    traits: &'a TraitStore,
    catalog: &'a ConditionCatalog,
}

impl<'a> ModelResolver<'a> {
    pub fn new(traits: &'a TraitStore, catalog: &'a ConditionCatalog) -> Self {
        Self { traits, catalog }
    }

    /// Resolve a single archetype. Fails fast on the first unknown
    /// trait or condition identifier; malformed condition values only
    /// drop the offending modifier with a warning.
    pub fn build(&self, model: &CharacterModel) -> Result<UnifiedModel> {
        let mut warnings = 0;
        self.build_counted(model, &mut warnings)
    }

    /// Resolve every model in the store, collecting per-model errors.
    pub fn build_all(&self, models: &ModelStore) -> ResolutionReport {
        let mut report = ResolutionReport::default();
        for model in models.iter() {
            match self.build_counted(model, &mut report.validation_warnings) {
                Ok(unified) => {
                    report.conflicts.extend(self.positive_conflicts(model));
                    report.models.insert(unified.name.clone(), unified);
                }
                Err(err) => {
                    log::error!("skipping model: {err}");
                    report.errors.push(err);
                }
            }
        }
        log::info!(
            "resolved {} models ({} errors, {} modifier warnings)",
            report.models.len(),
            report.errors.len(),
            report.validation_warnings
        );
        report
    }

    fn build_counted(
        &self,
        model: &CharacterModel,
        warnings: &mut usize,
    ) -> Result<UnifiedModel> {
        let mut addends = Vec::new();
        // Trait definitions in usage order, for the trait-modifier pass.
        let mut usages: Vec<&TraitDefinition> = Vec::new();

        for name in &model.traits.positive {
            let definition = self.lookup(model, name, ResolutionStage::PositiveTrait)?;
            usages.push(definition);
            addends.push(Addend {
                weight: definition.ai_effects.base_weight,
                condition: TriggerNode::has_trait(name.clone()),
                kind: AddendKind::PositiveTrait,
                source: name.clone(),
            });
        }

        // The weight keeps the sign declared on the trait itself; the
        // absence check alone expresses the negation.
        for name in &model.traits.negative {
            let definition = self.lookup(model, name, ResolutionStage::NegativeTrait)?;
            usages.push(definition);
            addends.push(Addend {
                weight: definition.ai_effects.base_weight,
                condition: TriggerNode::not_trait(name.clone()),
                kind: AddendKind::NegativeTrait,
                source: name.clone(),
            });
        }

        for name in &model.opposite_traits {
            let definition = self.lookup(model, name, ResolutionStage::OppositeTrait)?;
            usages.push(definition);
            addends.push(Addend {
                weight: definition.ai_effects.base_weight,
                condition: TriggerNode::not_trait(name.clone()),
                kind: AddendKind::OppositeTrait,
                source: name.clone(),
            });
        }

        for modifier in &model.modifiers {
            if let Some(condition) = self.modifier_condition(
                &model.name,
                &model.name,
                ResolutionStage::ModelCondition,
                modifier,
                warnings,
            )? {
                addends.push(Addend {
                    weight: modifier.weight_adjustment,
                    condition,
                    kind: AddendKind::ModelModifier,
                    source: model.name.clone(),
                });
            }
        }

        for definition in &usages {
            for modifier in &definition.ai_effects.modifiers {
                if let Some(condition) = self.modifier_condition(
                    &model.name,
                    &definition.name,
                    ResolutionStage::TraitCondition,
                    modifier,
                    warnings,
                )? {
                    addends.push(Addend {
                        weight: modifier.weight_adjustment,
                        condition,
                        kind: AddendKind::TraitModifier,
                        source: definition.name.clone(),
                    });
                }
            }
        }

        let referenced = model.referenced_traits();
        for interaction in self.traits.interactions() {
            if !interaction.applies_to(&referenced) {
                continue;
            }
            let mut parts: Vec<TriggerNode> = interaction
                .trait_combination
                .iter()
                .map(|t| TriggerNode::has_trait(t.clone()))
                .collect();
            if interaction.interaction_type == InteractionKind::Conditional {
                parts.extend(interaction.conditions.iter().map(TriggerNode::raw));
            }
            let source = if interaction.description.is_empty() {
                interaction.trait_combination.join(" + ")
            } else {
                interaction.description.clone()
            };
            addends.push(Addend {
                weight: interaction.weight_modifier,
                condition: TriggerNode::All(parts),
                kind: AddendKind::Interaction,
                source,
            });
        }

        Ok(UnifiedModel {
            name: model.name.clone(),
            description: model.description.clone(),
            base_weight: model.base_weight,
            addends,
        })
    }

    /// Pairs of positive traits that the data declares mutually
    /// exclusive. The opposite relationship counts in either
    /// direction, so one-sided declarations are caught.
    fn positive_conflicts(&self, model: &CharacterModel) -> Vec<OppositeConflict> {
        let positive = &model.traits.positive;
        let mut conflicts = Vec::new();
        for (i, first) in positive.iter().enumerate() {
            for second in &positive[i + 1..] {
                if self.traits.are_opposites(first, second) {
                    let conflict = OppositeConflict {
                        model: model.name.clone(),
                        first: first.clone(),
                        second: second.clone(),
                    };
                    log::warn!("{conflict}");
                    conflicts.push(conflict);
                }
            }
        }
        conflicts
    }

    fn lookup(
        &self,
        model: &CharacterModel,
        name: &str,
        stage: ResolutionStage,
    ) -> Result<&'a TraitDefinition> {
        self.traits
            .get(name)
            .ok_or_else(|| ResolutionError::new(&model.name, name, stage))
    }

    fn modifier_condition(
        &self,
        model: &str,
        owner: &str,
        stage: ResolutionStage,
        modifier: &WeightModifier,
        warnings: &mut usize,
    ) -> Result<Option<TriggerNode>> {
        match modifier.condition() {
            ModifierCondition::Raw(text) => Ok(Some(TriggerNode::raw(text))),
            ModifierCondition::Catalog { identifier, values } => {
                match self.catalog.resolve(identifier, values) {
                    Ok(text) => Ok(Some(TriggerNode::Raw(text))),
                    Err(ValidationError::UnknownIdentifier(_)) => {
                        Err(ResolutionError::new(model, identifier, stage))
                    }
                    Err(err) => {
                        log::warn!("model '{model}': dropping modifier on '{owner}': {err}");
                        *warnings += 1;
                        Ok(None)
                    }
                }
            }
        }
    }
}
