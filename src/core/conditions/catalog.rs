//! Condition catalog: lookup and syntax generation.
//!
//! The catalog resolves a condition identifier plus named input values
//! into a literal CK3 condition string, either through a declared custom
//! trigger shortcut or by substituting `$name` placeholders in the
//! entry's syntax template.

use std::path::Path;

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;

use super::error::ValidationError;
use super::types::{ConditionCategory, ConditionDefinition, ConditionType, Relevance};
use crate::core::data::error::DataError;

/// Operators accepted by comparison conditions.
pub const COMPARISON_OPERATORS: [&str; 6] = ["<", "<=", "=", "!=", ">", ">="];

/// Matches a `$placeholder` left over after substitution.
static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$([A-Za-z_][A-Za-z0-9_]*)").expect("invalid placeholder regex"));

#[derive(serde::Deserialize)]
struct CatalogFile {
    #[serde(default)]
    conditions: IndexMap<String, ConditionCategory>,
}

/// Catalog of condition definitions, grouped by category with a flat
/// identifier index for lookup.
#[derive(Debug, Default)]
pub struct ConditionCatalog {
    categories: IndexMap<String, ConditionCategory>,
    conditions: IndexMap<String, ConditionDefinition>,
}

impl ConditionCatalog {
    /// Load the catalog from a JSON file.
    ///
    /// A duplicate identifier across categories is a hard error: the
    /// catalog must name each condition exactly once.
    pub fn load(path: &Path) -> Result<Self, DataError> {
        let contents = std::fs::read_to_string(path).map_err(|source| DataError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let file: CatalogFile =
            serde_json::from_str(&contents).map_err(|source| DataError::Json {
                path: path.to_path_buf(),
                source,
            })?;

        let mut catalog = Self::default();
        for (category_name, mut category) in file.conditions {
            category.name = category_name.clone();
            for (name, definition) in category.conditions.iter_mut() {
                definition.name = name.clone();
                if catalog.conditions.contains_key(name) {
                    return Err(DataError::DuplicateIdentifier {
                        kind: "condition",
                        name: name.clone(),
                        path: path.to_path_buf(),
                    });
                }
                catalog
                    .conditions
                    .insert(name.clone(), definition.clone());
            }
            catalog.categories.insert(category_name, category);
        }

        log::info!(
            "loaded {} conditions in {} categories from {}",
            catalog.conditions.len(),
            catalog.categories.len(),
            path.display()
        );
        Ok(catalog)
    }

    /// Build a catalog directly from definitions (used by tests).
    pub fn from_definitions(definitions: Vec<ConditionDefinition>) -> Self {
        let mut catalog = Self::default();
        for definition in definitions {
            catalog
                .conditions
                .insert(definition.name.clone(), definition);
        }
        catalog
    }

    /// Look up a condition definition by identifier.
    pub fn get(&self, identifier: &str) -> Option<&ConditionDefinition> {
        self.conditions.get(identifier)
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.conditions.contains_key(identifier)
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Identifiers in declaration order.
    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.conditions.keys().map(String::as_str)
    }

    /// Conditions of the given relevance tier, in declaration order.
    pub fn by_relevance(&self, relevance: Relevance) -> Vec<&ConditionDefinition> {
        self.conditions
            .values()
            .filter(|c| c.ai_relevance == relevance)
            .collect()
    }

    /// Resolve an identifier plus input values into a literal condition.
    ///
    /// When exactly one value is supplied and its key names a declared
    /// custom trigger, the trigger's fixed expansion wins. Otherwise each
    /// `$key` placeholder in the syntax template is substituted; a
    /// placeholder left unsubstituted, an operator outside the allowed
    /// set, or a non-`yes`/`no` value for a boolean condition fails
    /// validation.
    pub fn resolve(
        &self,
        identifier: &str,
        values: &IndexMap<String, String>,
    ) -> Result<String, ValidationError> {
        let definition = self
            .get(identifier)
            .ok_or_else(|| ValidationError::UnknownIdentifier(identifier.to_string()))?;

        if let Some((key, _)) = values.first().filter(|_| values.len() == 1) {
            if let Some(expansion) = definition.custom_triggers.get(key) {
                return Ok(expansion.clone());
            }
        }

        validate_values(definition, values)?;

        // Longer keys first so `$wealth_threshold` is not clobbered by a
        // hypothetical `$wealth` substitution.
        let mut keys: Vec<&String> = values.keys().collect();
        keys.sort_by_key(|k| std::cmp::Reverse(k.len()));

        let mut result = definition.syntax.clone();
        for key in keys {
            let placeholder = format!("${key}");
            if let Some(value) = values.get(key) {
                result = result.replace(&placeholder, value);
            }
        }

        if let Some(caps) = PLACEHOLDER.captures(&result) {
            return Err(ValidationError::MissingPlaceholder {
                identifier: identifier.to_string(),
                placeholder: caps[1].to_string(),
            });
        }

        Ok(result)
    }
}

fn validate_values(
    definition: &ConditionDefinition,
    values: &IndexMap<String, String>,
) -> Result<(), ValidationError> {
    match definition.condition_type {
        ConditionType::Boolean => {
            if values.is_empty() {
                return Err(ValidationError::MissingPlaceholder {
                    identifier: definition.name.clone(),
                    placeholder: "value".to_string(),
                });
            }
            for value in values.values() {
                if value != "yes" && value != "no" {
                    return Err(ValidationError::InvalidBooleanValue {
                        identifier: definition.name.clone(),
                        value: value.clone(),
                    });
                }
            }
        }
        ConditionType::Comparison => {
            for (key, value) in values {
                if key == "operator" && !COMPARISON_OPERATORS.contains(&value.as_str()) {
                    return Err(ValidationError::InvalidOperator {
                        identifier: definition.name.clone(),
                        operator: value.clone(),
                    });
                }
                if key.ends_with("_threshold") && value.parse::<f64>().is_err() {
                    return Err(ValidationError::InvalidNumericValue {
                        identifier: definition.name.clone(),
                        key: key.clone(),
                        value: value.clone(),
                    });
                }
            }
        }
        ConditionType::Trait | ConditionType::Claim | ConditionType::Complex => {}
    }

    for required in definition.input_values.keys() {
        if !values.contains_key(required) {
            return Err(ValidationError::MissingPlaceholder {
                identifier: definition.name.clone(),
                placeholder: required.clone(),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(pairs: &[(&str, &str)]) -> IndexMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn test_catalog() -> ConditionCatalog {
        let definitions = vec![
            ConditionDefinition {
                name: "IS_RULER".to_string(),
                description: "Whether the character rules a title".to_string(),
                syntax: "is_ruler = $value".to_string(),
                input_values: values(&[("value", "yes or no")]),
                custom_triggers: IndexMap::new(),
                supported_scopes: vec!["character".to_string()],
                ai_relevance: Relevance::High,
                condition_type: ConditionType::Boolean,
            },
            ConditionDefinition {
                name: "WEALTH".to_string(),
                description: String::new(),
                syntax: "wealth $operator $wealth_threshold".to_string(),
                input_values: values(&[("operator", "comparison"), ("wealth_threshold", "gold")]),
                custom_triggers: values(&[("is_poor", "wealth < 100")]),
                supported_scopes: vec!["character".to_string()],
                ai_relevance: Relevance::Medium,
                condition_type: ConditionType::Comparison,
            },
            ConditionDefinition {
                name: "HAS_CLAIM_ON".to_string(),
                description: String::new(),
                syntax: "has_claim_on = $target".to_string(),
                input_values: values(&[("target", "title scope")]),
                custom_triggers: IndexMap::new(),
                supported_scopes: vec!["character".to_string()],
                ai_relevance: Relevance::High,
                condition_type: ConditionType::Claim,
            },
        ];
        ConditionCatalog::from_definitions(definitions)
    }

    #[test]
    fn test_resolve_substitutes_placeholders() {
        let catalog = test_catalog();
        let rendered = catalog
            .resolve("HAS_CLAIM_ON", &values(&[("target", "ROOT")]))
            .unwrap();
        assert_eq!(rendered, "has_claim_on = ROOT");
    }

    #[test]
    fn test_resolve_boolean() {
        let catalog = test_catalog();
        let rendered = catalog
            .resolve("IS_RULER", &values(&[("value", "yes")]))
            .unwrap();
        assert_eq!(rendered, "is_ruler = yes");
    }

    #[test]
    fn test_resolve_rejects_bad_boolean_value() {
        let catalog = test_catalog();
        let err = catalog
            .resolve("IS_RULER", &values(&[("value", "maybe")]))
            .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidBooleanValue { .. }));
    }

    #[test]
    fn test_resolve_custom_trigger_shortcut() {
        let catalog = test_catalog();
        let rendered = catalog
            .resolve("WEALTH", &values(&[("is_poor", "")]))
            .unwrap();
        assert_eq!(rendered, "wealth < 100");
    }

    #[test]
    fn test_resolve_comparison() {
        let catalog = test_catalog();
        let rendered = catalog
            .resolve(
                "WEALTH",
                &values(&[("operator", "<"), ("wealth_threshold", "500")]),
            )
            .unwrap();
        assert_eq!(rendered, "wealth < 500");
    }

    #[rstest::rstest]
    #[case("<")]
    #[case("<=")]
    #[case("=")]
    #[case("!=")]
    #[case(">")]
    #[case(">=")]
    fn test_resolve_accepts_all_operators(#[case] operator: &str) {
        let catalog = test_catalog();
        let rendered = catalog
            .resolve(
                "WEALTH",
                &values(&[("operator", operator), ("wealth_threshold", "500")]),
            )
            .unwrap();
        assert_eq!(rendered, format!("wealth {operator} 500"));
    }

    #[test]
    fn test_resolve_rejects_invalid_operator() {
        let catalog = test_catalog();
        let err = catalog
            .resolve(
                "WEALTH",
                &values(&[("operator", "~"), ("wealth_threshold", "500")]),
            )
            .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidOperator { .. }));
    }

    #[test]
    fn test_resolve_rejects_non_numeric_threshold() {
        let catalog = test_catalog();
        let err = catalog
            .resolve(
                "WEALTH",
                &values(&[("operator", "<"), ("wealth_threshold", "lots")]),
            )
            .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidNumericValue { .. }));
    }

    #[test]
    fn test_resolve_reports_missing_placeholder() {
        let catalog = test_catalog();
        let err = catalog
            .resolve("HAS_CLAIM_ON", &values(&[]))
            .unwrap_err();
        match err {
            ValidationError::MissingPlaceholder { placeholder, .. } => {
                assert_eq!(placeholder, "target");
            }
            other => panic!("expected MissingPlaceholder, got {other:?}"),
        }
    }

    #[test]
    fn test_resolve_unknown_identifier() {
        let catalog = test_catalog();
        let err = catalog.resolve("NO_SUCH", &values(&[])).unwrap_err();
        assert_eq!(
            err,
            ValidationError::UnknownIdentifier("NO_SUCH".to_string())
        );
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("condition_models.json");
        std::fs::write(
            &path,
            r#"{
                "conditions": {
                    "status": {
                        "description": "Character status checks",
                        "conditions": {
                            "IS_RULER": {
                                "syntax": "is_ruler = $value",
                                "input_values": { "value": "yes or no" },
                                "condition_type": "boolean",
                                "ai_relevance": "high"
                            }
                        }
                    }
                }
            }"#,
        )
        .unwrap();

        let catalog = ConditionCatalog::load(&path).unwrap();
        assert_eq!(catalog.len(), 1);
        let definition = catalog.get("IS_RULER").unwrap();
        assert_eq!(definition.name, "IS_RULER");
        assert_eq!(definition.condition_type, ConditionType::Boolean);
    }

    #[test]
    fn test_load_rejects_duplicate_across_categories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("condition_models.json");
        std::fs::write(
            &path,
            r#"{
                "conditions": {
                    "a": { "conditions": { "IS_RULER": { "syntax": "is_ruler = $value" } } },
                    "b": { "conditions": { "IS_RULER": { "syntax": "is_ruler = $value" } } }
                }
            }"#,
        )
        .unwrap();
        assert!(ConditionCatalog::load(&path).is_err());
    }

    #[test]
    fn test_by_relevance_filters() {
        let catalog = test_catalog();
        let high = catalog.by_relevance(Relevance::High);
        assert_eq!(high.len(), 2);
        assert_eq!(high[0].name, "IS_RULER");
    }
}
