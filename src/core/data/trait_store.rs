//! Trait definitions loaded from a directory of JSON files.

use std::collections::BTreeSet;
use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;

use super::error::{DataError, Result};
use super::types::{TraitDefinition, TraitInteraction};
use crate::core::conditions::ValidationError;

#[derive(Deserialize)]
struct TraitFile {
    #[serde(default)]
    traits: IndexMap<String, TraitDefinition>,
    #[serde(default)]
    interactions: Vec<TraitInteraction>,
}

/// Read-only store of trait definitions and trait interactions,
/// preserving file and declaration order.
#[derive(Debug, Default)]
pub struct TraitStore {
    traits: IndexMap<String, TraitDefinition>,
    interactions: Vec<TraitInteraction>,
}

impl TraitStore {
    /// Load every `*.json` file in `dir`. Files are read in sorted name
    /// order so repeated runs see identical store ordering.
    pub fn load(dir: &Path) -> Result<Self> {
        let mut store = Self::default();
        for path in json_files(dir)? {
            store.load_file(&path)?;
        }
        log::info!(
            "loaded {} traits and {} interactions from {}",
            store.traits.len(),
            store.interactions.len(),
            dir.display()
        );
        Ok(store)
    }

    fn load_file(&mut self, path: &Path) -> Result<()> {
        let contents = std::fs::read_to_string(path).map_err(|source| DataError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let file: TraitFile = serde_json::from_str(&contents).map_err(|source| DataError::Json {
            path: path.to_path_buf(),
            source,
        })?;

        for (name, mut definition) in file.traits {
            if self.traits.contains_key(&name) {
                return Err(DataError::DuplicateIdentifier {
                    kind: "trait",
                    name,
                    path: path.to_path_buf(),
                });
            }
            definition.name = name.clone();
            definition.validate().map_err(|source| DataError::Validation {
                path: path.to_path_buf(),
                name: name.clone(),
                source,
            })?;
            self.traits.insert(name, definition);
        }

        for interaction in file.interactions {
            interaction
                .validate()
                .map_err(|source| DataError::Validation {
                    path: path.to_path_buf(),
                    name: interaction.trait_combination.join("+"),
                    source,
                })?;
            self.interactions.push(interaction);
        }

        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&TraitDefinition> {
        self.traits.get(name)
    }

    pub fn require(&self, name: &str) -> std::result::Result<&TraitDefinition, ValidationError> {
        self.get(name)
            .ok_or_else(|| ValidationError::UnknownIdentifier(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.traits.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.traits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.traits.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TraitDefinition> {
        self.traits.values()
    }

    pub fn interactions(&self) -> &[TraitInteraction] {
        &self.interactions
    }

    /// Opposite-trait names declared by any trait but absent from the
    /// store, sorted and deduplicated. Opposite relationships must
    /// resolve like any other reference.
    pub fn validate_opposites(&self) -> Vec<String> {
        let mut unresolved = BTreeSet::new();
        for definition in self.traits.values() {
            for name in &definition.opposite_traits {
                if !self.traits.contains_key(name) {
                    unresolved.insert(name.clone());
                }
            }
        }
        unresolved.into_iter().collect()
    }

    /// Whether two traits are declared opposites, in either direction.
    pub fn are_opposites(&self, first: &str, second: &str) -> bool {
        let declared = |a: &str, b: &str| {
            self.traits
                .get(a)
                .is_some_and(|d| d.opposite_traits.iter().any(|t| t == b))
        };
        declared(first, second) || declared(second, first)
    }
}

/// Sorted list of JSON files directly under `dir`.
pub(crate) fn json_files(dir: &Path) -> Result<Vec<std::path::PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|source| DataError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| DataError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == "json") {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const TRAITS_JSON: &str = r#"{
        "traits": {
            "ambitious": {
                "description": "Craves power",
                "weight": 3,
                "ai_effects": {
                    "base_weight": 25,
                    "modifiers": [
                        { "condition": "is_ruler = no", "weight_adjustment": 10 }
                    ]
                },
                "opposite_traits": ["content"]
            },
            "content": {
                "ai_effects": { "base_weight": -20 }
            }
        },
        "interactions": [
            {
                "trait_combination": ["ambitious", "content"],
                "interaction_type": "antagonism",
                "weight_modifier": -15,
                "description": "conflicting drives"
            }
        ]
    }"#;

    fn write_traits(dir: &Path, file: &str, contents: &str) {
        std::fs::write(dir.join(file), contents).unwrap();
    }

    #[test]
    fn test_load_fills_names_and_interactions() {
        let dir = TempDir::new().unwrap();
        write_traits(dir.path(), "personality.json", TRAITS_JSON);
        let store = TraitStore::load(dir.path()).unwrap();

        assert_eq!(store.len(), 2);
        let ambitious = store.get("ambitious").unwrap();
        assert_eq!(ambitious.name, "ambitious");
        assert_eq!(ambitious.ai_effects.base_weight, 25);
        assert_eq!(ambitious.opposite_traits, vec!["content"]);
        assert_eq!(store.interactions().len(), 1);
    }

    #[test]
    fn test_load_rejects_duplicate_across_files() {
        let dir = TempDir::new().unwrap();
        write_traits(dir.path(), "a.json", TRAITS_JSON);
        write_traits(
            dir.path(),
            "b.json",
            r#"{ "traits": { "ambitious": {} } }"#,
        );
        let err = TraitStore::load(dir.path()).unwrap_err();
        assert!(matches!(err, DataError::DuplicateIdentifier { name, .. } if name == "ambitious"));
    }

    #[test]
    fn test_load_rejects_zero_adjustment() {
        let dir = TempDir::new().unwrap();
        write_traits(
            dir.path(),
            "bad.json",
            r#"{
                "traits": {
                    "proud": {
                        "ai_effects": {
                            "base_weight": 20,
                            "modifiers": [
                                { "condition": "is_ruler = yes", "weight_adjustment": 0 }
                            ]
                        }
                    }
                }
            }"#,
        );
        let err = TraitStore::load(dir.path()).unwrap_err();
        match err {
            DataError::Validation { name, source, .. } => {
                assert_eq!(name, "proud");
                assert_eq!(source, ValidationError::ZeroAdjustment);
            }
            other => panic!("expected validation error, got {other}"),
        }
    }

    #[test]
    fn test_load_rejects_malformed_json() {
        let dir = TempDir::new().unwrap();
        write_traits(dir.path(), "broken.json", "{ not json");
        assert!(matches!(
            TraitStore::load(dir.path()).unwrap_err(),
            DataError::Json { .. }
        ));
    }

    #[test]
    fn test_validate_opposites_reports_unknown_names() {
        let dir = TempDir::new().unwrap();
        write_traits(
            dir.path(),
            "traits.json",
            r#"{
                "traits": {
                    "ambitious": { "opposite_traits": ["content", "lazy"] },
                    "content": { "opposite_traits": ["ambitious"] }
                }
            }"#,
        );
        let store = TraitStore::load(dir.path()).unwrap();
        assert_eq!(store.validate_opposites(), vec!["lazy"]);
    }

    #[test]
    fn test_are_opposites_checks_both_directions() {
        let dir = TempDir::new().unwrap();
        // Only one side declares the relationship.
        write_traits(
            dir.path(),
            "traits.json",
            r#"{
                "traits": {
                    "ambitious": { "opposite_traits": ["content"] },
                    "content": {},
                    "greedy": {}
                }
            }"#,
        );
        let store = TraitStore::load(dir.path()).unwrap();
        assert!(store.are_opposites("ambitious", "content"));
        assert!(store.are_opposites("content", "ambitious"));
        assert!(!store.are_opposites("ambitious", "greedy"));
    }

    #[test]
    fn test_require_unknown_trait() {
        let store = TraitStore::default();
        assert!(store.require("missing").is_err());
    }
}
