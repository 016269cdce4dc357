//! Archetype definitions loaded from a directory of JSON files.

use std::collections::BTreeSet;
use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;

use super::error::{DataError, Result};
use super::trait_store::{json_files, TraitStore};
use super::types::CharacterModel;

#[derive(Deserialize)]
struct ModelFile {
    #[serde(default)]
    models: IndexMap<String, CharacterModel>,
}

/// Read-only store of character models (archetypes) in declaration
/// order.
#[derive(Debug, Default)]
pub struct ModelStore {
    models: IndexMap<String, CharacterModel>,
}

impl ModelStore {
    pub fn load(dir: &Path) -> Result<Self> {
        let mut store = Self::default();
        for path in json_files(dir)? {
            store.load_file(&path)?;
        }
        log::info!(
            "loaded {} character models from {}",
            store.models.len(),
            dir.display()
        );
        Ok(store)
    }

    fn load_file(&mut self, path: &Path) -> Result<()> {
        let contents = std::fs::read_to_string(path).map_err(|source| DataError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let file: ModelFile = serde_json::from_str(&contents).map_err(|source| DataError::Json {
            path: path.to_path_buf(),
            source,
        })?;

        for (name, mut model) in file.models {
            if self.models.contains_key(&name) {
                return Err(DataError::DuplicateIdentifier {
                    kind: "model",
                    name,
                    path: path.to_path_buf(),
                });
            }
            model.name = name.clone();
            model.validate().map_err(|source| DataError::Validation {
                path: path.to_path_buf(),
                name: name.clone(),
                source,
            })?;
            self.models.insert(name, model);
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&CharacterModel> {
        self.models.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.models.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CharacterModel> {
        self.models.values()
    }

    /// Every trait name referenced by any model but absent from the
    /// trait store, sorted and deduplicated. The full set is reported
    /// so one run surfaces every data problem.
    pub fn validate_references(&self, traits: &TraitStore) -> Vec<String> {
        let mut unresolved = BTreeSet::new();
        for model in self.models.values() {
            for name in model.referenced_traits() {
                if !traits.contains(name) {
                    unresolved.insert(name.to_string());
                }
            }
        }
        unresolved.into_iter().collect()
    }
}
