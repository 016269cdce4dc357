//! Batch driver: load data, resolve models, rewrite event files.

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::Context;
use walkdir::WalkDir;

use crate::config::AppConfig;
use crate::core::backup;
use crate::core::conditions::ConditionCatalog;
use crate::core::data::{ModelStore, TraitStore};
use crate::core::mods;
use crate::core::render::TriggerSerializer;
use crate::core::resolver::{ModelResolver, OppositeConflict, ResolutionError, ResolutionReport};
use crate::core::rewrite::{BlockError, BlockRewriter, MarkerSet};

/// Per-run counters and collected failures, printed at the end of a
/// run. Sufficient to locate a data problem without re-running at
/// higher verbosity.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub dry_run: bool,
    pub traits_loaded: usize,
    pub models_loaded: usize,
    pub models_resolved: usize,
    pub unresolved_traits: Vec<String>,
    pub opposite_conflicts: Vec<OppositeConflict>,
    pub resolution_errors: Vec<ResolutionError>,
    pub validation_warnings: usize,
    pub files_scanned: usize,
    pub files_with_library: usize,
    pub files_modified: usize,
    pub blocks_found: usize,
    pub blocks_rewritten: usize,
    pub block_errors: Vec<BlockError>,
    pub backups_created: usize,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.dry_run {
            writeln!(f, "Run summary (dry run, no files written)")?;
        } else {
            writeln!(f, "Run summary")?;
        }
        writeln!(
            f,
            "  data:   {} traits, {} models ({} resolved)",
            self.traits_loaded, self.models_loaded, self.models_resolved
        )?;
        writeln!(
            f,
            "  files:  {} scanned, {} with library marker, {} modified, {} backups",
            self.files_scanned, self.files_with_library, self.files_modified, self.backups_created
        )?;
        writeln!(
            f,
            "  blocks: {} found, {} rewritten, {} skipped",
            self.blocks_found,
            self.blocks_rewritten,
            self.block_errors.len()
        )?;
        if self.validation_warnings > 0 {
            writeln!(f, "  {} modifier(s) dropped by validation", self.validation_warnings)?;
        }
        if !self.unresolved_traits.is_empty() {
            writeln!(f, "  unresolved traits: {}", self.unresolved_traits.join(", "))?;
        }
        for conflict in &self.opposite_conflicts {
            writeln!(f, "  opposite-trait conflict: {conflict}")?;
        }
        for err in &self.resolution_errors {
            writeln!(f, "  resolution error: {err}")?;
        }
        for err in &self.block_errors {
            writeln!(f, "  skipped block: {err}")?;
        }
        Ok(())
    }
}

pub struct Pipeline {
    config: AppConfig,
}

impl Pipeline {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Run the full batch. With `dry_run` everything is scanned and
    /// resolved but nothing is written.
    pub fn run(&self, dry_run: bool) -> anyhow::Result<RunSummary> {
        let (traits, models, catalog) = self.load_data()?;
        let report = self.resolve(&traits, &models, &catalog);

        let mut summary = RunSummary {
            dry_run,
            traits_loaded: traits.len(),
            models_loaded: models.len(),
            models_resolved: report.models.len(),
            unresolved_traits: unresolved_trait_names(&traits, &models),
            opposite_conflicts: report.conflicts.clone(),
            validation_warnings: report.validation_warnings,
            ..Default::default()
        };
        let failed_models: Vec<String> =
            report.errors.iter().map(|e| e.model.clone()).collect();
        summary.resolution_errors = report.errors;

        let markers = MarkerSet::from_config(&self.config.markers)
            .context("invalid marker pattern in configuration")?;
        let serializer = TriggerSerializer::new(self.config.output.indent_unit.clone());
        let rewriter = BlockRewriter::new(
            &markers,
            &serializer,
            self.config.processing.delete_markers,
        );

        let events_dir = self.events_dir()?;
        log::info!("processing event files under {}", events_dir.display());

        for path in self.event_files(&events_dir) {
            summary.files_scanned += 1;
            let content = match std::fs::read_to_string(&path) {
                Ok(content) => content,
                Err(err) => {
                    log::warn!("skipping unreadable file {}: {err}", path.display());
                    continue;
                }
            };

            let outcome = rewriter.rewrite(&path, &content, &report.models, &failed_models);
            if outcome.has_library {
                summary.files_with_library += 1;
            }
            summary.blocks_found += outcome.blocks_found;
            summary.blocks_rewritten += outcome.blocks_rewritten;
            summary.block_errors.extend(outcome.errors);

            if !outcome.changed {
                continue;
            }
            if dry_run {
                log::info!("would rewrite {}", path.display());
                summary.files_modified += 1;
                continue;
            }
            if self.config.processing.backup_files {
                backup::create_backup(&path, &self.config.processing.backup_suffix)
                    .with_context(|| format!("failed to back up {}", path.display()))?;
                summary.backups_created += 1;
            }
            std::fs::write(&path, &outcome.content)
                .with_context(|| format!("failed to write {}", path.display()))?;
            summary.files_modified += 1;
            log::info!("rewrote {}", path.display());
        }

        Ok(summary)
    }

    /// Resolved-weight report for every model, without touching files.
    pub fn weight_report(&self) -> anyhow::Result<String> {
        let (traits, models, catalog) = self.load_data()?;
        let report = self.resolve(&traits, &models, &catalog);

        let mut out = String::new();
        for model in report.models.values() {
            out.push_str(&format!(
                "{} (base {}, total {})\n",
                model.name,
                model.base_weight,
                model.total_weight()
            ));
            for addend in &model.addends {
                out.push_str(&format!(
                    "  {:+5}  {:<15} {}\n",
                    addend.weight,
                    addend.kind.as_str(),
                    addend.source
                ));
            }
        }
        for err in &report.errors {
            out.push_str(&format!("unresolved: {err}\n"));
        }
        Ok(out)
    }

    fn load_data(&self) -> anyhow::Result<(TraitStore, ModelStore, ConditionCatalog)> {
        let traits = TraitStore::load(&self.config.data.traits_dir)
            .context("failed to load trait definitions")?;
        let models = ModelStore::load(&self.config.data.models_dir)
            .context("failed to load character models")?;
        let catalog = ConditionCatalog::load(&self.config.data.conditions_file)
            .context("failed to load condition catalog")?;
        Ok((traits, models, catalog))
    }

    fn resolve(
        &self,
        traits: &TraitStore,
        models: &ModelStore,
        catalog: &ConditionCatalog,
    ) -> ResolutionReport {
        let unresolved = unresolved_trait_names(traits, models);
        if !unresolved.is_empty() {
            log::warn!("unresolved trait references: {}", unresolved.join(", "));
        }
        ModelResolver::new(traits, catalog).build_all(models)
    }

    /// The directory to process: explicit config target, a discovered
    /// mod folder by name, or `events/` in the working directory.
    fn events_dir(&self) -> anyhow::Result<PathBuf> {
        if let Some(dir) = &self.config.data.events_dir {
            return Ok(dir.clone());
        }
        if let Some(name) = &self.config.mods.mod_folder_name {
            let discovered = mods::discover(&self.config.mods);
            let found = mods::find_by_name(&discovered, name)
                .with_context(|| format!("mod folder '{name}' not found"))?;
            return Ok(found.events_dir());
        }
        Ok(PathBuf::from("events"))
    }

    fn event_files(&self, dir: &Path) -> Vec<PathBuf> {
        event_files(dir, &self.config.processing.file_extensions)
    }
}

/// Trait names referenced by any model or declared as an opposite of
/// any trait, but absent from the store; sorted and deduplicated.
fn unresolved_trait_names(traits: &TraitStore, models: &ModelStore) -> Vec<String> {
    let mut unresolved = models.validate_references(traits);
    unresolved.extend(traits.validate_opposites());
    unresolved.sort();
    unresolved.dedup();
    unresolved
}

fn event_files(dir: &Path, extensions: &[String]) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| {
            path.file_name()
                .and_then(|f| f.to_str())
                .is_some_and(|name| extensions.iter().any(|ext| name.ends_with(ext.as_str())))
        })
        .collect();
    files.sort();
    files
}
