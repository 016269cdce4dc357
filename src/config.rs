use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Top-level application configuration.
///
/// Loaded from a TOML file; every section falls back to defaults so a
/// partial config file is valid. A config file that exists but fails to
/// parse is a fatal error - the run aborts before any data is loaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub data: DataConfig,
    pub markers: MarkerConfig,
    pub processing: ProcessingConfig,
    pub output: OutputConfig,
    pub mods: ModsConfig,
}

/// Locations of the declarative data files.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Directory containing trait definition JSON files.
    pub traits_dir: PathBuf,
    /// Directory containing character model JSON files.
    pub models_dir: PathBuf,
    /// Condition catalog JSON file.
    pub conditions_file: PathBuf,
    /// Explicit events directory to process. When unset, the directory is
    /// derived from the target mod (see [`ModsConfig`]) or defaults to
    /// `events/` in the working directory.
    pub events_dir: Option<PathBuf>,
}

/// Marker strings and patterns recognized in event files.
///
/// The library/start/end markers are literal lines (matched
/// case-insensitively); the model and comment patterns are regexes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerConfig {
    /// File-level marker; files without it pass through untouched.
    pub library_marker: String,
    /// Start of an AI placeholder block.
    pub start_marker: String,
    /// End of an AI placeholder block.
    pub end_marker: String,
    /// Pattern extracting the referenced model name, first capture group.
    pub model_pattern: String,
    /// Pattern recognizing a comment line to preserve.
    pub comment_pattern: String,
}

/// File-processing behavior flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    /// Drop the start/end marker lines from rewritten blocks.
    pub delete_markers: bool,
    /// Copy each file aside before modifying it.
    pub backup_files: bool,
    /// Suffix appended to backup copies.
    pub backup_suffix: String,
    /// Extensions of files considered for scanning.
    pub file_extensions: Vec<String>,
}

/// Generated-output formatting.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// One level of indentation inside rendered trigger blocks.
    pub indent_unit: String,
}

/// CK3 mod folder discovery settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModsConfig {
    /// Name of the mod folder to target, matched against discovered mods.
    pub mod_folder_name: Option<String>,
    /// Steam Workshop content directory for CK3 (folders named by item id).
    pub steam_workshop_path: Option<PathBuf>,
    /// Paradox launcher mod directory.
    pub paradox_mod_path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data: DataConfig::default(),
            markers: MarkerConfig::default(),
            processing: ProcessingConfig::default(),
            output: OutputConfig::default(),
            mods: ModsConfig::default(),
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            traits_dir: PathBuf::from("models/Traits"),
            models_dir: PathBuf::from("models/Characters"),
            conditions_file: PathBuf::from("models/Conditions/condition_models.json"),
            events_dir: None,
        }
    }
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            library_marker: "# AI-MODEL-LIB".to_string(),
            start_marker: "# AI-START".to_string(),
            end_marker: "# AI-END".to_string(),
            model_pattern: r"using:\s*\{([^}]+)\}".to_string(),
            comment_pattern: r"#\s*(.+)".to_string(),
        }
    }
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            delete_markers: false,
            backup_files: true,
            backup_suffix: ".backup".to_string(),
            file_extensions: vec![".txt".to_string()],
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            indent_unit: "    ".to_string(),
        }
    }
}

impl Default for ModsConfig {
    fn default() -> Self {
        Self {
            mod_folder_name: None,
            steam_workshop_path: None,
            paradox_mod_path: None,
        }
    }
}

impl AppConfig {
    /// Load configuration.
    ///
    /// With an explicit `path` the file must exist and parse. Without one,
    /// `weightgen.toml` in the working directory is tried, then
    /// `<config dir>/ck3-weightgen/config.toml`; if neither exists the
    /// defaults are used. A file that exists but does not parse is an
    /// error in every case.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        if let Some(path) = path {
            return Self::from_file(path);
        }

        for candidate in Self::default_paths() {
            if candidate.exists() {
                return Self::from_file(&candidate);
            }
        }

        log::debug!("no config file found, using defaults");
        Ok(Self::default())
    }

    fn from_file(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config: Self = toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        log::info!("loaded config from {}", path.display());
        Ok(config)
    }

    fn default_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("weightgen.toml")];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("ck3-weightgen").join("config.toml"));
        }
        paths
    }
}
