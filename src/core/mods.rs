//! CK3 mod folder discovery and descriptor parsing.

use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::ModsConfig;

static NAME_FIELD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?m)^name\s*=\s*"([^"]*)""#).expect("invalid name regex"));
static VERSION_FIELD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?m)^version\s*=\s*"([^"]*)""#).expect("invalid version regex"));

/// A discovered mod folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModInfo {
    pub path: PathBuf,
    /// Display name from `descriptor.mod`, falling back to the folder
    /// name.
    pub name: String,
    pub version: Option<String>,
    pub source: ModSource,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModSource {
    SteamWorkshop,
    ParadoxFolder,
}

impl ModInfo {
    /// The directory the rewriter should process for this mod.
    pub fn events_dir(&self) -> PathBuf {
        self.path.join("events")
    }
}

/// Whether a directory looks like a CK3 mod: it carries a descriptor
/// or at least an events directory.
pub fn is_valid_mod_dir(path: &Path) -> bool {
    path.is_dir() && (path.join("descriptor.mod").is_file() || path.join("events").is_dir())
}

/// Enumerate mods from the configured Steam Workshop and Paradox mod
/// directories. Workshop folders are named by numeric item id;
/// anything else there is skipped.
pub fn discover(config: &ModsConfig) -> Vec<ModInfo> {
    let mut mods = Vec::new();
    if let Some(workshop) = &config.steam_workshop_path {
        collect(workshop, ModSource::SteamWorkshop, &mut mods);
    }
    if let Some(paradox) = &config.paradox_mod_path {
        collect(paradox, ModSource::ParadoxFolder, &mut mods);
    }
    log::info!("discovered {} mod folders", mods.len());
    mods
}

/// Find a discovered mod by display or folder name, case-insensitively.
pub fn find_by_name<'a>(mods: &'a [ModInfo], name: &str) -> Option<&'a ModInfo> {
    mods.iter().find(|m| {
        m.name.eq_ignore_ascii_case(name)
            || m.path
                .file_name()
                .is_some_and(|f| f.eq_ignore_ascii_case(name))
    })
}

fn collect(root: &Path, source: ModSource, mods: &mut Vec<ModInfo>) {
    let entries = match std::fs::read_dir(root) {
        Ok(entries) => entries,
        Err(err) => {
            log::warn!("cannot read mod directory {}: {err}", root.display());
            return;
        }
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if source == ModSource::SteamWorkshop {
            let numeric = path
                .file_name()
                .and_then(|f| f.to_str())
                .is_some_and(|f| f.chars().all(|c| c.is_ascii_digit()));
            if !numeric {
                continue;
            }
        }
        if !is_valid_mod_dir(&path) {
            continue;
        }
        mods.push(read_mod(&path, source));
    }
}

fn read_mod(path: &Path, source: ModSource) -> ModInfo {
    let folder_name = path
        .file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_default();
    let descriptor = std::fs::read_to_string(path.join("descriptor.mod")).unwrap_or_default();
    let name = NAME_FIELD
        .captures(&descriptor)
        .map(|caps| caps[1].to_string())
        .unwrap_or(folder_name);
    let version = VERSION_FIELD
        .captures(&descriptor)
        .map(|caps| caps[1].to_string());
    ModInfo {
        path: path.to_path_buf(),
        name,
        version,
        source,
    }
}
