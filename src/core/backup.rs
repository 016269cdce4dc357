//! Backup copies of files about to be rewritten.

use std::io;
use std::path::{Path, PathBuf};

/// Copy `path` aside before modification. The backup lands next to the
/// original with `suffix` appended; if that name is already taken a
/// local timestamp is appended as well, so earlier backups survive.
pub fn create_backup(path: &Path, suffix: &str) -> io::Result<PathBuf> {
    let mut backup = with_suffix(path, suffix);
    if backup.exists() {
        let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        backup = with_suffix(path, &format!("{suffix}.{stamp}"));
    }
    std::fs::copy(path, &backup)?;
    log::debug!("backed up {} to {}", path.display(), backup.display());
    Ok(backup)
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(suffix);
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_backup_copies_content() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("events.txt");
        std::fs::write(&file, "original").unwrap();

        let backup = create_backup(&file, ".backup").unwrap();
        assert_eq!(backup, dir.path().join("events.txt.backup"));
        assert_eq!(std::fs::read_to_string(&backup).unwrap(), "original");
    }

    #[test]
    fn test_existing_backup_is_not_overwritten() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("events.txt");
        std::fs::write(&file, "new").unwrap();
        std::fs::write(dir.path().join("events.txt.backup"), "old").unwrap();

        let backup = create_backup(&file, ".backup").unwrap();
        assert_ne!(backup, dir.path().join("events.txt.backup"));
        assert_eq!(
            std::fs::read_to_string(dir.path().join("events.txt.backup")).unwrap(),
            "old"
        );
        assert_eq!(std::fs::read_to_string(&backup).unwrap(), "new");
    }
}
