// src/core/fs_ops.rs
//! File system helpers shared by generation and dispatch

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tokio::fs;

use crate::app_log;

pub struct FsOps;

impl FsOps {
    /// Ensure directory exists
    pub fn ensure_dir_exists(path: &Path) -> Result<()> {
        if !path.as_os_str().is_empty() && !path.exists() {
            std::fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {}", path.display()))?;
            app_log!(info, "Created directory: {}", path.display());
        }
        Ok(())
    }

    /// Remove a file, tolerating that it is already gone
    pub fn remove_file_if_exists(path: &Path) -> Result<()> {
        match std::fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("Failed to remove {}", path.display())),
        }
    }

    /// Most recently modified variant of the file named by `prefix`.
    ///
    /// `prefix` is a path whose final component is a file stem inside its
    /// parent directory. A variant is that stem itself or the stem plus an
    /// `_<hex token>` suffix, with any extension: `output/curriculum_Acme`
    /// matches `output/curriculum_Acme.pdf` and `output/curriculum_Acme_3f2a.pdf`
    /// but not `output/curriculum_AcmeCorp.pdf`.
    pub async fn most_recent_with_prefix(prefix: &Path) -> Result<Option<PathBuf>> {
        let dir = match prefix.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let name_prefix = match prefix.file_name().and_then(|n| n.to_str()) {
            Some(name) => name.to_string(),
            None => return Ok(None),
        };

        if !dir.exists() {
            return Ok(None);
        }

        let mut entries = fs::read_dir(&dir)
            .await
            .with_context(|| format!("Failed to read directory: {}", dir.display()))?;

        let mut newest: Option<(SystemTime, PathBuf)> = None;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let matches = path
                .file_stem()
                .and_then(|n| n.to_str())
                .is_some_and(|stem| is_variant_of(stem, &name_prefix));
            if !matches {
                continue;
            }

            let metadata = entry.metadata().await?;
            if !metadata.is_file() {
                continue;
            }
            let modified = metadata
                .modified()
                .with_context(|| format!("No modification time for {}", path.display()))?;

            let replace = match &newest {
                None => true,
                Some((best_time, best_path)) => {
                    modified > *best_time || (modified == *best_time && path > *best_path)
                }
            };
            if replace {
                newest = Some((modified, path));
            }
        }

        Ok(newest.map(|(_, path)| path))
    }
}

/// `stem` is `base` or `base_<hex token>`
fn is_variant_of(stem: &str, base: &str) -> bool {
    match stem.strip_prefix(base) {
        Some("") => true,
        Some(rest) => rest
            .strip_prefix('_')
            .is_some_and(|token| !token.is_empty() && token.chars().all(|c| c.is_ascii_hexdigit())),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::time::Duration;

    fn touch(path: &Path, age: Duration) {
        let file = File::create(path).unwrap();
        file.set_modified(SystemTime::now() - age).unwrap();
    }

    #[tokio::test]
    async fn test_most_recent_prefers_latest_modification() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("curriculum_Acme.pdf"), Duration::from_secs(600));
        touch(
            &dir.path().join("curriculum_Acme_ab12cd34.pdf"),
            Duration::from_secs(10),
        );
        touch(&dir.path().join("curriculum_Globex.pdf"), Duration::from_secs(1));

        let found = FsOps::most_recent_with_prefix(&dir.path().join("curriculum_Acme"))
            .await
            .unwrap();
        assert_eq!(found, Some(dir.path().join("curriculum_Acme_ab12cd34.pdf")));
    }

    #[tokio::test]
    async fn test_most_recent_without_match() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("curriculum.pdf"), Duration::from_secs(1));

        let found = FsOps::most_recent_with_prefix(&dir.path().join("curriculum_Initech"))
            .await
            .unwrap();
        assert_eq!(found, None);
    }

    #[tokio::test]
    async fn test_most_recent_in_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let found = FsOps::most_recent_with_prefix(&dir.path().join("nope").join("curriculum_X"))
            .await
            .unwrap();
        assert_eq!(found, None);
    }

    #[tokio::test]
    async fn test_generic_collision_is_not_taken_for_hex_like_company() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("curriculum_c.pdf"), Duration::from_secs(600));
        touch(
            &dir.path().join("curriculum_c0ffee1234567890abcdef1234567890.pdf"),
            Duration::from_secs(5),
        );
        touch(&dir.path().join("curriculum_cafe.pdf"), Duration::from_secs(1));

        let found = FsOps::most_recent_with_prefix(&dir.path().join("curriculum_c"))
            .await
            .unwrap();
        assert_eq!(found, Some(dir.path().join("curriculum_c.pdf")));
    }

    #[test]
    fn test_variant_matching() {
        assert!(is_variant_of("curriculum_Acme", "curriculum_Acme"));
        assert!(is_variant_of("curriculum_Acme_ab12cd34", "curriculum_Acme"));
        assert!(!is_variant_of("curriculum_AcmeCorp", "curriculum_Acme"));
        assert!(!is_variant_of("curriculum_Acme_", "curriculum_Acme"));
        assert!(!is_variant_of("curriculum_Acme_draft", "curriculum_Acme"));
        assert!(!is_variant_of("curriculum", "curriculum_Acme"));
    }

    #[test]
    fn test_remove_file_if_exists_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("temp_logo.png");
        File::create(&path).unwrap();

        FsOps::remove_file_if_exists(&path).unwrap();
        FsOps::remove_file_if_exists(&path).unwrap();
        assert!(!path.exists());
    }
}
