// src/core/artifact_namer.rs
//! Collision-safe output paths.
//!
//! A path is claimed with exclusive-create semantics. On collision a fresh
//! random token is appended to the base stem and the claim is retried,
//! so an existing artifact is never overwritten.

use anyhow::{Context, Result};
use std::fs::{File, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::FsOps;
use crate::app_log;

const ARTIFACT_PREFIX: &str = "curriculum";
const ARTIFACT_EXTENSION: &str = "pdf";

/// Outcome of one exclusive-create attempt
#[derive(Debug)]
pub enum Claim {
    Created(File, PathBuf),
    Collision,
}

/// Deterministic artifact path for a company: `<dir>/curriculum_<stem>.pdf`
pub fn company_artifact_path(output_dir: &Path, company_stem: &str) -> PathBuf {
    output_dir.join(format!(
        "{}_{}.{}",
        ARTIFACT_PREFIX, company_stem, ARTIFACT_EXTENSION
    ))
}

/// Path of the branding-free document: `<dir>/curriculum.pdf`
pub fn generic_artifact_path(output_dir: &Path) -> PathBuf {
    output_dir.join(format!("{}.{}", ARTIFACT_PREFIX, ARTIFACT_EXTENSION))
}

/// `dir/base.ext` -> `dir/base_<token>.ext`
pub fn with_token(path: &Path, token: &str) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match path.extension() {
        Some(ext) => format!("{}_{}.{}", stem, token, ext.to_string_lossy()),
        None => format!("{}_{}", stem, token),
    };
    path.with_file_name(name)
}

/// Single exclusive-create attempt
pub fn try_claim(path: &Path) -> Result<Claim> {
    match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => Ok(Claim::Created(file, path.to_path_buf())),
        Err(e) if matches!(e.kind(), ErrorKind::AlreadyExists | ErrorKind::PermissionDenied) => {
            Ok(Claim::Collision)
        }
        Err(e) => Err(e).with_context(|| format!("Failed to create {}", path.display())),
    }
}

/// Claim `path`, or a token-suffixed sibling of it, drawing tokens from `next_token`
pub fn claim_unique_with<F>(path: &Path, mut next_token: F) -> Result<(File, PathBuf)>
where
    F: FnMut() -> String,
{
    if let Some(parent) = path.parent() {
        FsOps::ensure_dir_exists(parent)?;
    }

    let mut candidate = path.to_path_buf();
    loop {
        match try_claim(&candidate)? {
            Claim::Created(file, claimed) => return Ok((file, claimed)),
            Claim::Collision => {
                app_log!(debug, "{} is taken, drawing a new name", candidate.display());
                candidate = with_token(path, &next_token());
            }
        }
    }
}

/// Claim `path` or a uuid-suffixed sibling
pub fn claim_unique(path: &Path) -> Result<(File, PathBuf)> {
    claim_unique_with(path, || uuid::Uuid::new_v4().simple().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_artifact_paths() {
        let dir = Path::new("output");
        assert_eq!(
            company_artifact_path(dir, "Acme"),
            PathBuf::from("output/curriculum_Acme.pdf")
        );
        assert_eq!(generic_artifact_path(dir), PathBuf::from("output/curriculum.pdf"));
    }

    #[test]
    fn test_with_token() {
        assert_eq!(
            with_token(Path::new("out/curriculum_Acme.pdf"), "ab12"),
            PathBuf::from("out/curriculum_Acme_ab12.pdf")
        );
        assert_eq!(
            with_token(Path::new("out/readme"), "ab12"),
            PathBuf::from("out/readme_ab12")
        );
    }

    #[test]
    fn test_claim_free_path_keeps_name_and_creates_parent() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested").join("curriculum_Acme.pdf");

        let (_file, claimed) = claim_unique(&target).unwrap();
        assert_eq!(claimed, target);
        assert!(target.exists());
    }

    #[test]
    fn test_collision_never_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("curriculum_Acme.pdf");
        std::fs::write(&target, b"first run").unwrap();

        let (mut file, claimed) = claim_unique(&target).unwrap();
        file.write_all(b"second run").unwrap();

        assert_ne!(claimed, target);
        assert_eq!(std::fs::read(&target).unwrap(), b"first run");
        let name = claimed.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("curriculum_Acme_"));
        assert!(name.ends_with(".pdf"));
    }

    #[test]
    fn test_retries_until_a_token_is_free() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("curriculum.pdf");
        std::fs::write(&target, b"").unwrap();
        std::fs::write(dir.path().join("curriculum_aaaa.pdf"), b"").unwrap();

        let mut tokens = vec!["bbbb".to_string(), "aaaa".to_string()];
        let (_file, claimed) = claim_unique_with(&target, || tokens.pop().unwrap()).unwrap();

        assert_eq!(claimed, dir.path().join("curriculum_bbbb.pdf"));
        assert!(tokens.is_empty());
    }

    #[test]
    fn test_try_claim_reports_collision() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("taken.pdf");
        std::fs::write(&target, b"").unwrap();
        assert!(matches!(try_claim(&target).unwrap(), Claim::Collision));
    }
}
