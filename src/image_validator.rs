// src/image_validator.rs
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::utils::get_file_extension;

/// Logo formats accepted for branded documents (compared lowercase)
pub const ALLOWED_LOGO_EXTENSIONS: &[&str] =
    &["jpg", "jpeg", "png", "gif", "bmp", "tiff", "tif", "pict"];

#[derive(Debug, Clone, Error)]
#[error("[{}] {}", .error_type.code(), .message)]
pub struct LogoValidationError {
    pub path: PathBuf,
    pub error_type: LogoErrorType,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoErrorType {
    FileNotFound,
    UnsupportedExtension,
}

impl LogoErrorType {
    pub fn code(&self) -> &'static str {
        match self {
            Self::FileNotFound => "LOGO_NOT_FOUND",
            Self::UnsupportedExtension => "LOGO_UNSUPPORTED_EXTENSION",
        }
    }
}

pub struct LogoValidator;

impl LogoValidator {
    /// A logo is usable when it exists and carries an allowed extension
    pub fn validate_logo(path: &Path) -> Result<(), LogoValidationError> {
        if !path.is_file() {
            return Err(LogoValidationError {
                path: path.to_path_buf(),
                error_type: LogoErrorType::FileNotFound,
                message: format!("Logo not found: {}", path.display()),
            });
        }

        let extension = path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(get_file_extension);

        match extension {
            Some(ext) if ALLOWED_LOGO_EXTENSIONS.contains(&ext.as_str()) => Ok(()),
            other => Err(LogoValidationError {
                path: path.to_path_buf(),
                error_type: LogoErrorType::UnsupportedExtension,
                message: format!(
                    "Unsupported logo extension {:?} for {}. Allowed: {:?}",
                    other.unwrap_or_default(),
                    path.display(),
                    ALLOWED_LOGO_EXTENSIONS
                ),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_allowed_extensions_case_insensitively() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["acme.png", "globex.JPG", "initech.Tif", "hooli.pict"] {
            let path = dir.path().join(name);
            std::fs::write(&path, b"x").unwrap();
            assert!(LogoValidator::validate_logo(&path).is_ok(), "{}", name);
        }
    }

    #[test]
    fn test_rejects_svg() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vector.svg");
        std::fs::write(&path, b"<svg/>").unwrap();

        let err = LogoValidator::validate_logo(&path).unwrap_err();
        assert_eq!(err.error_type, LogoErrorType::UnsupportedExtension);
    }

    #[test]
    fn test_rejects_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = LogoValidator::validate_logo(&dir.path().join("ghost.png")).unwrap_err();
        assert_eq!(err.error_type, LogoErrorType::FileNotFound);
        assert_eq!(err.error_type.code(), "LOGO_NOT_FOUND");
        assert!(err
            .to_string()
            .starts_with("[LOGO_NOT_FOUND] Logo not found: "));
    }
}
