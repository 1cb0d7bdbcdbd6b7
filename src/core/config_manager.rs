// src/core/config_manager.rs
//! Optional `jobfinder.toml` layered over the built-in defaults

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::config::AppConfig;

pub const DEFAULT_CONFIG_FILE: &str = "jobfinder.toml";

#[derive(Debug, Clone)]
pub struct ConfigManager {
    pub app: AppConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    profile: Option<PathBuf>,
    logos_dir: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    mail_log_dir: Option<PathBuf>,
    credentials: Option<PathBuf>,
    token: Option<PathBuf>,
    consent_port: Option<u16>,
    sender_domain: Option<String>,
}

impl ConfigManager {
    /// Load configuration. An explicit path must exist; the default one may be absent.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let root_dir = std::env::current_dir().context("Failed to get current directory")?;

        let requested = explicit
            .map(Path::to_path_buf)
            .or_else(|| std::env::var("JOBFINDER_CONFIG").ok().map(PathBuf::from));

        let (path, required) = match requested {
            Some(path) => (path, true),
            None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        };
        let path = if path.is_absolute() {
            path
        } else {
            root_dir.join(path)
        };

        if !path.exists() {
            if required {
                anyhow::bail!("Configuration file not found: {}", path.display());
            }
            info!("No {} found, using defaults", DEFAULT_CONFIG_FILE);
            return Ok(Self {
                app: AppConfig::new(root_dir),
            });
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let app = Self::from_toml_str(&content, root_dir)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        info!("Loaded configuration from {}", path.display());
        Ok(Self { app })
    }

    /// Apply a TOML document on top of the defaults
    pub fn from_toml_str(content: &str, root_dir: PathBuf) -> Result<AppConfig> {
        let file: ConfigFile = toml::from_str(content)?;
        let mut app = AppConfig::new(root_dir);

        if let Some(path) = file.profile {
            app = app.with_profile_path(path);
        }
        if let Some(dir) = file.logos_dir {
            app = app.with_logos_dir(dir);
        }
        if let Some(dir) = file.output_dir {
            app = app.with_output_dir(dir);
        }
        if let Some(dir) = file.mail_log_dir {
            app = app.with_mail_log_dir(dir);
        }
        if let Some(path) = file.credentials {
            app = app.with_credentials_path(path);
        }
        if let Some(path) = file.token {
            app = app.with_token_path(path);
        }
        if let Some(port) = file.consent_port {
            app = app.with_consent_port(port);
        }
        if let Some(domain) = file.sender_domain {
            app = app.with_sender_domain(domain.trim_start_matches('@').to_string());
        }

        Ok(app)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let app = ConfigManager::from_toml_str(
            "output_dir = \"pdfs\"\nconsent_port = 9090\n",
            PathBuf::from("/home/me"),
        )
        .unwrap();

        assert_eq!(app.output_dir, PathBuf::from("pdfs"));
        assert_eq!(app.consent_port, 9090);
        assert_eq!(app.logos_dir, PathBuf::from("logos"));
        assert_eq!(app.sender_domain, "gmail.com");
    }

    #[test]
    fn test_sender_domain_drops_leading_at() {
        let app = ConfigManager::from_toml_str(
            "sender_domain = \"@example.org\"",
            PathBuf::from("/"),
        )
        .unwrap();
        assert_eq!(app.sender_domain, "example.org");
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        assert!(ConfigManager::from_toml_str("database = \"x.db\"", PathBuf::from("/")).is_err());
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(ConfigManager::load(Some(&missing)).is_err());
    }
}
