// src/config.rs
use std::path::{Path, PathBuf};

/// Provider domain the sender address has to belong to.
pub const DEFAULT_SENDER_DOMAIN: &str = "gmail.com";

/// Port of the loopback listener that receives the OAuth redirect.
pub const DEFAULT_CONSENT_PORT: u16 = 8080;

/// Filesystem layout and provider settings for one run
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub profile_path: PathBuf,
    pub logos_dir: PathBuf,
    pub output_dir: PathBuf,
    pub mail_log_dir: PathBuf,
    pub credentials_path: PathBuf,
    pub token_path: PathBuf,
    pub consent_port: u16,
    pub sender_domain: String,
    pub root_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        // Capture the current directory at creation time
        let current_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

        Self {
            profile_path: PathBuf::from("curriculum.json"),
            logos_dir: PathBuf::from("logos"),
            output_dir: PathBuf::from("output"),
            mail_log_dir: PathBuf::from("mail"),
            credentials_path: PathBuf::from("credentials.json"),
            token_path: PathBuf::from("token.json"),
            consent_port: DEFAULT_CONSENT_PORT,
            sender_domain: DEFAULT_SENDER_DOMAIN.to_string(),
            root_dir: current_dir,
        }
    }
}

impl AppConfig {
    pub fn new(root_dir: PathBuf) -> Self {
        Self {
            root_dir,
            ..Self::default()
        }
    }

    pub fn with_profile_path(mut self, path: PathBuf) -> Self {
        self.profile_path = path;
        self
    }

    pub fn with_logos_dir(mut self, dir: PathBuf) -> Self {
        self.logos_dir = dir;
        self
    }

    pub fn with_output_dir(mut self, dir: PathBuf) -> Self {
        self.output_dir = dir;
        self
    }

    pub fn with_mail_log_dir(mut self, dir: PathBuf) -> Self {
        self.mail_log_dir = dir;
        self
    }

    pub fn with_credentials_path(mut self, path: PathBuf) -> Self {
        self.credentials_path = path;
        self
    }

    pub fn with_token_path(mut self, path: PathBuf) -> Self {
        self.token_path = path;
        self
    }

    pub fn with_consent_port(mut self, port: u16) -> Self {
        self.consent_port = port;
        self
    }

    pub fn with_sender_domain(mut self, domain: String) -> Self {
        self.sender_domain = domain;
        self
    }

    fn absolute_path(&self, relative_path: &Path) -> PathBuf {
        if relative_path.is_absolute() {
            relative_path.to_path_buf()
        } else {
            self.root_dir.join(relative_path)
        }
    }

    pub fn profile_path_absolute(&self) -> PathBuf {
        self.absolute_path(&self.profile_path)
    }

    pub fn logos_dir_absolute(&self) -> PathBuf {
        self.absolute_path(&self.logos_dir)
    }

    pub fn output_dir_absolute(&self) -> PathBuf {
        self.absolute_path(&self.output_dir)
    }

    pub fn mail_log_dir_absolute(&self) -> PathBuf {
        self.absolute_path(&self.mail_log_dir)
    }

    pub fn credentials_path_absolute(&self) -> PathBuf {
        self.absolute_path(&self.credentials_path)
    }

    pub fn token_path_absolute(&self) -> PathBuf {
        self.absolute_path(&self.token_path)
    }

    /// Logo file for a company entry
    pub fn logo_path(&self, logo: &str) -> PathBuf {
        self.logos_dir_absolute().join(logo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_paths_resolve_against_root() {
        let config = AppConfig::new(PathBuf::from("/srv/jobs"));
        assert_eq!(
            config.output_dir_absolute(),
            PathBuf::from("/srv/jobs/output")
        );
        assert_eq!(
            config.logo_path("acme.png"),
            PathBuf::from("/srv/jobs/logos/acme.png")
        );
    }

    #[test]
    fn test_absolute_paths_are_kept() {
        let config =
            AppConfig::new(PathBuf::from("/srv/jobs")).with_output_dir(PathBuf::from("/tmp/cvs"));
        assert_eq!(config.output_dir_absolute(), PathBuf::from("/tmp/cvs"));
    }
}
