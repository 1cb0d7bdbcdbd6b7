// src/cli.rs
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::config::AppConfig;

#[derive(Parser, Debug)]
#[command(name = "jobfinder")]
#[command(about = "Render per-company résumés and mail them to each company")]
pub struct Cli {
    /// Profile record (JSON)
    #[arg(long)]
    pub profile: Option<PathBuf>,

    /// Directory the documents are written to
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Directory holding the company logos
    #[arg(long)]
    pub logos_dir: Option<PathBuf>,

    /// Configuration file (defaults to jobfinder.toml)
    #[arg(long, env = "JOBFINDER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Skip the menu and run this action
    #[arg(long, value_enum)]
    pub action: Option<Action>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Action {
    Generate,
    Dispatch,
    All,
}

impl Action {
    /// Menu number to action; anything else is not an action
    pub fn from_choice(choice: i64) -> Option<Self> {
        match choice {
            1 => Some(Self::Generate),
            2 => Some(Self::Dispatch),
            3 => Some(Self::All),
            _ => None,
        }
    }

    pub fn generates(self) -> bool {
        matches!(self, Self::Generate | Self::All)
    }

    pub fn dispatches(self) -> bool {
        matches!(self, Self::Dispatch | Self::All)
    }
}

impl Cli {
    /// Flags win over the configuration file
    pub fn apply(&self, mut config: AppConfig) -> AppConfig {
        if let Some(profile) = &self.profile {
            config = config.with_profile_path(profile.clone());
        }
        if let Some(dir) = &self.output_dir {
            config = config.with_output_dir(dir.clone());
        }
        if let Some(dir) = &self.logos_dir {
            config = config.with_logos_dir(dir.clone());
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_choices() {
        assert_eq!(Action::from_choice(1), Some(Action::Generate));
        assert_eq!(Action::from_choice(3), Some(Action::All));
        assert_eq!(Action::from_choice(4), None);
        assert_eq!(Action::from_choice(-1), None);
        assert!(Action::All.generates() && Action::All.dispatches());
        assert!(!Action::Dispatch.generates());
    }

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::parse_from([
            "jobfinder",
            "--output-dir",
            "/tmp/cvs",
            "--action",
            "dispatch",
        ]);
        let config = cli.apply(AppConfig::new(PathBuf::from("/srv")));

        assert_eq!(config.output_dir_absolute(), PathBuf::from("/tmp/cvs"));
        assert_eq!(config.logos_dir_absolute(), PathBuf::from("/srv/logos"));
        assert_eq!(cli.action, Some(Action::Dispatch));
    }
}
