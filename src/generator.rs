// src/generator.rs
use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::app_log;
use crate::config::AppConfig;
use crate::core::artifact_namer::{company_artifact_path, generic_artifact_path};
use crate::core::FsOps;
use crate::image_validator::LogoValidator;
use crate::layout::DocumentLayoutEngine;
use crate::types::profile::ProfileRecord;

/// A company that got no branded document, and why
#[derive(Debug, Clone)]
pub struct SkippedCompany {
    pub logo: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default)]
pub struct GenerationReport {
    pub branded: Vec<PathBuf>,
    pub skipped: Vec<SkippedCompany>,
    pub generic: PathBuf,
}

impl GenerationReport {
    pub fn total_written(&self) -> usize {
        self.branded.len() + 1
    }
}

/// Renders one branded document per usable company logo, then the generic one
pub struct BatchGenerator {
    config: AppConfig,
    engine: DocumentLayoutEngine,
}

impl BatchGenerator {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            engine: DocumentLayoutEngine::new().with_base_dir(config.root_dir.clone()),
            config: config.clone(),
        }
    }

    /// Companies are handled in input order, one render at a time
    pub fn generate_all(&self, profile: &ProfileRecord) -> Result<GenerationReport> {
        let output_dir = self.config.output_dir_absolute();
        FsOps::ensure_dir_exists(&output_dir).context("Failed to create output directory")?;

        let mut report = GenerationReport::default();

        for company in &profile.companies {
            let logo_path = self.config.logo_path(&company.logo);
            if let Err(e) = LogoValidator::validate_logo(&logo_path) {
                app_log!(warn, "<- CV GENERATOR -> Skipping {}: {}", company.logo, e);
                report.skipped.push(SkippedCompany {
                    logo: company.logo.clone(),
                    reason: e.to_string(),
                });
                continue;
            }

            let target = company_artifact_path(&output_dir, &company.stem());
            match self.engine.render(&target, profile, Some(&logo_path)) {
                Ok(written) => {
                    app_log!(info, "<- CV GENERATOR -> {} written", written.display());
                    report.branded.push(written);
                }
                Err(e) => {
                    app_log!(warn, "<- CV GENERATOR -> Skipping {}: {:#}", company.logo, e);
                    report.skipped.push(SkippedCompany {
                        logo: company.logo.clone(),
                        reason: format!("{:#}", e),
                    });
                }
            }
        }

        report.generic = self
            .engine
            .render(&generic_artifact_path(&output_dir), profile, None)
            .context("Failed to render the generic document")?;
        app_log!(
            info,
            "<- CV GENERATOR -> {} written",
            report.generic.display()
        );

        Ok(report)
    }
}
