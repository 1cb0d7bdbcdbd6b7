// src/mail/scheduler.rs
//! Sequential, throttled dispatch of the generated documents.

use anyhow::{Context, Result};
use async_trait::async_trait;
use rand::Rng;
use std::path::PathBuf;
use std::time::Duration;

use super::gmail::Mailer;
use super::interval::SendInterval;
use super::message::{compose_body, subject_line, Attachment, OutgoingMessage};
use super::run_log::RunLog;
use crate::app_log;
use crate::core::artifact_namer::company_artifact_path;
use crate::core::FsOps;
use crate::types::profile::ProfileRecord;

/// Suspends the run between two sends
#[async_trait]
pub trait Pause: Send + Sync {
    async fn pause(&self, duration: Duration);
}

pub struct TokioPause;

#[async_trait]
impl Pause for TokioPause {
    async fn pause(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Sent { company: String, artifact: PathBuf },
    Skipped { company: String, reason: String },
    Failed { company: String, error: String },
}

#[derive(Debug, Clone, Default)]
pub struct DispatchReport {
    pub outcomes: Vec<DispatchOutcome>,
    /// Every delay taken, in order
    pub pauses: Vec<Duration>,
}

impl DispatchReport {
    pub fn sent(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, DispatchOutcome::Sent { .. }))
            .count()
    }

    pub fn skipped(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, DispatchOutcome::Skipped { .. }))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, DispatchOutcome::Failed { .. }))
            .count()
    }
}

pub struct DispatchScheduler<M, P, R> {
    mailer: M,
    pause: P,
    rng: R,
    output_dir: PathBuf,
    run_log: RunLog,
}

impl<M, P, R> DispatchScheduler<M, P, R>
where
    M: Mailer,
    P: Pause,
    R: Rng + Send,
{
    pub fn new(mailer: M, pause: P, rng: R, output_dir: PathBuf, run_log: RunLog) -> Self {
        Self {
            mailer,
            pause,
            rng,
            output_dir,
            run_log,
        }
    }

    /// Visit companies in input order. The first send goes out immediately;
    /// every later send waits a fresh draw from `interval`. Missing documents
    /// are skipped and transport failures are recorded, neither stops the run.
    pub async fn dispatch_all(
        &mut self,
        profile: &ProfileRecord,
        interval: SendInterval,
    ) -> Result<DispatchReport> {
        let mut report = DispatchReport::default();
        let mut attempted = false;

        for company in &profile.companies {
            let stem = company.stem();
            let base = company_artifact_path(&self.output_dir, &stem);
            app_log!(
                info,
                "<- EMAIL GENERATOR -> Company: {}, Position: {}, BaseCV: {}",
                stem,
                company.position,
                base.display()
            );

            if !base.exists() {
                app_log!(
                    warn,
                    "<- EMAIL GENERATOR -> PDF for {} not found in {}. Skipping...",
                    stem,
                    self.output_dir.display()
                );
                report.outcomes.push(DispatchOutcome::Skipped {
                    company: stem,
                    reason: format!("{} does not exist", base.display()),
                });
                continue;
            }

            let prefix = base.with_extension("");
            let artifact = match FsOps::most_recent_with_prefix(&prefix).await? {
                Some(artifact) => artifact,
                None => {
                    app_log!(
                        warn,
                        "<- EMAIL GENERATOR -> Failed to get a CV for {} in {}. Aborting this email.",
                        stem,
                        self.output_dir.display()
                    );
                    report.outcomes.push(DispatchOutcome::Skipped {
                        company: stem,
                        reason: "no matching document".to_string(),
                    });
                    continue;
                }
            };
            app_log!(
                info,
                "<- EMAIL GENERATOR -> Most recent company CV found: {}",
                artifact.display()
            );

            let body = compose_body(
                &profile.message,
                &stem,
                &company.position,
                &profile.name,
                &mut self.rng,
            );
            let subject = subject_line(&company.position, &stem);

            if attempted {
                let delay = interval.draw(&mut self.rng);
                app_log!(
                    info,
                    "<- EMAIL GENERATOR -> Waiting {} minutes before sending the next email...",
                    delay.as_secs() / 60
                );
                self.pause.pause(delay).await;
                report.pauses.push(delay);
            }
            attempted = true;

            let content = tokio::fs::read(&artifact)
                .await
                .with_context(|| format!("Failed to read {}", artifact.display()))?;
            let filename = base
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let message = OutgoingMessage {
                to: company.email.clone(),
                subject,
                html_body: body,
                attachment: Some(Attachment { filename, content }),
            };

            match self.mailer.send(&message).await {
                Ok(()) => {
                    self.run_log.info(&format!(
                        "Generated Email - Recipient: {} | Subject: {}\nBody: {}",
                        message.to, message.subject, message.html_body
                    ))?;
                    app_log!(info, "<- EMAIL GENERATOR -> Email sent to {}", message.to);
                    report.outcomes.push(DispatchOutcome::Sent {
                        company: stem,
                        artifact,
                    });
                }
                Err(e) => {
                    self.run_log
                        .error(&format!("Failed to send to {}: {}", message.to, e))?;
                    app_log!(error, "<- EMAIL GENERATOR -> ERROR: {}", e);
                    report.outcomes.push(DispatchOutcome::Failed {
                        company: stem,
                        error: e.to_string(),
                    });
                }
            }
        }

        Ok(report)
    }

    pub fn into_run_log(self) -> RunLog {
        self.run_log
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mail::gmail::SendError;
    use crate::types::profile::tests::SAMPLE;
    use chrono::Utc;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingMailer {
        sent: Mutex<Vec<OutgoingMessage>>,
    }

    #[async_trait]
    impl Mailer for RecordingMailer {
        async fn send(&self, message: &OutgoingMessage) -> Result<(), SendError> {
            self.sent.lock().unwrap().push(message.clone());
            Ok(())
        }
    }

    #[derive(Default)]
    struct NoPause;

    #[async_trait]
    impl Pause for NoPause {
        async fn pause(&self, _duration: Duration) {}
    }

    #[tokio::test]
    async fn test_attachment_keeps_base_name_and_body_is_logged() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("output");
        std::fs::create_dir_all(&output).unwrap();
        std::fs::write(output.join("curriculum_Acme.pdf"), b"%PDF-acme").unwrap();

        let profile = ProfileRecord::from_json_str(SAMPLE).unwrap();
        let run_log = RunLog::create(&dir.path().join("mail"), Utc::now()).unwrap();
        let mut scheduler = DispatchScheduler::new(
            RecordingMailer::default(),
            NoPause,
            StdRng::seed_from_u64(3),
            output,
            run_log,
        );

        let interval = SendInterval { minimum: 30, maximum: 60 };
        let report = scheduler.dispatch_all(&profile, interval).await.unwrap();

        assert_eq!(report.sent(), 1);
        assert_eq!(report.skipped(), 1);
        assert!(report.pauses.is_empty());

        let sent = scheduler.mailer.sent.lock().unwrap().clone();
        assert_eq!(sent[0].to, "jobs@acme.com");
        assert_eq!(sent[0].subject, "Application for Backend Engineer at Acme");
        let attachment = sent[0].attachment.as_ref().unwrap();
        assert_eq!(attachment.filename, "curriculum_Acme.pdf");
        assert_eq!(attachment.content, b"%PDF-acme");

        let log = std::fs::read_to_string(scheduler.into_run_log().path()).unwrap();
        assert!(log.contains("Generated Email - Recipient: jobs@acme.com | Subject: Application for Backend Engineer at Acme"));
    }
}
