// src/mail/mod.rs
//! Dispatch pipeline: interval setup, sender confirmation, authorization,
//! then the throttled send loop.

pub mod consent;
pub mod credentials;
pub mod gmail;
pub mod interval;
pub mod message;
pub mod run_log;
pub mod scheduler;

use anyhow::Result;
use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::{BufRead, Write};

use crate::app_log;
use crate::config::AppConfig;
use crate::prompt::Prompter;
use crate::types::profile::ProfileRecord;
use crate::utils::{is_provider_email, is_valid_email};

pub use credentials::{CredentialState, CredentialStore};
pub use gmail::{GmailMailer, Mailer, SendError};
pub use interval::SendInterval;
pub use scheduler::{DispatchOutcome, DispatchReport, DispatchScheduler, Pause, TokioPause};

pub const EMAIL_CONTEXT: &str = "<- EMAIL GENERATOR ->";

/// Clamp the profile's interval and report every correction
pub fn configure_interval(profile: &ProfileRecord) -> SendInterval {
    let (interval, corrections) =
        SendInterval::configure(profile.minimum_interval, profile.maximum_interval);
    for correction in &corrections {
        app_log!(
            warn,
            "{} ERROR: {}\n{} Applying default values instead...",
            EMAIL_CONTEXT,
            correction,
            EMAIL_CONTEXT
        );
    }
    app_log!(info, "{} Interval set to {}", EMAIL_CONTEXT, interval);
    interval
}

/// Offer the profile address as sender, else ask until a valid provider address is given
pub fn choose_sender<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    profile_email: &str,
    domain: &str,
) -> Result<String> {
    let acceptable = |email: &str| is_valid_email(email) && is_provider_email(email, domain);

    prompter.say(&format!(
        "{} Do you wish to use {} as your sender email?",
        EMAIL_CONTEXT, profile_email
    ))?;
    prompter.say("\t[1] Yes")?;
    prompter.say("\t[2] No")?;
    if prompter.integer("Your choice: ", EMAIL_CONTEXT)? == 1 {
        if acceptable(profile_email) {
            return Ok(profile_email.to_string());
        }
        prompter.say(&format!("{} is invalid.", profile_email))?;
    }

    loop {
        let email = prompter.line(&format!(
            "{} Enter your email address (only {} supported): ",
            EMAIL_CONTEXT, domain
        ))?;
        let email = email.trim();
        if acceptable(email) {
            return Ok(email.to_string());
        }
        prompter.say(&format!(
            "{} The email '{}' is not valid, please re-type.",
            EMAIL_CONTEXT, email
        ))?;
    }
}

/// Full dispatch run against the Gmail API
pub async fn run_dispatch<R: BufRead, W: Write>(
    config: &AppConfig,
    profile: &ProfileRecord,
    prompter: &mut Prompter<R, W>,
) -> Result<DispatchReport> {
    let interval = configure_interval(profile);
    let sender = choose_sender(prompter, &profile.contact.email, &config.sender_domain)?;

    app_log!(
        info,
        "{} {} detected. Attempting to authenticate...",
        EMAIL_CONTEXT,
        sender
    );
    let store = CredentialStore::new(
        config.credentials_path_absolute(),
        config.token_path_absolute(),
    );
    let refresher = credentials::OAuthClient::new()?;
    let consent =
        consent::LoopbackConsent::new(credentials::OAuthClient::new()?, config.consent_port);
    let state = store.settle(&refresher, &consent, Utc::now()).await?;
    let token = match state.token() {
        Some(token) => token.token.clone(),
        None => anyhow::bail!("No usable credentials after authorization"),
    };
    app_log!(info, "{} Successfully authenticated! Sending...", EMAIL_CONTEXT);

    let run_log = run_log::RunLog::create(&config.mail_log_dir_absolute(), Utc::now())?;
    app_log!(debug, "Run log at {}", run_log.path().display());

    let mut scheduler = DispatchScheduler::new(
        GmailMailer::new(token)?,
        TokioPause,
        StdRng::from_entropy(),
        config.output_dir_absolute(),
        run_log,
    );
    let report = scheduler.dispatch_all(profile, interval).await?;

    app_log!(
        info,
        "{} {} sent, {} skipped, {} failed",
        EMAIL_CONTEXT,
        report.sent(),
        report.skipped(),
        report.failed()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn run(input: &str, profile_email: &str) -> (Result<String>, String) {
        let mut prompter = Prompter::new(Cursor::new(input.to_string()), Vec::new());
        let chosen = choose_sender(&mut prompter, profile_email, "gmail.com");
        (chosen, String::from_utf8(prompter.into_output()).unwrap())
    }

    #[test]
    fn test_profile_address_accepted() {
        let (chosen, _) = run("1\n", "jane@gmail.com");
        assert_eq!(chosen.unwrap(), "jane@gmail.com");
    }

    #[test]
    fn test_declined_address_loops_until_valid() {
        let (chosen, output) = run("2\njane@yahoo.com\nnot-an-email\njoe@gmail.com\n", "jane@gmail.com");
        assert_eq!(chosen.unwrap(), "joe@gmail.com");
        assert_eq!(output.matches("is not valid, please re-type.").count(), 2);
    }

    #[test]
    fn test_foreign_profile_address_is_rejected() {
        let (chosen, output) = run("1\njane@gmail.com\n", "jane@corp.com");
        assert_eq!(chosen.unwrap(), "jane@gmail.com");
        assert!(output.contains("jane@corp.com is invalid."));
    }
}
