// src/app.rs
//! Top-level run: load the profile, pick an action, run it.

use anyhow::{Context, Result};
use std::io::{BufRead, Write};

use crate::app_log;
use crate::cli::{Action, Cli};
use crate::config::AppConfig;
use crate::core::ConfigManager;
use crate::generator::BatchGenerator;
use crate::mail;
use crate::prompt::{Prompter, MAIN_CONTEXT};
use crate::types::profile::ProfileRecord;

pub const FINISHED_CONTEXT: &str = "<- FINISHED ->";

pub async fn run(cli: Cli) -> Result<()> {
    let manager = ConfigManager::load(cli.config.as_deref())?;
    let config = cli.apply(manager.app);

    let profile_path = config.profile_path_absolute();
    app_log!(
        info,
        "{} Analyzing your '{}' data...",
        MAIN_CONTEXT,
        profile_path.display()
    );
    let profile = ProfileRecord::load(&profile_path)
        .with_context(|| format!("{} Cannot use {}", MAIN_CONTEXT, profile_path.display()))?;
    app_log!(info, "{} Data is valid.", MAIN_CONTEXT);

    let mut prompter = Prompter::stdio();
    let action = match cli.action {
        Some(action) => Some(action),
        None => menu(&mut prompter, &profile.name)?,
    };
    execute(&config, &profile, action, &mut prompter).await
}

/// Greet the user and read one menu choice
pub fn menu<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    name: &str,
) -> Result<Option<Action>> {
    prompter.say(&format!(
        "{} Welcome to JobFinder {}! Type the corresponding number in order to select an option.",
        MAIN_CONTEXT, name
    ))?;
    prompter.say(&format!("{} How may I assist you?", MAIN_CONTEXT))?;
    prompter.say("\t[1] Generate Curriculum Vitae PDF Documents")?;
    prompter.say("\t[2] Send Curriculum Vitae email to all target companies")?;
    prompter.say("\t[3] All of the above")?;

    let choice = prompter.integer("Your choice: ", MAIN_CONTEXT)?;
    Ok(Action::from_choice(choice))
}

/// Run the chosen action. `None` is an out-of-range menu choice.
pub async fn execute<R: BufRead, W: Write>(
    config: &AppConfig,
    profile: &ProfileRecord,
    action: Option<Action>,
    prompter: &mut Prompter<R, W>,
) -> Result<()> {
    match action {
        Some(action) => {
            if action.generates() {
                app_log!(info, "{} Generating CVs...", MAIN_CONTEXT);
                let report = BatchGenerator::new(config).generate_all(profile)?;
                app_log!(
                    info,
                    "{} Finished generating CVs! {} written, {} skipped",
                    MAIN_CONTEXT,
                    report.total_written(),
                    report.skipped.len()
                );
            }
            if action.dispatches() {
                app_log!(info, "{} Sending emails...", MAIN_CONTEXT);
                mail::run_dispatch(config, profile, prompter).await?;
                app_log!(info, "{} Finished processing emails!", MAIN_CONTEXT);
            }
        }
        None => prompter.say(&format!(
            "{} {}, you do not know how to read. Please do so before attempting to find a job. Aborting...",
            FINISHED_CONTEXT, profile.name
        ))?,
    }

    prompter.say(&format!("{} Thank you for using JobFinder!", FINISHED_CONTEXT))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::profile::tests::SAMPLE;
    use std::io::Cursor;

    fn prompter(input: &str) -> Prompter<Cursor<String>, Vec<u8>> {
        Prompter::new(Cursor::new(input.to_string()), Vec::new())
    }

    #[test]
    fn test_menu_reads_choice() {
        let mut p = prompter("x\n2\n");
        assert_eq!(menu(&mut p, "Jane").unwrap(), Some(Action::Dispatch));
        let output = String::from_utf8(p.into_output()).unwrap();
        assert!(output.contains("Welcome to JobFinder Jane!"));
        assert!(output.contains("Invalid input. Please enter a valid integer."));
    }

    #[tokio::test]
    async fn test_out_of_range_choice_aborts_politely() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::new(dir.path().to_path_buf());
        let profile = ProfileRecord::from_json_str(SAMPLE).unwrap();
        let mut p = prompter("");

        execute(&config, &profile, None, &mut p).await.unwrap();

        let output = String::from_utf8(p.into_output()).unwrap();
        assert!(output.contains("Jane Doe, you do not know how to read."));
        assert!(output.ends_with("<- FINISHED -> Thank you for using JobFinder!\n"));
        assert!(!config.output_dir_absolute().exists());
    }

    #[tokio::test]
    async fn test_generate_action_writes_generic_document() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::new(dir.path().to_path_buf());
        let profile = ProfileRecord::from_json_str(SAMPLE).unwrap();
        let mut p = prompter("");

        execute(&config, &profile, Some(Action::Generate), &mut p)
            .await
            .unwrap();

        assert!(config.output_dir_absolute().join("curriculum.pdf").exists());
    }
}
