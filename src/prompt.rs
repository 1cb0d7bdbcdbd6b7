// src/prompt.rs
//! Line-based operator prompts over any reader/writer pair.

use anyhow::{bail, Context, Result};
use std::io::{BufRead, Stdin, StdinLock, Stdout, Write};

pub const MAIN_CONTEXT: &str = "<- MAIN ->";

pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl Prompter<StdinLock<'static>, Stdout> {
    pub fn stdio() -> Self {
        let stdin: Stdin = std::io::stdin();
        Self::new(stdin.lock(), std::io::stdout())
    }
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Print one line to the operator
    pub fn say(&mut self, text: &str) -> Result<()> {
        writeln!(self.output, "{}", text).context("Failed to write to the terminal")
    }

    /// Show `prompt` and read one line without its terminator. Closed input is an error.
    pub fn line(&mut self, prompt: &str) -> Result<String> {
        write!(self.output, "{}", prompt).context("Failed to write to the terminal")?;
        self.output.flush().context("Failed to flush the terminal")?;

        let mut buffer = String::new();
        let read = self
            .input
            .read_line(&mut buffer)
            .context("Failed to read from the terminal")?;
        if read == 0 {
            bail!("Input closed while waiting for an answer");
        }
        Ok(buffer.trim_end_matches(&['\r', '\n'][..]).to_string())
    }

    /// Re-prompt until the answer parses as an integer
    pub fn integer(&mut self, prompt: &str, context: &str) -> Result<i64> {
        loop {
            let answer = self.line(prompt)?;
            match answer.trim().parse::<i64>() {
                Ok(value) => return Ok(value),
                Err(_) => self.say(&format!(
                    "{} Invalid input. Please enter a valid integer.",
                    context
                ))?,
            }
        }
    }

    pub fn into_output(self) -> W {
        self.output
    }
}
