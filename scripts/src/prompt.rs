//! Operator confirmation before spending funds on-chain.

use std::io::{self, BufRead, Write};

use crate::{constants::CONFIRM_TOKEN, errors::ScriptError};

/// Something able to ask the operator a question and read one line back
pub trait Prompt {
    /// Show `label` and return the line typed by the operator, without its terminator
    fn ask(&mut self, label: &str) -> Result<String, ScriptError>;
}

/// Prompt on the process terminal
#[derive(Debug, Default)]
pub struct StdinPrompt;

impl Prompt for StdinPrompt {
    fn ask(&mut self, label: &str) -> Result<String, ScriptError> {
        let mut stdout = io::stdout();
        write!(stdout, "{label}").map_err(|e| ScriptError::Console(e.to_string()))?;
        stdout.flush().map_err(|e| ScriptError::Console(e.to_string()))?;

        read_answer(io::stdin().lock())
    }
}

/// Read a single answer line, an empty answer when the input is closed
pub fn read_answer(mut input: impl BufRead) -> Result<String, ScriptError> {
    let mut line = String::new();
    input
        .read_line(&mut line)
        .map_err(|e| ScriptError::Console(e.to_string()))?;

    Ok(strip_line_terminator(&line).to_string())
}

/// Whether the answer lets the deployment go on. Only the exact token counts.
pub fn is_affirmative(answer: &str) -> bool {
    answer == CONFIRM_TOKEN
}

fn strip_line_terminator(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}
