//! Interactive stdin prompts

use std::io::{self, Write};

use anyhow::Result;

/// Ask a yes/no question
///
/// Returns true if user confirms, false otherwise.
/// In non-interactive mode (no TTY), returns false.
pub fn confirm(prompt: &str) -> Result<bool> {
    if !atty::is(atty::Stream::Stdin) {
        return Ok(false);
    }

    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    let input = input.trim().to_lowercase();
    Ok(input == "y" || input == "yes")
}

/// Read one line of input after a prompt
pub fn prompt_line(prompt: &str) -> Result<String> {
    print!("{}: ", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

/// Read a password from stdin
///
/// Input is line-based and not masked; prefer passing `--password` in
/// scripts.
pub fn prompt_password(prompt: &str) -> Result<String> {
    prompt_line(prompt)
}
