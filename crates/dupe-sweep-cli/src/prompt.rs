use dupe_sweep_core::confirm::{is_affirmative, Confirm};
use std::io::{self, BufRead, Write};

/// Reads a single answer from stdin. Only `yes` proceeds; anything else,
/// including end of input, declines.
pub struct StdinPrompt;

impl Confirm for StdinPrompt {
    fn confirm(&mut self, prompt: &str) -> io::Result<bool> {
        prompt_confirm(prompt, &mut io::stdin().lock(), &mut io::stdout())
    }
}

pub fn prompt_confirm<R: BufRead, W: Write>(
    prompt: &str,
    input: &mut R,
    output: &mut W,
) -> io::Result<bool> {
    write!(output, "{} (yes/no): ", prompt)?;
    output.flush()?;

    let mut answer = String::new();
    if input.read_line(&mut answer)? == 0 {
        writeln!(output)?;
        return Ok(false);
    }

    Ok(is_affirmative(&answer))
}
