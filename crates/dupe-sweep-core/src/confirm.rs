use std::io;

/// Yes/no gate in front of destructive work.
///
/// Any closure `FnMut(&str) -> io::Result<bool>` is a `Confirm`, so callers
/// can script the decision instead of reading a terminal.
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> io::Result<bool>;
}

impl<F> Confirm for F
where
    F: FnMut(&str) -> io::Result<bool>,
{
    fn confirm(&mut self, prompt: &str) -> io::Result<bool> {
        self(prompt)
    }
}

/// Only an explicit `yes` counts. Case is ignored; only the line terminator
/// is stripped, so padded answers decline.
pub fn is_affirmative(answer: &str) -> bool {
    answer
        .trim_end_matches(|c: char| c == '\n' || c == '\r')
        .eq_ignore_ascii_case("yes")
}
