use crate::domain::model::IssueDraft;
use crate::domain::ports::Confirm;
use crate::utils::error::Result;
use std::io::{BufRead, Write};

/// Interactive `Y/n` prompt on stdin/stdout.
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&self, line: usize, draft: &IssueDraft) -> Result<bool> {
        let stdin = std::io::stdin();
        let stdout = std::io::stdout();
        ask(line, draft, &mut stdin.lock(), &mut stdout.lock())
    }
}

pub fn ask<R: BufRead, W: Write>(
    line: usize,
    draft: &IssueDraft,
    input: &mut R,
    output: &mut W,
) -> Result<bool> {
    writeln!(output, "\nCreate a bug from line {} with the following data?", line)?;
    writeln!(output, "  summary: {}", draft.summary)?;
    for (i, text) in draft.description.lines().enumerate() {
        let label = if i == 0 { "  description: " } else { "               " };
        writeln!(output, "{}{}", label, text)?;
    }
    write!(output, "Y/n > ")?;
    output.flush()?;

    let mut answer = String::new();
    let read = input.read_line(&mut answer)?;
    // EOF declines so a closed stdin cannot create issues
    Ok(read > 0 && is_yes(&answer))
}

/// Empty input or `y` (any case) accepts.
pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "" | "y")
}
