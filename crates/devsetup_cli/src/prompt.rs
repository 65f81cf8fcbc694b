//! Interactive yes/no confirmation.

use std::io::{self, BufRead, StderrLock, StdinLock, Write};

use devsetup_core::{ConflictResolver, CoreError, CoreResult};
use devsetup_templates::ConfigValue;

/// Asks on a terminal whether a persisted value should be replaced.
pub struct ConsolePrompt<R, W> {
    input: R,
    output: W,
}

impl ConsolePrompt<StdinLock<'static>, StderrLock<'static>> {
    /// Prompt on stderr and read answers from stdin.
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stderr().lock())
    }
}

impl<R: BufRead, W: Write> ConsolePrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> ConflictResolver for ConsolePrompt<R, W> {
    fn resolve(
        &mut self,
        field: &str,
        current: &ConfigValue,
        proposed: &ConfigValue,
    ) -> CoreResult<ConfigValue> {
        loop {
            write!(
                self.output,
                "Do you want to update '{}' with '{}' (current value: {})? (y/n): ",
                field, proposed, current
            )?;
            self.output.flush()?;

            let mut answer = String::new();
            if self.input.read_line(&mut answer)? == 0 {
                return Err(CoreError::Prompt(format!(
                    "input closed before answering for '{}'",
                    field
                )));
            }

            match answer.trim().to_lowercase().as_str() {
                "y" | "yes" => return Ok(proposed.clone()),
                "n" | "no" => return Ok(current.clone()),
                _ => writeln!(self.output, "Invalid input. Please answer with 'y' or 'n'.")?,
            }
        }
    }
}
