//! The [`SlashCommand`] trait and the [`SlashLine`] commands are parsed from.

use crate::sequencer::Sequencer;
use anyhow::Result;

/// A tokenized `/command` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlashLine {
    /// The whole line as typed, trimmed.
    pub raw: String,
    /// Tokens, starting with the `/keyword` itself. Quotes are stripped.
    pub params: Vec<String>,
}

impl SlashLine {
    /// Positional argument `n` (1-based: 0 is the keyword).
    pub fn arg(&self, n: usize) -> Option<&str> {
        self.params.get(n).map(String::as_str)
    }

    /// Everything after the keyword, verbatim.
    pub fn rest(&self) -> &str {
        let keyword = self.params.first().map(String::as_str).unwrap_or_default();
        self.raw
            .strip_prefix(keyword)
            .unwrap_or_else(|| self.raw.split_once(char::is_whitespace).map_or("", |(_, r)| r))
            .trim()
    }
}

/// What the host has to do after a command ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Done,
    /// Open the script editor, then reload the scripts.
    OpenEditor,
}

/// A single slash command.
///
/// Implement this trait to add a new command. Then:
///
/// 1. Define `pub const NAME: &'static str` on your struct: the keyword
///    without its slash (e.g. `"start"`).
/// 2. Re-export the struct from `src/commands/mod.rs`.
/// 3. Add one entry to the `REGISTRY` in [`crate::parser`]:
///    `(MyCmd::NAME, MyCmd::parse_boxed)`.
pub trait SlashCommand: 'static {
    /// The command keyword, accessible through a trait object.
    ///
    /// Implementations should return their `NAME` constant.
    fn name(&self) -> &'static str;

    /// Parse this command from a tokenized line.
    ///
    /// Errors carry the usage message shown to the user.
    fn parse(line: &SlashLine) -> Result<Self>
    where
        Self: Sized;

    /// Parse and box this command; the function-pointer type stored in the
    /// registry.
    fn parse_boxed(line: &SlashLine) -> Result<Box<dyn SlashCommand>>
    where
        Self: Sized,
    {
        Ok(Box::new(Self::parse(line)?))
    }

    /// Run the command against the sequencer.
    fn execute(&self, seq: &mut Sequencer) -> Outcome;
}
