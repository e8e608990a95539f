//! [`Repeat`] and [`RepeatNlb`] commands: repeat a literal game command.
//!
//! Syntax:
//! - `/repeat <command>`: send every second, whatever the game says
//! - `/repeatnlb <command>`: send again each time the character is no longer busy
//!
//! Everything after the keyword is repeated verbatim, quotes included.

use crate::command::{Outcome, SlashCommand, SlashLine};
use crate::sequencer::Sequencer;
use anyhow::{Result, bail};

/// Fixed-interval repeat.
pub struct Repeat {
    pub command: String,
}

impl Repeat {
    pub const NAME: &'static str = "repeat";
}

impl SlashCommand for Repeat {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn parse(line: &SlashLine) -> Result<Self> {
        Ok(Self {
            command: remainder(line, Self::NAME)?,
        })
    }

    fn execute(&self, seq: &mut Sequencer) -> Outcome {
        seq.start_repeat_with_delay(&self.command);
        Outcome::Done
    }
}

/// Repeat on "no longer busy".
pub struct RepeatNlb {
    pub command: String,
}

impl RepeatNlb {
    pub const NAME: &'static str = "repeatnlb";
}

impl SlashCommand for RepeatNlb {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn parse(line: &SlashLine) -> Result<Self> {
        Ok(Self {
            command: remainder(line, Self::NAME)?,
        })
    }

    fn execute(&self, seq: &mut Sequencer) -> Outcome {
        seq.start_simple_repeat(&self.command);
        Outcome::Done
    }
}

fn remainder(line: &SlashLine, name: &str) -> Result<String> {
    let rest = line.rest();
    if rest.is_empty() {
        bail!("A command to repeat is expected when using /{name}");
    }
    Ok(rest.to_string())
}
