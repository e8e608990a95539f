//! [`Pause`] and [`Resume`] commands.
//!
//! Syntax: `/pause`, `/resume`

use crate::command::{Outcome, SlashCommand, SlashLine};
use crate::sequencer::Sequencer;
use anyhow::Result;

pub struct Pause;

impl Pause {
    pub const NAME: &'static str = "pause";
}

impl SlashCommand for Pause {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn parse(_line: &SlashLine) -> Result<Self> {
        Ok(Self)
    }

    fn execute(&self, seq: &mut Sequencer) -> Outcome {
        seq.pause_current_script();
        Outcome::Done
    }
}

pub struct Resume;

impl Resume {
    pub const NAME: &'static str = "resume";
}

impl SlashCommand for Resume {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn parse(_line: &SlashLine) -> Result<Self> {
        Ok(Self)
    }

    fn execute(&self, seq: &mut Sequencer) -> Outcome {
        seq.resume_current_script();
        Outcome::Done
    }
}
