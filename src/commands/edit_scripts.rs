//! [`EditScripts`] command: asks the host to open the script editor.
//!
//! Syntax: `/editscripts`

use crate::command::{Outcome, SlashCommand, SlashLine};
use crate::sequencer::Sequencer;
use anyhow::Result;

pub struct EditScripts;

impl EditScripts {
    pub const NAME: &'static str = "editscripts";
}

impl SlashCommand for EditScripts {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn parse(_line: &SlashLine) -> Result<Self> {
        Ok(Self)
    }

    fn execute(&self, _seq: &mut Sequencer) -> Outcome {
        Outcome::OpenEditor
    }
}
