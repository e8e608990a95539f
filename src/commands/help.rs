//! [`Help`] command: prints usage for every slash command.
//!
//! Syntax: `/help`

use crate::command::{Outcome, SlashCommand, SlashLine};
use crate::sequencer::Sequencer;
use anyhow::Result;

const USAGE: &str = "\
Available slash commands:
  /scripts                  list the names of loaded scripts
  /editscripts              open the script file in your editor
  /current                  show the running script
  /start name [target] [weapon] [shield] [shouldKill] [continueOnWalkIn]
                            run a script; quote values that contain spaces
  /stop                     stop the running script or repeat
  /repeat <command>         send <command> every second
  /repeatnlb <command>      send <command> whenever you are no longer busy
  /pause                    pause the running script or repeat
  /resume                   resume after /pause
  /authhash                 show this session's auth hash
Examples:
  /start spearClose thug|brute boison-tipped
  /start chop \"giant rat\" axe shield yes no
  /repeatnlb forage";

pub struct Help;

impl Help {
    pub const NAME: &'static str = "help";
}

impl SlashCommand for Help {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn parse(_line: &SlashLine) -> Result<Self> {
        Ok(Self)
    }

    fn execute(&self, seq: &mut Sequencer) -> Outcome {
        seq.display(USAGE);
        Outcome::Done
    }
}
