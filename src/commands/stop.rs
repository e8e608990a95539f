//! [`Stop`] command: stops whatever is running.
//!
//! Syntax: `/stop`

use crate::command::{Outcome, SlashCommand, SlashLine};
use crate::sequencer::Sequencer;
use anyhow::Result;

pub struct Stop;

impl Stop {
    pub const NAME: &'static str = "stop";
}

impl SlashCommand for Stop {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn parse(_line: &SlashLine) -> Result<Self> {
        Ok(Self)
    }

    fn execute(&self, seq: &mut Sequencer) -> Outcome {
        seq.kill_current_script();
        Outcome::Done
    }
}

#[cfg(test)]
mod tests {
    use crate::commands::testing;
    use crate::parser::interpret;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn test_stop_running_script() {
        let (mut seq, t) = testing::sequencer();
        interpret("/start myScript rat", &mut seq);
        interpret("/stop", &mut seq);

        tokio::time::advance(Duration::from_secs(5)).await;
        seq.fire_due();
        assert!(t.lock().unwrap().sent.is_empty());
        assert!(seq.state().command_list.is_empty());
        assert_eq!(
            testing::displayed(&t).last().map(String::as_str),
            Some("Stopping script: Script - myScript")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_with_nothing_running() {
        let (mut seq, t) = testing::sequencer();
        interpret("/stop", &mut seq);
        assert!(testing::displayed(&t).is_empty());
    }
}
