//! [`Current`] command: names the running script.
//!
//! Syntax: `/current`

use crate::command::{Outcome, SlashCommand, SlashLine};
use crate::sequencer::Sequencer;
use anyhow::Result;

pub struct Current;

impl Current {
    pub const NAME: &'static str = "current";
}

impl SlashCommand for Current {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn parse(_line: &SlashLine) -> Result<Self> {
        Ok(Self)
    }

    fn execute(&self, seq: &mut Sequencer) -> Outcome {
        let name = seq.state().current_script_name.clone();
        seq.display(&format!("The current script is: {name}"));
        Outcome::Done
    }
}

#[cfg(test)]
mod tests {
    use crate::commands::testing;
    use crate::parser::interpret;

    #[tokio::test(start_paused = true)]
    async fn test_current() {
        let (mut seq, t) = testing::sequencer();
        interpret("/start MYSCRIPT rat", &mut seq);
        interpret("/current", &mut seq);
        assert_eq!(
            testing::displayed(&t).last().map(String::as_str),
            Some("The current script is: myScript")
        );
    }
}
