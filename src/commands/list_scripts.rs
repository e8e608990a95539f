//! [`ListScripts`] command: names every loaded script.
//!
//! Syntax: `/scripts`

use crate::command::{Outcome, SlashCommand, SlashLine};
use crate::sequencer::Sequencer;
use anyhow::Result;

pub struct ListScripts;

impl ListScripts {
    pub const NAME: &'static str = "scripts";
}

impl SlashCommand for ListScripts {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn parse(_line: &SlashLine) -> Result<Self> {
        Ok(Self)
    }

    fn execute(&self, seq: &mut Sequencer) -> Outcome {
        let names: Vec<_> = seq
            .scripts()
            .iter()
            .map(|s| format!("  {}", s.script_name))
            .collect();
        seq.display(&format!(
            "Here are the names of available scripts:\n{}",
            names.join("\n")
        ));
        Outcome::Done
    }
}

#[cfg(test)]
mod tests {
    use crate::commands::testing;
    use crate::parser::interpret;

    #[test]
    fn test_lists_names() {
        let (mut seq, t) = testing::sequencer();
        interpret("/scripts", &mut seq);
        assert_eq!(
            testing::displayed(&t),
            vec!["Here are the names of available scripts:\n  myScript"]
        );
    }
}
