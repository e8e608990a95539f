//! [`Start`] command: runs a script by name.
//!
//! Syntax: `/start scriptName [target] [weapon] [shield] [shouldKill] [continueOnWalkIn]`

use crate::command::{Outcome, SlashCommand, SlashLine};
use crate::sequencer::{ScriptOptions, Sequencer};
use anyhow::{Result, anyhow};

pub struct Start {
    pub script_name: String,
    pub options: ScriptOptions,
    /// The line as typed; remembered as the last command ran.
    pub raw: String,
}

impl Start {
    pub const NAME: &'static str = "start";
}

impl SlashCommand for Start {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn parse(line: &SlashLine) -> Result<Self> {
        let script_name = line
            .arg(1)
            .ok_or_else(|| anyhow!("A script name parameter is expected when using /start"))?;

        let options = ScriptOptions {
            target: line.arg(2).map(str::to_string),
            weapon_item_name: line.arg(3).map(str::to_string),
            shield_item_name: line.arg(4).map(str::to_string),
            should_kill: line.arg(5).map(parse_bool),
            continue_on_walk_in: line.arg(6).map(parse_bool),
        };

        Ok(Self {
            script_name: script_name.to_string(),
            options,
            raw: line.raw.clone(),
        })
    }

    fn execute(&self, seq: &mut Sequencer) -> Outcome {
        if seq.find_script(&self.script_name).is_none() {
            seq.display("Script not found.");
        }
        seq.run_script_by_name(&self.script_name, self.options.clone());
        seq.state_mut().last_command_ran = Some(self.raw.clone());
        Outcome::Done
    }
}

/// `true`/`yes`/`1` and `false`/`no`/`0`, case-insensitive. Any other
/// non-empty text counts as true.
pub(crate) fn parse_bool(s: &str) -> bool {
    match s.trim().to_lowercase().as_str() {
        "true" | "yes" | "1" => true,
        "false" | "no" | "0" | "" => false,
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing;
    use crate::parser::parse_line;

    fn parse(raw: &str) -> Result<Start> {
        Start::parse(&SlashLine {
            raw: raw.to_string(),
            params: crate::parser::tokenize(raw),
        })
    }

    #[test]
    fn test_parse_full() {
        let cmd = parse("/start myScript rat sword shield true true").unwrap();
        assert_eq!(cmd.script_name, "myScript");
        assert_eq!(
            cmd.options,
            ScriptOptions {
                target: Some("rat".into()),
                weapon_item_name: Some("sword".into()),
                shield_item_name: Some("shield".into()),
                should_kill: Some(true),
                continue_on_walk_in: Some(true),
            }
        );
    }

    #[test]
    fn test_parse_optional_booleans_absent() {
        let cmd = parse("/start spearClose thug|brute spear").unwrap();
        assert_eq!(cmd.options.target.as_deref(), Some("thug|brute"));
        assert_eq!(cmd.options.shield_item_name, None);
        assert_eq!(cmd.options.should_kill, None);
        assert_eq!(cmd.options.continue_on_walk_in, None);
    }

    #[test]
    fn test_parse_requires_name() {
        let err = parse("/start").err().unwrap().to_string();
        assert_eq!(err, "A script name parameter is expected when using /start");
    }

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("YES"));
        assert!(parse_bool("1"));
        assert!(!parse_bool("no"));
        assert!(!parse_bool("False"));
        assert!(parse_bool("whatever"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_execute_starts_script() {
        let (mut seq, t) = testing::sequencer();
        let raw = "/start myScript rat sword shield true true";
        parse_line(raw).unwrap().execute(&mut seq);

        let state = seq.state();
        assert_eq!(state.current_script_name, "myScript");
        assert_eq!(state.target, "rat");
        assert_eq!(state.weapon_item_name, "sword");
        assert_eq!(state.shield_item_name, "shield");
        assert!(state.should_kill);
        assert!(state.continue_on_walk_in);
        assert_eq!(state.last_command_ran.as_deref(), Some(raw));
        assert_eq!(
            testing::displayed(&t),
            vec!["Starting script: myScript (Axe chopping)"]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_execute_unknown_script() {
        let (mut seq, t) = testing::sequencer();
        parse_line("/start nope rat").unwrap().execute(&mut seq);
        assert!(seq.state().command_list.is_empty());
        assert_eq!(testing::displayed(&t), vec!["Script not found."]);
    }
}
