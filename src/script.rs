//! Script definitions: [`Script`], [`CommandStep`], and [`ParseRule`].
//!
//! Scripts are authored as JSON with camelCase keys. A step's `parse` field may
//! hold a single rule or a list of rules; both are normalized to a list when
//! the script is loaded.

use crate::config::lenient_ms;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Placeholder replaced by the active target in commands and outcomes.
pub const TARGET_PLACEHOLDER: &str = "<target>";
/// Placeholder replaced by the tracked weapon in a custom entangled command.
pub const WEAPON_PLACEHOLDER: &str = "<weapon>";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptType {
    Combat,
    Noncom,
}

impl<'de> Deserialize<'de> for ScriptType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        match raw.trim().to_lowercase().as_str() {
            "combat" => Ok(Self::Combat),
            "noncom" => Ok(Self::Noncom),
            other => Err(serde::de::Error::custom(format!(
                "unknown script type '{other}', expected 'combat' or 'noncom'"
            ))),
        }
    }
}

impl fmt::Display for ScriptType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Combat => f.write_str("combat"),
            Self::Noncom => f.write_str("noncom"),
        }
    }
}

/// A user-authored automation unit: an ordered command list plus behavior flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Script {
    pub script_name: String,
    #[serde(default)]
    pub script_friendly_name: String,
    pub script_type: ScriptType,
    #[serde(default)]
    pub command_list: Vec<CommandStep>,

    #[serde(default)]
    pub should_kill: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub should_kill_parse: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_kill_command: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_kill_command_parse: Option<String>,
    #[serde(default)]
    pub continue_on_walk_in: bool,
    #[serde(default)]
    pub add_attack: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stance_command: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entangled_command: Option<String>,
}

impl Script {
    /// Case-insensitive name comparison, the way scripts are looked up.
    pub fn is_named(&self, name: &str) -> bool {
        self.script_name.to_lowercase() == name.to_lowercase()
    }
}

/// One entry of a script's command list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandStep {
    pub command: String,

    #[serde(default = "default_true")]
    pub target_required: bool,

    /// Rules evaluated in order; the first whose outcome matches wins.
    #[serde(default, deserialize_with = "one_or_many")]
    pub parse: Vec<ParseRule>,

    #[serde(default, deserialize_with = "lenient_ms", skip_serializing_if = "Option::is_none")]
    pub delay_before_next: Option<u64>,

    /// Watchdog retry threshold while this step is current; `Some(0)` disables it.
    #[serde(default, deserialize_with = "lenient_ms", skip_serializing_if = "Option::is_none")]
    pub command_retry_ms: Option<u64>,
}

impl CommandStep {
    pub fn new(command: impl Into<String>, parse: Vec<ParseRule>) -> Self {
        Self {
            command: command.into(),
            target_required: true,
            parse,
            delay_before_next: None,
            command_retry_ms: None,
        }
    }
}

/// An expected outcome and the trigger that advances past it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseRule {
    /// `|`-delimited alternatives, each may contain `<target>`.
    pub outcome: String,
    #[serde(default)]
    pub move_next_when: Option<String>,
    #[serde(default)]
    pub move_next_now: bool,
}

impl ParseRule {
    pub fn new(outcome: impl Into<String>, move_next_when: Option<&str>) -> Self {
        Self {
            outcome: outcome.into(),
            move_next_when: move_next_when.map(str::to_string),
            move_next_now: false,
        }
    }
}

fn default_true() -> bool {
    true
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(ParseRule),
    Many(Vec<ParseRule>),
    Missing(()),
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<ParseRule>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(rule) => vec![rule],
        OneOrMany::Many(rules) => rules,
        OneOrMany::Missing(()) => Vec::new(),
    })
}
