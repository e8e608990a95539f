//! [`ExecutionState`]: where the sequencer currently is.

use crate::config::Config;
use crate::script::{CommandStep, ScriptType};
use tokio::time::Instant;

/// Trigger every command waits on until its parse rule says otherwise.
pub const BUSY_SENTINEL: &str = "You are no longer busy";

/// The mutable record of the running script, repeat, and overrides.
///
/// Owned by the [`Sequencer`](crate::Sequencer) and threaded explicitly into
/// the matcher, formatter, and reaction table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExecutionState {
    pub config: Config,

    // Active script
    pub current_script_name: String,
    pub current_script_friendly_name: String,
    pub current_script_type: Option<ScriptType>,
    pub command_list: Vec<CommandStep>,
    pub current_cmd_index: usize,
    pub current_move_next_when: Option<String>,
    pub move_next_now: bool,
    pub command_override: Option<String>,
    pub script_paused: bool,

    // Combat
    pub target: String,
    pub weapon_item_name: String,
    pub shield_item_name: String,
    pub stance: String,
    pub entangled_command: String,
    pub should_kill: bool,
    pub should_kill_parse: String,
    pub custom_kill_command: String,
    pub custom_kill_command_parse: String,
    pub attempting_kill: bool,
    pub advancing_to_kill: bool,
    pub continue_on_walk_in: bool,
    pub add_attack: bool,
    pub recovering_weapon: bool,

    // Repeats
    pub run_repeat: bool,
    pub repeat_command: String,
    pub run_repeat_with_delay: bool,
    pub repeat_with_delay_command: String,

    // Timing
    pub last_command_ran: Option<String>,
    pub last_command_sent: Option<Instant>,
    /// Replaces the random delay of the next scheduled command once.
    pub delay_next_command_by: u64,
    /// Retry threshold of the step sent last, captured when it was sent.
    pub command_retry_override: Option<u64>,
}

impl ExecutionState {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Clear everything about the running script or repeat.
    ///
    /// The configuration and the last literal command ran survive a reset.
    pub fn reset(&mut self) {
        let config = std::mem::take(&mut self.config);
        let last_command_ran = self.last_command_ran.take();
        *self = Self {
            config,
            last_command_ran,
            ..Self::default()
        };
    }

    pub fn current_step(&self) -> Option<&CommandStep> {
        self.command_list.get(self.current_cmd_index)
    }

    /// Move to the next step, wrapping to the first.
    ///
    /// Wrapping with `add_attack` set queues an attack on the target.
    pub fn advance(&mut self) {
        if self.advance_index() && self.add_attack {
            self.command_override = Some(format!("att {}", self.target));
        }
    }

    /// Move to the next step, wrapping to the first. Returns true on a wrap.
    pub fn advance_index(&mut self) -> bool {
        if self.command_list.is_empty() {
            return false;
        }
        if self.current_cmd_index + 1 >= self.command_list.len() {
            self.current_cmd_index = 0;
            true
        } else {
            self.current_cmd_index += 1;
            false
        }
    }

    pub fn override_contains(&self, needle: &str) -> bool {
        !needle.is_empty()
            && self
                .command_override
                .as_deref()
                .is_some_and(|cmd| cmd.contains(needle))
    }

    pub fn clear_override(&mut self) {
        self.command_override = None;
    }

    /// The kill command for the current target, custom when configured.
    pub fn kill_command(&self) -> String {
        if self.custom_kill_command.is_empty() {
            format!("kill {}", self.target)
        } else {
            format!("{} {}", self.custom_kill_command, self.target)
        }
    }

    /// `Script - <name>` for a script, otherwise the last literal command.
    pub fn running_description(&self) -> String {
        if !self.current_script_name.is_empty() {
            format!("Script - {}", self.current_script_name)
        } else {
            self.last_command_ran.clone().unwrap_or_default()
        }
    }

    pub fn is_running_anything(&self) -> bool {
        !self.current_script_name.is_empty() || self.last_command_ran.is_some()
    }
}
