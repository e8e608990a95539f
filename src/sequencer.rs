//! The [`Sequencer`]: decides, line by line, when the next scripted command goes out.

use crate::client::GameClient;
use crate::config::Config;
use crate::dispatch::{Dispatcher, Job, REPEAT_INTERVAL};
use crate::format::formatted_command;
use crate::matcher::match_expected_parse;
use crate::reactions::{
    self, COMBAT_REACTIONS, Cycle, KILL_RULES, SHORT_EXTRA_DELAY, SKIP_EXTRA_DELAY,
    WALK_IN_PHRASES,
};
use crate::script::{Script, ScriptType};
use crate::state::{BUSY_SENTINEL, ExecutionState};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Line that ends a simple repeat's round.
const REPEAT_TRIGGER: &str = "You are no longer busy.";

/// Caller-supplied values that take precedence over a script's own.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptOptions {
    pub target: Option<String>,
    pub weapon_item_name: Option<String>,
    pub shield_item_name: Option<String>,
    pub should_kill: Option<bool>,
    pub continue_on_walk_in: Option<bool>,
}

/// Drives scripts and repeats against a [`GameClient`].
///
/// The sequencer never blocks and never spawns. The host feeds it server
/// lines with [`handle_line`](Self::handle_line), calls
/// [`fire_due`](Self::fire_due) when [`next_deadline`](Self::next_deadline)
/// passes, and [`watchdog`](Self::watchdog) every
/// [`watchdog_interval`](Self::watchdog_interval).
pub struct Sequencer {
    state: ExecutionState,
    dispatcher: Dispatcher,
    scripts: Vec<Script>,
    client: Box<dyn GameClient>,
}

impl Sequencer {
    pub fn new(client: impl GameClient + 'static, scripts: Vec<Script>, config: Config) -> Self {
        Self {
            state: ExecutionState::new(config),
            dispatcher: Dispatcher::new(),
            scripts,
            client: Box::new(client),
        }
    }

    pub fn state(&self) -> &ExecutionState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut ExecutionState {
        &mut self.state
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn scripts(&self) -> &[Script] {
        &self.scripts
    }

    /// Replace the script list. A running script keeps its copied command list.
    pub fn set_scripts(&mut self, scripts: Vec<Script>) {
        self.scripts = scripts;
    }

    pub fn set_config(&mut self, config: Config) {
        self.state.config = config;
    }

    pub fn find_script(&self, name: &str) -> Option<&Script> {
        self.scripts.iter().find(|s| s.is_named(name))
    }

    pub fn display(&mut self, message: &str) {
        self.client.display(message);
    }

    pub fn auth_hash(&self) -> Option<String> {
        self.client.auth_hash()
    }

    /// Send a literal command to the game right away.
    pub fn send_command(&mut self, command: &str) {
        if command.trim().is_empty() {
            debug!("empty command, nothing sent");
            return;
        }
        info!(command, "command sent");
        if let Err(e) = self.client.send(command) {
            warn!(command, error = %e, "failed to send command");
        }
        self.state.last_command_sent = Some(Instant::now());
    }

    // ---------------------------------------------------------------------
    // Incoming lines

    /// React to one line of server output.
    pub fn handle_line(&mut self, line: &str) {
        if self.state.script_paused {
            return;
        }

        if self.state.run_repeat && line.contains(REPEAT_TRIGGER) {
            let command = self.state.repeat_command.clone();
            self.dispatcher
                .send_after_delay(&self.state, Job::Send(command), Duration::ZERO);
            return;
        }

        if self.state.command_list.is_empty() {
            return;
        }
        match self.state.current_script_type {
            Some(ScriptType::Combat) => self.combat_cycle(line),
            Some(ScriptType::Noncom) => self.noncom_cycle(line),
            None => {}
        }
    }

    fn combat_cycle(&mut self, line: &str) {
        if self.advance_on_expected(line, true) {
            return;
        }

        // Some maneuvers can never land on this target; skip them.
        if line.contains("You can't trip") {
            self.state.advance();
            self.dispatcher
                .send_next_command(&mut self.state, SKIP_EXTRA_DELAY);
            return;
        }

        let mut cycle = Cycle {
            line,
            state: &mut self.state,
            dispatcher: &mut self.dispatcher,
        };
        if cycle.state.should_kill {
            reactions::apply(KILL_RULES, &mut cycle);
        }
        if cycle.state.continue_on_walk_in && WALK_IN_PHRASES.iter().any(|p| line.contains(p)) {
            cycle
                .dispatcher
                .send_next_command(cycle.state, SHORT_EXTRA_DELAY);
        }
        reactions::apply(COMBAT_REACTIONS, &mut cycle);

        self.send_on_trigger(line);
    }

    fn noncom_cycle(&mut self, line: &str) {
        if self.advance_on_expected(line, false) {
            return;
        }
        self.send_on_trigger(line);
    }

    /// Advance past the current step when `line` is one of its outcomes.
    ///
    /// `attack_on_wrap` applies the script's `addAttack`; only combat scripts
    /// attack. Returns true when the next command was scheduled right away and
    /// the rest of the cycle must be skipped.
    fn advance_on_expected(&mut self, line: &str, attack_on_wrap: bool) -> bool {
        if !match_expected_parse(&mut self.state, line) {
            return false;
        }
        if attack_on_wrap {
            self.state.advance();
        } else {
            self.state.advance_index();
        }

        let no_trigger = self
            .state
            .current_move_next_when
            .as_deref()
            .is_none_or(str::is_empty);
        if self.state.move_next_now || no_trigger {
            self.dispatcher
                .send_next_command(&mut self.state, SHORT_EXTRA_DELAY);
            return true;
        }
        false
    }

    fn send_on_trigger(&mut self, line: &str) {
        let triggered = self
            .state
            .current_move_next_when
            .as_deref()
            .is_some_and(|t| !t.is_empty() && line.contains(t));
        if triggered {
            self.dispatcher
                .send_next_command(&mut self.state, Duration::ZERO);
        }
    }

    // ---------------------------------------------------------------------
    // Timers

    /// When the earliest scheduled send is due.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.dispatcher.next_deadline()
    }

    /// Carry out every scheduled send that is due.
    pub fn fire_due(&mut self) {
        while let Some(job) = self.dispatcher.pop_due() {
            self.fire(job);
        }
    }

    fn fire(&mut self, job: Job) {
        if self.state.script_paused && job != Job::RepeatTick {
            debug!(?job, "paused, scheduled send dropped");
            return;
        }

        match job {
            Job::NextCommand => {
                let command = formatted_command(&self.state);
                self.send_command(&command);

                self.state.current_move_next_when = Some(BUSY_SENTINEL.to_string());
                self.state.move_next_now = false;
                let (delay, retry) = self
                    .state
                    .current_step()
                    .map(|s| (s.delay_before_next, s.command_retry_ms))
                    .unwrap_or_default();
                self.state.delay_next_command_by = delay.unwrap_or(0);
                self.state.command_retry_override = retry;
            }
            Job::Send(command) => self.send_command(&command),
            Job::SendCurrent => {
                let command = formatted_command(&self.state);
                self.send_command(&command);
            }
            Job::Approach { command, follow_up } => {
                self.send_command(&command);
                // Engaging costs no round time, so attack right behind it.
                if follow_up {
                    self.dispatcher
                        .send_after_delay(&self.state, Job::SendCurrent, SHORT_EXTRA_DELAY);
                }
            }
            Job::RepeatTick => {
                if !self.state.run_repeat_with_delay {
                    return;
                }
                if !self.state.script_paused {
                    let command = self.state.repeat_with_delay_command.clone();
                    self.send_command(&command);
                }
                self.dispatcher.schedule(Job::RepeatTick, REPEAT_INTERVAL);
            }
        }
    }

    pub fn watchdog_interval(&self) -> Duration {
        self.state.config.watchdog_interval()
    }

    /// Force the next command when the sequence has stalled.
    ///
    /// Uses the retry threshold captured from the step sent last, falling
    /// back to the configured one. A threshold of zero disables the retry.
    pub fn watchdog(&mut self) {
        if self.state.command_list.is_empty()
            || self.state.script_paused
            || self.dispatcher.has_pending_next_command()
        {
            return;
        }
        let retry = self
            .state
            .command_retry_override
            .map(Duration::from_millis)
            .unwrap_or_else(|| self.state.config.command_retry());
        if retry.is_zero() {
            return;
        }
        let Some(last) = self.state.last_command_sent else {
            return;
        };
        if last.elapsed() > retry {
            info!(
                retry_ms = retry.as_millis() as u64,
                "nothing sent within the retry window, sending next command"
            );
            self.dispatcher
                .send_next_command(&mut self.state, Duration::ZERO);
        }
    }

    // ---------------------------------------------------------------------
    // Lifecycle

    /// Start the script named `name` (case-insensitive).
    ///
    /// Returns false, leaving everything untouched, when no such script exists.
    pub fn run_script_by_name(&mut self, name: &str, options: ScriptOptions) -> bool {
        let Some(script) = self.find_script(name).cloned() else {
            warn!(script = name, "no script found matching name");
            return false;
        };

        self.kill_current_script();
        self.display(&format!(
            "Starting script: {name} ({})",
            script.script_friendly_name
        ));
        info!(script = %script.script_name, kind = %script.script_type, "starting script");

        let s = &mut self.state;
        s.current_move_next_when = Some(BUSY_SENTINEL.to_string());
        s.target = options.target.unwrap_or_default();
        s.weapon_item_name = options.weapon_item_name.unwrap_or_default();
        s.shield_item_name = options.shield_item_name.unwrap_or_default();
        s.should_kill = options.should_kill.unwrap_or(script.should_kill);
        s.should_kill_parse = script.should_kill_parse.unwrap_or_default();
        s.custom_kill_command = script.custom_kill_command.unwrap_or_default();
        s.custom_kill_command_parse = script.custom_kill_command_parse.unwrap_or_default();
        s.continue_on_walk_in = options
            .continue_on_walk_in
            .unwrap_or(script.continue_on_walk_in);
        s.add_attack = script.add_attack;
        s.stance = script.stance_command.unwrap_or_default();
        s.entangled_command = script.entangled_command.unwrap_or_default();
        s.current_script_type = Some(script.script_type);
        s.current_script_name = script.script_name;
        s.current_script_friendly_name = script.script_friendly_name;
        s.script_paused = false;
        s.command_list = script.command_list;

        self.dispatcher
            .send_next_command(&mut self.state, Duration::ZERO);
        true
    }

    /// Repeat `command` each time the character is no longer busy.
    ///
    /// While paused this keeps the current state, which is how a paused
    /// repeat is resumed.
    pub fn run_simple_repeat(&mut self, command: &str) {
        if !self.state.script_paused {
            self.kill_current_script();
        }
        self.state.run_repeat = true;
        self.state.repeat_command = command.to_string();
        self.state.last_command_ran = Some(command.to_string());
        self.dispatcher
            .send_after_delay(&self.state, Job::Send(command.to_string()), Duration::ZERO);
    }

    /// Send `command` every second regardless of server output.
    pub fn run_simple_repeat_with_delay(&mut self, command: &str) {
        self.kill_current_script();
        self.state.run_repeat_with_delay = true;
        self.state.repeat_with_delay_command = command.to_string();
        self.state.last_command_ran = Some(command.to_string());
        self.dispatcher.schedule(Job::RepeatTick, REPEAT_INTERVAL);
    }

    /// Start a no-longer-busy repeat from scratch and tell the user.
    pub fn start_simple_repeat(&mut self, command: &str) {
        self.state.script_paused = false;
        self.run_simple_repeat(command);
        self.display(&format!("Starting to repeat the command: {command}"));
    }

    /// Start a fixed-interval repeat from scratch and tell the user.
    pub fn start_repeat_with_delay(&mut self, command: &str) {
        self.state.script_paused = false;
        self.run_simple_repeat_with_delay(command);
        self.display(&format!("Starting to repeat the command: {command}"));
    }

    /// Stop whatever is running and reset the execution state.
    pub fn kill_current_script(&mut self) {
        if self.state.is_running_anything() {
            let running = self.state.running_description();
            self.display(&format!("Stopping script: {running}"));
            info!(running = %running, "stopping");
        }
        self.state.reset();
        self.dispatcher.cancel_all();
    }

    pub fn pause_current_script(&mut self) {
        self.state.script_paused = true;
        let running = self.state.running_description();
        self.display(&format!("Paused: {running}"));
    }

    pub fn resume_current_script(&mut self) {
        if self.state.run_repeat {
            let command = self.state.repeat_command.clone();
            self.run_simple_repeat(&command);
            self.state.script_paused = false;
        } else {
            self.state.script_paused = false;
            self.dispatcher
                .send_next_command(&mut self.state, Duration::ZERO);
        }
        let running = self.state.running_description();
        self.display(&format!("Resumed: {running}"));
    }
}
