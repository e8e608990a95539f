//! Timer queue behind every scheduled command send.
//!
//! Nothing is spawned: jobs wait in the [`Dispatcher`] until the host asks for
//! the ones that are due, so a send always reflects the state at the moment
//! it fires rather than when it was scheduled.
//!
//! Scheduling discipline:
//! - the "next command" send is a single slot; scheduling a new one replaces
//!   the pending one,
//! - literal sends and delayed command sequences may overlap freely,
//! - [`Dispatcher::cancel_all`] drops everything (used on a full reset).

use crate::state::ExecutionState;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// Offset between the entries of a delayed command sequence.
pub const DELAYED_COMMAND_OFFSET: Duration = Duration::from_millis(1000);
/// Tick of the fixed-interval repeat.
pub const REPEAT_INTERVAL: Duration = Duration::from_millis(1000);

/// Work carried out when a timer fires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Job {
    /// Send the override or the current step, then wait for the busy sentinel.
    NextCommand,
    /// Send this text as is.
    Send(String),
    /// Send the override or the current step without touching the sequence.
    SendCurrent,
    /// Send an approach command; `engage` is followed by the current command.
    Approach { command: String, follow_up: bool },
    /// One beat of the fixed-interval repeat.
    RepeatTick,
}

#[derive(Debug)]
struct Timer {
    id: u64,
    due: Instant,
    job: Job,
}

#[derive(Debug, Default)]
pub struct Dispatcher {
    timers: Vec<Timer>,
    next_id: u64,
    next_command: Option<u64>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `job` to fire after `delay`.
    ///
    /// A [`Job::NextCommand`] replaces any pending one.
    pub fn schedule(&mut self, job: Job, delay: Duration) {
        let id = self.next_id;
        self.next_id += 1;

        if job == Job::NextCommand {
            if let Some(previous) = self.next_command.replace(id) {
                self.timers.retain(|t| t.id != previous);
            }
        }

        self.timers.push(Timer {
            id,
            due: Instant::now() + delay,
            job,
        });
    }

    /// Queue each command at `DELAYED_COMMAND_OFFSET * (position + 2)`.
    pub fn schedule_sequence(&mut self, commands: Vec<String>) {
        for (i, command) in commands.into_iter().enumerate() {
            self.schedule(Job::Send(command), DELAYED_COMMAND_OFFSET * (i as u32 + 2));
        }
    }

    /// Schedule the next step of the sequence after a randomized delay.
    ///
    /// Refused while a fixed-interval repeat owns the channel. A pending
    /// `delayBeforeNext` from the previous step replaces the random delay once.
    /// Returns whether anything was scheduled.
    pub fn send_next_command(&mut self, state: &mut ExecutionState, additional: Duration) -> bool {
        if state.run_repeat_with_delay {
            debug!("fixed-interval repeat is running, next command not scheduled");
            return false;
        }

        let delay = if state.delay_next_command_by > 0 {
            Duration::from_millis(std::mem::take(&mut state.delay_next_command_by))
        } else {
            state.config.command_delay(additional)
        };
        self.schedule(Job::NextCommand, delay);
        true
    }

    /// Schedule `job` after the standard randomized delay plus `additional`.
    pub fn send_after_delay(&mut self, state: &ExecutionState, job: Job, additional: Duration) {
        self.schedule(job, state.config.command_delay(additional));
    }

    /// Queue a short literal sequence at fixed offsets and drop the override.
    pub fn send_delayed_commands(&mut self, state: &mut ExecutionState, commands: Vec<String>) {
        if commands.is_empty() {
            return;
        }
        self.schedule_sequence(commands);
        state.clear_override();
    }

    /// Remove and return the earliest job that is due, if any.
    ///
    /// Jobs due at the same instant come out in scheduling order.
    pub fn pop_due(&mut self) -> Option<Job> {
        let now = Instant::now();
        let idx = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due <= now)
            .min_by_key(|(_, t)| (t.due, t.id))
            .map(|(i, _)| i)?;

        let timer = self.timers.swap_remove(idx);
        if self.next_command == Some(timer.id) {
            self.next_command = None;
        }
        Some(timer.job)
    }

    /// When the earliest pending job is due.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.iter().map(|t| t.due).min()
    }

    pub fn has_pending_next_command(&self) -> bool {
        self.next_command.is_some()
    }

    pub fn pending(&self) -> usize {
        self.timers.len()
    }

    pub fn cancel_all(&mut self) {
        self.timers.clear();
        self.next_command = None;
    }
}
