//! # Tecscript
//!
//! A script engine that automates repetitive command sequences in a
//! text-based multiplayer game.
//!
//! A [`Script`] is an ordered list of commands, each paired with the server
//! text that confirms it ran and the text that says the next one may go out.
//! The [`Sequencer`] watches every incoming line, moves through the list,
//! recovers from the game's interruptions (knockdowns, fumbles, range and
//! stance problems, entanglement), optionally finishes off the target, and
//! paces everything with randomized delays and a stall watchdog.
//!
//! ## Quick start
//!
//! ```no_run
//! use tecscript::{Config, MemoryClient, Script, Sequencer, ScriptOptions};
//!
//! # fn main() -> anyhow::Result<()> {
//! let scripts: Vec<Script> = serde_json::from_str(r#"[{
//!     "scriptName": "chop",
//!     "scriptType": "combat",
//!     "commandList": [
//!         {"command": "chop",
//!          "parse": {"outcome": "You raise your", "moveNextWhen": "You are no longer busy."}}
//!     ]
//! }]"#)?;
//!
//! let client = MemoryClient::new();
//! let mut seq = Sequencer::new(client, scripts, Config::default());
//! seq.run_script_by_name("chop", ScriptOptions {
//!     target: Some("rat".into()),
//!     ..Default::default()
//! });
//! seq.handle_line("You raise your axe over your head.");
//! # Ok(())
//! # }
//! ```
//!
//! The sequencer never sleeps or spawns: a host feeds it lines, calls
//! [`Sequencer::fire_due`] once [`Sequencer::next_deadline`] passes, and
//! [`Sequencer::watchdog`] on an interval. [`Session`] is the host the
//! `tecscript` binary uses; it runs the game client in a PTY.
//!
//! ## Slash commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `/start name [target] [weapon] [shield] [shouldKill] [continueOnWalkIn]` | Run a script |
//! | `/stop` | Stop the running script or repeat |
//! | `/repeat <command>` | Send a command every second |
//! | `/repeatnlb <command>` | Send a command whenever you are no longer busy |
//! | `/pause`, `/resume` | Pause and resume |
//! | `/scripts`, `/current` | List scripts, show the running one |
//! | `/editscripts` | Edit the scripts file |
//! | `/authhash` | Show the session's auth hash |
//! | `/help` | Usage |
//!
//! ## Implementing a custom slash command
//!
//! Built-in commands implement [`SlashCommand`] and are listed in the
//! `REGISTRY` in `src/parser.rs`, which is private to this crate. Code using
//! the library parses and runs its own commands directly:
//!
//! ```no_run
//! use tecscript::command::{Outcome, SlashCommand, SlashLine};
//! use tecscript::Sequencer;
//! use anyhow::Result;
//!
//! pub struct Flee;
//!
//! impl Flee {
//!     pub const NAME: &'static str = "flee";
//! }
//!
//! impl SlashCommand for Flee {
//!     fn name(&self) -> &'static str { Self::NAME }
//!
//!     fn parse(_line: &SlashLine) -> Result<Self> {
//!         Ok(Self)
//!     }
//!
//!     fn execute(&self, seq: &mut Sequencer) -> Outcome {
//!         seq.kill_current_script();
//!         seq.send_command("retreat");
//!         Outcome::Done
//!     }
//! }
//!
//! # fn run(seq: &mut Sequencer) -> Result<()> {
//! let line = SlashLine { raw: "/flee".into(), params: vec!["/flee".into()] };
//! if tecscript::is_slash_command(&line.raw) {
//!     Flee::parse(&line)?.execute(seq);
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod command;
pub mod commands;
pub mod config;
pub mod dispatch;
pub mod format;
pub mod matcher;
pub mod parser;
pub mod reactions;
pub mod script;
pub mod sequencer;
pub mod session;
pub mod state;
pub mod store;
pub(crate) mod pty;
pub(crate) mod pty_reader;

pub use client::{GameClient, MemoryClient, Transcript};
pub use command::{Outcome, SlashCommand};
pub use config::Config;
pub use parser::{interpret, is_slash_command};
pub use script::{CommandStep, ParseRule, Script, ScriptType};
pub use sequencer::{ScriptOptions, Sequencer};
pub use session::{Session, SessionOptions};
pub use state::ExecutionState;
