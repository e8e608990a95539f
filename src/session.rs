//! The interactive host: runs the game client in a PTY and drives a
//! [`Sequencer`] from its output.
//!
//! Game output is echoed to stdout untouched and split into lines for the
//! sequencer. User input lines starting with `/` go to the slash-command
//! interpreter; everything else is sent to the game.

use crate::client::GameClient;
use crate::command::Outcome;
use crate::config::Config;
use crate::parser::{interpret, is_slash_command};
use crate::pty::PtySession;
use crate::pty_reader::{LineBuffer, spawn_reader};
use crate::script::Script;
use crate::sequencer::Sequencer;
use crate::store::{JsonFileStore, ScriptStore};
use anyhow::{Context, Result, bail};
use std::io::{self, Write};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Prefix of engine messages in the terminal, so they stand out from game text.
const MESSAGE_PREFIX: &str = "[tecscript]";

/// What to run and how to present it.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub command: String,
    pub args: Vec<String>,
    pub auth_hash: Option<String>,
}

/// [`GameClient`] writing commands into the PTY and messages to stdout.
struct PtyClient {
    writer: Box<dyn Write + Send>,
    messages: Box<dyn Write + Send>,
    auth_hash: Option<String>,
}

impl GameClient for PtyClient {
    fn send(&mut self, command: &str) -> Result<()> {
        self.writer.write_all(command.as_bytes())?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }

    fn display(&mut self, message: &str) {
        if let Err(e) = write_message(&mut self.messages, message) {
            debug!(message, error = %e, "failed to display message");
        }
    }

    fn auth_hash(&self) -> Option<String> {
        self.auth_hash.clone()
    }
}

pub struct Session {
    sequencer: Sequencer,
    pty: PtySession,
    output_rx: UnboundedReceiver<Vec<u8>>,
    scripts: JsonFileStore,
}

impl Session {
    /// Spawn the game client and wire it to a fresh sequencer.
    pub fn spawn(
        options: &SessionOptions,
        scripts: Vec<Script>,
        config: Config,
        store: JsonFileStore,
    ) -> Result<Self> {
        let (pty, (reader, writer)) = PtySession::spawn(&options.command, &options.args)?;
        let output_rx = spawn_reader(reader);
        let client = PtyClient {
            writer,
            messages: Box::new(io::stdout()),
            auth_hash: options.auth_hash.clone(),
        };
        info!(command = %options.command, scripts = scripts.len(), "session started");

        Ok(Session {
            sequencer: Sequencer::new(client, scripts, config),
            pty,
            output_rx,
            scripts: store,
        })
    }

    /// Run until the game client exits.
    pub async fn run(mut self) -> Result<()> {
        let mut input = BufReader::new(tokio::io::stdin()).lines();
        let mut input_open = true;
        let mut lines = LineBuffer::default();

        let mut watchdog = tokio::time::interval(self.sequencer.watchdog_interval());
        watchdog.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            let deadline = self.sequencer.next_deadline();
            tokio::select! {
                chunk = self.output_rx.recv() => {
                    let Some(chunk) = chunk else { break };
                    echo(&chunk)?;
                    for line in lines.push(&chunk) {
                        self.sequencer.handle_line(&line);
                    }
                }
                line = input.next_line(), if input_open => {
                    match line.context("Failed to read user input")? {
                        Some(line) => self.handle_input(&line).await,
                        None => {
                            debug!("stdin closed");
                            input_open = false;
                        }
                    }
                }
                _ = wait_until(deadline) => self.sequencer.fire_due(),
                _ = watchdog.tick() => self.sequencer.watchdog(),
            }
        }

        self.sequencer.kill_current_script();
        self.pty.wait()
    }

    async fn handle_input(&mut self, line: &str) {
        if !is_slash_command(line) {
            self.sequencer.send_command(line);
            return;
        }
        if interpret(line, &mut self.sequencer) == Outcome::OpenEditor {
            if let Err(e) = self.edit_scripts().await {
                warn!(error = %e, "script editing failed");
                self.sequencer.display(&format!("{e:#}"));
            }
        }
    }

    /// Open the scripts file in `$VISUAL`/`$EDITOR` and reload it afterwards.
    async fn edit_scripts(&mut self) -> Result<()> {
        let editor = std::env::var("VISUAL")
            .or_else(|_| std::env::var("EDITOR"))
            .unwrap_or_else(|_| "vi".to_string());
        let path = self.scripts.path().to_path_buf();
        if !self.scripts.exists().await {
            self.scripts.save_scripts(self.sequencer.scripts()).await?;
        }

        let status = tokio::process::Command::new(&editor)
            .arg(&path)
            .status()
            .await
            .with_context(|| format!("Failed to launch editor {editor}"))?;
        if !status.success() {
            bail!("Editor {editor} exited with {status}");
        }

        let scripts = self.scripts.load_scripts().await?;
        info!(count = scripts.len(), path = %path.display(), "scripts reloaded");
        self.sequencer
            .display(&format!("Loaded {} scripts.", scripts.len()));
        self.sequencer.set_scripts(scripts);
        Ok(())
    }
}

fn write_message(out: &mut dyn Write, message: &str) -> io::Result<()> {
    for line in message.lines() {
        write!(out, "\r\n{MESSAGE_PREFIX} {line}")?;
    }
    write!(out, "\r\n")?;
    out.flush()
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

fn echo(data: &[u8]) -> Result<()> {
    let mut stdout = io::stdout();
    stdout.write_all(data)?;
    stdout.flush()?;
    Ok(())
}
