use anyhow::{Context, Result};
use portable_pty::{Child, CommandBuilder, MasterPty, PtySize};
use std::io::{Read, Write};

/// The game client program running inside a PTY.
pub struct PtySession {
    // Dropping the master closes the PTY under the child.
    _master: Box<dyn MasterPty + Send>,
    child: Box<dyn Child + Send + Sync>,
}

/// Both ends of the PTY the host talks through.
pub type PtyStreams = (Box<dyn Read + Send>, Box<dyn Write + Send>);

impl PtySession {
    /// Spawn `command` in a PTY, returning the session and its output/input streams.
    pub fn spawn(command: &str, args: &[String]) -> Result<(Self, PtyStreams)> {
        let pty_system = portable_pty::native_pty_system();

        let pty_size = PtySize {
            rows: 24,
            cols: 100,
            pixel_width: 0,
            pixel_height: 0,
        };

        let pair = pty_system
            .openpty(pty_size)
            .context("Failed to open PTY")?;

        let mut cmd = CommandBuilder::new(command);
        for arg in args {
            cmd.arg(arg);
        }
        if let Ok(cwd) = std::env::current_dir() {
            cmd.cwd(cwd);
        }

        let child = pair
            .slave
            .spawn_command(cmd)
            .with_context(|| format!("Failed to spawn {command}"))?;

        let writer = pair
            .master
            .take_writer()
            .context("Failed to get PTY writer")?;

        let reader = pair
            .master
            .try_clone_reader()
            .context("Failed to get PTY reader")?;

        let session = PtySession {
            _master: pair.master,
            child,
        };

        Ok((session, (reader, writer)))
    }

    /// Wait for the game client to exit.
    pub fn wait(&mut self) -> Result<()> {
        let status = self.child.wait().context("Failed to wait for child")?;
        tracing::info!(success = status.success(), "game client exited");
        Ok(())
    }
}
