//! The [`GameClient`] seam: where commands go out and user messages are shown.

use anyhow::Result;
use std::sync::{Arc, Mutex};

/// Outbound side of a game session.
///
/// `send` is fire-and-forget: there is no acknowledgment, and the sequencer
/// only logs a failed send. `display` is informational feedback for the user
/// and never reaches the game.
pub trait GameClient {
    /// Send one command line to the game.
    fn send(&mut self, command: &str) -> Result<()>;

    /// Show a message to the user.
    fn display(&mut self, message: &str);

    /// The account's auth hash, when the session knows it.
    fn auth_hash(&self) -> Option<String> {
        None
    }
}

/// Everything a [`MemoryClient`] has seen.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Transcript {
    pub sent: Vec<String>,
    pub displayed: Vec<String>,
}

/// A [`GameClient`] that records into a shared [`Transcript`].
///
/// Clone the handle from [`MemoryClient::transcript`] before handing the
/// client to a sequencer to inspect what it did.
#[derive(Debug, Default, Clone)]
pub struct MemoryClient {
    transcript: Arc<Mutex<Transcript>>,
    auth_hash: Option<String>,
}

impl MemoryClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_auth_hash(hash: impl Into<String>) -> Self {
        Self {
            auth_hash: Some(hash.into()),
            ..Self::default()
        }
    }

    pub fn transcript(&self) -> Arc<Mutex<Transcript>> {
        self.transcript.clone()
    }
}

impl GameClient for MemoryClient {
    fn send(&mut self, command: &str) -> Result<()> {
        self.transcript
            .lock()
            .map_err(|_| anyhow::anyhow!("transcript lock poisoned"))?
            .sent
            .push(command.to_string());
        Ok(())
    }

    fn display(&mut self, message: &str) {
        if let Ok(mut t) = self.transcript.lock() {
            t.displayed.push(message.to_string());
        }
    }

    fn auth_hash(&self) -> Option<String> {
        self.auth_hash.clone()
    }
}
