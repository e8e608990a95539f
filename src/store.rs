//! Persistence for scripts and configuration.
//!
//! The engine only sees the [`ScriptStore`] and [`ConfigStore`] traits;
//! [`JsonFileStore`] is the implementation the CLI uses. A missing file is not
//! an error: it reads as an empty script list or the default configuration.

use crate::config::Config;
use crate::script::Script;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

#[async_trait(?Send)]
pub trait ScriptStore {
    async fn load_scripts(&self) -> Result<Vec<Script>>;
    async fn save_scripts(&self, scripts: &[Script]) -> Result<()>;
}

#[async_trait(?Send)]
pub trait ConfigStore {
    async fn load_config(&self) -> Result<Config>;
    async fn save_config(&self, config: &Config) -> Result<()>;
}

/// A pretty-printed JSON document on disk.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn exists(&self) -> bool {
        tokio::fs::try_exists(&self.path).await.unwrap_or(false)
    }

    async fn read<T: DeserializeOwned>(&self) -> Result<Option<T>> {
        let text = match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no file yet, using defaults");
                return Ok(None);
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to read {}", self.path.display()));
            }
        };
        if text.trim().is_empty() {
            return Ok(None);
        }
        let value = serde_json::from_str(&text)
            .with_context(|| format!("Malformed JSON in {}", self.path.display()))?;
        Ok(Some(value))
    }

    async fn write<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let mut text = serde_json::to_string_pretty(value)?;
        text.push('\n');
        tokio::fs::write(&self.path, text)
            .await
            .with_context(|| format!("Failed to write {}", self.path.display()))
    }
}

#[async_trait(?Send)]
impl ScriptStore for JsonFileStore {
    async fn load_scripts(&self) -> Result<Vec<Script>> {
        Ok(self.read().await?.unwrap_or_default())
    }

    async fn save_scripts(&self, scripts: &[Script]) -> Result<()> {
        self.write(scripts).await
    }
}

#[async_trait(?Send)]
impl ConfigStore for JsonFileStore {
    async fn load_config(&self) -> Result<Config> {
        Ok(self.read().await?.unwrap_or_default())
    }

    async fn save_config(&self, config: &Config) -> Result<()> {
        self.write(config).await
    }
}
