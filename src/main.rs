use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tecscript::store::{ConfigStore, JsonFileStore, ScriptStore};
use tecscript::{Session, SessionOptions};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "tecscript",
    about = "Run combat and crafting scripts against a text game client",
    version
)]
struct Args {
    /// Path to the scripts JSON file (created if missing)
    #[arg(short, long, default_value = "scripts.json")]
    scripts: PathBuf,

    /// Path to the configuration JSON file (created if missing)
    #[arg(long, default_value = "config.json")]
    config: PathBuf,

    /// Auth hash reported by /authhash
    #[arg(long, env = "TECSCRIPT_AUTH_HASH")]
    auth_hash: Option<String>,

    /// Game client program to run in the PTY
    #[arg(short, long)]
    command: String,

    /// Arguments to pass to the game client
    #[arg(trailing_var_arg = true)]
    args: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "tecscript=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let script_store = JsonFileStore::new(&args.scripts);
    let scripts = script_store
        .load_scripts()
        .await
        .with_context(|| format!("Failed to load scripts: {}", args.scripts.display()))?;
    if !script_store.exists().await {
        script_store.save_scripts(&scripts).await?;
    }

    let config_store = JsonFileStore::new(&args.config);
    let config = config_store
        .load_config()
        .await
        .with_context(|| format!("Failed to load config: {}", args.config.display()))?;
    if !config_store.exists().await {
        config_store.save_config(&config).await?;
    }

    let options = SessionOptions {
        command: args.command,
        args: args.args,
        auth_hash: args.auth_hash,
    };
    let session = Session::spawn(&options, scripts, config, script_store)
        .context("Failed to start game session")?;

    session.run().await.context("Session failed")
}
