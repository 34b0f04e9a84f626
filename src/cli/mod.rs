//! CLI subcommand definitions and handlers.
//!
//! Uses clap derive to define the subcommand hierarchy:
//! - `start` (default) -- start the poll server
//! - `config show|get|path` -- inspect configuration
//! - `version` -- print build/version info

use clap::{Parser, Subcommand};
use serde_json::Value;

use crate::config;
use crate::polls::{MAX_OPTIONS, MAX_OPTION_CHARS, MAX_QUESTION_CHARS, MIN_OPTIONS};

/// Poll server for chat apps.
#[derive(Parser, Debug)]
#[command(
    name = "chatpoll",
    version = env!("CARGO_PKG_VERSION"),
    about = "Poll authoring, voting and tallying server"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the poll server (default when no subcommand is given).
    Start {
        /// Port to listen on (overrides config).
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Inspect configuration.
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Print version, build date, and git commit information.
    Version,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the effective configuration as JSON.
    Show,

    /// Print a specific configuration value by dot-notation path.
    Get {
        /// Dot-notation key (e.g. "server.port").
        key: String,
    },

    /// Print the resolved configuration file path.
    Path,
}

// ---------------------------------------------------------------------------
// Subcommand handlers
// ---------------------------------------------------------------------------

/// Run the `config show` subcommand.
pub fn handle_config_show() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = config::load_config()?;
    println!("{}", serde_json::to_string_pretty(&cfg)?);
    Ok(())
}

/// Run the `config get <key>` subcommand.
pub fn handle_config_get(key: &str) -> Result<(), Box<dyn std::error::Error>> {
    let cfg = serde_json::to_value(config::load_config()?)?;
    let value = lookup_key(&cfg, key).ok_or_else(|| format!("No config key '{}'", key))?;
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Run the `config path` subcommand.
pub fn handle_config_path() {
    println!("{}", config::get_config_path().display());
}

/// Run the `version` subcommand.
pub fn handle_version() {
    print!("{}", version_report());
}

/// Build stamp plus the poll limits this binary enforces.
fn version_report() -> String {
    format!(
        "chatpoll {} ({}, built {})\n\
         poll limits: {}-{} options, question <= {} chars, option <= {} chars\n",
        env!("CARGO_PKG_VERSION"),
        env!("CHATPOLL_GIT_HASH"),
        env!("CHATPOLL_BUILD_DATE"),
        MIN_OPTIONS,
        MAX_OPTIONS,
        MAX_QUESTION_CHARS,
        MAX_OPTION_CHARS,
    )
}

/// Resolve a dotted config key such as `server.port` to a JSON pointer.
fn lookup_key<'a>(root: &'a Value, key: &str) -> Option<&'a Value> {
    if key.is_empty() {
        return None;
    }
    root.pointer(&format!("/{}", key.replace('.', "/")))
}
