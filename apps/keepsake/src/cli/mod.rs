//! # Keepsake CLI Module
//!
//! This module implements the CLI interface for the settings inspector.
//!
//! ## Available Commands
//!
//! - `keys` - List persisted keys, optionally filtered by prefix
//! - `get` - Read one entry
//! - `set` - Write one entry
//! - `remove` - Delete one entry

mod commands;

use clap::{Parser, Subcommand};
use keepsake_core::KeepsakeError;
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Keepsake - Settings Inspector
///
/// Examine and edit a persisted settings database outside a running
/// application. Keys are the `/`-joined scoped paths the cascade engine
/// writes (e.g. `mainWindow/fontSize`).
#[derive(Parser, Debug)]
#[command(name = "keepsake")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to the settings database
    #[arg(short = 'D', long, global = true, default_value = "keepsake.db")]
    pub database: PathBuf,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List persisted keys
    Keys {
        /// Only list keys starting with this prefix
        #[arg(short, long)]
        prefix: Option<String>,
    },

    /// Read the entry under a key
    Get {
        /// Full key, e.g. mainWindow/fontSize
        key: String,
    },

    /// Write an entry
    Set {
        /// Full key, e.g. mainWindow/fontSize
        key: String,

        /// Value to store, parsed according to --kind
        value: String,

        /// Value kind (bool, int, real, text)
        #[arg(short, long, default_value = "text")]
        kind: String,
    },

    /// Delete the entry under a key
    Remove {
        /// Full key, e.g. mainWindow/_geometry
        key: String,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub fn execute(cli: Cli) -> Result<(), KeepsakeError> {
    let json = cli.json;

    match cli.command {
        Some(Commands::Keys { prefix }) => cmd_keys(&cli.database, json, prefix.as_deref()),
        Some(Commands::Get { key }) => cmd_get(&cli.database, json, &key),
        Some(Commands::Set { key, value, kind }) => {
            cmd_set(&cli.database, json, &key, &value, &kind)
        }
        Some(Commands::Remove { key }) => cmd_remove(&cli.database, json, &key),
        None => {
            // No subcommand - list all keys by default
            cmd_keys(&cli.database, json, None)
        }
    }
}
