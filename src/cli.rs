//! Command-line interface argument parsing
//!
//! Defines all CLI commands and their arguments using Clap.

use crate::config::{defaults, Config};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// HopCache CLI - typed access to a remote HopCache key-value cache
#[derive(Parser, Debug)]
#[command(name = "hopcache")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "A CLI tool for reading and writing a remote HopCache key-value cache")]
#[command(long_about = concat!(
    "HopCache (v", env!("CARGO_PKG_VERSION"), ")\n",
    "A CLI tool for reading and writing a remote HopCache key-value cache.\n\n",
    "Values are JSON maps; they are serialized and base64-wrapped for transport\n",
    "automatically. Point the tool at a service with --host or a config file."
))]
pub struct Cli {
    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// HopCache service URL
    #[arg(long, global = true, default_value = "http://localhost:3000")]
    pub host: String,

    /// Path to a config file (default: ~/.config/hopcache/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch the value stored under one or more keys
    ///
    /// Multiple keys are fetched concurrently.
    ///
    /// Examples:
    ///   hopcache get user:1
    ///   hopcache get user:1 user:2 --pretty
    #[command(display_order = 1)]
    Get {
        /// Keys to fetch
        #[arg(required = true)]
        keys: Vec<String>,

        /// Pretty-print the fetched values
        #[arg(long)]
        pretty: bool,
    },

    /// Store a JSON map under a key, creating or overwriting the entry
    ///
    /// Example:
    ///   hopcache set user:1 '{"name":"Ada","admin":true}'
    #[command(visible_alias = "put")]
    #[command(display_order = 2)]
    Set {
        /// Key to store under
        key: String,

        /// Value as a JSON map
        value: String,
    },

    /// Remove the entry under a key
    ///
    /// Deleting an absent key succeeds; delete is idempotent.
    ///
    /// Example:
    ///   hopcache delete user:1
    #[command(visible_alias = "del")]
    #[command(visible_alias = "rm")]
    #[command(display_order = 3)]
    Delete {
        /// Key to remove
        key: String,
    },

    /// Check whether a key has an entry
    ///
    /// Example:
    ///   hopcache exists user:1
    #[command(display_order = 4)]
    Exists {
        /// Key to check
        key: String,
    },

    /// List every key in the cache
    #[command(display_order = 5)]
    Keys,

    /// List every value in the cache
    #[command(display_order = 6)]
    Values,

    /// Show the number of entries in the cache
    #[command(visible_alias = "len")]
    #[command(display_order = 7)]
    Length,

    /// Flush every entry from the cache
    ///
    /// Asks for confirmation unless --yes is passed.
    #[command(visible_alias = "flush")]
    #[command(display_order = 8)]
    Clean {
        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Show the service's cache report
    #[command(display_order = 9)]
    Info,

    /// Check CLI version
    #[command(display_order = 10)]
    Version,
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        <Self as Parser>::parse()
    }

    /// Flag values as a config overlay, for merging over a config file
    pub fn overrides(&self) -> Config {
        Config {
            host: self.host.clone(),
            timeout_secs: defaults::default_timeout(),
            connect_timeout_secs: defaults::default_connect_timeout(),
            verbose: self.verbose,
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_get_accepts_multiple_keys() {
        let cli = Cli::parse_from(["hopcache", "get", "a", "b", "c"]);
        match cli.command {
            Commands::Get { keys, pretty } => {
                assert_eq!(keys, vec!["a", "b", "c"]);
                assert!(!pretty);
            }
            other => panic!("parsed {other:?}"),
        }
    }

    #[test]
    fn test_host_flag_feeds_overrides() {
        let cli = Cli::parse_from(["hopcache", "--host", "http://x:1", "keys"]);
        assert_eq!(cli.overrides().host, "http://x:1");
    }
}
