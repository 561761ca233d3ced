// CLI module for gemrelay
// Author: kelexine (https://github.com/kelexine)

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// gemrelay - relay system/user prompts to Gemini with a server-held API key
#[derive(Parser, Debug)]
#[command(name = "gemrelay", version, about, long_about = None)]
pub struct Args {
    /// Path to a TOML config file (default: ~/.gemrelay/config.toml, optional)
    #[arg(long, short, global = true, env = "GEMRELAY_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Run the HTTP server (default)
    Serve {
        /// Override the bind host
        #[arg(long)]
        host: Option<String>,

        /// Override the bind port
        #[arg(long)]
        port: Option<u16>,
    },

    /// Read one handler event as JSON from stdin and print the response
    Invoke,

    /// Print the effective configuration as TOML
    Config,
}

impl Args {
    /// The subcommand to run, `serve` when none was given.
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Serve {
            host: None,
            port: None,
        })
    }
}
