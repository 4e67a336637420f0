//! Command-line interface for duel.

use clap::{Args, Parser, Subcommand};
use duel_server::{ConfigError, DEFAULT_PORT, ServerConfig};
use std::path::PathBuf;

/// Duel - two-player tic-tac-toe over TCP
#[derive(Parser, Debug)]
#[command(name = "duel")]
#[command(about = "Referee server and terminal client for networked tic-tac-toe", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the referee server
    Server(ServerArgs),

    /// Join a game from the terminal
    Client {
        /// Server host
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Server port
        #[arg(short, long, default_value_t = DEFAULT_PORT)]
        port: u16,

        /// Display name (prompted for when omitted)
        #[arg(short, long)]
        name: Option<String>,
    },
}

/// Server options. Flags override values from `--config`.
#[derive(Args, Debug)]
pub struct ServerArgs {
    /// TOML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Port to bind to
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Host to bind to
    #[arg(long)]
    pub host: Option<String>,

    /// Sessions allowed to run at once
    #[arg(long)]
    pub max_sessions: Option<usize>,

    /// Pause after the match-found notice, in milliseconds
    #[arg(long)]
    pub start_delay_ms: Option<u64>,

    /// Reject returned grids that are not one legal move
    #[arg(long)]
    pub validate_moves: bool,

    /// Drop connections that do not send a name in time
    #[arg(long)]
    pub handshake_timeout_secs: Option<u64>,
}

impl ServerArgs {
    /// Resolves the final config: file (or defaults), then flags.
    pub fn into_config(self) -> Result<ServerConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => ServerConfig::from_file(path)?,
            None => ServerConfig::default(),
        };

        if let Some(port) = self.port {
            config = config.with_port(port);
        }
        if let Some(host) = self.host {
            config = config.with_host(host);
        }
        if let Some(max_sessions) = self.max_sessions {
            config = config.with_max_sessions(max_sessions);
        }
        if let Some(delay) = self.start_delay_ms {
            config = config.with_start_delay_ms(delay);
        }
        if self.validate_moves {
            config = config.with_validate_moves(true);
        }
        if self.handshake_timeout_secs.is_some() {
            config = config.with_handshake_timeout_secs(self.handshake_timeout_secs);
        }

        config.validate()?;
        Ok(config)
    }
}
