//! Server configuration.

use derive_getters::Getters;
use derive_more::{Display, Error};
use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Default listening port.
pub const DEFAULT_PORT: u16 = 9898;

/// Default number of sessions that may run at once.
pub const DEFAULT_MAX_SESSIONS: usize = 5;

/// Configuration for the dispatcher and the sessions it starts.
///
/// Every field has a default, so a TOML file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Setters, Serialize, Deserialize)]
#[setters(prefix = "with_")]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind.
    host: String,

    /// Port to bind (0 picks an ephemeral port).
    port: u16,

    /// Capacity of the session pool.
    max_sessions: usize,

    /// Pause after the match-found notice, so clients can show it.
    start_delay_ms: u64,

    /// Reject returned grids that are not one legal placement by the mover.
    validate_moves: bool,

    /// Upper bound on waiting for a new connection's name line.
    handshake_timeout_secs: Option<u64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            max_sessions: DEFAULT_MAX_SESSIONS,
            start_delay_ms: 2500,
            validate_moves: false,
            handshake_timeout_secs: None,
        }
    }
}

impl ServerConfig {
    /// Loads configuration from TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        info!(port = config.port, max_sessions = config.max_sessions, "Config loaded successfully");
        Ok(config)
    }

    /// Checks values that deserialize fine but cannot run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_sessions == 0 {
            return Err(ConfigError::new("max_sessions must be at least 1".to_string()));
        }
        if self.host.trim().is_empty() {
            return Err(ConfigError::new("host must not be empty".to_string()));
        }
        Ok(())
    }

    /// Start delay as a [`Duration`].
    pub fn start_delay(&self) -> Duration {
        Duration::from_millis(self.start_delay_ms)
    }

    /// Handshake timeout as a [`Duration`], if bounded.
    pub fn handshake_timeout(&self) -> Option<Duration> {
        self.handshake_timeout_secs.map(Duration::from_secs)
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(*config.port(), 9898);
        assert_eq!(*config.max_sessions(), 5);
        assert!(!config.validate_moves());
        assert_eq!(config.handshake_timeout(), None);
    }

    #[test]
    fn test_from_file_partial_keys() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "port = 4000\nmax_sessions = 2\nvalidate_moves = true").unwrap();

        let config = ServerConfig::from_file(file.path()).unwrap();
        assert_eq!(*config.port(), 4000);
        assert_eq!(*config.max_sessions(), 2);
        assert!(*config.validate_moves());
        assert_eq!(config.host(), "127.0.0.1");
        assert_eq!(config.start_delay(), Duration::from_millis(2500));
    }

    #[test]
    fn test_zero_sessions_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "max_sessions = 0").unwrap();

        let err = ServerConfig::from_file(file.path()).unwrap_err();
        assert!(err.message.contains("max_sessions"));
    }

    #[test]
    fn test_setters_override() {
        let config = ServerConfig::default()
            .with_port(0)
            .with_start_delay_ms(0)
            .with_handshake_timeout_secs(Some(3));
        assert_eq!(*config.port(), 0);
        assert_eq!(config.handshake_timeout(), Some(Duration::from_secs(3)));
    }
}
