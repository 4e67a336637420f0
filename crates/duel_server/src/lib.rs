//! Networked referee for two-player tic-tac-toe.
//!
//! Connections are paired in arrival order: the first of each pair plays X
//! and moves first, the second plays O. Each pair becomes a session run by a
//! [`Coordinator`], which owns the authoritative grid and exchanges
//! [`Snapshot`]s with both participants until the game ends or a connection
//! fails. At most `max_sessions` sessions run at once; later pairs queue in
//! a [`SessionPool`].
//!
//! ```no_run
//! use duel_server::{Server, ServerConfig};
//!
//! # async fn serve() -> Result<(), duel_server::ServerError> {
//! let server = Server::bind(ServerConfig::default()).await?;
//! server.run().await;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod acceptor;
mod config;
mod connection;
mod error;
mod pool;
pub mod protocol;
mod session;
mod state;

pub use acceptor::Server;
pub use config::{ConfigError, DEFAULT_MAX_SESSIONS, DEFAULT_PORT, ServerConfig};
pub use connection::{Connection, Participant};
pub use error::{ServerError, SessionError, WireError};
pub use pool::SessionPool;
pub use protocol::{Frame, Snapshot};
pub use session::{Coordinator, SessionOutcome, SessionSettings};
pub use state::{Seat, SessionState};
