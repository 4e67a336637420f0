//! Error types for the wire and the session layer.

use derive_more::{Display, Error, From};
use duel_tictactoe::MoveViolation;

/// Failure on one participant's connection.
///
/// Every variant ends the session: the referee never retries a read.
#[derive(Debug, Display, Error, From)]
pub enum WireError {
    /// The peer closed its side of the stream.
    #[display("Connection closed by peer")]
    Closed,

    /// Socket read or write failed.
    #[display("I/O error: {}", _0)]
    #[from]
    Io(std::io::Error),

    /// The name line was blank.
    #[display("Participant sent an empty name")]
    EmptyName,

    /// A line was not a valid frame.
    #[display("Malformed frame: {}", _0)]
    #[from]
    Malformed(serde_json::Error),

    /// A valid frame arrived where another kind was required.
    #[display("Expected {} frame, got {}", expected, got)]
    Unexpected {
        /// Frame kind the reader was waiting for.
        expected: &'static str,
        /// Frame kind that arrived.
        got: &'static str,
    },
}

/// Reason a session stopped before reaching a terminal grid.
#[derive(Debug, Display, Error)]
pub enum SessionError {
    /// A participant's connection failed.
    #[display("{} transport failure: {}", participant, source)]
    Transport {
        /// Name of the participant whose connection failed.
        participant: String,
        /// Underlying wire failure.
        source: WireError,
    },

    /// A participant returned a grid that is not one legal move.
    #[display("{} made an illegal move: {}", participant, source)]
    IllegalMove {
        /// Name of the offending participant.
        participant: String,
        /// What was wrong with the returned grid.
        source: MoveViolation,
    },
}

impl SessionError {
    /// Wraps a wire failure with the participant it happened on.
    pub fn transport(participant: impl Into<String>, source: WireError) -> Self {
        Self::Transport {
            participant: participant.into(),
            source,
        }
    }

    /// Wraps a move violation with the participant who made it.
    pub fn illegal_move(participant: impl Into<String>, source: MoveViolation) -> Self {
        Self::IllegalMove {
            participant: participant.into(),
            source,
        }
    }
}

/// Failure to start the server.
#[derive(Debug, Display, Error, From)]
pub enum ServerError {
    /// Invalid configuration.
    #[display("{}", _0)]
    #[from]
    Config(crate::ConfigError),

    /// The listener could not be bound.
    #[display("Failed to bind listener: {}", _0)]
    #[from]
    Bind(std::io::Error),
}
