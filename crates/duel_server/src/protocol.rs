//! Newline-delimited JSON frames exchanged after the name line.
//!
//! Each frame is one JSON object on its own line, tagged by `"kind"`:
//!
//! ```text
//! {"kind":"notice","text":"Opponent found. A new game has started!"}
//! {"kind":"seat","mark":"X"}
//! {"kind":"snapshot","grid":[[null,null,null],[null,"X",null],[null,null,null]],"active_name":"ada","active_mark":"O"}
//! ```

use crate::WireError;
use duel_tictactoe::{Grid, Mark};
use serde::{Deserialize, Serialize};

/// Sent to both participants once they are paired.
pub const MATCH_FOUND: &str = "Opponent found. A new game has started!";

/// Sent to both participants when either connection fails.
pub const OPPONENT_DISCONNECTED: &str = "Your opponent disconnected. Game over.";

/// Authoritative view of a session at the start of a turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_new::new)]
pub struct Snapshot {
    /// Grid as the referee currently holds it.
    pub grid: Grid,
    /// Name of the participant whose turn it is.
    pub active_name: String,
    /// Mark of the participant whose turn it is.
    pub active_mark: Mark,
}

/// One message on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Frame {
    /// Human-readable text.
    Notice {
        /// Text to display.
        text: String,
    },
    /// Tells a participant which mark it plays.
    Seat {
        /// The receiving participant's mark.
        mark: Mark,
    },
    /// Full session view.
    Snapshot(Snapshot),
}

impl Frame {
    /// Builds a notice frame.
    pub fn notice(text: impl Into<String>) -> Self {
        Frame::Notice { text: text.into() }
    }

    /// Kind tag, for logs and error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Frame::Notice { .. } => "notice",
            Frame::Seat { .. } => "seat",
            Frame::Snapshot(_) => "snapshot",
        }
    }

    /// Serializes the frame as one line, newline included.
    pub fn encode(&self) -> Result<String, WireError> {
        let mut line = serde_json::to_string(self)?;
        line.push('\n');
        Ok(line)
    }

    /// Parses one line (trailing newline allowed).
    pub fn decode(line: &str) -> Result<Self, WireError> {
        Ok(serde_json::from_str(line.trim_end())?)
    }

    /// Unwraps a snapshot frame.
    pub fn into_snapshot(self) -> Result<Snapshot, WireError> {
        match self {
            Frame::Snapshot(snapshot) => Ok(snapshot),
            other => Err(WireError::Unexpected {
                expected: "snapshot",
                got: other.kind(),
            }),
        }
    }
}
