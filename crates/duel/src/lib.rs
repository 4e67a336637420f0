//! Duel - networked two-player tic-tac-toe.
//!
//! The referee lives in `duel_server`; this crate holds the client side and
//! the `duel` binary that runs either role.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod client;
