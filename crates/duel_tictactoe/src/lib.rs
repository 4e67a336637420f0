//! Tic-tac-toe grid and rules for the duel game server.
//!
//! This crate is pure data and pure functions: no I/O, no concurrency.
//! The session layer in `duel_server` owns a [`Grid`] per game and folds
//! each participant's move into it.
//!
//! # Example
//!
//! ```
//! use duel_tictactoe::{Grid, Mark, Position};
//!
//! let mut grid = Grid::new();
//! grid.place(Position::TopLeft, Mark::X).unwrap();
//! grid.place(Position::TopCenter, Mark::X).unwrap();
//! grid.place(Position::TopRight, Mark::X).unwrap();
//! assert!(grid.has_won());
//! assert!(grid.has_ended());
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod position;
mod types;

pub mod rules;

pub use position::Position;
pub use rules::{MoveViolation, placement_between};
pub use types::{Cell, Grid, Mark, PlaceError};
