//! Game rules for tic-tac-toe.
//!
//! This module contains pure functions for evaluating a grid according to
//! tic-tac-toe rules. Rules are separated from grid storage so the session
//! layer can reason about outcomes and moves without mutating anything.

pub mod draw;
pub mod placement;
pub mod win;

pub use draw::{is_draw, is_full};
pub use placement::{MoveViolation, placement_between};
pub use win::{LINES, check_winner};
