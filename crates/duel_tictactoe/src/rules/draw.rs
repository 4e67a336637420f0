//! Draw detection logic for tic-tac-toe.

use super::win::check_winner;
use crate::Grid;

/// Checks if the grid is full (all nine cells occupied).
pub fn is_full(grid: &Grid) -> bool {
    grid.filled_count() == 9
}

/// A full grid with no winner.
pub fn is_draw(grid: &Grid) -> bool {
    is_full(grid) && check_winner(grid).is_none()
}
