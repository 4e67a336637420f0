//! Win detection logic for tic-tac-toe.

use crate::{Cell, Grid, Mark, Position};
use tracing::instrument;

/// Every line that wins: three rows, three columns, two diagonals.
pub const LINES: [[Position; 3]; 8] = [
    // Rows
    [Position::TopLeft, Position::TopCenter, Position::TopRight],
    [Position::MiddleLeft, Position::Center, Position::MiddleRight],
    [Position::BottomLeft, Position::BottomCenter, Position::BottomRight],
    // Columns
    [Position::TopLeft, Position::MiddleLeft, Position::BottomLeft],
    [Position::TopCenter, Position::Center, Position::BottomCenter],
    [Position::TopRight, Position::MiddleRight, Position::BottomRight],
    // Diagonals
    [Position::TopLeft, Position::Center, Position::BottomRight],
    [Position::TopRight, Position::Center, Position::BottomLeft],
];

/// Checks if there is a winner on the grid.
///
/// Returns `Some(mark)` if some line holds three of that mark,
/// `None` otherwise. When several lines are complete the first in
/// [`LINES`] order is reported; callers only need existence.
#[instrument(level = "trace", skip(grid))]
pub fn check_winner(grid: &Grid) -> Option<Mark> {
    for [a, b, c] in LINES {
        let cell = grid.get(a);
        if cell != Cell::Empty && cell == grid.get(b) && cell == grid.get(c) {
            return cell.mark();
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_with(marks: &[(Position, Mark)]) -> Grid {
        let mut grid = Grid::new();
        for (pos, mark) in marks {
            grid.place(*pos, *mark).unwrap();
        }
        grid
    }

    #[test]
    fn test_no_winner_empty_grid() {
        assert_eq!(check_winner(&Grid::new()), None);
    }

    #[test]
    fn test_winner_top_row() {
        let grid = grid_with(&[
            (Position::TopLeft, Mark::X),
            (Position::TopCenter, Mark::X),
            (Position::TopRight, Mark::X),
        ]);
        assert_eq!(check_winner(&grid), Some(Mark::X));
    }

    #[test]
    fn test_winner_column() {
        let grid = grid_with(&[
            (Position::TopCenter, Mark::O),
            (Position::Center, Mark::O),
            (Position::BottomCenter, Mark::O),
        ]);
        assert_eq!(check_winner(&grid), Some(Mark::O));
    }

    #[test]
    fn test_winner_anti_diagonal() {
        let grid = grid_with(&[
            (Position::TopRight, Mark::O),
            (Position::Center, Mark::O),
            (Position::BottomLeft, Mark::O),
        ]);
        assert_eq!(check_winner(&grid), Some(Mark::O));
    }

    #[test]
    fn test_mixed_line_is_not_a_win() {
        let grid = grid_with(&[
            (Position::TopLeft, Mark::X),
            (Position::TopCenter, Mark::O),
            (Position::TopRight, Mark::X),
        ]);
        assert_eq!(check_winner(&grid), None);
    }
}
