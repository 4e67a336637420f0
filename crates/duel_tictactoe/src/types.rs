//! Core domain types for the 3x3 grid.

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::position::Position;
use crate::rules::{draw, win};

/// One of the two distinct marks a participant plays with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
pub enum Mark {
    /// Assigned to the first participant of a pair (moves first).
    X,
    /// Assigned to the second participant of a pair.
    O,
}

impl Mark {
    /// Returns the opposing mark.
    pub fn opponent(self) -> Self {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }
}

/// A single cell of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    /// No mark yet.
    Empty,
    /// Holds a participant's mark.
    Occupied(Mark),
}

impl Cell {
    /// Returns the mark in this cell, if any.
    pub fn mark(self) -> Option<Mark> {
        match self {
            Cell::Empty => None,
            Cell::Occupied(mark) => Some(mark),
        }
    }
}

/// Error returned when a mark cannot be placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum PlaceError {
    /// The target cell already holds a mark.
    #[display("Cell {} is already occupied", _0)]
    Occupied(Position),
}

impl std::error::Error for PlaceError {}

/// 3x3 tic-tac-toe grid.
///
/// `filled` always equals the number of occupied cells: the only mutation is
/// [`Grid::place`] into an empty cell, and deserialization recounts the cells.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "GridWire", from = "GridWire")]
pub struct Grid {
    /// Cells in row-major order (0-8).
    cells: [Cell; 9],
    /// Number of occupied cells (0-9).
    filled: u8,
}

impl Grid {
    /// Creates a new empty grid.
    pub fn new() -> Self {
        Self {
            cells: [Cell::Empty; 9],
            filled: 0,
        }
    }

    /// Gets the cell at the given position.
    pub fn get(&self, pos: Position) -> Cell {
        self.cells[pos.to_index()]
    }

    /// Checks if the cell at `pos` holds no mark.
    pub fn is_empty(&self, pos: Position) -> bool {
        self.get(pos) == Cell::Empty
    }

    /// Places `mark` at `pos`.
    ///
    /// # Errors
    ///
    /// Returns [`PlaceError::Occupied`] without touching the grid when the
    /// cell already holds a mark.
    #[instrument(skip(self), fields(filled = self.filled))]
    pub fn place(&mut self, pos: Position, mark: Mark) -> Result<(), PlaceError> {
        if !self.is_empty(pos) {
            return Err(PlaceError::Occupied(pos));
        }
        self.cells[pos.to_index()] = Cell::Occupied(mark);
        self.filled += 1;
        Ok(())
    }

    /// Number of occupied cells.
    pub fn filled_count(&self) -> u8 {
        self.filled
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> &[Cell; 9] {
        &self.cells
    }

    /// True once all nine cells are occupied.
    pub fn is_full(&self) -> bool {
        draw::is_full(self)
    }

    /// True iff some row, column or diagonal holds three identical marks.
    pub fn has_won(&self) -> bool {
        win::check_winner(self).is_some()
    }

    /// The mark owning a complete line, if any.
    pub fn winner(&self) -> Option<Mark> {
        win::check_winner(self)
    }

    /// True when the game on this grid is over (won or full).
    ///
    /// A final move that both completes a line and fills the grid is a win;
    /// call [`Grid::has_won`] after this to tell the outcomes apart.
    pub fn has_ended(&self) -> bool {
        self.has_won() || self.is_full()
    }

    /// Formats the grid as a human-readable string.
    ///
    /// Empty cells show their 1-based keypad number.
    pub fn render(&self) -> String {
        let mut result = String::new();
        for row in 0..3 {
            for col in 0..3 {
                let pos = row * 3 + col;
                let symbol = match self.cells[pos] {
                    Cell::Empty => (pos + 1).to_string(),
                    Cell::Occupied(mark) => mark.to_string(),
                };
                result.push_str(&symbol);
                if col < 2 {
                    result.push('|');
                }
            }
            if row < 2 {
                result.push_str("\n-+-+-\n");
            }
        }
        result
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

/// Wire form of a grid: rows of optional marks.
#[derive(Serialize, Deserialize)]
#[serde(transparent)]
struct GridWire([[Option<Mark>; 3]; 3]);

impl From<Grid> for GridWire {
    fn from(grid: Grid) -> Self {
        let mut rows = [[None; 3]; 3];
        for pos in Position::ALL {
            rows[pos.row()][pos.col()] = grid.get(pos).mark();
        }
        GridWire(rows)
    }
}

impl From<GridWire> for Grid {
    fn from(wire: GridWire) -> Self {
        let mut grid = Grid::new();
        for pos in Position::ALL {
            if let Some(mark) = wire.0[pos.row()][pos.col()] {
                grid.cells[pos.to_index()] = Cell::Occupied(mark);
                grid.filled += 1;
            }
        }
        grid
    }
}
