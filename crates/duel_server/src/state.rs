//! Referee-side state of one session.

use crate::{Participant, Snapshot};
use duel_tictactoe::Grid;
use tracing::instrument;

/// Index into a session's pair of participants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum Seat {
    /// Paired first; plays X.
    First,
    /// Paired second; plays O.
    Second,
}

impl Seat {
    /// The other seat.
    pub fn other(self) -> Self {
        match self {
            Seat::First => Seat::Second,
            Seat::Second => Seat::First,
        }
    }

    /// Array index of this seat.
    pub fn index(self) -> usize {
        match self {
            Seat::First => 0,
            Seat::Second => 1,
        }
    }
}

/// Grid plus whose turn it is.
///
/// Roles start reversed (`active = Second`) because every turn begins with a
/// toggle, which hands the first move to the first participant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    grid: Grid,
    active: Seat,
    idle: Seat,
    terminal: bool,
}

impl SessionState {
    /// Fresh state with an empty grid.
    pub fn new() -> Self {
        Self {
            grid: Grid::new(),
            active: Seat::Second,
            idle: Seat::First,
            terminal: false,
        }
    }

    /// Swaps active and idle.
    pub fn toggle(&mut self) {
        std::mem::swap(&mut self.active, &mut self.idle);
    }

    /// Seat whose turn it is.
    pub fn active(&self) -> Seat {
        self.active
    }

    /// Seat waiting for the other to move.
    pub fn idle(&self) -> Seat {
        self.idle
    }

    /// Current grid.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Builds the snapshot naming the active participant.
    pub fn snapshot(&self, participants: &[Participant; 2]) -> Snapshot {
        let active = &participants[self.active.index()];
        Snapshot::new(self.grid.clone(), active.name().clone(), *active.mark())
    }

    /// Replaces the grid with one returned by the active participant.
    #[instrument(level = "debug", skip_all, fields(filled = grid.filled_count()))]
    pub fn merge(&mut self, grid: Grid) {
        self.grid = grid;
    }

    /// True once the grid is won or full.
    pub fn has_ended(&self) -> bool {
        self.grid.has_ended()
    }

    /// Marks the session as finished.
    pub fn finish(&mut self) {
        self.terminal = true;
    }

    /// Whether [`SessionState::finish`] has run.
    pub fn is_terminal(&self) -> bool {
        self.terminal
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}
