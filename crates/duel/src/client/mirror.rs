//! Client-side copy of the session state.

use duel_server::Snapshot;
use duel_tictactoe::{Grid, Mark, PlaceError, Position};
use tracing::{debug, instrument};

/// What the local participant knows about the session.
///
/// Replaced wholesale by every snapshot; the only local change is placing
/// the participant's own mark before sending the result back.
#[derive(Debug, Clone)]
pub struct Mirror {
    name: String,
    own_mark: Option<Mark>,
    grid: Grid,
    active_name: String,
    active_mark: Option<Mark>,
}

impl Mirror {
    /// Empty mirror for the participant called `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            own_mark: None,
            grid: Grid::new(),
            active_name: String::new(),
            active_mark: None,
        }
    }

    /// Records the mark the referee assigned.
    pub fn seat(&mut self, mark: Mark) {
        debug!(mark = %mark, "Seated");
        self.own_mark = Some(mark);
    }

    /// Adopts an incoming snapshot.
    pub fn apply(&mut self, snapshot: Snapshot) {
        self.grid = snapshot.grid;
        self.active_name = snapshot.active_name;
        self.active_mark = Some(snapshot.active_mark);
    }

    /// Whether the latest snapshot names this participant as the mover.
    ///
    /// Compares marks once seated; falls back to names otherwise.
    pub fn is_my_turn(&self) -> bool {
        match (self.own_mark, self.active_mark) {
            (Some(own), Some(active)) => own == active,
            (None, Some(_)) => self.active_name == self.name,
            _ => false,
        }
    }

    /// Places the active mark and builds the snapshot to send back.
    ///
    /// The mirror is left unchanged when the cell is taken.
    #[instrument(skip(self), fields(name = %self.name))]
    pub fn place(&mut self, pos: Position) -> Result<Snapshot, PlaceError> {
        let mark = self.active_mark.or(self.own_mark).unwrap_or(Mark::X);
        self.grid.place(pos, mark)?;
        Ok(Snapshot::new(self.grid.clone(), self.active_name.clone(), mark))
    }

    /// Local participant's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Local participant's mark, once seated.
    pub fn own_mark(&self) -> Option<Mark> {
        self.own_mark
    }

    /// Latest grid.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Name of the participant whose turn it is.
    pub fn active_name(&self) -> &str {
        &self.active_name
    }
}
