//! Move legality between two grids.
//!
//! The session layer receives whole grids back from participants. This
//! module answers whether such a grid is exactly one legal placement away
//! from the one the participant was shown.

use crate::{Cell, Grid, Mark, Position};
use tracing::instrument;

/// Why a returned grid is not a single legal placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum MoveViolation {
    /// The returned grid is identical to the prior one.
    #[display("No mark was placed")]
    NoChange,

    /// A previously occupied cell was changed or cleared.
    #[display("Cell {} was overwritten", _0)]
    Overwrote(Position),

    /// More than one cell was filled in a single turn.
    #[display("{} marks were placed in one turn", _0)]
    TooManyPlacements(usize),

    /// The new mark is not the mover's.
    #[display("Cell {} holds {} but {} was expected", position, found, expected)]
    WrongMark {
        /// Cell that changed.
        position: Position,
        /// Mark of the participant whose turn it was.
        expected: Mark,
        /// Mark that was actually placed.
        found: Mark,
    },
}

impl std::error::Error for MoveViolation {}

/// Finds the single placement of `mark` that turns `before` into `after`.
///
/// # Errors
///
/// Returns a [`MoveViolation`] describing the first problem found.
#[instrument(level = "debug", skip(before, after), fields(expected = %mark))]
pub fn placement_between(before: &Grid, after: &Grid, mark: Mark) -> Result<Position, MoveViolation> {
    let mut placed = Vec::new();

    for pos in Position::ALL {
        match (before.get(pos), after.get(pos)) {
            (old, new) if old == new => {}
            (Cell::Empty, Cell::Occupied(found)) => placed.push((pos, found)),
            (Cell::Occupied(_), _) => return Err(MoveViolation::Overwrote(pos)),
            (Cell::Empty, Cell::Empty) => {}
        }
    }

    match placed.as_slice() {
        [] => Err(MoveViolation::NoChange),
        [(position, found)] if *found != mark => Err(MoveViolation::WrongMark {
            position: *position,
            expected: mark,
            found: *found,
        }),
        [(position, _)] => Ok(*position),
        many => Err(MoveViolation::TooManyPlacements(many.len())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_placement_accepted() {
        let before = Grid::new();
        let mut after = before.clone();
        after.place(Position::Center, Mark::X).unwrap();

        assert_eq!(placement_between(&before, &after, Mark::X), Ok(Position::Center));
    }

    #[test]
    fn test_no_change_rejected() {
        let grid = Grid::new();
        assert_eq!(placement_between(&grid, &grid, Mark::X), Err(MoveViolation::NoChange));
    }

    #[test]
    fn test_wrong_mark_rejected() {
        let before = Grid::new();
        let mut after = before.clone();
        after.place(Position::TopLeft, Mark::O).unwrap();

        assert_eq!(
            placement_between(&before, &after, Mark::X),
            Err(MoveViolation::WrongMark {
                position: Position::TopLeft,
                expected: Mark::X,
                found: Mark::O,
            })
        );
    }

    #[test]
    fn test_double_placement_rejected() {
        let before = Grid::new();
        let mut after = before.clone();
        after.place(Position::TopLeft, Mark::X).unwrap();
        after.place(Position::BottomRight, Mark::X).unwrap();

        assert_eq!(
            placement_between(&before, &after, Mark::X),
            Err(MoveViolation::TooManyPlacements(2))
        );
    }

    #[test]
    fn test_overwrite_rejected() {
        let mut before = Grid::new();
        before.place(Position::Center, Mark::O).unwrap();
        let mut after = Grid::new();
        after.place(Position::Center, Mark::X).unwrap();

        assert_eq!(
            placement_between(&before, &after, Mark::X),
            Err(MoveViolation::Overwrote(Position::Center))
        );
    }
}
