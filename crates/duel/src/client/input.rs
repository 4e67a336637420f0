//! Keyboard handling for cell selection.

use crossterm::event::KeyCode;
use duel_tictactoe::Position;

/// What a key press means while choosing a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Cursor moved.
    Cursor(Position),
    /// Choose this cell.
    Select(Position),
    /// Leave the game.
    Quit,
    /// Not bound.
    Ignore,
}

/// Maps a key to an action given the current cursor.
pub fn interpret(cursor: Position, key: KeyCode) -> KeyAction {
    match key {
        KeyCode::Up | KeyCode::Down | KeyCode::Left | KeyCode::Right => {
            KeyAction::Cursor(move_cursor(cursor, key))
        }
        KeyCode::Enter | KeyCode::Char(' ') => KeyAction::Select(cursor),
        KeyCode::Char('q') | KeyCode::Esc => KeyAction::Quit,
        KeyCode::Char(c) => c
            .to_digit(10)
            .and_then(|d| Position::from_key_or_label(&d.to_string()))
            .map_or(KeyAction::Ignore, KeyAction::Select),
        _ => KeyAction::Ignore,
    }
}

/// Moves the cursor one cell with the arrow keys, stopping at the edges.
pub fn move_cursor(cursor: Position, key: KeyCode) -> Position {
    let (row, col) = (cursor.row(), cursor.col());
    let target = match key {
        KeyCode::Up => row.checked_sub(1).map(|r| (r, col)),
        KeyCode::Down => Some((row + 1, col)),
        KeyCode::Left => col.checked_sub(1).map(|c| (row, c)),
        KeyCode::Right => Some((row, col + 1)),
        _ => None,
    };

    target
        .and_then(|(r, c)| Position::from_row_col(r, c))
        .unwrap_or(cursor)
}
