//! Local I/O surface the remote peer drives.

use anyhow::Result;
use duel_tictactoe::{Grid, Mark, Position};

/// Where the client shows the game and gets the user's choices.
#[async_trait::async_trait]
pub trait Surface: Send {
    /// Renders the grid; `own_mark` is known once the referee has seated us.
    fn show_grid(&mut self, grid: &Grid, own_mark: Option<Mark>) -> Result<()>;

    /// Updates the turn indicator.
    fn show_turn(&mut self, text: &str) -> Result<()>;

    /// Shows a notice or status line.
    fn show_status(&mut self, text: &str) -> Result<()>;

    /// Blocks until the user picks a cell. `None` means the user quit.
    ///
    /// May return an occupied cell; the caller rejects it.
    async fn choose_cell(&mut self, grid: &Grid) -> Result<Option<Position>>;

    /// Waits for the user to dismiss the final screen.
    async fn acknowledge(&mut self) -> Result<()>;

    /// Resolves when the user asks to leave while the game is waiting on the
    /// network. Surfaces without a quit control never resolve.
    async fn quit_requested(&mut self) {
        std::future::pending::<()>().await
    }
}
