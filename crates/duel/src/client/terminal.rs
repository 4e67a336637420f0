//! Full-screen terminal surface (ratatui + crossterm).

use super::Surface;
use super::input::{KeyAction, interpret};
use super::ui::{self, View};
use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use duel_tictactoe::{Grid, Mark, Position};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{self, Stdout};
use std::sync::Arc;
use tokio::sync::{Notify, mpsc};
use tracing::{debug, instrument, warn};

/// Spawns the thread that reads key presses and forwards them.
///
/// `q` and Esc also fire `quit`, which the surface reports through
/// [`Surface::quit_requested`] while the client waits on the network. The
/// thread ends when the receiver is dropped.
pub fn spawn_key_reader(keys: mpsc::UnboundedSender<KeyCode>, quit: Arc<Notify>) {
    std::thread::spawn(move || {
        loop {
            match event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                    if keys.send(key.code).is_err() {
                        break;
                    }
                    if matches!(key.code, KeyCode::Char('q') | KeyCode::Esc) {
                        quit.notify_one();
                    }
                }
                Ok(_) => {}
                Err(e) => {
                    warn!(error = %e, "Key reader stopped");
                    break;
                }
            }
        }
        debug!("Key reader thread exiting");
    });
}

/// Terminal surface: draws the grid and reads cell choices from the keyboard.
pub struct TerminalSurface {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    keys: mpsc::UnboundedReceiver<KeyCode>,
    quit: Arc<Notify>,
    name: String,
    own_mark: Option<Mark>,
    grid: Grid,
    cursor: Position,
    choosing: bool,
    turn: String,
    status: String,
    restored: bool,
}

impl TerminalSurface {
    /// Switches the terminal to raw mode on the alternate screen.
    pub fn enter(
        name: impl Into<String>,
        keys: mpsc::UnboundedReceiver<KeyCode>,
        quit: Arc<Notify>,
    ) -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;

        Ok(Self {
            terminal,
            keys,
            quit,
            name: name.into(),
            own_mark: None,
            grid: Grid::new(),
            cursor: Position::Center,
            choosing: false,
            turn: String::new(),
            status: String::new(),
            restored: false,
        })
    }

    /// Leaves the alternate screen and raw mode. Later calls do nothing.
    pub fn restore(&mut self) -> Result<()> {
        if self.restored {
            return Ok(());
        }
        self.restored = true;
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        Ok(())
    }

    fn redraw(&mut self) -> Result<()> {
        let view = View {
            name: &self.name,
            own_mark: self.own_mark,
            grid: &self.grid,
            cursor: self.choosing.then_some(self.cursor),
            turn: &self.turn,
            status: &self.status,
        };
        self.terminal.draw(|f| ui::draw(f, &view))?;
        Ok(())
    }
}

impl Drop for TerminalSurface {
    fn drop(&mut self) {
        if let Err(e) = self.restore() {
            warn!(error = %e, "Failed to restore terminal");
        }
    }
}

#[async_trait::async_trait]
impl Surface for TerminalSurface {
    fn show_grid(&mut self, grid: &Grid, own_mark: Option<Mark>) -> Result<()> {
        self.grid = grid.clone();
        self.own_mark = own_mark;
        self.redraw()
    }

    fn show_turn(&mut self, text: &str) -> Result<()> {
        self.turn = text.to_string();
        self.redraw()
    }

    fn show_status(&mut self, text: &str) -> Result<()> {
        self.status = text.to_string();
        self.redraw()
    }

    #[instrument(skip_all)]
    async fn choose_cell(&mut self, grid: &Grid) -> Result<Option<Position>> {
        // Drop keys pressed while it was not our turn.
        while self.keys.try_recv().is_ok() {}

        self.grid = grid.clone();
        self.choosing = true;
        self.redraw()?;

        let choice = loop {
            let Some(key) = self.keys.recv().await else {
                break None;
            };
            match interpret(self.cursor, key) {
                KeyAction::Cursor(pos) => {
                    self.cursor = pos;
                    self.redraw()?;
                }
                KeyAction::Select(pos) => {
                    self.cursor = pos;
                    break Some(pos);
                }
                KeyAction::Quit => break None,
                KeyAction::Ignore => {}
            }
        };

        self.choosing = false;
        self.redraw()?;
        debug!(choice = ?choice, "Cell chosen");
        Ok(choice)
    }

    async fn quit_requested(&mut self) {
        self.quit.notified().await;
    }

    async fn acknowledge(&mut self) -> Result<()> {
        self.turn = "Press any key to exit".to_string();
        self.redraw()?;
        while self.keys.try_recv().is_ok() {}
        self.keys.recv().await;
        Ok(())
    }
}
