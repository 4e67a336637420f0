//! Remote peer adapter: plays one session against the referee.

use super::{Mirror, Surface};
use anyhow::{Context, Result, bail};
use duel_server::protocol::{MATCH_FOUND, OPPONENT_DISCONNECTED};
use duel_server::{Connection, Frame, Snapshot};
use duel_tictactoe::PlaceError;
use tokio::net::{TcpStream, ToSocketAddrs};
use tracing::{debug, info, instrument, warn};

/// Shown while the referee looks for an opponent.
pub const WAITING: &str = "Waiting for opponent...";

/// Shown when the user picks a taken cell.
pub const PICK_BLANK: &str = "Please select a blank space.";

/// Shown when it is the local participant's turn.
pub const YOUR_TURN: &str = "It's your turn to make a move";

/// Shown on a full grid with no line.
pub const TIE: &str = "There was a tie!";

/// Trims a display name and checks it fits on the name line.
///
/// Returns `None` for blank names and names with control characters.
pub fn normalize_name(raw: &str) -> Option<String> {
    let name = raw.trim();
    if name.is_empty() || name.chars().any(char::is_control) {
        return None;
    }
    Some(name.to_string())
}

/// How the game ended from this participant's point of view.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum ClientOutcome {
    /// Someone completed a line.
    #[display("{} has won!", winner)]
    Won {
        /// Name the referee attributed the win to.
        winner: String,
    },
    /// The grid filled with no line.
    #[display("{}", TIE)]
    Draw,
    /// The opponent (or the referee) went away.
    #[display("{}", OPPONENT_DISCONNECTED)]
    OpponentLeft,
    /// The local user quit.
    #[display("You left the game.")]
    Quit,
}

/// Client end of one session.
pub struct RemotePeer<S> {
    connection: Connection,
    mirror: Mirror,
    surface: S,
}

impl<S: Surface> RemotePeer<S> {
    /// Connects and sends the name line.
    ///
    /// Fails without connecting when `name` is blank or contains control
    /// characters.
    #[instrument(skip(addr, surface))]
    pub async fn connect(addr: impl ToSocketAddrs, name: &str, surface: S) -> Result<Self> {
        let Some(name) = normalize_name(name) else {
            bail!("Name must be non-empty and on a single line");
        };
        let stream = TcpStream::connect(addr)
            .await
            .context("Failed to connect to server")?;
        let peer = stream.peer_addr()?;
        let mut connection = Connection::new(stream, peer);
        connection.write_line(&name).await?;
        info!(server = %peer, "Connected");

        Ok(Self {
            connection,
            mirror: Mirror::new(name),
            surface,
        })
    }

    /// Plays until the game ends, the opponent leaves, or the user quits.
    ///
    /// Transport failures are outcomes, not errors; only surface failures
    /// are returned as `Err`.
    #[instrument(skip(self), fields(name = %self.mirror.name()))]
    pub async fn run(mut self) -> Result<ClientOutcome> {
        self.surface.show_status(WAITING)?;

        let outcome = loop {
            let received = tokio::select! {
                received = self.connection.recv() => received,
                _ = self.surface.quit_requested() => {
                    info!("Quit while waiting");
                    break ClientOutcome::Quit;
                }
            };
            let frame = match received {
                Ok(frame) => frame,
                Err(e) => {
                    warn!(error = %e, "Lost connection to referee");
                    break ClientOutcome::OpponentLeft;
                }
            };

            match frame {
                Frame::Notice { text } => {
                    debug!(text = %text, "Notice");
                    if text == OPPONENT_DISCONNECTED {
                        break ClientOutcome::OpponentLeft;
                    }
                    self.surface.show_status(&text)?;
                    if text == MATCH_FOUND {
                        self.surface.show_grid(self.mirror.grid(), self.mirror.own_mark())?;
                    }
                }
                Frame::Seat { mark } => {
                    self.mirror.seat(mark);
                    self.surface.show_grid(self.mirror.grid(), Some(mark))?;
                }
                Frame::Snapshot(snapshot) => {
                    if let Some(outcome) = self.on_snapshot(snapshot).await? {
                        break outcome;
                    }
                }
            }
        };

        info!(outcome = %outcome, "Game over");
        if outcome != ClientOutcome::Quit {
            self.surface.show_status(&outcome.to_string())?;
            self.surface.acknowledge().await?;
        }
        self.connection.shutdown().await;
        Ok(outcome)
    }

    async fn on_snapshot(&mut self, snapshot: Snapshot) -> Result<Option<ClientOutcome>> {
        self.mirror.apply(snapshot);
        self.surface.show_grid(self.mirror.grid(), self.mirror.own_mark())?;

        let grid = self.mirror.grid();
        if grid.has_won() {
            return Ok(Some(ClientOutcome::Won {
                winner: self.mirror.active_name().to_string(),
            }));
        }
        if grid.is_full() {
            return Ok(Some(ClientOutcome::Draw));
        }

        if !self.mirror.is_my_turn() {
            let text = format!("{} is making their move...", self.mirror.active_name());
            self.surface.show_turn(&text)?;
            return Ok(None);
        }

        self.surface.show_turn(YOUR_TURN)?;
        let Some(reply) = self.take_turn().await? else {
            return Ok(Some(ClientOutcome::Quit));
        };
        self.surface.show_grid(self.mirror.grid(), self.mirror.own_mark())?;

        if let Err(e) = self.connection.send(&Frame::Snapshot(reply)).await {
            warn!(error = %e, "Failed to send move");
            return Ok(Some(ClientOutcome::OpponentLeft));
        }
        Ok(None)
    }

    /// Asks for cells until an empty one is chosen.
    async fn take_turn(&mut self) -> Result<Option<Snapshot>> {
        loop {
            let Some(pos) = self.surface.choose_cell(self.mirror.grid()).await? else {
                return Ok(None);
            };
            match self.mirror.place(pos) {
                Ok(reply) => {
                    debug!(position = %pos, "Move chosen");
                    return Ok(Some(reply));
                }
                Err(PlaceError::Occupied(_)) => self.surface.show_status(PICK_BLANK)?,
            }
        }
    }
}
