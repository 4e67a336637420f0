//! Session coordinator: referees one game between two participants.
//!
//! The coordinator is the only writer of [`SessionState`]. Each turn it
//! broadcasts a [`Snapshot`] to both participants, waits for the active one
//! to send a snapshot back, and folds the returned grid in. Any transport
//! failure ends the session and both sides get a best-effort notice.

use crate::protocol::{MATCH_FOUND, OPPONENT_DISCONNECTED};
use crate::{Participant, SessionError, SessionState, Snapshot};
use duel_tictactoe::{Mark, placement_between};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Per-session tunables, copied out of the server config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_new::new)]
pub struct SessionSettings {
    /// Pause between the match-found notice and the first snapshot.
    pub start_delay: Duration,
    /// Check each returned grid is one legal placement by the mover.
    pub validate_moves: bool,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            start_delay: Duration::from_millis(2500),
            validate_moves: false,
        }
    }
}

/// How a session ended.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum SessionOutcome {
    /// A participant completed a line.
    #[display("{} ({}) won", winner, mark)]
    Won {
        /// Name of the winner.
        winner: String,
        /// Winner's mark.
        mark: Mark,
    },
    /// The grid filled with no line.
    #[display("Draw")]
    Draw,
    /// A connection failed (or, with validation on, a move was illegal).
    #[display("Disconnected: {}", reason)]
    Disconnected {
        /// Description of the failure.
        reason: String,
    },
}

/// Drives one paired session from the match-found notice to teardown.
#[derive(Debug)]
pub struct Coordinator {
    id: u64,
    participants: [Participant; 2],
    state: SessionState,
    settings: SessionSettings,
}

impl Coordinator {
    /// Pairs two participants; `first` moves first.
    pub fn new(id: u64, first: Participant, second: Participant, settings: SessionSettings) -> Self {
        Self {
            id,
            participants: [first, second],
            state: SessionState::new(),
            settings,
        }
    }

    /// Runs the session to completion and closes both connections.
    #[instrument(
        name = "session",
        skip(self),
        fields(
            session_id = self.id,
            x = %self.participants[0].name(),
            o = %self.participants[1].name(),
        )
    )]
    pub async fn run(mut self) -> SessionOutcome {
        info!("Session starting");

        let outcome = match self.play().await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(error = %e, "Session aborted");
                self.notify_disconnected().await;
                SessionOutcome::Disconnected {
                    reason: e.to_string(),
                }
            }
        };

        self.teardown().await;

        info!(outcome = %outcome, "Session finished");
        outcome
    }

    async fn play(&mut self) -> Result<SessionOutcome, SessionError> {
        self.start().await?;

        while !self.state.has_ended() {
            self.state.toggle();
            let snapshot = self.state.snapshot(&self.participants);
            self.broadcast(&snapshot).await?;

            let participant = &mut self.participants[self.state.active().index()];
            let returned = participant
                .recv_snapshot()
                .await
                .map_err(|e| SessionError::transport(participant.name().clone(), e))?;

            if self.settings.validate_moves {
                let position = placement_between(self.state.grid(), &returned.grid, *participant.mark())
                    .map_err(|v| SessionError::illegal_move(participant.name().clone(), v))?;
                debug!(position = %position, "Move validated");
            }

            self.state.merge(returned.grid);
            debug!(grid = %self.state.grid().render(), "Turn complete");
        }

        self.finish_game().await;
        Ok(self.classify())
    }

    async fn start(&mut self) -> Result<(), SessionError> {
        for participant in &mut self.participants {
            participant
                .send_notice(MATCH_FOUND)
                .await
                .map_err(|e| SessionError::transport(participant.name().clone(), e))?;
            participant
                .send_seat()
                .await
                .map_err(|e| SessionError::transport(participant.name().clone(), e))?;
        }

        tokio::time::sleep(self.settings.start_delay).await;
        Ok(())
    }

    async fn broadcast(&mut self, snapshot: &Snapshot) -> Result<(), SessionError> {
        for participant in &mut self.participants {
            participant
                .send_snapshot(snapshot)
                .await
                .map_err(|e| SessionError::transport(participant.name().clone(), e))?;
        }
        Ok(())
    }

    /// Sends the terminal snapshot. The result is decided already, so a
    /// failed send is only logged.
    async fn finish_game(&mut self) {
        let snapshot = self.state.snapshot(&self.participants);
        if let Err(e) = self.broadcast(&snapshot).await {
            warn!(error = %e, "Final snapshot not delivered");
        }
    }

    fn classify(&self) -> SessionOutcome {
        if self.state.grid().has_won() {
            let winner = &self.participants[self.state.active().index()];
            SessionOutcome::Won {
                winner: winner.name().clone(),
                mark: *winner.mark(),
            }
        } else {
            SessionOutcome::Draw
        }
    }

    async fn notify_disconnected(&mut self) {
        for participant in &mut self.participants {
            if let Err(e) = participant.send_notice(OPPONENT_DISCONNECTED).await {
                debug!(participant = %participant.name(), error = %e, "Disconnect notice not delivered");
            }
        }
    }

    /// Closes both connections. Only the first call has any effect.
    async fn teardown(&mut self) {
        if self.state.is_terminal() {
            return;
        }
        self.state.finish();
        for participant in &mut self.participants {
            participant.shutdown().await;
        }
        debug!("Connections closed");
    }
}
