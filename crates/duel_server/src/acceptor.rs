//! Accept loop: pairs connections in arrival order and dispatches sessions.

use crate::{
    Connection, Coordinator, Participant, ServerConfig, ServerError, SessionPool, SessionSettings,
};
use duel_tictactoe::Mark;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{Instrument, debug, info, info_span, instrument, warn};

/// Listening referee.
#[derive(Debug)]
pub struct Server {
    listener: TcpListener,
    config: ServerConfig,
    pool: SessionPool,
    next_session: u64,
}

impl Server {
    /// Validates the config and binds the listener.
    #[instrument(skip(config), fields(host = %config.host(), port = config.port()))]
    pub async fn bind(config: ServerConfig) -> Result<Self, ServerError> {
        config.validate()?;
        let listener = TcpListener::bind((config.host().as_str(), *config.port())).await?;
        let pool = SessionPool::new(*config.max_sessions());

        info!(
            addr = %listener.local_addr()?,
            max_sessions = config.max_sessions(),
            "Server listening"
        );

        Ok(Self {
            listener,
            config,
            pool,
            next_session: 0,
        })
    }

    /// Address actually bound (useful with port 0).
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Session pool, for occupancy reporting.
    pub fn pool(&self) -> &SessionPool {
        &self.pool
    }

    /// Accepts forever. The first connection of each pair plays X.
    pub async fn run(mut self) {
        loop {
            let first = self.accept_participant(Mark::X).await;
            let second = self.accept_participant(Mark::O).await;
            self.dispatch(first, second);
        }
    }

    /// Accepts until one connection completes the name handshake.
    async fn accept_participant(&self, mark: Mark) -> Participant {
        loop {
            let (stream, peer) = match self.listener.accept().await {
                Ok(accepted) => accepted,
                Err(e) => {
                    warn!(error = %e, "Accept failed");
                    tokio::time::sleep(Duration::from_millis(100)).await;
                    continue;
                }
            };

            let span = info_span!("handshake", peer = %peer, mark = %mark);
            match self.handshake(Connection::new(stream, peer), mark).instrument(span).await {
                Some(participant) => return participant,
                None => continue,
            }
        }
    }

    async fn handshake(&self, mut connection: Connection, mark: Mark) -> Option<Participant> {
        let name = match self.config.handshake_timeout() {
            Some(limit) => match tokio::time::timeout(limit, connection.read_name()).await {
                Ok(result) => result,
                Err(_) => {
                    warn!(timeout_secs = limit.as_secs(), "Handshake timed out");
                    connection.shutdown().await;
                    return None;
                }
            },
            None => connection.read_name().await,
        };

        match name {
            Ok(name) => {
                info!(name = %name, "Participant connected");
                Some(Participant::new(name, mark, connection))
            }
            Err(e) => {
                warn!(error = %e, "Handshake failed");
                connection.shutdown().await;
                None
            }
        }
    }

    fn dispatch(&mut self, first: Participant, second: Participant) {
        self.next_session += 1;
        let id = self.next_session;
        let settings = SessionSettings::new(self.config.start_delay(), *self.config.validate_moves());

        debug!(
            session_id = id,
            in_flight = self.pool.in_flight(),
            queued = self.pool.queued(),
            "Dispatching session"
        );

        let coordinator = Coordinator::new(id, first, second, settings);
        self.pool.submit(async move {
            coordinator.run().await;
        });
    }
}
