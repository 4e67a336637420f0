//! Line-oriented framing over one TCP stream.

use crate::{Frame, Snapshot, WireError};
use duel_tictactoe::Mark;
use std::net::SocketAddr;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tracing::{debug, instrument, trace};

/// Both halves of a TCP stream plus the read buffer.
///
/// The buffer that served the name line keeps serving frames, so nothing a
/// peer sent early is lost.
#[derive(Debug)]
pub struct Connection {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
    peer: SocketAddr,
    closed: bool,
}

impl Connection {
    /// Wraps an accepted or connected stream.
    pub fn new(stream: TcpStream, peer: SocketAddr) -> Self {
        let (read, writer) = stream.into_split();
        Self {
            reader: BufReader::new(read),
            writer,
            peer,
            closed: false,
        }
    }

    /// Remote address of the stream.
    pub fn peer(&self) -> SocketAddr {
        self.peer
    }

    /// Reads one line, without the trailing newline.
    ///
    /// EOF is [`WireError::Closed`]; invalid UTF-8 surfaces as an I/O error.
    pub async fn read_line(&mut self) -> Result<String, WireError> {
        let mut line = String::new();
        let n = self.reader.read_line(&mut line).await?;
        if n == 0 {
            return Err(WireError::Closed);
        }
        trace!(peer = %self.peer, bytes = n, "Read line");
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    /// Reads the handshake line: the participant's display name.
    #[instrument(skip(self), fields(peer = %self.peer))]
    pub async fn read_name(&mut self) -> Result<String, WireError> {
        let name = self.read_line().await?.trim().to_string();
        if name.is_empty() {
            return Err(WireError::EmptyName);
        }
        debug!(name = %name, "Read participant name");
        Ok(name)
    }

    /// Writes raw text followed by a newline.
    pub async fn write_line(&mut self, text: &str) -> Result<(), WireError> {
        self.writer.write_all(text.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await?;
        Ok(())
    }

    /// Writes one frame.
    pub async fn send(&mut self, frame: &Frame) -> Result<(), WireError> {
        let line = frame.encode()?;
        self.writer.write_all(line.as_bytes()).await?;
        self.writer.flush().await?;
        trace!(peer = %self.peer, kind = frame.kind(), "Sent frame");
        Ok(())
    }

    /// Reads one frame.
    pub async fn recv(&mut self) -> Result<Frame, WireError> {
        let line = self.read_line().await?;
        let frame = Frame::decode(&line)?;
        trace!(peer = %self.peer, kind = frame.kind(), "Received frame");
        Ok(frame)
    }

    /// Closes the write half. Later calls do nothing.
    pub async fn shutdown(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        if let Err(e) = self.writer.shutdown().await {
            debug!(peer = %self.peer, error = %e, "Shutdown of write half failed");
        }
    }

    /// Whether [`Connection::shutdown`] has run.
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

/// One paired participant as the referee sees it.
#[derive(Debug, derive_getters::Getters)]
pub struct Participant {
    /// Display name sent in the handshake.
    name: String,
    /// Mark assigned at pairing.
    mark: Mark,
    #[getter(skip)]
    connection: Connection,
}

impl Participant {
    /// Binds a named connection to its mark.
    pub fn new(name: String, mark: Mark, connection: Connection) -> Self {
        debug!(name = %name, mark = %mark, peer = %connection.peer(), "Participant seated");
        Self {
            name,
            mark,
            connection,
        }
    }

    /// Sends human-readable text.
    #[instrument(skip(self), fields(participant = %self.name))]
    pub async fn send_notice(&mut self, text: &str) -> Result<(), WireError> {
        self.connection.send(&Frame::notice(text)).await
    }

    /// Tells the participant its own mark.
    #[instrument(skip(self), fields(participant = %self.name))]
    pub async fn send_seat(&mut self) -> Result<(), WireError> {
        let frame = Frame::Seat { mark: self.mark };
        self.connection.send(&frame).await
    }

    /// Sends the authoritative session view.
    #[instrument(skip(self, snapshot), fields(participant = %self.name, active = %snapshot.active_mark))]
    pub async fn send_snapshot(&mut self, snapshot: &Snapshot) -> Result<(), WireError> {
        self.connection.send(&Frame::Snapshot(snapshot.clone())).await
    }

    /// Waits for the participant to return a snapshot.
    ///
    /// Any other frame kind is a protocol failure.
    #[instrument(skip(self), fields(participant = %self.name))]
    pub async fn recv_snapshot(&mut self) -> Result<Snapshot, WireError> {
        self.connection.recv().await?.into_snapshot()
    }

    /// Closes the participant's connection.
    pub async fn shutdown(&mut self) {
        self.connection.shutdown().await;
    }
}
