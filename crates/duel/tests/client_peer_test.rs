//! Remote peers playing full sessions against a live referee.

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use duel::client::{ClientOutcome, PICK_BLANK, RemotePeer, Surface, WAITING, YOUR_TURN};
use duel_server::protocol::{MATCH_FOUND, OPPONENT_DISCONNECTED};
use duel_server::{Server, ServerConfig};
use duel_tictactoe::{Grid, Mark, Position};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tokio::sync::Notify;

/// Surface that picks cells from a script and records what it was shown.
struct ScriptedSurface {
    moves: VecDeque<Position>,
    log: Arc<Mutex<Vec<String>>>,
    quit: Arc<Notify>,
}

impl ScriptedSurface {
    fn new(moves: impl IntoIterator<Item = Position>) -> (Self, Arc<Mutex<Vec<String>>>) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let surface = Self {
            moves: moves.into_iter().collect(),
            log: Arc::clone(&log),
            quit: Arc::new(Notify::new()),
        };
        (surface, log)
    }

    /// Presses quit before the game starts.
    fn quitting(self) -> Self {
        self.quit.notify_one();
        self
    }

    fn record(&self, line: String) {
        self.log.lock().unwrap().push(line);
    }
}

#[async_trait::async_trait]
impl Surface for ScriptedSurface {
    fn show_grid(&mut self, _grid: &Grid, _own_mark: Option<Mark>) -> Result<()> {
        Ok(())
    }

    fn show_turn(&mut self, text: &str) -> Result<()> {
        self.record(format!("turn: {}", text));
        Ok(())
    }

    fn show_status(&mut self, text: &str) -> Result<()> {
        self.record(format!("status: {}", text));
        Ok(())
    }

    async fn choose_cell(&mut self, _grid: &Grid) -> Result<Option<Position>> {
        Ok(self.moves.pop_front())
    }

    async fn acknowledge(&mut self) -> Result<()> {
        // Dismissing the final screen with `q` also fires quit.
        self.quit.notify_one();
        tokio::task::yield_now().await;
        Ok(())
    }

    async fn quit_requested(&mut self) {
        self.quit.notified().await;
    }
}

fn statuses(log: &Arc<Mutex<Vec<String>>>) -> Vec<String> {
    log.lock().unwrap().clone()
}

async fn start_server() -> SocketAddr {
    let config = ServerConfig::default().with_port(0).with_start_delay_ms(0);
    let server = Server::bind(config).await.unwrap();
    let addr = server.local_addr().unwrap();
    tokio::spawn(server.run());
    addr
}

/// Runs one game between scripted X (`alice`) and O (`bob`).
async fn play_pair(
    addr: SocketAddr,
    alice_moves: Vec<Position>,
    bob_moves: Vec<Position>,
) -> (
    (ClientOutcome, Arc<Mutex<Vec<String>>>),
    (ClientOutcome, Arc<Mutex<Vec<String>>>),
) {
    let (alice_surface, alice_log) = ScriptedSurface::new(alice_moves);
    let alice = RemotePeer::connect(addr, "alice", alice_surface).await.unwrap();
    let alice = tokio::spawn(alice.run());

    // Let the acceptor seat alice first.
    tokio::time::sleep(Duration::from_millis(50)).await;

    let (bob_surface, bob_log) = ScriptedSurface::new(bob_moves);
    let bob = RemotePeer::connect(addr, "bob", bob_surface).await.unwrap();
    let bob = tokio::spawn(bob.run());

    let alice = tokio::time::timeout(Duration::from_secs(5), alice)
        .await
        .unwrap()
        .unwrap()
        .unwrap();
    let bob = tokio::time::timeout(Duration::from_secs(5), bob)
        .await
        .unwrap()
        .unwrap()
        .unwrap();
    ((alice, alice_log), (bob, bob_log))
}

#[tokio::test]
async fn test_full_game_both_see_winner() {
    let addr = start_server().await;
    let ((alice, alice_log), (bob, bob_log)) = play_pair(
        addr,
        vec![Position::TopLeft, Position::TopCenter, Position::TopRight],
        vec![Position::MiddleLeft, Position::Center],
    )
    .await;

    let won = ClientOutcome::Won {
        winner: "alice".to_string(),
    };
    assert_eq!(alice, won);
    assert_eq!(bob, won);

    let alice_log = statuses(&alice_log);
    assert_eq!(alice_log[0], format!("status: {}", WAITING));
    assert!(alice_log.contains(&format!("status: {}", MATCH_FOUND)));
    assert!(alice_log.contains(&format!("turn: {}", YOUR_TURN)));
    assert_eq!(alice_log.last().unwrap(), "status: alice has won!");

    let bob_log = statuses(&bob_log);
    assert!(bob_log.contains(&"turn: alice is making their move...".to_string()));
    assert_eq!(bob_log.last().unwrap(), "status: alice has won!");
}

#[tokio::test]
async fn test_occupied_cell_rejected_locally_then_draw() {
    let addr = start_server().await;
    // Ends X O X / X O O / O X X. Bob first tries alice's cell.
    let ((alice, _), (bob, bob_log)) = play_pair(
        addr,
        vec![
            Position::TopLeft,
            Position::TopRight,
            Position::MiddleLeft,
            Position::BottomCenter,
            Position::BottomRight,
        ],
        vec![
            Position::TopLeft,
            Position::TopCenter,
            Position::Center,
            Position::MiddleRight,
            Position::BottomLeft,
        ],
    )
    .await;

    assert_eq!(alice, ClientOutcome::Draw);
    assert_eq!(bob, ClientOutcome::Draw);

    let bob_log = statuses(&bob_log);
    let rejections = bob_log
        .iter()
        .filter(|line| **line == format!("status: {}", PICK_BLANK))
        .count();
    assert_eq!(rejections, 1);
    assert_eq!(bob_log.last().unwrap(), "status: There was a tie!");
}

#[tokio::test]
async fn test_quitting_player_leaves_opponent_notified() {
    let addr = start_server().await;
    // Alice has no moves scripted, so she quits on her first turn.
    let ((alice, _), (bob, bob_log)) = play_pair(addr, vec![], vec![]).await;

    assert_eq!(alice, ClientOutcome::Quit);
    assert_eq!(bob, ClientOutcome::OpponentLeft);
    assert_eq!(
        statuses(&bob_log).last().unwrap(),
        &format!("status: {}", OPPONENT_DISCONNECTED)
    );
}

#[tokio::test]
async fn test_malformed_frame_is_opponent_leaving() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let (read_half, mut write_half) = stream.into_split();
        let mut lines = BufReader::new(read_half).lines();
        assert_eq!(lines.next_line().await.unwrap().as_deref(), Some("carol"));

        let notice = serde_json::json!({"kind": "notice", "text": MATCH_FOUND});
        write_half
            .write_all(format!("{}\n", notice).as_bytes())
            .await
            .unwrap();
        write_half.write_all(b"\xff\xfe garbage\n").await.unwrap();
        write_half.flush().await.unwrap();
        // Hold the socket open so only the bad frame ends the game.
        tokio::time::sleep(Duration::from_secs(5)).await;
    });

    let (surface, log) = ScriptedSurface::new([]);
    let peer = RemotePeer::connect(addr, "carol", surface).await.unwrap();
    let outcome = tokio::time::timeout(Duration::from_secs(2), peer.run())
        .await
        .unwrap()
        .unwrap();

    assert_eq!(outcome, ClientOutcome::OpponentLeft);
    let log = statuses(&log);
    assert!(log.contains(&format!("status: {}", MATCH_FOUND)));
    assert_eq!(log.last().unwrap(), &format!("status: {}", OPPONENT_DISCONNECTED));
}

#[tokio::test]
async fn test_quit_on_final_screen_keeps_result() {
    let addr = start_server().await;
    let ((alice, alice_log), (bob, _)) = play_pair(
        addr,
        vec![Position::TopLeft, Position::Center, Position::BottomRight],
        vec![Position::TopCenter, Position::TopRight],
    )
    .await;

    let won = ClientOutcome::Won {
        winner: "alice".to_string(),
    };
    assert_eq!(alice, won);
    assert_eq!(bob, won);
    assert_eq!(statuses(&alice_log).last().unwrap(), "status: alice has won!");
}

#[tokio::test]
async fn test_quit_while_waiting_for_opponent() {
    let addr = start_server().await;
    let (surface, log) = ScriptedSurface::new([]);
    let peer = RemotePeer::connect(addr, "dora", surface.quitting()).await.unwrap();

    let outcome = tokio::time::timeout(Duration::from_secs(2), peer.run())
        .await
        .unwrap()
        .unwrap();

    assert_eq!(outcome, ClientOutcome::Quit);
    assert_eq!(statuses(&log), vec![format!("status: {}", WAITING)]);
}

#[tokio::test]
async fn test_name_with_line_break_is_refused_before_connecting() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let (surface, _) = ScriptedSurface::new([]);
    let err = RemotePeer::connect(addr, "ev\nil", surface).await.err().unwrap();
    assert!(err.to_string().contains("single line"));

    let (surface, _) = ScriptedSurface::new([]);
    assert!(RemotePeer::connect(addr, " \t ", surface).await.is_err());

    assert!(
        tokio::time::timeout(Duration::from_millis(100), listener.accept())
            .await
            .is_err(),
        "a connection was opened"
    );
}
