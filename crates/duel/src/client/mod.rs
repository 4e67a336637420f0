//! Terminal client: connects to the referee and plays one game.

mod input;
mod mirror;
mod peer;
mod surface;
mod terminal;
mod ui;

pub use input::{KeyAction, interpret, move_cursor};
pub use mirror::Mirror;
pub use peer::{ClientOutcome, PICK_BLANK, RemotePeer, TIE, WAITING, YOUR_TURN, normalize_name};
pub use surface::Surface;
pub use terminal::{TerminalSurface, spawn_key_reader};
pub use ui::{View, draw};
