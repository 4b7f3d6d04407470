// CONTROLLER: Input decoding, player steering, and tick sequencing
pub mod input;
pub mod player;
pub mod session;

pub use input::{Action, CursorWarp, InputEvent, InputState, KeyMap, MouseButtons};
pub use player::PlayerController;
pub use session::{PlaySession, SessionError, TickFrame};
