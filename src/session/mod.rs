//! Game sessions and the store that owns them.
//!
//! - `GameSession`: lives, score, magazine, turn, shot counter
//! - `SessionStore`: create / shoot / bot turn / get / finalize, atomic per
//!   session and independent across sessions
//! - `ShotOutcome`, `SessionSnapshot`: what callers get back
//! - `SessionError`: `UnknownSession`, `OutOfTurn`, `Internal`

mod error;
mod state;
mod store;
mod view;

pub use error::{ErrorKind, SessionError};
pub use state::{GameSession, SessionStatus, SessionToken, ShotRecord};
pub use store::{SessionHandle, SessionRegistry, SessionStore, SharedSessionMap};
pub use view::{SessionSnapshot, ShotOutcome, Started};
