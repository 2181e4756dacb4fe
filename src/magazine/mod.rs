//! The shotgun's magazine.
//!
//! - `Shell`: live or blank
//! - `Magazine`: FIFO sequence of shells for one loading round
//! - `MagazineLoader`: builds a randomized magazine from configured ranges

mod loader;
mod shell;

pub use loader::{Load, MagazineLoader};
pub use shell::{Magazine, Shell};
