//! Duel rules.
//!
//! - `ShotResolver`: the resolution table (damage, points, turn passing)
//! - `BotPolicy`: how the scripted opponent picks a target
//!
//! Both are pure: they read a shell or a random source and return a
//! decision. The session store applies decisions to state.

mod bot;
mod resolver;

pub use bot::BotPolicy;
pub use resolver::{MessageKind, Outcome, ShotResolver};
