//! Core engine types: combatants, turns, randomness, configuration.
//!
//! Everything here is free of session state and I/O; the magazine, the
//! rules and the session store all build on these.

pub mod combatant;
pub mod config;
pub mod rng;

pub use combatant::{Combatant, Target, Turn};
pub use config::{
    ConfigError, GameConfig, ScoringRules, ShellRange, RANKING_LIMIT_MAX, SHELLS_PER_KIND_MAX,
};
pub use rng::{GameRng, RandomSource, ScriptedRng};
