//! # shotgun-roulette
//!
//! Session engine for a turn-based shotgun roulette duel: a human player
//! and a scripted bot take turns drawing shells from a randomized
//! magazine and aiming at each other or themselves. Live shells cost a
//! life, blanks don't; the match ends when either side runs out.
//!
//! ## Design Principles
//!
//! 1. **One rule table**: every shot goes through `ShotResolver::resolve`.
//!    Damage, points and turn passing live there and nowhere else.
//!
//! 2. **Injected randomness**: magazine loads and bot targeting take a
//!    `RandomSource`, so every scenario can be replayed with a seed or an
//!    exact script.
//!
//! 3. **Per-session locking**: the store's index is only locked to find,
//!    add or evict a session. Shots on different sessions never wait on
//!    each other.
//!
//! 4. **Discriminated results**: a shot request reloads, fires, or ends
//!    the match, and the result type says which.
//!
//! ## Modules
//!
//! - `core`: combatants, turns, randomness, configuration
//! - `magazine`: shells and magazine loading
//! - `rules`: shot resolution table and bot policy
//! - `session`: game sessions and the concurrent session store
//! - `scores`: score/audit persistence boundary, ranking, statistics
//! - `service`: typed request/response contract for a transport layer
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use shotgun_roulette::{GameConfig, GameRng, MemoryScoreRecorder, SessionStore, Target};
//!
//! let recorder = Arc::new(MemoryScoreRecorder::new());
//! let store = SessionStore::new(GameConfig::default(), recorder).unwrap();
//! let mut rng = GameRng::new(42);
//!
//! let started = store.create("Ana", &mut rng).unwrap();
//! assert_eq!(started.snapshot.player_lives, 3);
//!
//! let outcome = store
//!     .player_shoot(&started.snapshot.token, Target::Opponent, &mut rng)
//!     .unwrap();
//! assert_eq!(outcome.snapshot().shots_fired, 1);
//! ```

pub mod core;
pub mod magazine;
pub mod rules;
pub mod scores;
pub mod service;
pub mod session;

// Re-export commonly used types
pub use crate::core::{
    Combatant, ConfigError, GameConfig, GameRng, RandomSource, ScoringRules, ScriptedRng,
    ShellRange, Target, Turn,
};

pub use crate::magazine::{Load, Magazine, MagazineLoader, Shell};

pub use crate::rules::{BotPolicy, MessageKind, Outcome, ShotResolver};

pub use crate::session::{
    ErrorKind, GameSession, SessionError, SessionRegistry, SessionSnapshot, SessionStatus,
    SessionStore, SessionToken, SharedSessionMap, ShotOutcome, ShotRecord, Started,
};

pub use crate::scores::{
    MemoryScoreRecorder, RankingEntry, RecordError, ScoreRecord, ScoreRecorder, Statistics,
};

pub use crate::service::GameService;
