//! What callers see of a session.
//!
//! Results are discriminated: a shot request either reloaded, fired, or
//! ended the match, and each case carries exactly the fields it has.

use serde::{Deserialize, Serialize};

use crate::core::{Combatant, Turn};
use crate::rules::MessageKind;

use super::state::{GameSession, SessionToken, ShotRecord};

/// Read-only copy of a session's observable fields.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub token: SessionToken,
    pub player_name: String,
    pub player_lives: u32,
    pub bot_lives: u32,
    pub score: u32,
    pub shells_remaining: usize,
    pub turn: Turn,
    pub shots_fired: u32,
}

impl SessionSnapshot {
    #[must_use]
    pub fn player_turn(&self) -> bool {
        self.turn.is_player()
    }
}

impl From<&GameSession> for SessionSnapshot {
    fn from(session: &GameSession) -> Self {
        Self {
            token: session.token().clone(),
            player_name: session.player_name().to_string(),
            player_lives: session.player_lives,
            bot_lives: session.bot_lives,
            score: session.score,
            shells_remaining: session.magazine.len(),
            turn: session.turn,
            shots_fired: session.shots_fired,
        }
    }
}

/// A freshly started match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Started {
    pub snapshot: SessionSnapshot,
    pub live_count: u32,
    pub blank_count: u32,
}

impl Started {
    #[must_use]
    pub fn message(&self) -> MessageKind {
        MessageKind::Loaded {
            live: self.live_count,
            blank: self.blank_count,
        }
    }
}

/// Result of a `player_shoot` or `bot_turn` request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum ShotOutcome {
    /// The magazine was empty and has been refilled. No shell was fired
    /// and the turn did not change; the caller should shoot again.
    Reloaded {
        snapshot: SessionSnapshot,
        live_count: u32,
        blank_count: u32,
    },
    /// A shell was fired and the match continues.
    Fired {
        snapshot: SessionSnapshot,
        shot: ShotRecord,
    },
    /// A shell was fired and a life total hit zero. The session has been
    /// finalized and removed from the store.
    GameOver {
        snapshot: SessionSnapshot,
        shot: Option<ShotRecord>,
        winner: Combatant,
    },
}

impl ShotOutcome {
    #[must_use]
    pub fn snapshot(&self) -> &SessionSnapshot {
        match self {
            ShotOutcome::Reloaded { snapshot, .. }
            | ShotOutcome::Fired { snapshot, .. }
            | ShotOutcome::GameOver { snapshot, .. } => snapshot,
        }
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        matches!(self, ShotOutcome::GameOver { .. })
    }

    #[must_use]
    pub fn is_reloaded(&self) -> bool {
        matches!(self, ShotOutcome::Reloaded { .. })
    }

    #[must_use]
    pub fn turn_changed(&self) -> bool {
        match self {
            ShotOutcome::Reloaded { .. } => false,
            ShotOutcome::Fired { shot, .. } => shot.turn_changed,
            ShotOutcome::GameOver { shot, .. } => shot.is_some_and(|s| s.turn_changed),
        }
    }

    /// The message for this result. A finished match reports the
    /// victory or defeat rather than the final shot.
    #[must_use]
    pub fn message(&self) -> MessageKind {
        match self {
            ShotOutcome::Reloaded {
                live_count,
                blank_count,
                ..
            } => MessageKind::Reloaded {
                live: *live_count,
                blank: *blank_count,
            },
            ShotOutcome::Fired { shot, .. } => shot.message,
            ShotOutcome::GameOver { winner, .. } => match winner {
                Combatant::Player => MessageKind::Victory,
                Combatant::Bot => MessageKind::Defeat,
            },
        }
    }
}
