//! Per-match state.
//!
//! A `GameSession` is only ever mutated while its store mutex is held.
//! Lives never go below zero; a session whose lives hit zero moves to
//! `SessionStatus::Finishing` and is never shot at again.

use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::core::{Combatant, GameConfig, Target, Turn};
use crate::magazine::{Load, Magazine, Shell};
use crate::rules::{MessageKind, Outcome};

/// Opaque session identifier: 32 bytes from the OS CSPRNG, hex encoded.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    /// Mint a fresh token.
    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = [0u8; 32];
        OsRng.fill_bytes(&mut bytes);
        Self(hex::encode(bytes))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Leading characters, for log lines.
    #[must_use]
    pub fn short(&self) -> &str {
        self.0.get(..8).unwrap_or(&self.0)
    }
}

impl From<String> for SessionToken {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl From<&str> for SessionToken {
    fn from(raw: &str) -> Self {
        Self(raw.to_string())
    }
}

impl std::fmt::Display for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lifecycle of a session inside the store.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionStatus {
    /// Accepting shots.
    #[default]
    Active,
    /// A life total hit zero; the finalize writes have not all succeeded.
    Finishing { score_recorded: bool },
    /// Finalized and evicted. Only observed by requests that grabbed the
    /// session before it was removed.
    Closed,
}

/// The last shot fired, kept for views and finalize retries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShotRecord {
    pub actor: Combatant,
    pub target: Target,
    pub shell: Shell,
    pub turn_changed: bool,
    pub message: MessageKind,
}

/// State of one match.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameSession {
    token: SessionToken,
    player_name: String,
    #[serde(with = "time::serde::rfc3339")]
    started_at: OffsetDateTime,

    pub player_lives: u32,
    pub bot_lives: u32,
    pub score: u32,
    pub magazine: Magazine,
    pub turn: Turn,
    pub shots_fired: u32,
    pub status: SessionStatus,
    pub last_shot: Option<ShotRecord>,
}

impl GameSession {
    /// Start a match with full lives and the given magazine.
    pub fn new(
        token: SessionToken,
        player_name: impl Into<String>,
        config: &GameConfig,
        magazine: Magazine,
    ) -> Self {
        Self {
            token,
            player_name: player_name.into(),
            started_at: OffsetDateTime::now_utc(),
            player_lives: config.max_lives,
            bot_lives: config.max_lives,
            score: 0,
            magazine,
            turn: Turn::Player,
            shots_fired: 0,
            status: SessionStatus::Active,
            last_shot: None,
        }
    }

    #[must_use]
    pub fn token(&self) -> &SessionToken {
        &self.token
    }

    #[must_use]
    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    #[must_use]
    pub fn started_at(&self) -> OffsetDateTime {
        self.started_at
    }

    /// Lives of one combatant.
    #[must_use]
    pub fn lives(&self, who: Combatant) -> u32 {
        match who {
            Combatant::Player => self.player_lives,
            Combatant::Bot => self.bot_lives,
        }
    }

    /// Whether either side is out of lives.
    #[must_use]
    pub fn is_over(&self) -> bool {
        self.player_lives == 0 || self.bot_lives == 0
    }

    /// The surviving side once the match is over.
    #[must_use]
    pub fn winner(&self) -> Option<Combatant> {
        if self.bot_lives == 0 {
            Some(Combatant::Player)
        } else if self.player_lives == 0 {
            Some(Combatant::Bot)
        } else {
            None
        }
    }

    /// Replace the magazine with a fresh load.
    pub fn reload(&mut self, load: &Load) {
        self.magazine = load.magazine.clone();
    }

    /// Draw the front shell, counting it as fired.
    pub fn draw(&mut self) -> Option<Shell> {
        let shell = self.magazine.draw()?;
        self.shots_fired += 1;
        Some(shell)
    }

    /// Apply a resolved shot: damage, points, turn, then game-over check.
    ///
    /// Damage saturates at zero; the score only grows.
    pub fn apply(&mut self, shot: ShotRecord, outcome: &Outcome) {
        match outcome.damage_to {
            Some(Combatant::Player) => self.player_lives = self.player_lives.saturating_sub(1),
            Some(Combatant::Bot) => self.bot_lives = self.bot_lives.saturating_sub(1),
            None => {}
        }
        self.score = self.score.saturating_add(outcome.points_gained);
        if outcome.turn_changes {
            self.turn = self.turn.passed();
        }
        self.last_shot = Some(shot);

        if self.is_over() {
            self.status = SessionStatus::Finishing { score_recorded: false };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ScoringRules;
    use crate::rules::ShotResolver;

    fn session(shells: &[Shell]) -> GameSession {
        GameSession::new(
            SessionToken::from("tok"),
            "Ana",
            &GameConfig::default(),
            Magazine::from_shells(shells.iter().copied()),
        )
    }

    fn fire(s: &mut GameSession, actor: Combatant, target: Target) -> Outcome {
        let shell = s.draw().unwrap();
        let outcome = ShotResolver::new(ScoringRules::default()).resolve(shell, target, actor);
        let shot = ShotRecord {
            actor,
            target,
            shell,
            turn_changed: outcome.turn_changes,
            message: outcome.message,
        };
        s.apply(shot, &outcome);
        outcome
    }

    #[test]
    fn test_token_shape() {
        let a = SessionToken::generate();
        let b = SessionToken::generate();
        assert_eq!(a.as_str().len(), 64);
        assert_eq!(hex::decode(a.as_str()).unwrap().len(), 32);
        assert_eq!(a.as_str(), a.as_str().to_ascii_lowercase());
        assert_eq!(a.short().len(), 8);
        assert_ne!(a, b);
    }

    #[test]
    fn test_new_session() {
        let s = session(&[Shell::Live]);
        assert_eq!(s.player_lives, 3);
        assert_eq!(s.bot_lives, 3);
        assert_eq!(s.score, 0);
        assert_eq!(s.turn, Turn::Player);
        assert_eq!(s.status, SessionStatus::Active);
        assert_eq!(s.player_name(), "Ana");
    }

    #[test]
    fn test_apply_live_hit() {
        let mut s = session(&[Shell::Live, Shell::Blank]);
        fire(&mut s, Combatant::Player, Target::Opponent);

        assert_eq!(s.bot_lives, 2);
        assert_eq!(s.score, 10);
        assert_eq!(s.turn, Turn::Bot);
        assert_eq!(s.shots_fired, 1);
        assert_eq!(s.magazine.len(), 1);
    }

    #[test]
    fn test_lives_hit_zero_enters_finishing() {
        let mut s = session(&[Shell::Live]);
        s.bot_lives = 1;
        fire(&mut s, Combatant::Player, Target::Opponent);

        assert!(s.is_over());
        assert_eq!(s.winner(), Some(Combatant::Player));
        assert_eq!(s.status, SessionStatus::Finishing { score_recorded: false });
    }

    #[test]
    fn test_draw_from_empty() {
        let mut s = session(&[]);
        assert_eq!(s.draw(), None);
        assert_eq!(s.shots_fired, 0);
    }
}
