//! Request and response records for the transport layer.
//!
//! Every field is explicit; flags such as `reloaded` and `game_over` are
//! derived from the discriminated [`ShotOutcome`], never defaulted.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::core::Target;
use crate::scores::{RankingEntry, RecordError, Statistics};
use crate::session::{ErrorKind, SessionError, SessionSnapshot, SessionToken, ShotOutcome, Started};

/// Name used when a player leaves theirs blank.
pub const DEFAULT_PLAYER_NAME: &str = "Player";

/// Ranking size when the caller does not ask for one.
pub const DEFAULT_RANKING_LIMIT: usize = 10;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartGameRequest {
    #[serde(default)]
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartGameResponse {
    pub token: SessionToken,
    pub player_lives: u32,
    pub bot_lives: u32,
    pub score: u32,
    pub shells_remaining: usize,
    pub player_turn: bool,
    pub message: String,
}

impl From<Started> for StartGameResponse {
    fn from(started: Started) -> Self {
        let message = started.message().to_string();
        let s = started.snapshot;
        Self {
            player_turn: s.player_turn(),
            token: s.token,
            player_lives: s.player_lives,
            bot_lives: s.bot_lives,
            score: s.score,
            shells_remaining: s.shells_remaining,
            message,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerShootRequest {
    pub token: SessionToken,
    pub target: Target,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotTurnRequest {
    pub token: SessionToken,
}

/// Response to `PlayerShoot` and `BotTurn`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShotResponse {
    pub player_lives: u32,
    pub bot_lives: u32,
    pub score: u32,
    pub shells_remaining: usize,
    pub turn_changed: bool,
    pub player_turn: bool,
    pub game_over: bool,
    pub reloaded: bool,
    pub message: String,
}

impl From<&ShotOutcome> for ShotResponse {
    fn from(outcome: &ShotOutcome) -> Self {
        let s = outcome.snapshot();
        Self {
            player_lives: s.player_lives,
            bot_lives: s.bot_lives,
            score: s.score,
            shells_remaining: s.shells_remaining,
            turn_changed: outcome.turn_changed(),
            player_turn: s.player_turn(),
            game_over: outcome.is_game_over(),
            reloaded: outcome.is_reloaded(),
            message: outcome.message().to_string(),
        }
    }
}

/// Error body. `state` is the last known session state when one exists,
/// so the client can resynchronize without replaying the match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub kind: ErrorKind,
    pub message: String,
    pub state: Option<SessionSnapshot>,
}

impl From<SessionError> for ErrorResponse {
    fn from(err: SessionError) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
            state: err.snapshot().cloned(),
        }
    }
}

impl From<RecordError> for ErrorResponse {
    fn from(err: RecordError) -> Self {
        Self {
            kind: ErrorKind::InternalError,
            message: err.to_string(),
            state: None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingRequest {
    #[serde(default)]
    pub limit: Option<usize>,
    /// Only scores recorded at or after this instant.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub since: Option<OffsetDateTime>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingResponse {
    pub ranking: Vec<RankingEntry>,
    pub total: usize,
}

impl From<Vec<RankingEntry>> for RankingResponse {
    fn from(ranking: Vec<RankingEntry>) -> Self {
        Self {
            total: ranking.len(),
            ranking,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StatisticsResponse {
    pub statistics: Statistics,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: String,
    pub version: String,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    pub active_sessions: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Combatant, Turn};
    use crate::magazine::Shell;
    use crate::rules::MessageKind;
    use crate::session::ShotRecord;

    fn snapshot() -> SessionSnapshot {
        SessionSnapshot {
            token: SessionToken::from("tok"),
            player_name: "Ana".to_string(),
            player_lives: 1,
            bot_lives: 0,
            score: 20,
            shells_remaining: 3,
            turn: Turn::Bot,
            shots_fired: 4,
        }
    }

    #[test]
    fn test_reload_response_flags() {
        let outcome = ShotOutcome::Reloaded {
            snapshot: snapshot(),
            live_count: 1,
            blank_count: 2,
        };
        let response = ShotResponse::from(&outcome);
        assert!(response.reloaded);
        assert!(!response.game_over);
        assert!(!response.turn_changed);
        assert_eq!(response.message, "New round: 1 live, 2 blank");
    }

    #[test]
    fn test_game_over_response_flags() {
        let outcome = ShotOutcome::GameOver {
            snapshot: snapshot(),
            shot: Some(ShotRecord {
                actor: Combatant::Player,
                target: Target::Opponent,
                shell: Shell::Live,
                turn_changed: true,
                message: MessageKind::PlayerHitBot,
            }),
            winner: Combatant::Player,
        };
        let response = ShotResponse::from(&outcome);
        assert!(response.game_over);
        assert!(!response.reloaded);
        assert!(response.turn_changed);
        assert!(!response.player_turn);
        assert_eq!(response.score, 20);
        assert_eq!(response.message, "VICTORY! You defeated the bot");
    }

    #[test]
    fn test_error_response_from_session_error() {
        let response = ErrorResponse::from(SessionError::OutOfTurn(Box::new(snapshot())));
        assert_eq!(response.kind, ErrorKind::OutOfTurn);
        assert_eq!(response.message, "not your turn");
        assert_eq!(response.state, Some(snapshot()));

        let response = ErrorResponse::from(SessionError::UnknownSession(SessionToken::from("x")));
        assert_eq!(response.kind, ErrorKind::UnknownSession);
        assert_eq!(response.message, "unknown session x");
        assert!(response.state.is_none());
    }

    #[test]
    fn test_error_response_from_record_error() {
        let response = ErrorResponse::from(RecordError::Unavailable("down".to_string()));
        assert_eq!(response.kind, ErrorKind::InternalError);
        assert!(response.state.is_none());
    }

    #[test]
    fn test_ranking_request_defaults() {
        let request: RankingRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(request, RankingRequest::default());

        let response = RankingResponse::from(Vec::new());
        assert_eq!(response.total, 0);
    }
}
