//! Session operation errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::scores::RecordError;

use super::state::SessionToken;
use super::view::SessionSnapshot;

/// Machine-readable error class, stable across transports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    UnknownSession,
    OutOfTurn,
    InternalError,
}

#[derive(Debug, Error)]
pub enum SessionError {
    /// Never created, or already finished and removed.
    #[error("unknown session {0}")]
    UnknownSession(SessionToken),

    /// The player tried to shoot during the bot's turn. Carries the
    /// current state so the caller can resynchronize.
    #[error("not your turn")]
    OutOfTurn(Box<SessionSnapshot>),

    /// A persistence write failed. For a finished match the session stays
    /// registered so finalize can be retried.
    #[error("internal error: {source}")]
    Internal {
        #[source]
        source: RecordError,
        snapshot: Option<Box<SessionSnapshot>>,
    },
}

impl SessionError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            SessionError::UnknownSession(_) => ErrorKind::UnknownSession,
            SessionError::OutOfTurn(_) => ErrorKind::OutOfTurn,
            SessionError::Internal { .. } => ErrorKind::InternalError,
        }
    }

    /// Last known state, when there is one.
    #[must_use]
    pub fn snapshot(&self) -> Option<&SessionSnapshot> {
        match self {
            SessionError::UnknownSession(_) => None,
            SessionError::OutOfTurn(snapshot) => Some(snapshot),
            SessionError::Internal { snapshot, .. } => snapshot.as_deref(),
        }
    }

    pub(crate) fn internal(source: RecordError, snapshot: Option<SessionSnapshot>) -> Self {
        SessionError::Internal {
            source,
            snapshot: snapshot.map(Box::new),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Turn;

    fn snapshot() -> SessionSnapshot {
        SessionSnapshot {
            token: SessionToken::from("tok"),
            player_name: "Ana".to_string(),
            player_lives: 2,
            bot_lives: 0,
            score: 10,
            shells_remaining: 1,
            turn: Turn::Bot,
            shots_fired: 1,
        }
    }

    #[test]
    fn test_kind_and_snapshot_per_variant() {
        let unknown = SessionError::UnknownSession(SessionToken::from("tok"));
        assert_eq!(unknown.kind(), ErrorKind::UnknownSession);
        assert!(unknown.snapshot().is_none());

        let out_of_turn = SessionError::OutOfTurn(Box::new(snapshot()));
        assert_eq!(out_of_turn.kind(), ErrorKind::OutOfTurn);
        assert_eq!(out_of_turn.snapshot(), Some(&snapshot()));

        let internal = SessionError::internal(
            RecordError::Unavailable("disk full".to_string()),
            Some(snapshot()),
        );
        assert_eq!(internal.kind(), ErrorKind::InternalError);
        assert_eq!(internal.snapshot().map(|s| s.bot_lives), Some(0));
    }

    #[test]
    fn test_internal_keeps_source() {
        let err = SessionError::internal(RecordError::Unavailable("disk full".to_string()), None);
        let source = std::error::Error::source(&err).unwrap();
        assert_eq!(source.to_string(), "score storage unavailable: disk full");
        assert_eq!(err.to_string(), "internal error: score storage unavailable: disk full");
    }

    #[test]
    fn test_kind_wire_names() {
        assert_eq!(
            serde_json::to_string(&ErrorKind::InternalError).unwrap(),
            "\"internal_error\""
        );
        assert_eq!(serde_json::to_string(&ErrorKind::OutOfTurn).unwrap(), "\"out_of_turn\"");
    }
}
