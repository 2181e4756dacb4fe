//! Persisted record shapes and the read models derived from them.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// One row per finished match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub name: String,
    pub score: u32,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    pub session_token: String,
}

/// Audit row written when a session starts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStart {
    pub session_token: String,
    pub player_name: String,
    #[serde(with = "time::serde::rfc3339")]
    pub start_time: OffsetDateTime,
}

/// Audit fields filled in when a session ends.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionEnd {
    pub session_token: String,
    #[serde(with = "time::serde::rfc3339")]
    pub end_time: OffsetDateTime,
    pub final_score: u32,
    pub shots_fired: u32,
}

/// Full audit record, one per session token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionAudit {
    pub session_token: String,
    pub player_name: String,
    #[serde(with = "time::serde::rfc3339")]
    pub start_time: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub end_time: Option<OffsetDateTime>,
    pub final_score: Option<u32>,
    pub shots_fired: u32,
}

impl SessionAudit {
    /// Audit record for a session that has just started.
    pub fn opened(start: &SessionStart) -> Self {
        Self {
            session_token: start.session_token.clone(),
            player_name: start.player_name.clone(),
            start_time: start.start_time,
            end_time: None,
            final_score: None,
            shots_fired: 0,
        }
    }

    /// Fill in the end-of-session fields.
    pub fn close(&mut self, end: &SessionEnd) {
        self.end_time = Some(end.end_time);
        self.final_score = Some(end.final_score);
        self.shots_fired = end.shots_fired;
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.end_time.is_some()
    }
}

/// Public ranking row.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingEntry {
    pub name: String,
    pub score: u32,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

impl From<&ScoreRecord> for RankingEntry {
    fn from(record: &ScoreRecord) -> Self {
        Self {
            name: record.name.clone(),
            score: record.score,
            timestamp: record.timestamp,
        }
    }
}

/// Aggregates over all recorded scores.
///
/// `max_score`/`min_score` are `None` before the first finished match.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub total_matches: u64,
    pub average_score: f64,
    pub max_score: Option<u32>,
    pub min_score: Option<u32>,
}
