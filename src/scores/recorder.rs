//! Score persistence boundary.
//!
//! The session store only needs an insert/query contract; which storage
//! engine sits behind it is the embedding application's choice.
//! `MemoryScoreRecorder` is the in-process implementation.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

use im::Vector;
use rustc_hash::FxHashMap;
use thiserror::Error;
use time::OffsetDateTime;

use super::ranking;
use super::{RankingEntry, ScoreRecord, SessionAudit, SessionEnd, SessionStart, Statistics};

/// Persistence failures.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("score storage unavailable: {0}")]
    Unavailable(String),

    #[error("session {0} already has an audit record")]
    DuplicateSession(String),

    #[error("no audit record for session {0}")]
    UnknownSession(String),
}

/// Insert/query contract for finished matches and session audits.
///
/// Implementations must be shareable across request handlers.
pub trait ScoreRecorder: Send + Sync {
    /// Write the audit "start" record. Tokens are unique.
    fn open_session(&self, start: &SessionStart) -> Result<(), RecordError>;

    /// Append a final score.
    fn record_score(&self, record: &ScoreRecord) -> Result<(), RecordError>;

    /// Fill in the end of an audit record.
    fn close_session(&self, end: &SessionEnd) -> Result<(), RecordError>;

    /// Best scores, highest first, ties broken by most recent.
    fn ranking(&self, limit: usize) -> Result<Vec<RankingEntry>, RecordError>;

    /// Like `ranking`, restricted to scores recorded at or after `since`.
    fn ranking_since(
        &self,
        limit: usize,
        since: OffsetDateTime,
    ) -> Result<Vec<RankingEntry>, RecordError>;

    fn statistics(&self) -> Result<Statistics, RecordError>;
}

#[derive(Debug, Default)]
struct MemoryState {
    scores: Vector<ScoreRecord>,
    sessions: FxHashMap<String, SessionAudit>,
}

/// In-process recorder.
///
/// Writes can be made to fail on demand with [`fail_next`], which is how
/// the store's retry path is exercised.
///
/// [`fail_next`]: MemoryScoreRecorder::fail_next
#[derive(Debug, Default)]
pub struct MemoryScoreRecorder {
    state: RwLock<MemoryState>,
    failures: AtomicUsize,
}

impl MemoryScoreRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `count` write calls fail with `Unavailable`.
    pub fn fail_next(&self, count: usize) {
        self.failures.store(count, Ordering::SeqCst);
    }

    /// All score records in insertion order.
    ///
    /// Cheap: the log is a persistent vector.
    #[must_use]
    pub fn scores(&self) -> Vector<ScoreRecord> {
        self.state.read().expect("score recorder lock poisoned").scores.clone()
    }

    /// Audit record for a token, if any.
    #[must_use]
    pub fn audit(&self, token: &str) -> Option<SessionAudit> {
        self.state
            .read()
            .expect("score recorder lock poisoned")
            .sessions
            .get(token)
            .cloned()
    }

    /// Number of audit records, open or closed.
    #[must_use]
    pub fn audit_count(&self) -> usize {
        self.state.read().expect("score recorder lock poisoned").sessions.len()
    }

    fn check_injected_failure(&self) -> Result<(), RecordError> {
        let consumed = self
            .failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
        match consumed {
            Ok(_) => Err(RecordError::Unavailable("injected failure".to_string())),
            Err(_) => Ok(()),
        }
    }
}

impl ScoreRecorder for MemoryScoreRecorder {
    fn open_session(&self, start: &SessionStart) -> Result<(), RecordError> {
        self.check_injected_failure()?;
        let mut state = self.state.write().expect("score recorder lock poisoned");
        if state.sessions.contains_key(&start.session_token) {
            return Err(RecordError::DuplicateSession(start.session_token.clone()));
        }
        state
            .sessions
            .insert(start.session_token.clone(), SessionAudit::opened(start));
        Ok(())
    }

    fn record_score(&self, record: &ScoreRecord) -> Result<(), RecordError> {
        self.check_injected_failure()?;
        let mut state = self.state.write().expect("score recorder lock poisoned");
        state.scores.push_back(record.clone());
        tracing::info!(name = %record.name, score = record.score, "score saved");
        Ok(())
    }

    fn close_session(&self, end: &SessionEnd) -> Result<(), RecordError> {
        self.check_injected_failure()?;
        let mut state = self.state.write().expect("score recorder lock poisoned");
        let audit = state
            .sessions
            .get_mut(&end.session_token)
            .ok_or_else(|| RecordError::UnknownSession(end.session_token.clone()))?;
        audit.close(end);
        Ok(())
    }

    fn ranking(&self, limit: usize) -> Result<Vec<RankingEntry>, RecordError> {
        let scores = self.scores();
        Ok(ranking::rank(&scores, limit, None))
    }

    fn ranking_since(
        &self,
        limit: usize,
        since: OffsetDateTime,
    ) -> Result<Vec<RankingEntry>, RecordError> {
        let scores = self.scores();
        Ok(ranking::rank(&scores, limit, Some(since)))
    }

    fn statistics(&self) -> Result<Statistics, RecordError> {
        let scores = self.scores();
        Ok(ranking::statistics(&scores))
    }
}
