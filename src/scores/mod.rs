//! Final scores and session audit records.
//!
//! - `ScoreRecorder`: the persistence boundary the session store writes to
//! - `MemoryScoreRecorder`: in-process implementation
//! - `ranking`: ordering, limit cap and statistics shared by backends

pub mod ranking;
mod recorder;
mod records;

pub use recorder::{MemoryScoreRecorder, RecordError, ScoreRecorder};
pub use records::{
    RankingEntry, ScoreRecord, SessionAudit, SessionEnd, SessionStart, Statistics,
};
