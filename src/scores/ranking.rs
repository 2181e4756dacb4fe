//! Ranking order and statistics, shared by every recorder backend.

use std::cmp::Ordering;

use time::OffsetDateTime;

use crate::core::RANKING_LIMIT_MAX;

use super::{RankingEntry, ScoreRecord, Statistics};

/// Clamp a requested ranking size to the hard cap.
#[must_use]
pub fn clamp_limit(limit: usize) -> usize {
    limit.min(RANKING_LIMIT_MAX)
}

/// Score descending, then most recent first.
pub fn ranking_order(a: &ScoreRecord, b: &ScoreRecord) -> Ordering {
    b.score.cmp(&a.score).then_with(|| b.timestamp.cmp(&a.timestamp))
}

/// Top `limit` entries (capped) among `records`, optionally only those
/// recorded at or after `since`.
pub fn rank<'a>(
    records: impl IntoIterator<Item = &'a ScoreRecord>,
    limit: usize,
    since: Option<OffsetDateTime>,
) -> Vec<RankingEntry> {
    let mut selected: Vec<&ScoreRecord> = records
        .into_iter()
        .filter(|r| since.map_or(true, |t| r.timestamp >= t))
        .collect();
    selected.sort_by(|a, b| ranking_order(a, b));
    selected
        .into_iter()
        .take(clamp_limit(limit))
        .map(RankingEntry::from)
        .collect()
}

/// Count, mean (rounded to two decimals), max and min score.
pub fn statistics<'a>(records: impl IntoIterator<Item = &'a ScoreRecord>) -> Statistics {
    let mut stats = Statistics::default();
    let mut total: u64 = 0;

    for record in records {
        stats.total_matches += 1;
        total += u64::from(record.score);
        stats.max_score = Some(stats.max_score.map_or(record.score, |m| m.max(record.score)));
        stats.min_score = Some(stats.min_score.map_or(record.score, |m| m.min(record.score)));
    }

    if stats.total_matches > 0 {
        let mean = total as f64 / stats.total_matches as f64;
        stats.average_score = (mean * 100.0).round() / 100.0;
    }

    stats
}
