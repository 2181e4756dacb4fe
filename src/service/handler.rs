//! Transport-agnostic request handling.
//!
//! A web layer deserializes a request record, calls the matching
//! `GameService` method with a per-request random source, and serializes
//! either the response or the [`ErrorResponse`].

use std::sync::Arc;

use time::OffsetDateTime;

use crate::core::{ConfigError, GameConfig, RandomSource};
use crate::scores::ScoreRecorder;
use crate::session::SessionStore;

use super::api::{
    BotTurnRequest, ErrorResponse, HealthReport, PlayerShootRequest, RankingRequest,
    RankingResponse, ShotResponse, StartGameRequest, StartGameResponse, StatisticsResponse,
    DEFAULT_PLAYER_NAME, DEFAULT_RANKING_LIMIT,
};

/// Entry point for every request kind.
pub struct GameService {
    store: SessionStore,
    recorder: Arc<dyn ScoreRecorder>,
}

impl GameService {
    pub fn new(config: GameConfig, recorder: Arc<dyn ScoreRecorder>) -> Result<Self, ConfigError> {
        let store = SessionStore::new(config, recorder.clone())?;
        Ok(Self { store, recorder })
    }

    /// Wrap an existing store; `recorder` should be the one it writes to.
    pub fn from_store(store: SessionStore, recorder: Arc<dyn ScoreRecorder>) -> Self {
        Self { store, recorder }
    }

    #[must_use]
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn start_game<R: RandomSource>(
        &self,
        request: &StartGameRequest,
        rng: &mut R,
    ) -> Result<StartGameResponse, ErrorResponse> {
        let name = match request.name.trim() {
            "" => DEFAULT_PLAYER_NAME,
            trimmed => trimmed,
        };
        Ok(self.store.create(name, rng)?.into())
    }

    pub fn player_shoot<R: RandomSource>(
        &self,
        request: &PlayerShootRequest,
        rng: &mut R,
    ) -> Result<ShotResponse, ErrorResponse> {
        let outcome = self.store.player_shoot(&request.token, request.target, rng)?;
        Ok(ShotResponse::from(&outcome))
    }

    pub fn bot_turn<R: RandomSource>(
        &self,
        request: &BotTurnRequest,
        rng: &mut R,
    ) -> Result<ShotResponse, ErrorResponse> {
        let outcome = self.store.bot_turn(&request.token, rng)?;
        Ok(ShotResponse::from(&outcome))
    }

    /// Top scores; the limit is capped at the configured maximum.
    pub fn ranking(&self, request: &RankingRequest) -> Result<RankingResponse, ErrorResponse> {
        let limit = request
            .limit
            .unwrap_or(DEFAULT_RANKING_LIMIT)
            .min(self.store.config().ranking_limit);
        let ranking = match request.since {
            Some(since) => self.recorder.ranking_since(limit, since)?,
            None => self.recorder.ranking(limit)?,
        };
        Ok(ranking.into())
    }

    pub fn statistics(&self) -> Result<StatisticsResponse, ErrorResponse> {
        let statistics = self.recorder.statistics()?;
        Ok(StatisticsResponse { statistics })
    }

    pub fn health(&self) -> HealthReport {
        HealthReport {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: OffsetDateTime::now_utc(),
            active_sessions: self.store.active_sessions(),
        }
    }
}
