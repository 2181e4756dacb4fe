//! Request/response contract for a transport layer.
//!
//! - `api`: typed request and response records
//! - `GameService`: maps requests onto the session store and recorder
//!
//! Routing, wire serialization and timeouts belong to the embedding
//! server; nothing here does I/O beyond the injected recorder.

pub mod api;
mod handler;

pub use api::{
    BotTurnRequest, ErrorResponse, HealthReport, PlayerShootRequest, RankingRequest,
    RankingResponse, ShotResponse, StartGameRequest, StartGameResponse, StatisticsResponse,
};
pub use handler::GameService;
