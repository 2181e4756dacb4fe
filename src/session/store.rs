//! Concurrency-safe registry of live sessions and the operations on them.
//!
//! ## Locking
//!
//! - The token index (`SessionRegistry`) is locked only long enough to
//!   clone a handle, insert, or remove.
//! - Each session sits behind its own `Mutex`. A shot holds that mutex
//!   from the shell draw through the turn flip, so no caller ever sees a
//!   half-applied shot, and shots on different sessions never contend.
//! - Finalize writes run under the session mutex only. A request that
//!   was waiting on the mutex when the session got evicted finds it
//!   `Closed` and gets `UnknownSession`.
//!
//! ## State machine
//!
//! ```text
//!   create ──> PlayerTurn <──────> BotTurn
//!                  │                  │
//!                  └──── lives 0 ─────┴──> Finishing ──finalize ok──> (removed)
//!                                            │  ^
//!                                            └──┘ finalize failed: InternalError, retry
//! ```

use std::sync::{Arc, Mutex, RwLock};

use rustc_hash::FxHashMap;
use time::OffsetDateTime;

use crate::core::{Combatant, ConfigError, GameConfig, RandomSource, Target};
use crate::magazine::MagazineLoader;
use crate::rules::{BotPolicy, ShotResolver};
use crate::scores::{RecordError, ScoreRecord, ScoreRecorder, SessionEnd, SessionStart};

use super::error::SessionError;
use super::state::{GameSession, SessionStatus, SessionToken, ShotRecord};
use super::view::{SessionSnapshot, ShotOutcome, Started};

/// Shared handle to one session.
pub type SessionHandle = Arc<Mutex<GameSession>>;

/// Token index. Implementations only guard the map itself; session
/// fields are protected by each handle's mutex.
pub trait SessionRegistry: Send + Sync {
    /// Register a session. Returns `false` if the token is taken.
    fn insert(&self, token: SessionToken, session: SessionHandle) -> bool;

    fn get(&self, token: &SessionToken) -> Option<SessionHandle>;

    fn remove(&self, token: &SessionToken) -> Option<SessionHandle>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// In-process registry: an `FxHashMap` behind a `RwLock`.
#[derive(Debug, Default)]
pub struct SharedSessionMap {
    index: RwLock<FxHashMap<SessionToken, SessionHandle>>,
}

impl SharedSessionMap {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionRegistry for SharedSessionMap {
    fn insert(&self, token: SessionToken, session: SessionHandle) -> bool {
        let mut index = self.index.write().expect("session index lock poisoned");
        if index.contains_key(&token) {
            return false;
        }
        index.insert(token, session);
        true
    }

    fn get(&self, token: &SessionToken) -> Option<SessionHandle> {
        self.index
            .read()
            .expect("session index lock poisoned")
            .get(token)
            .cloned()
    }

    fn remove(&self, token: &SessionToken) -> Option<SessionHandle> {
        self.index
            .write()
            .expect("session index lock poisoned")
            .remove(token)
    }

    fn len(&self) -> usize {
        self.index.read().expect("session index lock poisoned").len()
    }
}

/// Creates, mutates and retires game sessions.
///
/// Randomness is passed into each operation; the store itself holds no
/// generator.
pub struct SessionStore {
    config: GameConfig,
    loader: MagazineLoader,
    resolver: ShotResolver,
    bot: BotPolicy,
    registry: Box<dyn SessionRegistry>,
    recorder: Arc<dyn ScoreRecorder>,
}

impl SessionStore {
    /// Create a store backed by a [`SharedSessionMap`].
    pub fn new(config: GameConfig, recorder: Arc<dyn ScoreRecorder>) -> Result<Self, ConfigError> {
        Self::with_registry(config, recorder, Box::new(SharedSessionMap::new()))
    }

    /// Create a store over a custom registry.
    pub fn with_registry(
        config: GameConfig,
        recorder: Arc<dyn ScoreRecorder>,
        registry: Box<dyn SessionRegistry>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            loader: MagazineLoader::from_config(&config),
            resolver: ShotResolver::new(config.scoring),
            bot: BotPolicy::new(config.bot_aim_at_player),
            config,
            registry,
            recorder,
        })
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Number of registered sessions, including any awaiting a finalize retry.
    #[must_use]
    pub fn active_sessions(&self) -> usize {
        self.registry.len()
    }

    /// Start a match: mint a token, load a magazine, register, write the
    /// audit "start" record.
    ///
    /// The session is unregistered again if the audit write fails. The
    /// token has not been handed out at that point, so nobody else can
    /// have reached it.
    pub fn create<R: RandomSource>(
        &self,
        player_name: &str,
        rng: &mut R,
    ) -> Result<Started, SessionError> {
        let token = SessionToken::generate();
        let load = self.loader.load(rng);
        let session = GameSession::new(token.clone(), player_name, &self.config, load.magazine);
        let snapshot = SessionSnapshot::from(&session);
        let start = SessionStart {
            session_token: token.to_string(),
            player_name: player_name.to_string(),
            start_time: session.started_at(),
        };

        if !self.registry.insert(token.clone(), Arc::new(Mutex::new(session))) {
            // 256 random bits; a clash means the registry was seeded by hand.
            return Err(SessionError::internal(
                RecordError::DuplicateSession(token.to_string()),
                None,
            ));
        }

        if let Err(err) = self.recorder.open_session(&start) {
            self.registry.remove(&token);
            tracing::warn!(player = player_name, "session audit write failed: {err}");
            return Err(SessionError::internal(err, None));
        }

        tracing::info!(
            token = token.short(),
            player = player_name,
            live = load.live_count,
            blank = load.blank_count,
            "game started"
        );

        Ok(Started {
            snapshot,
            live_count: load.live_count,
            blank_count: load.blank_count,
        })
    }

    /// Fire the player's shot at `target`.
    pub fn player_shoot<R: RandomSource>(
        &self,
        token: &SessionToken,
        target: Target,
        rng: &mut R,
    ) -> Result<ShotOutcome, SessionError> {
        let handle = self.lookup(token)?;
        let mut session = handle.lock().expect("session lock poisoned");

        if let Some(pending) = self.check_status(token, &mut session) {
            return pending;
        }
        if !session.turn.is_player() {
            return Err(SessionError::OutOfTurn(Box::new(SessionSnapshot::from(&*session))));
        }

        self.fire(&mut session, Combatant::Player, |_| target, rng)
    }

    /// Let the bot take a shot.
    ///
    /// Only requires the session to exist; whose turn it is is the
    /// caller's business.
    pub fn bot_turn<R: RandomSource>(
        &self,
        token: &SessionToken,
        rng: &mut R,
    ) -> Result<ShotOutcome, SessionError> {
        let handle = self.lookup(token)?;
        let mut session = handle.lock().expect("session lock poisoned");

        if let Some(pending) = self.check_status(token, &mut session) {
            return pending;
        }
        if session.turn.is_player() {
            tracing::warn!(token = token.short(), "bot turn requested during the player's turn");
        }

        let bot = self.bot;
        self.fire(&mut session, Combatant::Bot, |rng| bot.choose_target(rng), rng)
    }

    /// Read-only snapshot.
    pub fn get(&self, token: &SessionToken) -> Result<SessionSnapshot, SessionError> {
        let handle = self.lookup(token)?;
        let session = handle.lock().expect("session lock poisoned");
        if session.status == SessionStatus::Closed {
            return Err(SessionError::UnknownSession(token.clone()));
        }
        Ok(SessionSnapshot::from(&*session))
    }

    /// Retry the finalize step of a finished match left registered by an
    /// earlier `InternalError`.
    ///
    /// Returns `Ok(None)` when the match is still in play.
    pub fn finalize(&self, token: &SessionToken) -> Result<Option<ShotOutcome>, SessionError> {
        let handle = self.lookup(token)?;
        let mut session = handle.lock().expect("session lock poisoned");

        match session.status {
            SessionStatus::Active => Ok(None),
            SessionStatus::Finishing { .. } => self.finalize_locked(&mut session).map(Some),
            SessionStatus::Closed => Err(SessionError::UnknownSession(token.clone())),
        }
    }

    fn lookup(&self, token: &SessionToken) -> Result<SessionHandle, SessionError> {
        self.registry
            .get(token)
            .ok_or_else(|| SessionError::UnknownSession(token.clone()))
    }

    /// Short-circuit for sessions that must not be shot at any more.
    fn check_status(
        &self,
        token: &SessionToken,
        session: &mut GameSession,
    ) -> Option<Result<ShotOutcome, SessionError>> {
        match session.status {
            SessionStatus::Active => None,
            SessionStatus::Finishing { .. } => Some(self.finalize_locked(session)),
            SessionStatus::Closed => Some(Err(SessionError::UnknownSession(token.clone()))),
        }
    }

    /// Draw, pick a target, resolve, apply. Reloads instead when empty.
    fn fire<R, F>(
        &self,
        session: &mut GameSession,
        actor: Combatant,
        pick_target: F,
        rng: &mut R,
    ) -> Result<ShotOutcome, SessionError>
    where
        R: RandomSource,
        F: FnOnce(&mut R) -> Target,
    {
        let Some(shell) = session.draw() else {
            let load = self.loader.load(rng);
            session.reload(&load);
            tracing::debug!(
                token = session.token().short(),
                live = load.live_count,
                blank = load.blank_count,
                "magazine reloaded"
            );
            return Ok(ShotOutcome::Reloaded {
                snapshot: SessionSnapshot::from(&*session),
                live_count: load.live_count,
                blank_count: load.blank_count,
            });
        };

        let target = pick_target(rng);
        let outcome = self.resolver.resolve(shell, target, actor);
        let shot = ShotRecord {
            actor,
            target,
            shell,
            turn_changed: outcome.turn_changes,
            message: outcome.message,
        };
        session.apply(shot, &outcome);

        tracing::debug!(
            token = session.token().short(),
            %actor,
            ?target,
            ?shell,
            player_lives = session.player_lives,
            bot_lives = session.bot_lives,
            score = session.score,
            "shot resolved"
        );

        if session.is_over() {
            return self.finalize_locked(session);
        }

        Ok(ShotOutcome::Fired {
            snapshot: SessionSnapshot::from(&*session),
            shot,
        })
    }

    /// Persist the final score, close the audit record, evict.
    ///
    /// Each write is attempted at most once per successful call; a failed
    /// call leaves the session registered in `Finishing` so the next one
    /// resumes where this stopped.
    fn finalize_locked(&self, session: &mut GameSession) -> Result<ShotOutcome, SessionError> {
        let SessionStatus::Finishing { score_recorded } = session.status else {
            return Err(SessionError::UnknownSession(session.token().clone()));
        };
        let token = session.token().clone();
        let now = OffsetDateTime::now_utc();

        if !score_recorded {
            let record = ScoreRecord {
                name: session.player_name().to_string(),
                score: session.score,
                timestamp: now,
                session_token: token.to_string(),
            };
            self.recorder.record_score(&record).map_err(|err| {
                tracing::warn!(token = token.short(), "score write failed, session kept: {err}");
                SessionError::internal(err, Some(SessionSnapshot::from(&*session)))
            })?;
            session.status = SessionStatus::Finishing { score_recorded: true };
        }

        self.recorder
            .close_session(&SessionEnd {
                session_token: token.to_string(),
                end_time: now,
                final_score: session.score,
                shots_fired: session.shots_fired,
            })
            .map_err(|err| {
                tracing::warn!(token = token.short(), "audit close failed, session kept: {err}");
                SessionError::internal(err, Some(SessionSnapshot::from(&*session)))
            })?;

        session.status = SessionStatus::Closed;
        self.registry.remove(&token);

        // Lives are zero on one side by construction of `Finishing`.
        let winner = session.winner().unwrap_or(Combatant::Bot);
        tracing::info!(
            token = token.short(),
            player = session.player_name(),
            score = session.score,
            shots = session.shots_fired,
            %winner,
            "game over"
        );

        Ok(ShotOutcome::GameOver {
            snapshot: SessionSnapshot::from(&*session),
            shot: session.last_shot,
            winner,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{GameRng, ScriptedRng, Turn};
    use crate::magazine::{Magazine, Shell};
    use crate::scores::MemoryScoreRecorder;

    fn store() -> (SessionStore, Arc<MemoryScoreRecorder>) {
        let recorder = Arc::new(MemoryScoreRecorder::new());
        let store = SessionStore::new(GameConfig::default(), recorder.clone()).unwrap();
        (store, recorder)
    }

    fn set_magazine(store: &SessionStore, token: &SessionToken, shells: &[Shell]) {
        let handle = store.lookup(token).unwrap();
        let mut session = handle.lock().unwrap();
        session.magazine = Magazine::from_shells(shells.iter().copied());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let recorder = Arc::new(MemoryScoreRecorder::new());
        let config = GameConfig::default().with_live_shells(5, 1);
        assert!(SessionStore::new(config, recorder).is_err());
    }

    #[test]
    fn test_create_registers_and_audits() {
        let (store, recorder) = store();
        let started = store.create("Ana", &mut GameRng::new(1)).unwrap();

        assert_eq!(store.active_sessions(), 1);
        let audit = recorder.audit(started.snapshot.token.as_str()).unwrap();
        assert_eq!(audit.player_name, "Ana");
        assert!(!audit.is_closed());
    }

    #[test]
    fn test_create_fails_on_audit_error() {
        let (store, recorder) = store();
        recorder.fail_next(1);

        let err = store.create("Ana", &mut GameRng::new(1)).unwrap_err();
        assert!(matches!(err, SessionError::Internal { snapshot: None, .. }));
        assert_eq!(store.active_sessions(), 0);
        assert_eq!(recorder.audit_count(), 0);

        // The failed attempt left nothing behind
        store.create("Ana", &mut GameRng::new(1)).unwrap();
        assert_eq!(store.active_sessions(), 1);
        assert_eq!(recorder.audit_count(), 1);
    }

    /// Registry that refuses every session.
    struct FullRegistry;

    impl SessionRegistry for FullRegistry {
        fn insert(&self, _token: SessionToken, _session: SessionHandle) -> bool {
            false
        }

        fn get(&self, _token: &SessionToken) -> Option<SessionHandle> {
            None
        }

        fn remove(&self, _token: &SessionToken) -> Option<SessionHandle> {
            None
        }

        fn len(&self) -> usize {
            0
        }
    }

    #[test]
    fn test_rejected_insert_writes_no_audit() {
        let recorder = Arc::new(MemoryScoreRecorder::new());
        let registry = Box::new(FullRegistry);
        let store = SessionStore::with_registry(GameConfig::default(), recorder.clone(), registry)
            .unwrap();

        let err = store.create("Ana", &mut GameRng::new(1)).unwrap_err();

        assert!(matches!(
            err,
            SessionError::Internal { source: RecordError::DuplicateSession(_), snapshot: None }
        ));
        assert_eq!(recorder.audit_count(), 0);
    }

    #[test]
    fn test_out_of_turn_carries_state() {
        let (store, _) = store();
        let token = store.create("Ana", &mut GameRng::new(1)).unwrap().snapshot.token;
        set_magazine(&store, &token, &[Shell::Blank, Shell::Live]);

        store.player_shoot(&token, Target::Opponent, &mut GameRng::new(2)).unwrap();

        let err = store
            .player_shoot(&token, Target::Opponent, &mut GameRng::new(3))
            .unwrap_err();
        let snapshot = err.snapshot().unwrap();
        assert_eq!(snapshot.turn, Turn::Bot);
        assert_eq!(snapshot.shells_remaining, 1);
    }

    #[test]
    fn test_bot_turn_reloads_when_empty() {
        let (store, _) = store();
        let token = store.create("Ana", &mut GameRng::new(1)).unwrap().snapshot.token;
        set_magazine(&store, &token, &[]);

        let mut rng = ScriptedRng::new().with_integers([2, 3]);
        let outcome = store.bot_turn(&token, &mut rng).unwrap();
        assert!(outcome.is_reloaded());
        assert_eq!(outcome.snapshot().shells_remaining, 5);
        assert_eq!(outcome.snapshot().shots_fired, 0);
    }

    #[test]
    fn test_finalize_on_live_session_is_noop() {
        let (store, _) = store();
        let token = store.create("Ana", &mut GameRng::new(1)).unwrap().snapshot.token;
        assert!(store.finalize(&token).unwrap().is_none());
        assert_eq!(store.active_sessions(), 1);
    }

    #[test]
    fn test_registry_rejects_duplicate_token() {
        let registry = SharedSessionMap::new();
        let token = SessionToken::from("t");
        let session = GameSession::new(token.clone(), "x", &GameConfig::default(), Magazine::new());
        let handle = Arc::new(Mutex::new(session));

        assert!(registry.insert(token.clone(), handle.clone()));
        assert!(!registry.insert(token.clone(), handle));
        assert_eq!(registry.len(), 1);
        assert!(registry.remove(&token).is_some());
        assert!(registry.is_empty());
    }
}
