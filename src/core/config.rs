//! Game configuration.
//!
//! The session engine consumes values, not mechanism:
//! - `ShellRange`: inclusive bounds for live and blank counts per load
//! - `ScoringRules`: points awarded by the resolution table
//! - `GameConfig`: everything above plus lives and the bot's aim
//!
//! Defaults reproduce the classic table (3 lives, 1-4 live, 1-4 blank,
//! 10 points for a live hit, 5 for a self-directed blank, bot aims at
//! the player 70% of the time). `GameConfig::from_env` layers
//! `ROULETTE_*` environment overrides on top.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Hard cap on ranking queries regardless of what a caller asks for.
pub const RANKING_LIMIT_MAX: usize = 100;

/// Largest count either shell range may reach in one load.
pub const SHELLS_PER_KIND_MAX: u32 = 32;

/// Configuration problems detected by [`GameConfig::validate`].
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    #[error("{name} range is empty: min {min} > max {max}")]
    EmptyRange { name: &'static str, min: u32, max: u32 },

    #[error("{name} range max {max} exceeds the cap of {cap}")]
    RangeTooLarge { name: &'static str, max: u32, cap: u32 },

    #[error("a load could come out empty: live and blank minimums are both 0")]
    EmptyLoad,

    #[error("bot aim probability must be within [0, 1], got {0}")]
    Probability(f64),

    #[error("max lives must be at least 1")]
    NoLives,
}

/// Inclusive count range for one shell type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShellRange {
    pub min: u32,
    pub max: u32,
}

impl ShellRange {
    /// Create a new inclusive range.
    #[must_use]
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    /// Check whether a count falls inside the range.
    #[must_use]
    pub fn contains(&self, count: u32) -> bool {
        (self.min..=self.max).contains(&count)
    }

    fn validate(&self, name: &'static str) -> Result<(), ConfigError> {
        if self.min > self.max {
            return Err(ConfigError::EmptyRange {
                name,
                min: self.min,
                max: self.max,
            });
        }
        if self.max > SHELLS_PER_KIND_MAX {
            return Err(ConfigError::RangeTooLarge {
                name,
                max: self.max,
                cap: SHELLS_PER_KIND_MAX,
            });
        }
        Ok(())
    }
}

impl Default for ShellRange {
    fn default() -> Self {
        Self::new(1, 4)
    }
}

/// Points awarded by shot resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringRules {
    /// Player hits the bot with a live shell.
    pub live_hit: u32,
    /// Player survives a blank aimed at themselves.
    pub self_blank: u32,
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            live_hit: 10,
            self_blank: 5,
        }
    }
}

/// Complete game configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Starting (and maximum) lives for both combatants.
    pub max_lives: u32,

    /// Live shells per load.
    pub live_shells: ShellRange,

    /// Blank shells per load.
    pub blank_shells: ShellRange,

    /// Points table.
    pub scoring: ScoringRules,

    /// Probability the bot aims at the player rather than itself.
    pub bot_aim_at_player: f64,

    /// Ranking query cap.
    pub ranking_limit: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            max_lives: 3,
            live_shells: ShellRange::default(),
            blank_shells: ShellRange::default(),
            scoring: ScoringRules::default(),
            bot_aim_at_player: 0.7,
            ranking_limit: RANKING_LIMIT_MAX,
        }
    }
}

impl GameConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set starting lives.
    #[must_use]
    pub fn with_max_lives(mut self, lives: u32) -> Self {
        self.max_lives = lives;
        self
    }

    /// Set the live shell range.
    #[must_use]
    pub fn with_live_shells(mut self, min: u32, max: u32) -> Self {
        self.live_shells = ShellRange::new(min, max);
        self
    }

    /// Set the blank shell range.
    #[must_use]
    pub fn with_blank_shells(mut self, min: u32, max: u32) -> Self {
        self.blank_shells = ShellRange::new(min, max);
        self
    }

    /// Set the points table.
    #[must_use]
    pub fn with_scoring(mut self, scoring: ScoringRules) -> Self {
        self.scoring = scoring;
        self
    }

    /// Set the bot's probability of aiming at the player.
    #[must_use]
    pub fn with_bot_aim(mut self, probability: f64) -> Self {
        self.bot_aim_at_player = probability;
        self
    }

    /// Check the configuration for values the engine cannot honor.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_lives == 0 {
            return Err(ConfigError::NoLives);
        }
        self.live_shells.validate("live shell")?;
        self.blank_shells.validate("blank shell")?;
        if self.live_shells.min == 0 && self.blank_shells.min == 0 {
            return Err(ConfigError::EmptyLoad);
        }
        if !(0.0..=1.0).contains(&self.bot_aim_at_player) {
            return Err(ConfigError::Probability(self.bot_aim_at_player));
        }
        Ok(())
    }

    /// Defaults with `ROULETTE_*` environment overrides applied, validated.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        apply_env_overrides(&mut config);
        config.validate()?;
        Ok(config)
    }
}

/// Apply `ROULETTE_*` environment variables to `config`.
///
/// Unparseable values are logged and ignored.
pub fn apply_env_overrides(config: &mut GameConfig) {
    if let Some(v) = env_parse::<u32>("ROULETTE_MAX_LIVES") {
        config.max_lives = v;
    }
    if let Some(v) = env_parse::<u32>("ROULETTE_LIVE_MIN") {
        config.live_shells.min = v;
    }
    if let Some(v) = env_parse::<u32>("ROULETTE_LIVE_MAX") {
        config.live_shells.max = v;
    }
    if let Some(v) = env_parse::<u32>("ROULETTE_BLANK_MIN") {
        config.blank_shells.min = v;
    }
    if let Some(v) = env_parse::<u32>("ROULETTE_BLANK_MAX") {
        config.blank_shells.max = v;
    }
    if let Some(v) = env_parse::<u32>("ROULETTE_LIVE_HIT_POINTS") {
        config.scoring.live_hit = v;
    }
    if let Some(v) = env_parse::<u32>("ROULETTE_SELF_BLANK_POINTS") {
        config.scoring.self_blank = v;
    }
    if let Some(v) = env_parse::<f64>("ROULETTE_BOT_AIM") {
        config.bot_aim_at_player = v;
    }
}

fn env_parse<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let raw = std::env::var(key).ok()?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    match trimmed.parse::<T>() {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::warn!("invalid {key}, ignoring: {err}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::{Mutex, MutexGuard, OnceLock};

    fn env_lock() -> MutexGuard<'static, ()> {
        static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        LOCK.get_or_init(|| Mutex::new(()))
            .lock()
            .expect("env lock")
    }

    struct EnvGuard {
        _lock: MutexGuard<'static, ()>,
        keys: Vec<String>,
    }

    impl EnvGuard {
        fn new(vars: &[(&str, &str)]) -> Self {
            let lock = env_lock();
            let mut keys = Vec::with_capacity(vars.len());
            for (key, value) in vars {
                std::env::set_var(key, value);
                keys.push((*key).to_string());
            }
            Self { _lock: lock, keys }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            for key in &self.keys {
                std::env::remove_var(key);
            }
        }
    }

    #[test]
    fn test_defaults() {
        let config = GameConfig::default();
        assert_eq!(config.max_lives, 3);
        assert_eq!(config.live_shells, ShellRange::new(1, 4));
        assert_eq!(config.blank_shells, ShellRange::new(1, 4));
        assert_eq!(config.scoring.live_hit, 10);
        assert_eq!(config.scoring.self_blank, 5);
        assert_eq!(config.bot_aim_at_player, 0.7);
        assert_eq!(config.ranking_limit, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = GameConfig::new()
            .with_max_lives(5)
            .with_live_shells(2, 2)
            .with_blank_shells(1, 3)
            .with_bot_aim(0.5);

        assert_eq!(config.max_lives, 5);
        assert!(config.live_shells.contains(2));
        assert!(!config.live_shells.contains(3));
        assert_eq!(config.blank_shells, ShellRange::new(1, 3));
        assert_eq!(config.bot_aim_at_player, 0.5);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert_eq!(
            GameConfig::new().with_live_shells(3, 2).validate(),
            Err(ConfigError::EmptyRange { name: "live shell", min: 3, max: 2 })
        );
        assert_eq!(
            GameConfig::new().with_live_shells(0, 2).with_blank_shells(0, 2).validate(),
            Err(ConfigError::EmptyLoad)
        );
        // One side may be zero as long as the other guarantees a shell
        assert!(GameConfig::new().with_live_shells(0, 2).validate().is_ok());
        assert_eq!(
            GameConfig::new().with_bot_aim(1.5).validate(),
            Err(ConfigError::Probability(1.5))
        );
        assert_eq!(GameConfig::new().with_max_lives(0).validate(), Err(ConfigError::NoLives));
    }

    #[test]
    fn test_validate_caps_range_size() {
        assert_eq!(
            GameConfig::new()
                .with_live_shells(u32::MAX, u32::MAX)
                .with_blank_shells(1, 1)
                .validate(),
            Err(ConfigError::RangeTooLarge { name: "live shell", max: u32::MAX, cap: 32 })
        );
        assert_eq!(
            GameConfig::new().with_blank_shells(0, 33).validate(),
            Err(ConfigError::RangeTooLarge { name: "blank shell", max: 33, cap: 32 })
        );
        assert!(GameConfig::new()
            .with_live_shells(SHELLS_PER_KIND_MAX, SHELLS_PER_KIND_MAX)
            .with_blank_shells(SHELLS_PER_KIND_MAX, SHELLS_PER_KIND_MAX)
            .validate()
            .is_ok());
    }

    #[test]
    fn test_env_overrides() {
        let _guard = EnvGuard::new(&[
            ("ROULETTE_MAX_LIVES", "5"),
            ("ROULETTE_LIVE_MAX", "6"),
            ("ROULETTE_BOT_AIM", " 0.25 "),
            ("ROULETTE_SELF_BLANK_POINTS", "not-a-number"),
        ]);

        let config = GameConfig::from_env().unwrap();
        assert_eq!(config.max_lives, 5);
        assert_eq!(config.live_shells, ShellRange::new(1, 6));
        assert_eq!(config.bot_aim_at_player, 0.25);
        // Invalid value ignored
        assert_eq!(config.scoring.self_blank, 5);
    }

    #[test]
    fn test_env_overrides_are_validated() {
        let _guard = EnvGuard::new(&[("ROULETTE_LIVE_MIN", "9")]);
        assert!(matches!(
            GameConfig::from_env(),
            Err(ConfigError::EmptyRange { name: "live shell", .. })
        ));
    }

    #[test]
    fn test_env_huge_ranges_rejected() {
        let _guard = EnvGuard::new(&[
            ("ROULETTE_LIVE_MIN", "4294967295"),
            ("ROULETTE_LIVE_MAX", "4294967295"),
            ("ROULETTE_BLANK_MIN", "4294967295"),
            ("ROULETTE_BLANK_MAX", "4294967295"),
        ]);
        assert!(matches!(
            GameConfig::from_env(),
            Err(ConfigError::RangeTooLarge { name: "live shell", .. })
        ));
    }

    #[test]
    fn test_config_serde() {
        let config = GameConfig::new().with_max_lives(4);
        let json = serde_json::to_string(&config).unwrap();
        let back: GameConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }
}
