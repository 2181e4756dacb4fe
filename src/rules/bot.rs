//! The scripted opponent.

use crate::core::{RandomSource, Target};

/// Picks the bot's target: the player with a fixed probability,
/// itself otherwise. Each shot is an independent draw.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BotPolicy {
    aim_at_player: f64,
}

impl Default for BotPolicy {
    fn default() -> Self {
        Self::new(0.7)
    }
}

impl BotPolicy {
    pub fn new(aim_at_player: f64) -> Self {
        Self {
            aim_at_player: aim_at_player.clamp(0.0, 1.0),
        }
    }

    /// Probability of aiming at the player.
    #[must_use]
    pub fn aim_at_player(&self) -> f64 {
        self.aim_at_player
    }

    pub fn choose_target<R: RandomSource>(&self, rng: &mut R) -> Target {
        if rng.chance(self.aim_at_player) {
            Target::Opponent
        } else {
            Target::Shooter
        }
    }
}
