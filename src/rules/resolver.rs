//! Shot resolution.
//!
//! `ShotResolver::resolve` is the single place the duel's rule table
//! lives. It only computes an [`Outcome`]; applying damage, points and
//! the turn flip to a session is the caller's job.
//!
//! | actor  | target   | shell | damage    | points     | turn passes |
//! |--------|----------|-------|-----------|------------|-------------|
//! | Player | Opponent | Live  | bot       | live_hit   | yes         |
//! | Player | Opponent | Blank | -         | 0          | yes         |
//! | Player | Shooter  | Live  | player    | 0          | yes         |
//! | Player | Shooter  | Blank | -         | self_blank | no          |
//! | Bot    | Opponent | Live  | player    | 0          | yes         |
//! | Bot    | Opponent | Blank | -         | 0          | yes         |
//! | Bot    | Shooter  | Live  | bot       | 0          | no          |
//! | Bot    | Shooter  | Blank | -         | 0          | no          |
//!
//! The bot keeps the turn after any shot at itself, while the player only
//! keeps it after a blank. Both `Bot, Shooter` rows encode that.

use serde::{Deserialize, Serialize};

use crate::core::{Combatant, ScoringRules, Target};
use crate::magazine::Shell;

/// What a single shot does to the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    /// Combatant losing one life, if any.
    pub damage_to: Option<Combatant>,
    /// Points added to the player's score.
    pub points_gained: u32,
    /// Whether the turn passes to the other side.
    pub turn_changes: bool,
    /// Message to show for this shot.
    pub message: MessageKind,
}

/// Every message the engine can emit.
///
/// Kept as data so callers can localize; `Display` gives the default
/// English text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MessageKind {
    /// A new game started with a fresh magazine.
    Loaded { live: u32, blank: u32 },
    /// An empty magazine was refilled.
    Reloaded { live: u32, blank: u32 },
    PlayerHitBot,
    PlayerMissedBot,
    PlayerHitSelf,
    PlayerBlankSelf,
    BotHitPlayer,
    BotMissedPlayer,
    BotHitSelf,
    BotBlankSelf,
    /// The bot ran out of lives.
    Victory,
    /// The player ran out of lives.
    Defeat,
}

impl std::fmt::Display for MessageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MessageKind::Loaded { live, blank } => {
                write!(f, "Shotgun loaded: {live} live, {blank} blank")
            }
            MessageKind::Reloaded { live, blank } => {
                write!(f, "New round: {live} live, {blank} blank")
            }
            MessageKind::PlayerHitBot => write!(f, "BANG! Live shell into the bot"),
            MessageKind::PlayerMissedBot => write!(f, "Click. Blank at the bot"),
            MessageKind::PlayerHitSelf => write!(f, "BANG! You shot yourself with a live shell"),
            MessageKind::PlayerBlankSelf => write!(f, "Blank. You keep the shotgun"),
            MessageKind::BotHitPlayer => write!(f, "The bot shot you with a live shell"),
            MessageKind::BotMissedPlayer => write!(f, "The bot shot you. Blank"),
            MessageKind::BotHitSelf => write!(f, "The bot shot itself with a live shell"),
            MessageKind::BotBlankSelf => write!(f, "The bot shot itself. Blank, it goes again"),
            MessageKind::Victory => write!(f, "VICTORY! You defeated the bot"),
            MessageKind::Defeat => write!(f, "GAME OVER. The bot wins"),
        }
    }
}

/// Applies the rule table with a given points configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ShotResolver {
    scoring: ScoringRules,
}

impl ShotResolver {
    pub fn new(scoring: ScoringRules) -> Self {
        Self { scoring }
    }

    /// Resolve one shot fired by `actor` at `target` with `shell`.
    #[must_use]
    pub fn resolve(&self, shell: Shell, target: Target, actor: Combatant) -> Outcome {
        use Combatant::{Bot, Player};
        use MessageKind as M;
        use Shell::{Blank, Live};
        use Target::{Opponent, Shooter};

        let (points, turn_changes, message) = match (actor, target, shell) {
            (Player, Opponent, Live) => (self.scoring.live_hit, true, M::PlayerHitBot),
            (Player, Opponent, Blank) => (0, true, M::PlayerMissedBot),
            (Player, Shooter, Live) => (0, true, M::PlayerHitSelf),
            (Player, Shooter, Blank) => (self.scoring.self_blank, false, M::PlayerBlankSelf),
            (Bot, Opponent, Live) => (0, true, M::BotHitPlayer),
            (Bot, Opponent, Blank) => (0, true, M::BotMissedPlayer),
            (Bot, Shooter, Live) => (0, false, M::BotHitSelf),
            (Bot, Shooter, Blank) => (0, false, M::BotBlankSelf),
        };

        Outcome {
            damage_to: shell.is_live().then(|| actor.aim(target)),
            points_gained: points,
            turn_changes,
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> ShotResolver {
        ShotResolver::new(ScoringRules::default())
    }

    fn row(actor: Combatant, target: Target, shell: Shell) -> (Option<Combatant>, u32, bool) {
        let o = resolver().resolve(shell, target, actor);
        (o.damage_to, o.points_gained, o.turn_changes)
    }

    #[test]
    fn test_player_rows() {
        use Combatant::*;
        assert_eq!(row(Player, Target::Opponent, Shell::Live), (Some(Bot), 10, true));
        assert_eq!(row(Player, Target::Opponent, Shell::Blank), (None, 0, true));
        assert_eq!(row(Player, Target::Shooter, Shell::Live), (Some(Player), 0, true));
        assert_eq!(row(Player, Target::Shooter, Shell::Blank), (None, 5, false));
    }

    #[test]
    fn test_bot_rows() {
        use Combatant::*;
        assert_eq!(row(Bot, Target::Opponent, Shell::Live), (Some(Player), 0, true));
        assert_eq!(row(Bot, Target::Opponent, Shell::Blank), (None, 0, true));
        assert_eq!(row(Bot, Target::Shooter, Shell::Live), (Some(Bot), 0, false));
        assert_eq!(row(Bot, Target::Shooter, Shell::Blank), (None, 0, false));
    }

    #[test]
    fn test_bot_live_self_shot_keeps_turn() {
        let outcome = resolver().resolve(Shell::Live, Target::Shooter, Combatant::Bot);
        assert_eq!(outcome.damage_to, Some(Combatant::Bot));
        assert!(!outcome.turn_changes);
        assert_eq!(outcome.message, MessageKind::BotHitSelf);
    }

    #[test]
    fn test_custom_scoring() {
        let resolver = ShotResolver::new(ScoringRules { live_hit: 25, self_blank: 1 });
        assert_eq!(
            resolver.resolve(Shell::Live, Target::Opponent, Combatant::Player).points_gained,
            25
        );
        assert_eq!(
            resolver.resolve(Shell::Blank, Target::Shooter, Combatant::Player).points_gained,
            1
        );
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            MessageKind::Loaded { live: 2, blank: 3 }.to_string(),
            "Shotgun loaded: 2 live, 3 blank"
        );
        assert_eq!(MessageKind::Victory.to_string(), "VICTORY! You defeated the bot");
    }
}
