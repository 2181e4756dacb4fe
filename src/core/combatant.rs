//! The two sides of a duel, who they aim at, and whose turn it is.

use serde::{Deserialize, Serialize};

/// One side of the duel.
///
/// Used both as the shooter (actor) of a shot and as the recipient of
/// its damage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Combatant {
    Player,
    Bot,
}

impl Combatant {
    /// The other side.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Combatant::Player => Combatant::Bot,
            Combatant::Bot => Combatant::Player,
        }
    }

    /// Who gets hit when this combatant fires at `target`.
    #[must_use]
    pub const fn aim(self, target: Target) -> Self {
        match target {
            Target::Opponent => self.opponent(),
            Target::Shooter => self,
        }
    }

    /// The turn owned by this combatant.
    #[must_use]
    pub const fn turn(self) -> Turn {
        match self {
            Combatant::Player => Turn::Player,
            Combatant::Bot => Turn::Bot,
        }
    }
}

impl std::fmt::Display for Combatant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Combatant::Player => write!(f, "player"),
            Combatant::Bot => write!(f, "bot"),
        }
    }
}

/// Where a shooter points the barrel, relative to themselves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Target {
    #[serde(rename = "opponent")]
    Opponent,
    /// The shooter's own head.
    #[serde(rename = "self")]
    Shooter,
}

impl std::str::FromStr for Target {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "opponent" => Ok(Target::Opponent),
            "self" => Ok(Target::Shooter),
            other => Err(format!("unknown target {other:?}, expected \"opponent\" or \"self\"")),
        }
    }
}

/// Whose turn it is. Exactly one holds at any time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Turn {
    #[default]
    Player,
    Bot,
}

impl Turn {
    /// The combatant allowed to act.
    #[must_use]
    pub const fn owner(self) -> Combatant {
        match self {
            Turn::Player => Combatant::Player,
            Turn::Bot => Combatant::Bot,
        }
    }

    /// Pass the turn to the other side.
    #[must_use]
    pub const fn passed(self) -> Self {
        match self {
            Turn::Player => Turn::Bot,
            Turn::Bot => Turn::Player,
        }
    }

    #[must_use]
    pub const fn is_player(self) -> bool {
        matches!(self, Turn::Player)
    }
}
