//! Shells and the magazine they are drawn from.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// A single shell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shell {
    Live,
    Blank,
}

impl Shell {
    #[must_use]
    pub const fn is_live(self) -> bool {
        matches!(self, Shell::Live)
    }
}

/// Ordered shells, drawn front first.
///
/// Stored back-to-front so a draw is a `pop` on the inline buffer; the
/// default ranges never exceed eight shells, which stay inline.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Magazine {
    reversed: SmallVec<[Shell; 8]>,
}

impl Magazine {
    /// Create an empty magazine.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a magazine from shells in firing order.
    pub fn from_shells(shells: impl IntoIterator<Item = Shell>) -> Self {
        let mut reversed: SmallVec<[Shell; 8]> = shells.into_iter().collect();
        reversed.reverse();
        Self { reversed }
    }

    /// Remove and return the front shell.
    pub fn draw(&mut self) -> Option<Shell> {
        self.reversed.pop()
    }

    /// Look at the front shell without drawing it.
    #[must_use]
    pub fn peek(&self) -> Option<Shell> {
        self.reversed.last().copied()
    }

    /// Shells remaining.
    #[must_use]
    pub fn len(&self) -> usize {
        self.reversed.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reversed.is_empty()
    }

    /// Remaining live shells.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.reversed.iter().filter(|s| s.is_live()).count()
    }

    /// Remaining blank shells.
    #[must_use]
    pub fn blank_count(&self) -> usize {
        self.len() - self.live_count()
    }

    /// Iterate in firing order.
    pub fn iter(&self) -> impl Iterator<Item = Shell> + '_ {
        self.reversed.iter().rev().copied()
    }
}
