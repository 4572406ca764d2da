//! Player experience and levelling.
//!
//! The battle core only reports how much XP a victory is worth. The player
//! adapter feeds that amount into [`Progression::gain_xp`], which can cross
//! several level thresholds at once.

use serde::{Deserialize, Serialize};

/// XP needed to go from level 1 to level 2.
pub const BASE_XP_TO_NEXT: u32 = 1000;

/// Attribute points granted per level.
pub const POINTS_PER_LEVEL: u32 = 3;

/// Growth factor applied to the threshold after each level.
pub const XP_GROWTH: f64 = 1.2;

/// Level, experience and unspent attribute points of the player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progression {
    /// Current level, starting at 1.
    pub level: u32,
    /// XP accumulated towards the next level.
    pub current_xp: u32,
    /// XP required for the next level.
    pub xp_to_next: u32,
    /// Attribute points not yet assigned.
    pub unspent_points: u32,
}

impl Default for Progression {
    fn default() -> Self {
        Self {
            level: 1,
            current_xp: 0,
            xp_to_next: BASE_XP_TO_NEXT,
            unspent_points: 0,
        }
    }
}

impl Progression {
    /// A fresh level 1 character.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds experience and applies every level-up it pays for.
    ///
    /// Returns the number of levels gained.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn gain_xp(&mut self, amount: u32) -> u32 {
        self.current_xp = self.current_xp.saturating_add(amount);
        let mut gained = 0;
        // A zero threshold would never terminate.
        while self.xp_to_next > 0 && self.current_xp >= self.xp_to_next {
            self.current_xp -= self.xp_to_next;
            self.level += 1;
            self.unspent_points += POINTS_PER_LEVEL;
            self.xp_to_next = (f64::from(self.xp_to_next) * XP_GROWTH).round() as u32;
            gained += 1;
        }
        if gained > 0 {
            tracing::info!(level = self.level, gained, "level up");
        }
        gained
    }

    /// Spends one attribute point. Returns false if none are left.
    pub fn spend_point(&mut self) -> bool {
        if self.unspent_points == 0 {
            return false;
        }
        self.unspent_points -= 1;
        true
    }
}
