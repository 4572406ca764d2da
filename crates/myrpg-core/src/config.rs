//! Battle tuning knobs.
//!
//! [`BattleConfig`] gathers every constant the turn rules depend on, so the
//! choices that were implicit in the game (whose cooldowns tick, whether loot
//! maxima are inclusive) become explicit, serializable data.

use serde::{Deserialize, Serialize};

/// Whose skill cooldowns tick down as turns pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CooldownTickPolicy {
    /// Only the player's cooldowns tick, once at the start of each player
    /// turn. NPC cooldowns never recover within a battle, so an NPC skill
    /// with a non-zero cooldown is single-use.
    #[default]
    PlayerOnly,
    /// Every fighter's cooldowns tick at the start of that fighter's turn.
    AllFighters,
}

/// Whether a loot entry's `max_amount` can itself be rolled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LootAmountBounds {
    /// Amount is drawn from `[min, max)`; `min` when `min >= max`.
    #[default]
    MaxExclusive,
    /// Amount is drawn from `[min, max]`.
    MaxInclusive,
}

/// Configuration for a [`Battle`](crate::battle::Battle).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleConfig {
    /// Seed for the default random source.
    pub seed: u64,
    /// HP ratio below which an NPC prefers healing itself.
    pub low_health_threshold: f32,
    /// HP ratio below which an allied NPC prefers healing a teammate.
    pub ally_heal_threshold: f32,
    /// Cooldown recovery rule.
    pub cooldown_tick: CooldownTickPolicy,
    /// Loot amount sampling rule.
    pub loot_amount_bounds: LootAmountBounds,
    /// Maximum fighter activations before the battle is called a defeat.
    pub turn_limit: u32,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            low_health_threshold: 0.3,
            ally_heal_threshold: 0.5,
            cooldown_tick: CooldownTickPolicy::PlayerOnly,
            loot_amount_bounds: LootAmountBounds::MaxExclusive,
            turn_limit: 10_000,
        }
    }
}

impl BattleConfig {
    /// Sets the random seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the self-heal threshold.
    #[must_use]
    pub fn with_low_health_threshold(mut self, ratio: f32) -> Self {
        self.low_health_threshold = ratio;
        self
    }

    /// Sets the ally-heal threshold.
    #[must_use]
    pub fn with_ally_heal_threshold(mut self, ratio: f32) -> Self {
        self.ally_heal_threshold = ratio;
        self
    }

    /// Sets the cooldown recovery rule.
    #[must_use]
    pub fn with_cooldown_tick(mut self, policy: CooldownTickPolicy) -> Self {
        self.cooldown_tick = policy;
        self
    }

    /// Sets the loot amount rule.
    #[must_use]
    pub fn with_loot_amount_bounds(mut self, bounds: LootAmountBounds) -> Self {
        self.loot_amount_bounds = bounds;
        self
    }

    /// Sets the activation cap.
    #[must_use]
    pub fn with_turn_limit(mut self, limit: u32) -> Self {
        self.turn_limit = limit;
        self
    }
}
