//! Loot tables and victory rolls.
//!
//! Each defeated enemy contributes its loot table. Every entry is rolled
//! independently: a uniform draw in `[0, 1)` strictly below `drop_chance`
//! awards the item, so a chance of `1.0` always drops and `0.0` never does.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::LootAmountBounds;
use crate::rng::RandomSource;

/// Identifier of an inventory item.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    /// Creates a new item id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// One row of an enemy's loot table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LootEntry {
    /// Item that may drop.
    pub item_id: ItemId,
    /// Probability in `[0, 1]`.
    pub drop_chance: f32,
    /// Smallest stack size.
    pub min_amount: u32,
    /// Largest stack size; whether it is reachable depends on [`LootAmountBounds`].
    pub max_amount: u32,
}

impl LootEntry {
    /// Creates a loot entry.
    #[must_use]
    pub fn new(item_id: &str, drop_chance: f32, min_amount: u32, max_amount: u32) -> Self {
        Self {
            item_id: ItemId::new(item_id),
            drop_chance,
            min_amount,
            max_amount,
        }
    }

    /// Rolls this entry once. Consumes one float, plus one int when it drops.
    pub fn roll(&self, bounds: LootAmountBounds, rng: &mut dyn RandomSource) -> Option<LootDrop> {
        let roll = rng.next_float();
        if roll >= f64::from(self.drop_chance) {
            return None;
        }
        let hi = match bounds {
            LootAmountBounds::MaxExclusive => self.max_amount,
            LootAmountBounds::MaxInclusive => self.max_amount.saturating_add(1),
        };
        Some(LootDrop {
            item_id: self.item_id.clone(),
            amount: rng.next_int(self.min_amount, hi),
        })
    }
}

/// An item awarded at victory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LootDrop {
    /// Item awarded.
    pub item_id: ItemId,
    /// Stack size.
    pub amount: u32,
}

/// Rolls every entry in order and collects the drops.
pub fn roll_loot(
    entries: &[LootEntry],
    bounds: LootAmountBounds,
    rng: &mut dyn RandomSource,
) -> Vec<LootDrop> {
    entries.iter().filter_map(|entry| entry.roll(bounds, rng)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::SeededRandom;

    /// Returns the same float forever and the low end of every int range.
    struct Fixed(f64);

    impl RandomSource for Fixed {
        fn next_float(&mut self) -> f64 {
            self.0
        }

        fn next_int(&mut self, lo: u32, _hi: u32) -> u32 {
            lo
        }
    }

    mod drop_chance_tests {
        use super::*;

        #[test]
        fn certain_drop_always_awards() {
            let entry = LootEntry::new("potion", 1.0, 1, 2);
            for roll in [0.0, 0.5, 0.999_999] {
                assert!(entry.roll(LootAmountBounds::MaxExclusive, &mut Fixed(roll)).is_some());
            }
        }

        #[test]
        fn zero_chance_never_awards() {
            let entry = LootEntry::new("potion", 0.0, 1, 2);
            for roll in [0.0, 0.5, 0.999_999] {
                assert!(entry.roll(LootAmountBounds::MaxExclusive, &mut Fixed(roll)).is_none());
            }
        }

        #[test]
        fn roll_equal_to_chance_misses() {
            let entry = LootEntry::new("gem", 0.5, 1, 2);
            assert!(entry.roll(LootAmountBounds::MaxExclusive, &mut Fixed(0.5)).is_none());
            assert!(entry.roll(LootAmountBounds::MaxExclusive, &mut Fixed(0.49)).is_some());
        }
    }

    mod amount_tests {
        use super::*;

        #[test]
        fn exclusive_bounds_never_reach_max() {
            let entry = LootEntry::new("coin", 1.0, 2, 5);
            let mut rng = SeededRandom::new(11);
            for _ in 0..500 {
                let drop = entry.roll(LootAmountBounds::MaxExclusive, &mut rng).unwrap();
                assert!((2..5).contains(&drop.amount));
            }
        }

        #[test]
        fn inclusive_bounds_can_reach_max() {
            let entry = LootEntry::new("coin", 1.0, 2, 5);
            let mut rng = SeededRandom::new(11);
            let amounts: Vec<u32> = (0..500)
                .map(|_| entry.roll(LootAmountBounds::MaxInclusive, &mut rng).unwrap().amount)
                .collect();
            assert!(amounts.iter().all(|a| (2..=5).contains(a)));
            assert!(amounts.contains(&5));
        }

        #[test]
        fn equal_bounds_yield_min() {
            let entry = LootEntry::new("key", 1.0, 1, 1);
            let mut rng = SeededRandom::new(0);
            assert_eq!(entry.roll(LootAmountBounds::MaxExclusive, &mut rng).unwrap().amount, 1);
        }
    }

    #[test]
    fn roll_loot_keeps_table_order() {
        let table = vec![
            LootEntry::new("a", 1.0, 1, 1),
            LootEntry::new("b", 0.0, 1, 1),
            LootEntry::new("c", 1.0, 3, 3),
        ];
        let drops = roll_loot(&table, LootAmountBounds::MaxExclusive, &mut Fixed(0.2));
        let ids: Vec<&str> = drops.iter().map(|d| d.item_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
        assert_eq!(drops[1].amount, 3);
    }
}
