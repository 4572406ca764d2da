//! Enemy groups: which enemies a map encounter spawns.
//!
//! A group either fields its whole list, or (with `random_selection`) draws
//! a count from `[min_count, max_count]` and fills it with weighted picks,
//! so the same enemy can appear more than once.

use serde::{Deserialize, Serialize};

use crate::fighter::ProfileId;
use crate::rng::RandomSource;

/// An enemy that may appear in a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupMember {
    /// Enemy profile id.
    pub enemy_id: ProfileId,
    /// Relative pick weight under random selection.
    #[serde(default = "default_weight")]
    pub spawn_weight: u32,
}

fn default_weight() -> u32 {
    1
}

/// A named encounter definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemyGroup {
    /// Group id referenced from the map.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Candidate enemies.
    pub enemies: Vec<GroupMember>,
    /// Draw a random weighted subset instead of fielding the whole list.
    #[serde(default)]
    pub random_selection: bool,
    /// Fewest enemies spawned under random selection.
    #[serde(default = "default_min_count")]
    pub min_count: u32,
    /// Most enemies spawned under random selection (inclusive).
    #[serde(default = "default_max_count")]
    pub max_count: u32,
}

fn default_min_count() -> u32 {
    1
}

fn default_max_count() -> u32 {
    3
}

impl EnemyGroup {
    /// A group that fields exactly `enemies`, in order.
    #[must_use]
    pub fn fixed(id: &str, enemies: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            name: id.to_string(),
            enemies: enemies
                .iter()
                .map(|e| GroupMember {
                    enemy_id: ProfileId::new(*e),
                    spawn_weight: 1,
                })
                .collect(),
            random_selection: false,
            min_count: default_min_count(),
            max_count: default_max_count(),
        }
    }

    /// A group that draws `min..=max` weighted picks from `(enemy, weight)`.
    #[must_use]
    pub fn weighted(id: &str, enemies: &[(&str, u32)], min_count: u32, max_count: u32) -> Self {
        Self {
            id: id.to_string(),
            name: id.to_string(),
            enemies: enemies
                .iter()
                .map(|(e, w)| GroupMember {
                    enemy_id: ProfileId::new(*e),
                    spawn_weight: *w,
                })
                .collect(),
            random_selection: true,
            min_count,
            max_count,
        }
    }

    /// Enemy ids to put into the battle roster.
    ///
    /// Fixed groups consume no randomness.
    pub fn spawn(&self, rng: &mut dyn RandomSource) -> Vec<ProfileId> {
        if self.enemies.is_empty() {
            return Vec::new();
        }
        if !self.random_selection {
            return self.enemies.iter().map(|m| m.enemy_id.clone()).collect();
        }
        let count = rng.next_int(self.min_count, self.max_count.saturating_add(1));
        (0..count)
            .filter_map(|_| self.pick_weighted(rng))
            .map(|m| m.enemy_id.clone())
            .collect()
    }

    fn pick_weighted(&self, rng: &mut dyn RandomSource) -> Option<&GroupMember> {
        let total = self
            .enemies
            .iter()
            .fold(0u32, |sum, m| sum.saturating_add(m.spawn_weight));
        let roll = rng.next_int(0, total);
        let mut acc = 0u32;
        for member in &self.enemies {
            acc = acc.saturating_add(member.spawn_weight);
            if roll < acc {
                return Some(member);
            }
        }
        // All weights zero.
        self.enemies.first()
    }
}
