//! Threshold-tiered NPC heuristic for tougher enemies.
//!
//! The fighter's own HP ratio picks a tier:
//!
//! | Tier       | HP ratio                  | Preference                                   |
//! |------------|---------------------------|----------------------------------------------|
//! | desperate  | `< desperate_threshold`   | strongest heal (if defensive), else strongest damage |
//! | aggressive | `< aggressive_threshold`  | strongest AoE when it hits 2+, else strongest single-target damage |
//! | normal     | otherwise                 | random AoE when it hits 2+, else random damage |
//!
//! A tier with nothing to offer falls through to the next one, and the
//! last resort is any usable skill.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::fighter::Fighter;
use crate::rng::{choose, RandomSource};
use crate::roster::Roster;
use crate::skill::{Skill, TargetShape};
use crate::targeting::TargetingResolver;

use super::{aim, executable_skills, highest_hp, lowest_hp, lowest_hp_ratio, strongest, Decision, TacticalCue};

/// Which enemy single-target damage goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TargetFocus {
    /// Lowest current HP, to finish fighters off.
    Weakest,
    /// Highest current HP.
    #[default]
    Strongest,
}

/// Tiered strategy parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TacticalStrategy {
    /// Upper bound of the aggressive tier.
    pub aggressive_threshold: f32,
    /// Upper bound of the desperate tier.
    pub desperate_threshold: f32,
    /// Favour all-enemies skills when they hit more than one fighter.
    pub prefer_aoe: bool,
    /// Damage target policy.
    pub focus: TargetFocus,
    /// Reach for heals in the desperate tier.
    pub defensive_when_low: bool,
}

impl Default for TacticalStrategy {
    fn default() -> Self {
        Self {
            aggressive_threshold: 0.5,
            desperate_threshold: 0.2,
            prefer_aoe: true,
            focus: TargetFocus::Strongest,
            defensive_when_low: true,
        }
    }
}

impl TacticalStrategy {
    /// Sets the target focus.
    #[must_use]
    pub fn with_focus(mut self, focus: TargetFocus) -> Self {
        self.focus = focus;
        self
    }

    /// Enables or disables the AoE preference.
    #[must_use]
    pub fn with_prefer_aoe(mut self, prefer: bool) -> Self {
        self.prefer_aoe = prefer;
        self
    }

    /// Enables or disables desperate healing.
    #[must_use]
    pub fn with_defensive_when_low(mut self, defensive: bool) -> Self {
        self.defensive_when_low = defensive;
        self
    }

    /// Picks a skill and target.
    pub fn decide(
        &self,
        npc: &Fighter,
        roster: &Roster,
        targeting: &TargetingResolver,
        rng: &mut dyn RandomSource,
    ) -> Option<Decision> {
        let usable = executable_skills(npc, roster, targeting);
        if usable.is_empty() {
            return None;
        }
        let skill = self.select_skill(npc, roster, targeting, &usable, rng)?;
        aim(&skill, npc, roster, targeting, |candidates| {
            if skill.is_heal() {
                lowest_hp_ratio(candidates)
            } else {
                match self.focus {
                    TargetFocus::Weakest => lowest_hp(candidates),
                    TargetFocus::Strongest => highest_hp(candidates),
                }
            }
        })
    }

    /// Cue for the combat log after `npc` used `skill`.
    #[must_use]
    pub fn cue(&self, npc: &Fighter, skill: &Skill) -> Option<TacticalCue> {
        if npc.hp_ratio() < self.desperate_threshold && skill.is_damage() {
            Some(TacticalCue::Desperate)
        } else if skill.target_shape == TargetShape::AllEnemies {
            Some(TacticalCue::AreaAssault)
        } else {
            None
        }
    }

    fn select_skill(
        &self,
        npc: &Fighter,
        roster: &Roster,
        targeting: &TargetingResolver,
        usable: &[Arc<Skill>],
        rng: &mut dyn RandomSource,
    ) -> Option<Arc<Skill>> {
        let ratio = npc.hp_ratio();
        let heals: Vec<Arc<Skill>> = usable.iter().filter(|s| s.is_heal()).cloned().collect();
        let damage: Vec<Arc<Skill>> = usable.iter().filter(|s| s.is_damage()).cloned().collect();
        let aoe: Vec<Arc<Skill>> = damage
            .iter()
            .filter(|s| s.target_shape == TargetShape::AllEnemies)
            .cloned()
            .collect();
        let single: Vec<Arc<Skill>> = damage
            .iter()
            .filter(|s| s.target_shape == TargetShape::SingleEnemy)
            .cloned()
            .collect();
        let aoe_worthwhile = self.prefer_aoe
            && !aoe.is_empty()
            && targeting
                .resolve_candidates(npc, TargetShape::AllEnemies, roster)
                .len()
                > 1;

        if ratio < self.desperate_threshold {
            if self.defensive_when_low && !heals.is_empty() {
                return strongest(&heals).cloned();
            }
            if !damage.is_empty() {
                return strongest(&damage).cloned();
            }
        }

        if ratio < self.aggressive_threshold {
            if aoe_worthwhile {
                return strongest(&aoe).cloned();
            }
            if !single.is_empty() {
                return strongest(&single).cloned();
            }
        }

        if aoe_worthwhile {
            return choose(rng, &aoe).cloned();
        }
        if !damage.is_empty() {
            return choose(rng, &damage).cloned();
        }
        choose(rng, usable).cloned()
    }
}
