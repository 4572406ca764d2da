//! Default NPC heuristic.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::BattleConfig;
use crate::fighter::{Faction, Fighter, FighterId};
use crate::rng::{choose, RandomSource};
use crate::roster::Roster;
use crate::skill::Skill;
use crate::targeting::TargetingResolver;

use super::{aim, executable_skills, lowest_hp, lowest_hp_ratio, Decision};

/// Heal when hurt, otherwise go for the kill.
///
/// Skill choice, in priority order:
///
/// 1. own HP ratio below `low_health_threshold` and a heal is usable: a heal
/// 2. allied-side fighter, some living ally below `ally_heal_threshold`, and
///    a usable heal can reach that ally: one of those heals
/// 3. a random damage skill
/// 4. a random usable skill
///
/// Heals aim at the candidate with the lowest HP ratio, damage at the
/// candidate with the lowest current HP.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasicStrategy {
    /// Self-heal trigger.
    pub low_health_threshold: f32,
    /// Teammate-heal trigger, allied side only.
    pub ally_heal_threshold: f32,
}

impl Default for BasicStrategy {
    fn default() -> Self {
        Self::from_config(&BattleConfig::default())
    }
}

impl BasicStrategy {
    /// Uses the thresholds from `config`.
    #[must_use]
    pub fn from_config(config: &BattleConfig) -> Self {
        Self {
            low_health_threshold: config.low_health_threshold,
            ally_heal_threshold: config.ally_heal_threshold,
        }
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
        let skill = Arc::clone(self.select_skill(npc, roster, targeting, &usable, rng)?);
        aim(&skill, npc, roster, targeting, |candidates| {
            if skill.is_heal() {
                lowest_hp_ratio(candidates)
            } else {
                lowest_hp(candidates)
            }
        })
    }

    fn select_skill<'a>(
        &self,
        npc: &Fighter,
        roster: &Roster,
        targeting: &TargetingResolver,
        usable: &'a [Arc<Skill>],
        rng: &mut dyn RandomSource,
    ) -> Option<&'a Arc<Skill>> {
        let heals: Vec<Arc<Skill>> = usable.iter().filter(|s| s.is_heal()).cloned().collect();
        let damage: Vec<Arc<Skill>> = usable.iter().filter(|s| s.is_damage()).cloned().collect();
        let team_heals = self.team_heals(npc, roster, targeting, &heals);

        let pool: &[Arc<Skill>] = if !heals.is_empty() && npc.hp_ratio() < self.low_health_threshold {
            &heals
        } else if !team_heals.is_empty() {
            &team_heals
        } else if !damage.is_empty() {
            &damage
        } else {
            usable
        };
        let picked = choose(rng, pool)?;
        usable.iter().find(|s| s.id == picked.id)
    }

    /// Heals that can reach a teammate below `ally_heal_threshold`. Empty for
    /// the enemy side.
    fn team_heals(
        &self,
        npc: &Fighter,
        roster: &Roster,
        targeting: &TargetingResolver,
        heals: &[Arc<Skill>],
    ) -> Vec<Arc<Skill>> {
        if npc.faction() != Faction::Allied {
            return Vec::new();
        }
        let hurt: Vec<FighterId> = roster
            .alive_in(Faction::Allied)
            .filter(|ally| ally.hp_ratio() < self.ally_heal_threshold)
            .map(Fighter::id)
            .collect();
        if hurt.is_empty() {
            return Vec::new();
        }
        heals
            .iter()
            .filter(|skill| {
                targeting
                    .resolve_candidates(npc, skill.target_shape, roster)
                    .iter()
                    .any(|id| hurt.contains(id))
            })
            .cloned()
            .collect()
    }
}
