//! Uniformly random NPC behaviour.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::fighter::Fighter;
use crate::rng::{choose, RandomSource};
use crate::roster::Roster;
use crate::targeting::TargetingResolver;

use super::{aim, executable_skills, Decision};

/// Any usable skill, aimed at any legal target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RandomStrategy;

impl RandomStrategy {
    /// Picks a skill and target.
    pub fn decide(
        &self,
        npc: &Fighter,
        roster: &Roster,
        targeting: &TargetingResolver,
        rng: &mut dyn RandomSource,
    ) -> Option<Decision> {
        let usable = executable_skills(npc, roster, targeting);
        let skill = Arc::clone(choose(rng, &usable)?);
        aim(&skill, npc, roster, targeting, |candidates| {
            choose(rng, candidates).map(|f| f.id())
        })
    }
}
