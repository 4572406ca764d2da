//! Legal target computation.
//!
//! [`TargetingResolver`] is a pure filter over the current roster: no
//! randomness, no mutation. It is faction-symmetric, so an enemy caster's
//! "enemies" are the allied side and the other way round.
//!
//! An empty result means the skill cannot be executed this turn.

use crate::fighter::{Fighter, FighterId};
use crate::roster::Roster;
use crate::skill::TargetShape;

/// Computes the candidate set for a skill shape.
#[derive(Debug, Clone, Copy, Default)]
pub struct TargetingResolver;

impl TargetingResolver {
    /// Creates a new targeting resolver.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Living fighters the caster may affect with a skill of this shape, in
    /// roster order.
    ///
    /// - `SingleEnemy` / `AllEnemies`: living members of the opposing faction
    /// - `SingleAlly` / `AllAllies`: living members of the caster's faction,
    ///   the caster included
    /// - `Self`: exactly the caster, or nothing if the caster is down
    #[must_use]
    pub fn resolve_candidates(
        &self,
        caster: &Fighter,
        shape: TargetShape,
        roster: &Roster,
    ) -> Vec<FighterId> {
        match shape {
            TargetShape::Myself => {
                if caster.is_alive() {
                    vec![caster.id()]
                } else {
                    Vec::new()
                }
            }
            TargetShape::SingleEnemy | TargetShape::AllEnemies => roster
                .alive_in(caster.faction().opposite())
                .map(Fighter::id)
                .collect(),
            TargetShape::SingleAlly | TargetShape::AllAllies => {
                roster.alive_in(caster.faction()).map(Fighter::id).collect()
            }
        }
    }

    /// True if `target` is a legal pick for this shape.
    #[must_use]
    pub fn is_legal_target(
        &self,
        caster: &Fighter,
        shape: TargetShape,
        target: FighterId,
        roster: &Roster,
    ) -> bool {
        self.resolve_candidates(caster, shape, roster).contains(&target)
    }
}
