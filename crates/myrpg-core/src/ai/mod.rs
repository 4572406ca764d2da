//! Decision-making for AI-controlled fighters.
//!
//! Every non-player fighter (comrades and enemies) acts through a
//! [`Strategy`]. Strategies are stateless: a decision is a pure function of
//! the roster and the random source, so a seeded battle replays exactly.
//!
//! # Strategies
//!
//! - [`BasicStrategy`]: heal when low, heal hurt teammates (allied side
//!   only), otherwise attack the weakest enemy
//! - [`TacticalStrategy`]: desperate / aggressive / normal tiers with AoE
//!   preference and a configurable focus policy
//! - [`RandomStrategy`]: any usable skill on any legal target
//!
//! Which strategy a fighter uses is data: the profile's `ai_class` is looked
//! up in a [`StrategyRegistry`], falling back to its default.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use myrpg_core::ai::{Strategy, StrategyRegistry};
//! use myrpg_core::config::BattleConfig;
//! use myrpg_core::fighter::FighterProfile;
//!
//! let registry = StrategyRegistry::from_config(&BattleConfig::default());
//! let boss = FighterProfile::enemy("ogre", "Ogre", 200, 0).with_ai_class("tactical");
//! assert!(matches!(registry.for_profile(&boss), Strategy::Tactical(_)));
//!
//! let slime = FighterProfile::enemy("slime", "Slime", 10, 0);
//! assert!(matches!(registry.for_profile(&slime), Strategy::Basic(_)));
//! ```

pub mod basic;
pub mod random;
pub mod tactical;

pub use basic::BasicStrategy;
pub use random::RandomStrategy;
pub use tactical::{TargetFocus, TacticalStrategy};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::config::BattleConfig;
use crate::fighter::{Fighter, FighterId, FighterProfile};
use crate::rng::RandomSource;
use crate::roster::Roster;
use crate::skill::{Skill, TargetShape};
use crate::targeting::TargetingResolver;

/// A skill and where to aim it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    /// Skill to use.
    pub skill: Arc<Skill>,
    /// Primary target. `None` for area shapes, which hit the whole
    /// candidate set.
    pub target: Option<FighterId>,
}

/// Flavour signal a strategy raises after acting, for the combat log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TacticalCue {
    /// Attacking while below the desperate threshold.
    Desperate,
    /// Using an all-enemies skill.
    AreaAssault,
}

impl fmt::Display for TacticalCue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Desperate => write!(f, "is getting desperate and fights more viciously"),
            Self::AreaAssault => write!(f, "unleashes a devastating area attack"),
        }
    }
}

/// A decision procedure for one AI-controlled fighter.
#[derive(Debug, Clone, PartialEq)]
pub enum Strategy {
    /// Default heuristic.
    Basic(BasicStrategy),
    /// Threshold-tiered heuristic.
    Tactical(TacticalStrategy),
    /// Uniformly random.
    Random(RandomStrategy),
}

impl Strategy {
    /// Picks a skill and target for `npc`, or `None` if it cannot act.
    pub fn decide(
        &self,
        npc: &Fighter,
        roster: &Roster,
        targeting: &TargetingResolver,
        rng: &mut dyn RandomSource,
    ) -> Option<Decision> {
        match self {
            Self::Basic(s) => s.decide(npc, roster, targeting, rng),
            Self::Tactical(s) => s.decide(npc, roster, targeting, rng),
            Self::Random(s) => s.decide(npc, roster, targeting, rng),
        }
    }

    /// Cue to report after `npc` has used `skill`.
    #[must_use]
    pub fn cue(&self, npc: &Fighter, skill: &Skill) -> Option<TacticalCue> {
        match self {
            Self::Tactical(s) => s.cue(npc, skill),
            Self::Basic(_) | Self::Random(_) => None,
        }
    }

    /// Registry name of this strategy kind.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Basic(_) => "basic",
            Self::Tactical(_) => "tactical",
            Self::Random(_) => "random",
        }
    }
}

impl Default for Strategy {
    fn default() -> Self {
        Self::Basic(BasicStrategy::default())
    }
}

/// Maps AI class names to strategies.
#[derive(Debug, Clone, Default)]
pub struct StrategyRegistry {
    default: Strategy,
    by_class: BTreeMap<String, Strategy>,
}

impl StrategyRegistry {
    /// Registry with only a default strategy.
    #[must_use]
    pub fn new(default: Strategy) -> Self {
        Self {
            default,
            by_class: BTreeMap::new(),
        }
    }

    /// Registry with the built-in `basic`, `tactical` and `random` classes,
    /// defaulting to `basic` tuned by `config`.
    #[must_use]
    pub fn from_config(config: &BattleConfig) -> Self {
        let basic = Strategy::Basic(BasicStrategy::from_config(config));
        let mut registry = Self::new(basic.clone());
        registry.register("basic", basic);
        registry.register("tactical", Strategy::Tactical(TacticalStrategy::default()));
        registry.register("random", Strategy::Random(RandomStrategy));
        registry
    }

    /// Registers (or replaces) a class.
    pub fn register(&mut self, class: &str, strategy: Strategy) {
        self.by_class.insert(class.to_string(), strategy);
    }

    /// Looks up a class by name.
    #[must_use]
    pub fn get(&self, class: &str) -> Option<&Strategy> {
        self.by_class.get(class)
    }

    /// Strategy for a profile: its `ai_class` if registered, else the default.
    #[must_use]
    pub fn for_profile(&self, profile: &FighterProfile) -> &Strategy {
        match profile.ai_class.as_deref() {
            Some(class) => self.by_class.get(class).unwrap_or_else(|| {
                tracing::warn!(class, profile = %profile.id, "unknown AI class, using default");
                &self.default
            }),
            None => &self.default,
        }
    }

    /// The fallback strategy.
    #[must_use]
    pub fn default_strategy(&self) -> &Strategy {
        &self.default
    }

    /// Number of named classes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_class.len()
    }

    /// True if no named class is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_class.is_empty()
    }
}

// =============================================================================
// Shared helpers
// =============================================================================

/// Usable skills that also have at least one living candidate.
pub(crate) fn executable_skills(
    npc: &Fighter,
    roster: &Roster,
    targeting: &TargetingResolver,
) -> Vec<Arc<Skill>> {
    npc.usable_skills()
        .filter(|skill| {
            !targeting
                .resolve_candidates(npc, skill.target_shape, roster)
                .is_empty()
        })
        .cloned()
        .collect()
}

/// Builds a decision, delegating the single-target pick to `pick`.
pub(crate) fn aim<F>(
    skill: &Arc<Skill>,
    npc: &Fighter,
    roster: &Roster,
    targeting: &TargetingResolver,
    pick: F,
) -> Option<Decision>
where
    F: FnOnce(&[&Fighter]) -> Option<FighterId>,
{
    let target = match skill.target_shape {
        TargetShape::AllEnemies | TargetShape::AllAllies => None,
        TargetShape::Myself => Some(npc.id()),
        TargetShape::SingleEnemy | TargetShape::SingleAlly => {
            let candidates: Vec<&Fighter> = targeting
                .resolve_candidates(npc, skill.target_shape, roster)
                .into_iter()
                .filter_map(|id| roster.get(id))
                .collect();
            Some(pick(&candidates)?)
        }
    };
    Some(Decision {
        skill: Arc::clone(skill),
        target,
    })
}

/// First candidate with the lowest HP ratio.
pub(crate) fn lowest_hp_ratio(candidates: &[&Fighter]) -> Option<FighterId> {
    candidates
        .iter()
        .min_by(|a, b| a.hp_ratio().total_cmp(&b.hp_ratio()))
        .map(|f| f.id())
}

/// First candidate with the lowest current HP.
pub(crate) fn lowest_hp(candidates: &[&Fighter]) -> Option<FighterId> {
    candidates.iter().min_by_key(|f| f.current_hp()).map(|f| f.id())
}

/// First candidate with the highest current HP.
pub(crate) fn highest_hp(candidates: &[&Fighter]) -> Option<FighterId> {
    candidates
        .iter()
        .min_by(|a, b| b.current_hp().cmp(&a.current_hp()))
        .map(|f| f.id())
}

/// First skill with the highest power.
pub(crate) fn strongest(skills: &[Arc<Skill>]) -> Option<&Arc<Skill>> {
    skills.iter().min_by(|a, b| b.power.cmp(&a.power))
}

#[cfg(test)]
mod tests {
    use super::*;

    mod registry_tests {
        use super::*;

        #[test]
        fn unknown_class_falls_back_to_default() {
            let registry = StrategyRegistry::from_config(&BattleConfig::default());
            let odd = FighterProfile::enemy("imp", "Imp", 10, 0).with_ai_class("berserker");
            assert_eq!(registry.for_profile(&odd).name(), "basic");
        }

        #[test]
        fn registered_class_overrides_builtin() {
            let mut registry = StrategyRegistry::from_config(&BattleConfig::default());
            registry.register("basic", Strategy::Random(RandomStrategy));
            let p = FighterProfile::enemy("imp", "Imp", 10, 0).with_ai_class("basic");
            assert_eq!(registry.for_profile(&p).name(), "random");
            assert_eq!(registry.len(), 3);
        }

        #[test]
        fn default_uses_config_thresholds() {
            let config = BattleConfig::default().with_low_health_threshold(0.6);
            let registry = StrategyRegistry::from_config(&config);
            match registry.default_strategy() {
                Strategy::Basic(b) => assert!((b.low_health_threshold - 0.6).abs() < f32::EPSILON),
                other => panic!("unexpected default {other:?}"),
            }
        }
    }

    mod pick_tests {
        use super::*;

        fn fighters() -> Vec<Fighter> {
            let make = |raw: u32, max: u32, hp: u32| {
                Fighter::new(
                    FighterId::new(raw),
                    Arc::new(FighterProfile::enemy("e", "E", max, 0)),
                    Vec::new(),
                )
                .with_current_hp(hp)
            };
            vec![make(0, 100, 40), make(1, 50, 20), make(2, 100, 90), make(3, 100, 90)]
        }

        #[test]
        fn ties_resolve_to_roster_order() {
            let owned = fighters();
            let refs: Vec<&Fighter> = owned.iter().collect();
            // 0.4 vs 0.4: first wins
            assert_eq!(lowest_hp_ratio(&refs), Some(FighterId::new(0)));
            assert_eq!(lowest_hp(&refs), Some(FighterId::new(1)));
            assert_eq!(highest_hp(&refs), Some(FighterId::new(2)));
        }

        #[test]
        fn empty_candidates_pick_nothing() {
            assert_eq!(lowest_hp(&[]), None);
            assert_eq!(highest_hp(&[]), None);
            assert_eq!(lowest_hp_ratio(&[]), None);
        }

        #[test]
        fn strongest_prefers_first_on_tie() {
            use crate::skill::EffectType;
            let skills = vec![
                Arc::new(Skill::new("a", 10, TargetShape::SingleEnemy, EffectType::Damage)),
                Arc::new(Skill::new("b", 30, TargetShape::SingleEnemy, EffectType::Damage)),
                Arc::new(Skill::new("c", 30, TargetShape::SingleEnemy, EffectType::Damage)),
            ];
            assert_eq!(strongest(&skills).unwrap().id.as_str(), "b");
        }
    }
}
