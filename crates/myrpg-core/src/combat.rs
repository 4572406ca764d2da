//! Skill effect resolution.
//!
//! [`CombatResolver`] turns a (caster, skill, target) choice into HP, MP and
//! cooldown changes on the roster.
//!
//! # Validation
//!
//! Everything is checked before anything is mutated, so a rejected action
//! leaves the roster exactly as it was:
//!
//! 1. caster exists and is alive
//! 2. skill is active (not passive), off cooldown and affordable
//! 3. single-target shapes have a legal primary target; `Self` coerces to
//!    the caster
//! 4. area shapes have at least one living candidate
//!
//! # Effects
//!
//! The skill's effect type is applied with `skill.power` to every fighter in
//! the resolved target set: the primary target for single shapes, the whole
//! candidate set for area shapes. Mana is spent and the cooldown started on
//! every successful resolution.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use myrpg_core::combat::CombatResolver;
//! use myrpg_core::fighter::FighterProfile;
//! use myrpg_core::roster::Roster;
//! use myrpg_core::skill::{EffectType, Skill, TargetShape};
//!
//! let slash = Arc::new(
//!     Skill::new("slash", 20, TargetShape::SingleEnemy, EffectType::Damage)
//!         .with_cooldown(2)
//!         .with_mana_cost(10),
//! );
//! let mut roster = Roster::new();
//! let hero = roster.spawn(
//!     Arc::new(FighterProfile::player("hero", "Hero", 100, 50)),
//!     vec![Arc::clone(&slash)],
//! );
//! let slime = roster.spawn(Arc::new(FighterProfile::enemy("slime", "Slime", 30, 0)), Vec::new());
//!
//! let report = CombatResolver::new()
//!     .resolve(hero, &slash, Some(slime), &mut roster)
//!     .unwrap();
//!
//! assert_eq!(report.effects[0].hp_after, 10);
//! assert_eq!(roster.get(hero).unwrap().current_mp(), 40);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{InvalidActionReason, Result};
use crate::fighter::FighterId;
use crate::roster::Roster;
use crate::skill::{EffectType, Skill, SkillId, TargetShape};
use crate::targeting::TargetingResolver;

/// Outcome of one skill on one target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetEffect {
    /// Fighter affected.
    pub target: FighterId,
    /// Damage or heal.
    pub effect: EffectType,
    /// Nominal magnitude (the skill's power).
    pub amount: u32,
    /// HP before the effect.
    pub hp_before: u32,
    /// HP after the effect.
    pub hp_after: u32,
    /// Whether the target is alive afterwards.
    pub alive: bool,
}

impl TargetEffect {
    /// HP actually removed or restored after clamping.
    #[must_use]
    pub fn delta(&self) -> u32 {
        self.hp_before.abs_diff(self.hp_after)
    }

    /// True if this effect is what killed the target.
    #[must_use]
    pub fn defeated(&self) -> bool {
        self.hp_before > 0 && !self.alive
    }
}

/// Everything one resolved action changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionReport {
    /// Acting fighter.
    pub caster: FighterId,
    /// Skill used.
    pub skill: SkillId,
    /// Shape of the skill.
    pub shape: TargetShape,
    /// MP paid.
    pub mana_spent: u32,
    /// Per-target outcomes, in roster order for area shapes.
    pub effects: Vec<TargetEffect>,
}

impl ResolutionReport {
    /// Fighters this action defeated.
    pub fn defeated(&self) -> impl Iterator<Item = FighterId> + '_ {
        self.effects.iter().filter(|e| e.defeated()).map(|e| e.target)
    }

    /// Fighters this action touched.
    pub fn targets(&self) -> impl Iterator<Item = FighterId> + '_ {
        self.effects.iter().map(|e| e.target)
    }
}

/// Applies skills to the roster.
#[derive(Debug, Clone, Copy, Default)]
pub struct CombatResolver {
    targeting: TargetingResolver,
}

impl CombatResolver {
    /// Creates a new combat resolver.
    #[must_use]
    pub fn new() -> Self {
        Self {
            targeting: TargetingResolver::new(),
        }
    }

    /// The targeting rules this resolver validates against.
    #[must_use]
    pub fn targeting(&self) -> &TargetingResolver {
        &self.targeting
    }

    /// Resolves `skill` cast by `caster`.
    ///
    /// `primary` is required for `SingleEnemy` and `SingleAlly`, optional
    /// for `Self` and ignored for area shapes.
    ///
    /// # Errors
    ///
    /// Returns [`CombatError::InvalidAction`](crate::error::CombatError::InvalidAction)
    /// when any precondition fails. The roster is untouched in that case.
    pub fn resolve(
        &self,
        caster: FighterId,
        skill: &Skill,
        primary: Option<FighterId>,
        roster: &mut Roster,
    ) -> Result<ResolutionReport> {
        let targets = self.validate(caster, skill, primary, roster)?;

        let mut effects = Vec::with_capacity(targets.len());
        for target in targets {
            let Some(fighter) = roster.get_mut(target) else {
                continue;
            };
            let hp_before = fighter.current_hp();
            match skill.effect {
                EffectType::Damage => {
                    fighter.take_damage(skill.power);
                }
                EffectType::Heal => {
                    fighter.heal(skill.power);
                }
            }
            effects.push(TargetEffect {
                target,
                effect: skill.effect,
                amount: skill.power,
                hp_before,
                hp_after: fighter.current_hp(),
                alive: fighter.is_alive(),
            });
        }

        if let Some(fighter) = roster.get_mut(caster) {
            fighter.use_mana(skill.mana_cost);
            fighter.set_skill_cooldown(skill);
        }

        tracing::debug!(
            caster = %caster,
            skill = %skill.id,
            targets = effects.len(),
            "skill resolved"
        );

        Ok(ResolutionReport {
            caster,
            skill: skill.id.clone(),
            shape: skill.target_shape,
            mana_spent: skill.mana_cost,
            effects,
        })
    }

    /// Checks every precondition and returns the target set.
    fn validate(
        &self,
        caster_id: FighterId,
        skill: &Skill,
        primary: Option<FighterId>,
        roster: &Roster,
    ) -> Result<Vec<FighterId>> {
        let caster = roster
            .get(caster_id)
            .ok_or(InvalidActionReason::UnknownFighter(caster_id))?;
        if !caster.is_alive() {
            return Err(InvalidActionReason::CasterDefeated(caster_id).into());
        }
        if skill.passive {
            return Err(InvalidActionReason::PassiveSkill(skill.id.clone()).into());
        }
        if !caster.is_skill_available(skill) {
            return Err(InvalidActionReason::OnCooldown {
                skill: skill.id.clone(),
                remaining: caster.cooldown_remaining(&skill.id),
            }
            .into());
        }
        if !caster.has_enough_mana(skill.mana_cost) {
            return Err(InvalidActionReason::InsufficientMana {
                skill: skill.id.clone(),
                required: skill.mana_cost,
                available: caster.current_mp(),
            }
            .into());
        }

        match skill.target_shape {
            TargetShape::Myself => match primary {
                Some(target) if target != caster_id => Err(InvalidActionReason::IllegalTarget {
                    skill: skill.id.clone(),
                    target,
                }
                .into()),
                _ => Ok(vec![caster_id]),
            },
            TargetShape::SingleEnemy | TargetShape::SingleAlly => {
                let target = primary.ok_or_else(|| InvalidActionReason::MissingTarget(skill.id.clone()))?;
                if !roster.contains(target) {
                    return Err(InvalidActionReason::UnknownFighter(target).into());
                }
                if !self
                    .targeting
                    .is_legal_target(caster, skill.target_shape, target, roster)
                {
                    return Err(InvalidActionReason::IllegalTarget {
                        skill: skill.id.clone(),
                        target,
                    }
                    .into());
                }
                Ok(vec![target])
            }
            TargetShape::AllEnemies | TargetShape::AllAllies => {
                let candidates = self
                    .targeting
                    .resolve_candidates(caster, skill.target_shape, roster);
                if candidates.is_empty() {
                    return Err(InvalidActionReason::NoTargets(skill.id.clone()).into());
                }
                Ok(candidates)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CombatError;
    use crate::fighter::FighterProfile;
    use std::sync::Arc;

    fn slash() -> Skill {
        Skill::new("slash", 20, TargetShape::SingleEnemy, EffectType::Damage)
            .with_cooldown(2)
            .with_mana_cost(10)
    }

    /// hero(0) 100/50, mira(1) 80/40, slime(2) 30, bat(3) 12
    fn roster() -> Roster {
        let mut roster = Roster::new();
        roster.spawn(Arc::new(FighterProfile::player("hero", "Hero", 100, 50)), Vec::new());
        roster.spawn(Arc::new(FighterProfile::comrade("mira", "Mira", 80, 40)), Vec::new());
        roster.spawn(Arc::new(FighterProfile::enemy("slime", "Slime", 30, 0)), Vec::new());
        roster.spawn(Arc::new(FighterProfile::enemy("bat", "Bat", 12, 0)), Vec::new());
        roster
    }

    fn id(raw: u32) -> FighterId {
        FighterId::new(raw)
    }

    fn reason(err: CombatError) -> InvalidActionReason {
        match err {
            CombatError::InvalidAction(reason) => reason,
            other => panic!("expected InvalidAction, got {other:?}"),
        }
    }

    mod single_target_tests {
        use super::*;

        #[test]
        fn damage_spends_mana_and_starts_cooldown() {
            let mut roster = roster();
            let skill = slash();
            let report = CombatResolver::new()
                .resolve(id(0), &skill, Some(id(2)), &mut roster)
                .unwrap();

            assert_eq!(report.effects.len(), 1);
            assert_eq!(report.effects[0].hp_after, 10);
            assert!(report.effects[0].alive);
            assert_eq!(report.mana_spent, 10);

            let hero = roster.get(id(0)).unwrap();
            assert_eq!(hero.current_mp(), 40);
            assert_eq!(hero.cooldown_remaining(&skill.id), 2);
        }

        #[test]
        fn lethal_damage_reports_defeat() {
            let mut roster = roster();
            let skill = slash();
            let report = CombatResolver::new()
                .resolve(id(0), &skill, Some(id(3)), &mut roster)
                .unwrap();
            assert_eq!(report.defeated().collect::<Vec<_>>(), vec![id(3)]);
            assert_eq!(report.effects[0].delta(), 12);
            assert!(!roster.get(id(3)).unwrap().is_alive());
        }

        #[test]
        fn single_ally_heal_clamps() {
            let mut roster = roster();
            roster.get_mut(id(1)).unwrap().take_damage(10);
            let heal = Skill::new("mend", 25, TargetShape::SingleAlly, EffectType::Heal);
            let report = CombatResolver::new()
                .resolve(id(0), &heal, Some(id(1)), &mut roster)
                .unwrap();
            assert_eq!(report.effects[0].hp_after, 80);
            assert_eq!(report.effects[0].delta(), 10);
        }

        #[test]
        fn self_shape_targets_caster_without_primary() {
            let mut roster = roster();
            roster.get_mut(id(0)).unwrap().take_damage(50);
            let focus = Skill::new("focus", 15, TargetShape::Myself, EffectType::Heal);
            let report = CombatResolver::new()
                .resolve(id(0), &focus, None, &mut roster)
                .unwrap();
            assert_eq!(report.targets().collect::<Vec<_>>(), vec![id(0)]);
            assert_eq!(roster.get(id(0)).unwrap().current_hp(), 65);
        }

        #[test]
        fn self_damage_hits_the_caster() {
            let mut roster = roster();
            let sacrifice = Skill::new("sacrifice", 30, TargetShape::Myself, EffectType::Damage);
            CombatResolver::new()
                .resolve(id(1), &sacrifice, Some(id(1)), &mut roster)
                .unwrap();
            assert_eq!(roster.get(id(1)).unwrap().current_hp(), 50);
        }
    }

    mod area_tests {
        use super::*;

        #[test]
        fn aoe_heal_clamps_each_ally() {
            let mut roster = roster();
            roster.get_mut(id(0)).unwrap().take_damage(60);
            let wave = Skill::new("wave", 15, TargetShape::AllAllies, EffectType::Heal);
            let report = CombatResolver::new()
                .resolve(id(1), &wave, None, &mut roster)
                .unwrap();
            let after: Vec<u32> = report.effects.iter().map(|e| e.hp_after).collect();
            assert_eq!(after, vec![55, 80]);
        }

        #[test]
        fn aoe_damage_hits_every_living_enemy_once() {
            let mut roster = roster();
            let quake = Skill::new("quake", 5, TargetShape::AllEnemies, EffectType::Damage);
            let report = CombatResolver::new()
                .resolve(id(0), &quake, None, &mut roster)
                .unwrap();
            assert_eq!(report.effects.len(), 2);
            assert!(report.effects.iter().all(|e| e.amount == 5 && e.delta() == 5));
        }

        #[test]
        fn aoe_skips_dead_enemies() {
            let mut roster = roster();
            roster.get_mut(id(3)).unwrap().take_damage(100);
            let quake = Skill::new("quake", 5, TargetShape::AllEnemies, EffectType::Damage);
            let report = CombatResolver::new()
                .resolve(id(0), &quake, Some(id(3)), &mut roster)
                .unwrap();
            assert_eq!(report.targets().collect::<Vec<_>>(), vec![id(2)]);
        }

        #[test]
        fn heal_effect_on_enemy_shape_heals_enemies() {
            let mut roster = roster();
            roster.get_mut(id(2)).unwrap().take_damage(20);
            let odd = Skill::new("odd", 5, TargetShape::AllEnemies, EffectType::Heal);
            CombatResolver::new()
                .resolve(id(0), &odd, None, &mut roster)
                .unwrap();
            assert_eq!(roster.get(id(2)).unwrap().current_hp(), 15);
        }
    }

    mod rejection_tests {
        use super::*;

        fn unchanged(before: &Roster, after: &Roster) {
            assert_eq!(before.snapshot(), after.snapshot());
        }

        #[test]
        fn cooldown_is_rejected() {
            let mut roster = roster();
            let skill = slash();
            let resolver = CombatResolver::new();
            resolver.resolve(id(0), &skill, Some(id(2)), &mut roster).unwrap();
            let before = roster.clone();
            let err = resolver
                .resolve(id(0), &skill, Some(id(2)), &mut roster)
                .unwrap_err();
            assert_eq!(
                reason(err),
                InvalidActionReason::OnCooldown {
                    skill: skill.id.clone(),
                    remaining: 2
                }
            );
            unchanged(&before, &roster);
        }

        #[test]
        fn insufficient_mana_is_rejected() {
            let mut roster = roster();
            let nuke = Skill::new("nuke", 99, TargetShape::SingleEnemy, EffectType::Damage).with_mana_cost(60);
            let before = roster.clone();
            let err = CombatResolver::new()
                .resolve(id(0), &nuke, Some(id(2)), &mut roster)
                .unwrap_err();
            assert!(matches!(
                reason(err),
                InvalidActionReason::InsufficientMana {
                    required: 60,
                    available: 50,
                    ..
                }
            ));
            unchanged(&before, &roster);
        }

        #[test]
        fn wrong_side_target_is_rejected() {
            let mut roster = roster();
            let err = CombatResolver::new()
                .resolve(id(0), &slash(), Some(id(1)), &mut roster)
                .unwrap_err();
            assert!(matches!(reason(err), InvalidActionReason::IllegalTarget { .. }));
        }

        #[test]
        fn dead_target_is_rejected() {
            let mut roster = roster();
            roster.get_mut(id(2)).unwrap().take_damage(100);
            let err = CombatResolver::new()
                .resolve(id(0), &slash(), Some(id(2)), &mut roster)
                .unwrap_err();
            assert!(matches!(reason(err), InvalidActionReason::IllegalTarget { .. }));
        }

        #[test]
        fn missing_and_unknown_targets_are_rejected() {
            let mut roster = roster();
            let resolver = CombatResolver::new();
            let err = resolver.resolve(id(0), &slash(), None, &mut roster).unwrap_err();
            assert!(matches!(reason(err), InvalidActionReason::MissingTarget(_)));
            let err = resolver
                .resolve(id(0), &slash(), Some(id(42)), &mut roster)
                .unwrap_err();
            assert_eq!(reason(err), InvalidActionReason::UnknownFighter(id(42)));
        }

        #[test]
        fn self_shape_rejects_other_target() {
            let mut roster = roster();
            let focus = Skill::new("focus", 15, TargetShape::Myself, EffectType::Heal);
            let err = CombatResolver::new()
                .resolve(id(0), &focus, Some(id(1)), &mut roster)
                .unwrap_err();
            assert!(matches!(reason(err), InvalidActionReason::IllegalTarget { .. }));
        }

        #[test]
        fn dead_caster_and_passive_skill_are_rejected() {
            let mut roster = roster();
            let resolver = CombatResolver::new();
            let aura = Skill::new("aura", 1, TargetShape::Myself, EffectType::Heal).passive();
            let err = resolver.resolve(id(0), &aura, None, &mut roster).unwrap_err();
            assert!(matches!(reason(err), InvalidActionReason::PassiveSkill(_)));

            roster.get_mut(id(1)).unwrap().take_damage(500);
            let err = resolver
                .resolve(id(1), &slash(), Some(id(2)), &mut roster)
                .unwrap_err();
            assert_eq!(reason(err), InvalidActionReason::CasterDefeated(id(1)));
        }

        #[test]
        fn empty_area_is_rejected() {
            let mut roster = roster();
            for raw in [2, 3] {
                roster.get_mut(id(raw)).unwrap().take_damage(100);
            }
            let quake = Skill::new("quake", 5, TargetShape::AllEnemies, EffectType::Damage).with_mana_cost(5);
            let err = CombatResolver::new()
                .resolve(id(0), &quake, None, &mut roster)
                .unwrap_err();
            assert!(matches!(reason(err), InvalidActionReason::NoTargets(_)));
            assert_eq!(roster.get(id(0)).unwrap().current_mp(), 50);
        }
    }
}
