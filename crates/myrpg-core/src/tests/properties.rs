//! Property tests for fighter arithmetic, resolution and the turn loop.

use std::collections::BTreeSet;
use std::sync::Arc;

use proptest::prelude::*;

use crate::battle::{BattleReport, TurnState};
use crate::combat::CombatResolver;
use crate::config::{BattleConfig, LootAmountBounds};
use crate::fighter::{Faction, Fighter, FighterId, FighterProfile};
use crate::loot::LootEntry;
use crate::observer::BattleEvent;
use crate::rng::SeededRandom;
use crate::roster::Roster;
use crate::skill::{EffectType, Skill, TargetShape};

use super::helpers::{battle_with, catalog, push, quake, turn_order};

#[derive(Debug, Clone)]
enum Op {
    Damage(u32),
    Heal(u32),
    Mana(u32),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0u32..80).prop_map(Op::Damage),
        (0u32..80).prop_map(Op::Heal),
        (0u32..40).prop_map(Op::Mana),
    ]
}

fn fighter(max_hp: u32, max_mp: u32) -> Fighter {
    Fighter::new(
        FighterId::new(0),
        Arc::new(FighterProfile::comrade("mira", "Mira", max_hp, max_mp)),
        Vec::new(),
    )
}

proptest! {
    #[test]
    fn hp_and_mp_stay_in_bounds(
        max_hp in 1u32..200,
        max_mp in 0u32..100,
        ops in prop::collection::vec(op(), 0..40),
    ) {
        let mut f = fighter(max_hp, max_mp);
        let mut was_dead = false;
        for op in ops {
            match op {
                Op::Damage(n) => { f.take_damage(n); }
                Op::Heal(n) => { f.heal(n); }
                Op::Mana(n) => f.use_mana(n),
            }
            prop_assert!(f.current_hp() <= f.max_hp());
            prop_assert!(f.current_mp() <= f.max_mp());
            prop_assert_eq!(f.is_alive(), f.current_hp() > 0);
            // Nothing revives.
            if was_dead {
                prop_assert!(!f.is_alive());
            }
            was_dead = !f.is_alive();
        }
    }

    #[test]
    fn zero_damage_and_zero_heal_change_nothing(max_hp in 1u32..200, hp in 0u32..200) {
        let mut f = fighter(max_hp, 0).with_current_hp(hp.min(max_hp));
        let (before, alive) = (f.current_hp(), f.is_alive());
        prop_assert_eq!(f.take_damage(0), 0);
        prop_assert_eq!(f.heal(0), 0);
        prop_assert_eq!(f.current_hp(), before);
        prop_assert_eq!(f.is_alive(), alive);
    }

    #[test]
    fn cooldown_round_trip(turns in 1u32..10) {
        let skill = Skill::new("slash", 1, TargetShape::SingleEnemy, EffectType::Damage)
            .with_cooldown(turns);
        let mut f = fighter(10, 0);
        f.set_skill_cooldown(&skill);
        for _ in 1..turns {
            f.reduce_cooldowns();
            prop_assert!(!f.is_skill_available(&skill));
        }
        f.reduce_cooldowns();
        prop_assert!(f.is_skill_available(&skill));
    }

    #[test]
    fn area_damage_hits_every_living_enemy(hps in prop::collection::vec(0u32..30, 1..6)) {
        let mut roster = Roster::new();
        let caster = push(&mut roster, FighterProfile::player("hero", "Hero", 100, 0), &["quake"], 100);
        for (i, hp) in hps.iter().enumerate() {
            push(&mut roster, FighterProfile::enemy(&format!("e{i}"), "Enemy", 30, 0), &[], *hp);
        }
        let living = hps.iter().filter(|hp| **hp > 0).count();
        let skill = quake();

        let result = CombatResolver::new().resolve(caster, &skill, None, &mut roster);
        if living == 0 {
            prop_assert!(result.is_err());
        } else {
            let report = result.unwrap();
            prop_assert_eq!(report.effects.len(), living);
            for effect in &report.effects {
                prop_assert_eq!(effect.amount, skill.power);
                prop_assert_eq!(effect.hp_after, effect.hp_before.saturating_sub(skill.power));
            }
        }
    }

    #[test]
    fn loot_amounts_respect_bounds(
        min in 0u32..5,
        span in 0u32..5,
        inclusive in any::<bool>(),
        seed in any::<u64>(),
    ) {
        let entry = LootEntry::new("gem", 1.0, min, min + span);
        let bounds = if inclusive {
            LootAmountBounds::MaxInclusive
        } else {
            LootAmountBounds::MaxExclusive
        };
        let mut rng = SeededRandom::new(seed);
        let drop = entry.roll(bounds, &mut rng).unwrap();
        prop_assert!(drop.amount >= min);
        if inclusive || span == 0 {
            prop_assert!(drop.amount <= min + span);
        } else {
            prop_assert!(drop.amount < min + span);
        }
    }
}

// =============================================================================
// Turn loop
// =============================================================================

fn npc_roster(ally_hp: &[u32], enemy_hp: &[u32]) -> Roster {
    let mut roster = Roster::new();
    for (i, hp) in ally_hp.iter().enumerate() {
        push(
            &mut roster,
            FighterProfile::comrade(&format!("a{i}"), "Ally", 60, 0),
            &["jab", "wave"],
            *hp,
        );
    }
    for (i, hp) in enemy_hp.iter().enumerate() {
        push(
            &mut roster,
            FighterProfile::enemy(&format!("e{i}"), "Enemy", 60, 0).with_ai_class("random"),
            &["jab", "quake", "lick"],
            *hp,
        );
    }
    roster
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn npc_battles_finish_and_respect_the_dead(
        seed in any::<u64>(),
        ally_hp in prop::collection::vec(0u32..60, 1..4),
        enemy_hp in prop::collection::vec(0u32..60, 1..4),
    ) {
        let config = BattleConfig::default().with_seed(seed).with_turn_limit(2_000);
        let (mut battle, log) = battle_with(catalog(), config);
        let state = battle.start_with_roster(npc_roster(&ally_hp, &enemy_hp)).unwrap();
        prop_assert!(state.is_finished());

        let events = log.take_events();
        let mut dead = BTreeSet::new();
        for event in &events {
            match event {
                BattleEvent::TurnStarted { fighter, .. } => {
                    prop_assert!(!dead.contains(fighter));
                }
                BattleEvent::FighterDefeated { fighter, .. } => {
                    dead.insert(*fighter);
                }
                _ => {}
            }
        }
        for id in turn_order(&events) {
            prop_assert!(battle.roster().contains(id));
        }

        let allies_up = battle.roster().any_alive(Faction::Allied);
        let enemies_up = battle.roster().any_alive(Faction::Enemy);
        let won = matches!(state, TurnState::Finished(BattleReport::Victory { .. }));
        prop_assert_eq!(won, allies_up && !enemies_up);
    }
}
