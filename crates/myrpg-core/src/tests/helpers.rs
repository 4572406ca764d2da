//! Fixtures for battle tests.

use std::collections::VecDeque;
use std::sync::Arc;

use crate::battle::Battle;
use crate::config::BattleConfig;
use crate::data::GameData;
use crate::fighter::{Fighter, FighterId, FighterProfile};
use crate::observer::{BattleEvent, EventLog};
use crate::rng::RandomSource;
use crate::roster::Roster;
use crate::skill::{EffectType, Skill, SkillId, TargetShape};

/// Routes `tracing` output through the test harness. Safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

// =============================================================================
// Scripted randomness
// =============================================================================

/// Random source that replays queued values.
///
/// Floats default to `0.0` and ints to `lo` once their queue runs dry.
/// Queued ints are clamped into the requested range.
#[derive(Debug, Default, Clone)]
pub struct ScriptedRandom {
    floats: VecDeque<f64>,
    ints: VecDeque<u32>,
}

impl ScriptedRandom {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_floats(mut self, floats: &[f64]) -> Self {
        self.floats.extend(floats);
        self
    }

    pub fn with_ints(mut self, ints: &[u32]) -> Self {
        self.ints.extend(ints);
        self
    }
}

impl RandomSource for ScriptedRandom {
    fn next_float(&mut self) -> f64 {
        self.floats.pop_front().unwrap_or(0.0)
    }

    fn next_int(&mut self, lo: u32, hi: u32) -> u32 {
        if lo >= hi {
            return lo;
        }
        self.ints.pop_front().map_or(lo, |v| v.clamp(lo, hi - 1))
    }
}

// =============================================================================
// Content
// =============================================================================

/// 20 power single-target damage, 10 MP, cooldown 2.
pub fn slash() -> Skill {
    Skill::new("slash", 20, TargetShape::SingleEnemy, EffectType::Damage)
        .with_cooldown(2)
        .with_mana_cost(10)
}

/// 5 power free single-target damage.
pub fn jab() -> Skill {
    Skill::new("jab", 5, TargetShape::SingleEnemy, EffectType::Damage)
}

/// 15 power heal on every ally.
pub fn wave() -> Skill {
    Skill::new("wave", 15, TargetShape::AllAllies, EffectType::Heal)
}

/// 10 power self heal.
pub fn lick() -> Skill {
    Skill::new("lick", 10, TargetShape::Myself, EffectType::Heal)
}

/// 8 power damage on every enemy.
pub fn quake() -> Skill {
    Skill::new("quake", 8, TargetShape::AllEnemies, EffectType::Damage)
}

/// Catalog with every fixture skill.
pub fn catalog() -> GameData {
    GameData::new()
        .with_skill(slash())
        .with_skill(jab())
        .with_skill(wave())
        .with_skill(lick())
        .with_skill(quake())
}

/// Player with 100 HP and 50 MP knowing slash and jab.
pub fn hero() -> FighterProfile {
    FighterProfile::player("hero", "Hero", 100, 50).with_skills(&["slash", "jab"])
}

/// Looks a fixture skill up in [`catalog`].
pub fn skill(id: &str) -> Arc<Skill> {
    use crate::data::SkillCatalog;
    catalog()
        .skill(&SkillId::new(id))
        .unwrap_or_else(|| panic!("no fixture skill {id}"))
}

/// Adds a fighter built from `profile` with the given skills and HP.
pub fn push(roster: &mut Roster, profile: FighterProfile, skills: &[&str], hp: u32) -> FighterId {
    let loadout = skills.iter().map(|id| skill(id)).collect();
    roster.push(Fighter::new(FighterId::new(0), Arc::new(profile), loadout).with_current_hp(hp))
}

// =============================================================================
// Battles
// =============================================================================

/// A battle over `data` with an attached event log.
pub fn battle_with(data: GameData, config: BattleConfig) -> (Battle, EventLog) {
    let data = Arc::new(data);
    let log = EventLog::new();
    let battle = Battle::new(config, data.clone(), data).with_observer(log.clone());
    (battle, log)
}

/// A battle over [`catalog`] with default config.
pub fn battle() -> (Battle, EventLog) {
    battle_with(catalog(), BattleConfig::default())
}

/// Fighters whose turns started, in order.
pub fn turn_order(events: &[BattleEvent]) -> Vec<FighterId> {
    events
        .iter()
        .filter_map(|e| match e {
            BattleEvent::TurnStarted { fighter, .. } => Some(*fighter),
            _ => None,
        })
        .collect()
}

/// Skills resolved by `caster`, in order.
pub fn skills_used_by(events: &[BattleEvent], caster: FighterId) -> Vec<String> {
    events
        .iter()
        .filter_map(|e| match e {
            BattleEvent::ActionResolved { report } if report.caster == caster => {
                Some(report.skill.to_string())
            }
            _ => None,
        })
        .collect()
}

/// Number of events of a kind.
pub fn count(events: &[BattleEvent], kind: &str) -> usize {
    events.iter().filter(|e| e.kind() == kind).count()
}
