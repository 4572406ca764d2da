//! Live combat state of a battle participant.
//!
//! - [`FighterId`]: position-stable handle into the roster
//! - [`Fighter`]: current HP/MP, aliveness, per-skill cooldowns
//! - [`FighterProfile`]: the immutable template the fighter was built from
//!
//! # Invariants
//!
//! - `0 <= current_hp <= max_hp` and `0 <= current_mp <= max_mp` at all times
//! - `is_alive()` is true iff `current_hp > 0`, and once false it never
//!   becomes true again within a battle
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use myrpg_core::fighter::{Fighter, FighterId, FighterProfile};
//! use myrpg_core::skill::{EffectType, Skill, TargetShape};
//!
//! let slash = Arc::new(
//!     Skill::new("slash", 20, TargetShape::SingleEnemy, EffectType::Damage)
//!         .with_cooldown(2)
//!         .with_mana_cost(10),
//! );
//! let profile = Arc::new(FighterProfile::player("hero", "Hero", 100, 50));
//! let mut hero = Fighter::new(FighterId::new(0), profile, vec![Arc::clone(&slash)]);
//!
//! hero.use_mana(slash.mana_cost);
//! hero.set_skill_cooldown(&slash);
//! assert_eq!(hero.current_mp(), 40);
//! assert!(!hero.is_skill_available(&slash));
//! ```

pub mod profile;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::skill::{Skill, SkillId};

pub use profile::{Faction, FighterKind, FighterProfile, ProfileId};

/// Handle of a fighter within one battle's roster.
///
/// Ids are assigned in roster insertion order, which is also turn order.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FighterId(u32);

impl FighterId {
    /// Creates a new `FighterId` from a raw value.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    /// Returns the raw value as a roster index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for FighterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FighterId({})", self.0)
    }
}

impl fmt::Display for FighterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Who makes decisions for a fighter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Controller {
    /// Waits for external player input.
    Player,
    /// Decided by an AI strategy.
    Ai,
}

/// A battle participant's mutable combat state.
#[derive(Debug, Clone)]
pub struct Fighter {
    id: FighterId,
    profile: Arc<FighterProfile>,
    loadout: Vec<Arc<Skill>>,
    current_hp: u32,
    current_mp: u32,
    alive: bool,
    /// Remaining turns per skill. A missing key means the skill is ready.
    cooldowns: BTreeMap<SkillId, u32>,
}

impl Fighter {
    /// Creates a fighter at full HP and MP.
    ///
    /// `loadout` holds the resolved definitions of the profile's skills.
    #[must_use]
    pub fn new(id: FighterId, profile: Arc<FighterProfile>, loadout: Vec<Arc<Skill>>) -> Self {
        let current_hp = profile.max_hp;
        let current_mp = profile.max_mp;
        Self {
            id,
            profile,
            loadout,
            current_hp,
            current_mp,
            alive: current_hp > 0,
            cooldowns: BTreeMap::new(),
        }
    }

    /// Starts the fighter at a given HP instead of full (clamped to max).
    #[must_use]
    pub fn with_current_hp(mut self, hp: u32) -> Self {
        self.current_hp = hp.min(self.profile.max_hp);
        self.alive = self.current_hp > 0;
        self
    }

    /// Starts the fighter at a given MP instead of full (clamped to max).
    #[must_use]
    pub fn with_current_mp(mut self, mp: u32) -> Self {
        self.current_mp = mp.min(self.profile.max_mp);
        self
    }

    pub(crate) fn assign_id(&mut self, id: FighterId) {
        self.id = id;
    }

    /// Roster handle.
    #[must_use]
    pub fn id(&self) -> FighterId {
        self.id
    }

    /// The immutable template.
    #[must_use]
    pub fn profile(&self) -> &Arc<FighterProfile> {
        &self.profile
    }

    /// Display name from the profile.
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.profile.display_name
    }

    /// Battle side.
    #[must_use]
    pub fn faction(&self) -> Faction {
        self.profile.faction
    }

    /// Data source of the profile.
    #[must_use]
    pub fn kind(&self) -> FighterKind {
        self.profile.kind
    }

    /// Who decides this fighter's actions.
    #[must_use]
    pub fn controller(&self) -> Controller {
        match self.profile.kind {
            FighterKind::Player => Controller::Player,
            FighterKind::Comrade | FighterKind::Enemy => Controller::Ai,
        }
    }

    /// True for the player-controlled fighter.
    #[must_use]
    pub fn is_player(&self) -> bool {
        self.controller() == Controller::Player
    }

    /// Current HP.
    #[must_use]
    pub fn current_hp(&self) -> u32 {
        self.current_hp
    }

    /// Maximum HP.
    #[must_use]
    pub fn max_hp(&self) -> u32 {
        self.profile.max_hp
    }

    /// Current MP.
    #[must_use]
    pub fn current_mp(&self) -> u32 {
        self.current_mp
    }

    /// Maximum MP.
    #[must_use]
    pub fn max_mp(&self) -> u32 {
        self.profile.max_mp
    }

    /// Whether the fighter can still act and be targeted.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// `current_hp / max_hp`, or 0 for a fighter with no max HP.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn hp_ratio(&self) -> f32 {
        if self.profile.max_hp == 0 {
            0.0
        } else {
            self.current_hp as f32 / self.profile.max_hp as f32
        }
    }

    /// Resolved skill definitions, in profile order.
    #[must_use]
    pub fn loadout(&self) -> &[Arc<Skill>] {
        &self.loadout
    }

    /// Looks up a skill in the loadout.
    #[must_use]
    pub fn skill(&self, id: &SkillId) -> Option<&Arc<Skill>> {
        self.loadout.iter().find(|s| &s.id == id)
    }

    /// Skills that can be activated right now: not passive, off cooldown and
    /// affordable.
    pub fn usable_skills(&self) -> impl Iterator<Item = &Arc<Skill>> {
        self.loadout.iter().filter(|skill| {
            !skill.passive && self.is_skill_available(skill) && self.has_enough_mana(skill.mana_cost)
        })
    }

    /// Subtracts HP, saturating at zero. Reaching zero is terminal.
    ///
    /// Returns the HP actually removed.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let before = self.current_hp;
        self.current_hp = self.current_hp.saturating_sub(amount);
        if self.current_hp == 0 {
            self.alive = false;
        }
        before - self.current_hp
    }

    /// Restores HP, capped at max HP. Dead fighters stay dead.
    ///
    /// Returns the HP actually restored.
    pub fn heal(&mut self, amount: u32) -> u32 {
        if !self.alive {
            return 0;
        }
        let before = self.current_hp;
        self.current_hp = self.current_hp.saturating_add(amount).min(self.profile.max_hp);
        self.current_hp - before
    }

    /// Spends MP, saturating at zero. Callers check [`Self::has_enough_mana`] first.
    pub fn use_mana(&mut self, amount: u32) {
        self.current_mp = self.current_mp.saturating_sub(amount);
    }

    /// True if at least `amount` MP remains.
    #[must_use]
    pub fn has_enough_mana(&self, amount: u32) -> bool {
        self.current_mp >= amount
    }

    /// Starts the skill's cooldown.
    pub fn set_skill_cooldown(&mut self, skill: &Skill) {
        if skill.cooldown_turns == 0 {
            self.cooldowns.remove(&skill.id);
        } else {
            self.cooldowns.insert(skill.id.clone(), skill.cooldown_turns);
        }
    }

    /// Turns left before the skill is ready again.
    #[must_use]
    pub fn cooldown_remaining(&self, id: &SkillId) -> u32 {
        self.cooldowns.get(id).copied().unwrap_or(0)
    }

    /// True if the skill is off cooldown.
    #[must_use]
    pub fn is_skill_available(&self, skill: &Skill) -> bool {
        self.cooldown_remaining(&skill.id) == 0
    }

    /// Ticks every running cooldown down by one turn.
    pub fn reduce_cooldowns(&mut self) {
        for remaining in self.cooldowns.values_mut() {
            *remaining = remaining.saturating_sub(1);
        }
        self.cooldowns.retain(|_, remaining| *remaining > 0);
    }
}
