//! Skill catalog entries.
//!
//! A [`Skill`] is an immutable definition looked up by [`SkillId`] from an
//! external [`SkillCatalog`](crate::data::SkillCatalog). Live cooldown
//! counters do not live here; they belong to each [`Fighter`](crate::fighter::Fighter).
//!
//! # Example
//!
//! ```
//! use myrpg_core::skill::{EffectType, Skill, SkillId, TargetShape};
//!
//! let slash = Skill::new("slash", 20, TargetShape::SingleEnemy, EffectType::Damage)
//!     .with_cooldown(2)
//!     .with_mana_cost(10);
//!
//! assert_eq!(slash.id, SkillId::new("slash"));
//! assert!(slash.target_shape.is_single());
//! assert!(slash.target_shape.targets_enemies());
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier of a skill definition.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SkillId(String);

impl SkillId {
    /// Creates a new `SkillId`.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SkillId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SkillId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Geometry of a skill's valid targets, relative to the caster's faction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetShape {
    /// One living fighter of the opposing faction.
    SingleEnemy,
    /// One living fighter of the caster's faction (the caster included).
    SingleAlly,
    /// The caster only.
    #[serde(rename = "Self")]
    Myself,
    /// Every living fighter of the opposing faction.
    AllEnemies,
    /// Every living fighter of the caster's faction.
    AllAllies,
}

impl TargetShape {
    /// True for shapes that need one chosen target.
    #[must_use]
    pub const fn is_single(self) -> bool {
        matches!(self, Self::SingleEnemy | Self::SingleAlly | Self::Myself)
    }

    /// True for shapes that hit the whole candidate set.
    #[must_use]
    pub const fn is_area(self) -> bool {
        matches!(self, Self::AllEnemies | Self::AllAllies)
    }

    /// True for shapes aimed at the opposing faction.
    #[must_use]
    pub const fn targets_enemies(self) -> bool {
        matches!(self, Self::SingleEnemy | Self::AllEnemies)
    }
}

impl fmt::Display for TargetShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SingleEnemy => write!(f, "SingleEnemy"),
            Self::SingleAlly => write!(f, "SingleAlly"),
            Self::Myself => write!(f, "Self"),
            Self::AllEnemies => write!(f, "AllEnemies"),
            Self::AllAllies => write!(f, "AllAllies"),
        }
    }
}

/// What a skill does to each of its targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectType {
    /// Subtract `power` HP.
    Damage,
    /// Restore `power` HP, capped at max HP.
    Heal,
}

impl fmt::Display for EffectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Damage => write!(f, "Damage"),
            Self::Heal => write!(f, "Heal"),
        }
    }
}

/// Immutable skill definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    /// Catalog id.
    pub id: SkillId,
    /// Display name. Defaults to the id.
    #[serde(default)]
    pub name: String,
    /// Magnitude of the damage or heal.
    pub power: u32,
    /// Which fighters the skill may affect.
    pub target_shape: TargetShape,
    /// Damage or heal.
    pub effect: EffectType,
    /// Turns the skill is unavailable after use.
    #[serde(default)]
    pub cooldown_turns: u32,
    /// MP spent on each use.
    #[serde(default)]
    pub mana_cost: u32,
    /// Passive skills are always on and never activated in combat.
    #[serde(default)]
    pub passive: bool,
    /// Flavour text for tooltips.
    #[serde(default)]
    pub description: String,
}

impl Skill {
    /// Creates an active skill with no cooldown and no mana cost.
    #[must_use]
    pub fn new(id: &str, power: u32, target_shape: TargetShape, effect: EffectType) -> Self {
        Self {
            id: SkillId::new(id),
            name: id.to_string(),
            power,
            target_shape,
            effect,
            cooldown_turns: 0,
            mana_cost: 0,
            passive: false,
            description: String::new(),
        }
    }

    /// Sets the cooldown length.
    #[must_use]
    pub fn with_cooldown(mut self, turns: u32) -> Self {
        self.cooldown_turns = turns;
        self
    }

    /// Sets the mana cost.
    #[must_use]
    pub fn with_mana_cost(mut self, cost: u32) -> Self {
        self.mana_cost = cost;
        self
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    /// Marks the skill passive.
    #[must_use]
    pub fn passive(mut self) -> Self {
        self.passive = true;
        self
    }

    /// True if this skill heals.
    #[must_use]
    pub fn is_heal(&self) -> bool {
        self.effect == EffectType::Heal
    }

    /// True if this skill deals damage.
    #[must_use]
    pub fn is_damage(&self) -> bool {
        self.effect == EffectType::Damage
    }

    /// Display name, falling back to the id when no name was given.
    #[must_use]
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            self.id.as_str()
        } else {
            &self.name
        }
    }
}
