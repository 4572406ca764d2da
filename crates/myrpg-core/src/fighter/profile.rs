//! Immutable fighter templates.
//!
//! The game has three sources of fighters (the player character, recruited
//! comrades, enemy definitions). Each is flattened into one
//! [`FighterProfile`] value when the roster is built, so combat logic never
//! needs to ask which source a fighter came from beyond [`FighterKind`].

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::skill::SkillId;

/// Unique identifier of a profile in its provider.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileId(String);

impl ProfileId {
    /// Creates a new `ProfileId`.
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

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ProfileId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Side of the battle. Targeting is defined relative to the caster's faction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Faction {
    /// The player and comrades.
    Allied,
    /// Monsters and other hostiles.
    Enemy,
}

impl Faction {
    /// The faction this one fights against.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Allied => Self::Enemy,
            Self::Enemy => Self::Allied,
        }
    }
}

impl fmt::Display for Faction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Allied => write!(f, "Allied"),
            Self::Enemy => write!(f, "Enemy"),
        }
    }
}

/// Which data source a profile was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FighterKind {
    /// The player character. Exactly one per battle, driven by player input.
    Player,
    /// A recruited ally, driven by AI.
    Comrade,
    /// A hostile, driven by AI.
    Enemy,
}

impl FighterKind {
    /// Faction a fighter of this kind normally belongs to.
    #[must_use]
    pub const fn default_faction(self) -> Faction {
        match self {
            Self::Player | Self::Comrade => Faction::Allied,
            Self::Enemy => Faction::Enemy,
        }
    }
}

/// Immutable template behind a [`Fighter`](crate::fighter::Fighter).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FighterProfile {
    /// Provider id.
    pub id: ProfileId,
    /// Name shown in the UI.
    pub display_name: String,
    /// Opaque handle to the portrait asset.
    #[serde(default)]
    pub icon: Option<String>,
    /// Maximum HP.
    pub max_hp: u32,
    /// Maximum MP.
    pub max_mp: u32,
    /// Source of this profile.
    pub kind: FighterKind,
    /// Battle side.
    pub faction: Faction,
    /// Skills this fighter may use, in display order.
    #[serde(default)]
    pub skills: Vec<SkillId>,
    /// Experience granted to the player when this fighter is defeated.
    #[serde(default)]
    pub xp_reward: u32,
    /// Name of the AI class in the strategy registry. `None` uses the default.
    #[serde(default)]
    pub ai_class: Option<String>,
}

impl FighterProfile {
    fn build(kind: FighterKind, id: &str, display_name: &str, max_hp: u32, max_mp: u32) -> Self {
        Self {
            id: ProfileId::new(id),
            display_name: display_name.to_string(),
            icon: None,
            max_hp,
            max_mp,
            kind,
            faction: kind.default_faction(),
            skills: Vec::new(),
            xp_reward: 0,
            ai_class: None,
        }
    }

    /// Profile for the player character.
    #[must_use]
    pub fn player(id: &str, display_name: &str, max_hp: u32, max_mp: u32) -> Self {
        Self::build(FighterKind::Player, id, display_name, max_hp, max_mp)
    }

    /// Profile for a comrade.
    #[must_use]
    pub fn comrade(id: &str, display_name: &str, max_hp: u32, max_mp: u32) -> Self {
        Self::build(FighterKind::Comrade, id, display_name, max_hp, max_mp)
    }

    /// Profile for an enemy.
    #[must_use]
    pub fn enemy(id: &str, display_name: &str, max_hp: u32, max_mp: u32) -> Self {
        Self::build(FighterKind::Enemy, id, display_name, max_hp, max_mp)
    }

    /// Replaces the skill list.
    #[must_use]
    pub fn with_skills(mut self, skills: &[&str]) -> Self {
        self.skills = skills.iter().map(|s| SkillId::new(*s)).collect();
        self
    }

    /// Sets the experience reward.
    #[must_use]
    pub fn with_xp_reward(mut self, xp: u32) -> Self {
        self.xp_reward = xp;
        self
    }

    /// Selects a named AI class.
    #[must_use]
    pub fn with_ai_class(mut self, class: &str) -> Self {
        self.ai_class = Some(class.to_string());
        self
    }

    /// Sets the icon handle.
    #[must_use]
    pub fn with_icon(mut self, icon: &str) -> Self {
        self.icon = Some(icon.to_string());
        self
    }

    /// Overrides the faction.
    #[must_use]
    pub fn with_faction(mut self, faction: Faction) -> Self {
        self.faction = faction;
        self
    }
}
