//! Data providers the combat core reads from.
//!
//! The core never owns game content. Profiles, skills, loot tables, enemy
//! groups and the active party come from adapters behind these traits:
//!
//! - [`FighterProfileProvider`]: player, comrade and enemy templates
//! - [`SkillCatalog`]: skill definitions by id
//! - [`PartyRosterProvider`]: comrades that join the next battle
//! - [`LootTableProvider`]: per-enemy loot tables
//! - [`EnemyGroupProvider`]: encounter definitions
//!
//! [`GameData`] is an in-memory catalog implementing all of them, loadable
//! from one JSON document.
//!
//! # Example
//!
//! ```
//! use myrpg_core::data::{FighterProfileProvider, GameData, SkillCatalog};
//! use myrpg_core::skill::SkillId;
//!
//! let data = GameData::from_json_str(r#"{
//!     "player": { "id": "hero", "display_name": "Hero", "max_hp": 100, "max_mp": 50,
//!                 "kind": "Player", "faction": "Allied", "skills": ["slash"] },
//!     "skills": [{ "id": "slash", "power": 20, "target_shape": "SingleEnemy",
//!                  "effect": "Damage", "cooldown_turns": 2, "mana_cost": 10 }]
//! }"#).unwrap();
//!
//! assert_eq!(data.player().unwrap().max_hp, 100);
//! assert_eq!(data.skill(&SkillId::new("slash")).unwrap().power, 20);
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::encounter::EnemyGroup;
use crate::fighter::{FighterProfile, ProfileId};
use crate::loot::LootEntry;
use crate::party::Party;
use crate::skill::{Skill, SkillId};

// =============================================================================
// Provider traits
// =============================================================================

/// Resolves fighter templates.
pub trait FighterProfileProvider: Send + Sync {
    /// The player character, if one is defined.
    fn player(&self) -> Option<Arc<FighterProfile>>;

    /// A comrade by id.
    fn ally(&self, id: &ProfileId) -> Option<Arc<FighterProfile>>;

    /// An enemy by id.
    fn enemy(&self, id: &ProfileId) -> Option<Arc<FighterProfile>>;
}

/// Resolves skill definitions.
pub trait SkillCatalog: Send + Sync {
    /// The skill with this id.
    fn skill(&self, id: &SkillId) -> Option<Arc<Skill>>;
}

/// Lists the comrades that join a battle.
pub trait PartyRosterProvider {
    /// Active comrade profile ids, in roster order.
    fn active_ally_ids(&self) -> Vec<ProfileId>;
}

/// Resolves loot tables.
pub trait LootTableProvider: Send + Sync {
    /// Loot table of an enemy profile. `None` means it drops nothing.
    fn loot_table(&self, enemy: &ProfileId) -> Option<Vec<LootEntry>>;
}

/// Resolves encounter definitions.
pub trait EnemyGroupProvider {
    /// The group with this id.
    fn enemy_group(&self, id: &str) -> Option<EnemyGroup>;
}

// =============================================================================
// GameData
// =============================================================================

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct Document {
    player: Option<FighterProfile>,
    comrades: Vec<FighterProfile>,
    enemies: Vec<FighterProfile>,
    skills: Vec<Skill>,
    loot_tables: BTreeMap<ProfileId, Vec<LootEntry>>,
    enemy_groups: Vec<EnemyGroup>,
    party: Party,
}

/// In-memory game content.
#[derive(Debug, Clone, Default)]
pub struct GameData {
    player: Option<Arc<FighterProfile>>,
    comrades: BTreeMap<ProfileId, Arc<FighterProfile>>,
    enemies: BTreeMap<ProfileId, Arc<FighterProfile>>,
    skills: BTreeMap<SkillId, Arc<Skill>>,
    loot_tables: BTreeMap<ProfileId, Vec<LootEntry>>,
    enemy_groups: BTreeMap<String, EnemyGroup>,
    party: Party,
}

impl GameData {
    /// Empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a catalog document. Every top-level section is optional.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if the document is malformed.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        let doc: Document = serde_json::from_str(json)?;
        let mut data = Self::new();
        if let Some(player) = doc.player {
            data = data.with_player(player);
        }
        for profile in doc.comrades {
            data = data.with_comrade(profile);
        }
        for profile in doc.enemies {
            data = data.with_enemy(profile);
        }
        for skill in doc.skills {
            data = data.with_skill(skill);
        }
        for (enemy, table) in doc.loot_tables {
            data.loot_tables.insert(enemy, table);
        }
        for group in doc.enemy_groups {
            data = data.with_enemy_group(group);
        }
        data.party = doc.party;
        Ok(data)
    }

    /// Serializes the catalog back into the document format.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if serialization fails.
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        let doc = Document {
            player: self.player.as_deref().cloned(),
            comrades: self.comrades.values().map(|p| (**p).clone()).collect(),
            enemies: self.enemies.values().map(|p| (**p).clone()).collect(),
            skills: self.skills.values().map(|s| (**s).clone()).collect(),
            loot_tables: self.loot_tables.clone(),
            enemy_groups: self.enemy_groups.values().cloned().collect(),
            party: self.party.clone(),
        };
        serde_json::to_string_pretty(&doc)
    }

    /// Sets the player profile.
    #[must_use]
    pub fn with_player(mut self, profile: FighterProfile) -> Self {
        self.player = Some(Arc::new(profile));
        self
    }

    /// Adds a comrade profile.
    #[must_use]
    pub fn with_comrade(mut self, profile: FighterProfile) -> Self {
        self.comrades.insert(profile.id.clone(), Arc::new(profile));
        self
    }

    /// Adds an enemy profile.
    #[must_use]
    pub fn with_enemy(mut self, profile: FighterProfile) -> Self {
        self.enemies.insert(profile.id.clone(), Arc::new(profile));
        self
    }

    /// Adds a skill definition.
    #[must_use]
    pub fn with_skill(mut self, skill: Skill) -> Self {
        self.skills.insert(skill.id.clone(), Arc::new(skill));
        self
    }

    /// Sets an enemy's loot table.
    #[must_use]
    pub fn with_loot_table(mut self, enemy: &str, table: Vec<LootEntry>) -> Self {
        self.loot_tables.insert(ProfileId::new(enemy), table);
        self
    }

    /// Adds an encounter definition.
    #[must_use]
    pub fn with_enemy_group(mut self, group: EnemyGroup) -> Self {
        self.enemy_groups.insert(group.id.clone(), group);
        self
    }

    /// Marks a comrade as active.
    #[must_use]
    pub fn with_active_comrade(mut self, id: &str) -> Self {
        self.party.add(id);
        self
    }

    /// The active party.
    #[must_use]
    pub fn party(&self) -> &Party {
        &self.party
    }

    /// Mutable access to the active party.
    pub fn party_mut(&mut self) -> &mut Party {
        &mut self.party
    }

    /// Number of skills in the catalog.
    #[must_use]
    pub fn skill_count(&self) -> usize {
        self.skills.len()
    }
}

impl FighterProfileProvider for GameData {
    fn player(&self) -> Option<Arc<FighterProfile>> {
        self.player.clone()
    }

    fn ally(&self, id: &ProfileId) -> Option<Arc<FighterProfile>> {
        self.comrades.get(id).cloned()
    }

    fn enemy(&self, id: &ProfileId) -> Option<Arc<FighterProfile>> {
        self.enemies.get(id).cloned()
    }
}

impl SkillCatalog for GameData {
    fn skill(&self, id: &SkillId) -> Option<Arc<Skill>> {
        self.skills.get(id).cloned()
    }
}

impl PartyRosterProvider for GameData {
    fn active_ally_ids(&self) -> Vec<ProfileId> {
        self.party.active_ally_ids()
    }
}

impl LootTableProvider for GameData {
    fn loot_table(&self, enemy: &ProfileId) -> Option<Vec<LootEntry>> {
        self.loot_tables.get(enemy).cloned()
    }
}

impl EnemyGroupProvider for GameData {
    fn enemy_group(&self, id: &str) -> Option<EnemyGroup> {
        self.enemy_groups.get(id).cloned()
    }
}
