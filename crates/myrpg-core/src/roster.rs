//! The ordered set of fighters taking part in one battle.
//!
//! Insertion order is turn order. Fighters are never removed: a defeated
//! fighter keeps its slot (and its [`FighterId`]) and is skipped by the turn
//! sequencer instead. That keeps ids stable and iteration deterministic.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use myrpg_core::fighter::{Faction, FighterProfile};
//! use myrpg_core::roster::Roster;
//!
//! let mut roster = Roster::new();
//! let hero = roster.spawn(Arc::new(FighterProfile::player("hero", "Hero", 100, 50)), Vec::new());
//! let slime = roster.spawn(Arc::new(FighterProfile::enemy("slime", "Slime", 10, 0)), Vec::new());
//!
//! assert_eq!(roster.ids().collect::<Vec<_>>(), vec![hero, slime]);
//! assert!(roster.any_alive(Faction::Enemy));
//! ```

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::fighter::{Faction, Fighter, FighterId, FighterProfile};
use crate::skill::Skill;

/// Fixed-order fighter storage for one battle.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    fighters: Vec<Fighter>,
}

impl Roster {
    /// Creates an empty roster.
    #[must_use]
    pub fn new() -> Self {
        Self {
            fighters: Vec::new(),
        }
    }

    /// Adds a fighter at full HP/MP and returns its id.
    pub fn spawn(&mut self, profile: Arc<FighterProfile>, loadout: Vec<Arc<Skill>>) -> FighterId {
        let id = self.next_id();
        self.fighters.push(Fighter::new(id, profile, loadout));
        id
    }

    /// Adds a prepared fighter, re-assigning its id to the next roster slot.
    ///
    /// Use this for fighters that enter the battle wounded or drained.
    pub fn push(&mut self, mut fighter: Fighter) -> FighterId {
        let id = self.next_id();
        fighter.assign_id(id);
        self.fighters.push(fighter);
        id
    }

    #[allow(clippy::cast_possible_truncation)]
    fn next_id(&self) -> FighterId {
        // Rosters hold a party and an enemy group, far below u32::MAX.
        FighterId::new(self.fighters.len() as u32)
    }

    /// Looks up a fighter.
    #[must_use]
    pub fn get(&self, id: FighterId) -> Option<&Fighter> {
        self.fighters.get(id.index())
    }

    /// Looks up a fighter mutably.
    #[must_use]
    pub fn get_mut(&mut self, id: FighterId) -> Option<&mut Fighter> {
        self.fighters.get_mut(id.index())
    }

    /// True if the id belongs to this roster.
    #[must_use]
    pub fn contains(&self, id: FighterId) -> bool {
        id.index() < self.fighters.len()
    }

    /// Fighters in turn order.
    pub fn fighters(&self) -> impl Iterator<Item = &Fighter> + '_ {
        self.fighters.iter()
    }

    /// Ids in turn order.
    pub fn ids(&self) -> impl Iterator<Item = FighterId> + '_ {
        self.fighters.iter().map(Fighter::id)
    }

    /// Living fighters of one faction, in turn order.
    pub fn alive_in(&self, faction: Faction) -> impl Iterator<Item = &Fighter> + '_ {
        self.fighters
            .iter()
            .filter(move |f| f.is_alive() && f.faction() == faction)
    }

    /// True if any fighter of the faction is still standing.
    #[must_use]
    pub fn any_alive(&self, faction: Faction) -> bool {
        self.alive_in(faction).next().is_some()
    }

    /// The player-controlled fighter, if any.
    #[must_use]
    pub fn player(&self) -> Option<&Fighter> {
        self.fighters.iter().find(|f| f.is_player())
    }

    /// Number of fighters, alive or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fighters.len()
    }

    /// True if the roster has no fighters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fighters.is_empty()
    }

    /// Serializable view of every fighter, for UI and persistence sinks.
    #[must_use]
    pub fn snapshot(&self) -> Vec<FighterSnapshot> {
        self.fighters.iter().map(FighterSnapshot::from).collect()
    }
}

/// Plain-data copy of a fighter's visible state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FighterSnapshot {
    /// Roster handle.
    pub id: FighterId,
    /// Display name.
    pub name: String,
    /// Battle side.
    pub faction: Faction,
    /// Current HP.
    pub hp: u32,
    /// Maximum HP.
    pub max_hp: u32,
    /// Current MP.
    pub mp: u32,
    /// Maximum MP.
    pub max_mp: u32,
    /// Whether the fighter is still standing.
    pub alive: bool,
}

impl From<&Fighter> for FighterSnapshot {
    fn from(f: &Fighter) -> Self {
        Self {
            id: f.id(),
            name: f.display_name().to_string(),
            faction: f.faction(),
            hp: f.current_hp(),
            max_hp: f.max_hp(),
            mp: f.current_mp(),
            max_mp: f.max_mp(),
            alive: f.is_alive(),
        }
    }
}
