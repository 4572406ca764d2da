//! # MyRPG Core
//!
//! Turn-based combat core for MyRPG.
//!
//! This crate resolves battles between the player's party and a group of
//! enemies: turn order, skill targeting, damage and healing, NPC decisions,
//! and victory rewards. It renders nothing and persists nothing; game content
//! comes in through the provider traits in [`data`] and everything that
//! happens goes out as [`observer::BattleEvent`]s.
//!
//! ## Architecture
//!
//! - **Fighters**: live HP/MP/cooldown state over an immutable profile
//! - **Targeting**: legal candidate sets per skill shape
//! - **AI**: pluggable strategies choosing a skill and target
//! - **Combat**: validates and applies one skill
//! - **Battle**: the turn sequencer that drives all of the above
//!
//! ## Usage
//!
//! ```
//! use std::sync::Arc;
//! use myrpg_core::{Battle, BattleConfig, GameData, ProfileId, SkillId, TurnState};
//!
//! let data = Arc::new(GameData::from_json_str(r#"{
//!     "player":  { "id": "hero", "display_name": "Hero", "max_hp": 100, "max_mp": 30,
//!                  "kind": "Player", "faction": "Allied", "skills": ["slash"] },
//!     "enemies": [{ "id": "slime", "display_name": "Slime", "max_hp": 25, "max_mp": 0,
//!                   "kind": "Enemy", "faction": "Enemy", "skills": ["ooze"], "xp_reward": 10 }],
//!     "skills":  [{ "id": "slash", "power": 20, "target_shape": "SingleEnemy", "effect": "Damage" },
//!                 { "id": "ooze",  "power": 4,  "target_shape": "SingleEnemy", "effect": "Damage" }]
//! }"#).unwrap());
//!
//! let mut battle = Battle::new(BattleConfig::default().with_seed(7), data.clone(), data.clone());
//! let mut state = battle
//!     .start_from_providers(data.as_ref(), data.as_ref(), &[ProfileId::new("slime")])
//!     .unwrap();
//!
//! let slime = battle.roster().ids().nth(1);
//! while let TurnState::AwaitingPlayer { .. } = state {
//!     state = battle.submit_player_action(&SkillId::new("slash"), slime).unwrap();
//! }
//! assert!(state.is_finished());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod ai;
pub mod battle;
pub mod combat;
pub mod config;
pub mod data;
pub mod encounter;
pub mod error;
pub mod fighter;
pub mod loot;
pub mod observer;
pub mod party;
pub mod progression;
pub mod rng;
pub mod roster;
pub mod skill;
pub mod targeting;

pub use ai::{Decision, Strategy, StrategyRegistry, TacticalCue};
pub use battle::{Battle, BattleOutcome, BattleReport, DefeatReason, TurnState};
pub use combat::{CombatResolver, ResolutionReport, TargetEffect};
pub use config::{BattleConfig, CooldownTickPolicy, LootAmountBounds};
pub use data::GameData;
pub use error::{CombatError, InvalidActionReason, Result};
pub use fighter::{Faction, Fighter, FighterId, FighterKind, FighterProfile, ProfileId};
pub use observer::{BattleEvent, BattleObserver, EventLog};
pub use rng::{RandomSource, SeededRandom};
pub use roster::Roster;
pub use skill::{EffectType, Skill, SkillId, TargetShape};
pub use targeting::TargetingResolver;

#[cfg(test)]
mod tests;
