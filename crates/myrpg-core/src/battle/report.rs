//! Turn sequencer results.

use serde::{Deserialize, Serialize};

use crate::fighter::FighterId;
use crate::loot::LootDrop;

/// Why the party lost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DefeatReason {
    /// No allied fighter is standing.
    PartyDefeated,
    /// The activation cap ran out before either side fell.
    TurnLimitReached,
}

/// Final result of a battle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattleReport {
    /// Every enemy fell while an ally was standing.
    Victory {
        /// Sum of the defeated enemies' XP rewards.
        xp: u32,
        /// Items rolled from the defeated enemies' loot tables.
        loot: Vec<LootDrop>,
    },
    /// The party lost. No rewards.
    Defeat {
        /// Why.
        reason: DefeatReason,
    },
}

impl BattleReport {
    /// The coarse outcome.
    #[must_use]
    pub fn outcome(&self) -> BattleOutcome {
        match self {
            Self::Victory { .. } => BattleOutcome::Victory,
            Self::Defeat { .. } => BattleOutcome::Defeat,
        }
    }
}

/// Coarse battle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattleOutcome {
    /// Still being fought (or not yet started).
    InProgress,
    /// The party won.
    Victory,
    /// The party lost.
    Defeat,
}

/// Where control sits after a sequencer call returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnState {
    /// The player fighter is active; call `submit_player_action` or
    /// `pass_player_turn` to continue.
    AwaitingPlayer {
        /// The suspended fighter.
        actor: FighterId,
    },
    /// The battle is over.
    Finished(BattleReport),
}

impl TurnState {
    /// True once the battle has ended.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        matches!(self, Self::Finished(_))
    }

    /// The suspended player fighter, if any.
    #[must_use]
    pub fn awaiting(&self) -> Option<FighterId> {
        match self {
            Self::AwaitingPlayer { actor } => Some(*actor),
            Self::Finished(_) => None,
        }
    }

    /// The final report, if the battle is over.
    #[must_use]
    pub fn report(&self) -> Option<&BattleReport> {
        match self {
            Self::Finished(report) => Some(report),
            Self::AwaitingPlayer { .. } => None,
        }
    }
}
