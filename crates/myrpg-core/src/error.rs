//! Error taxonomy for the combat core.
//!
//! Three classes of failure exist:
//!
//! - [`CombatError::InvalidAction`]: the caller asked for something the rules
//!   forbid (skill on cooldown, not enough mana, illegal target, wrong phase).
//!   Rejected synchronously; the battle state is left untouched.
//! - [`CombatError::InvariantViolation`]: the engine reached a state that the
//!   turn rules make unreachable. This is a defect, never a gameplay outcome.
//! - [`CombatError::MissingProfileData`]: a profile or skill id could not be
//!   found in the external catalog.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::fighter::FighterId;
use crate::skill::SkillId;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, CombatError>;

/// Errors produced by the combat core.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CombatError {
    /// The requested action is not legal right now.
    #[error("invalid action: {0}")]
    InvalidAction(#[from] InvalidActionReason),

    /// An internal turn-order invariant was broken.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    /// A referenced profile or skill id is not present in its catalog.
    #[error("missing {kind} data for id '{id}'")]
    MissingProfileData {
        /// Which catalog was consulted.
        kind: DataKind,
        /// The id that failed to resolve.
        id: String,
    },
}

impl CombatError {
    /// Shorthand for a missing skill definition.
    #[must_use]
    pub fn missing_skill(id: &SkillId) -> Self {
        Self::MissingProfileData {
            kind: DataKind::Skill,
            id: id.as_str().to_string(),
        }
    }

    /// Shorthand for a missing fighter profile.
    #[must_use]
    pub fn missing_profile(id: impl Into<String>) -> Self {
        Self::MissingProfileData {
            kind: DataKind::Profile,
            id: id.into(),
        }
    }

    /// Returns true for errors the battle can shrug off and keep running.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::InvariantViolation(_))
    }
}

/// Why an action was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidActionReason {
    /// No player decision is pending.
    #[error("the battle is not waiting for a player action")]
    NotAwaitingPlayer,
    /// The acting fighter does not know this skill.
    #[error("skill '{0}' is not in the fighter's loadout")]
    UnknownSkill(SkillId),
    /// Passive skills are never activated.
    #[error("skill '{0}' is passive")]
    PassiveSkill(SkillId),
    /// The skill is still cooling down.
    #[error("skill '{skill}' is on cooldown for {remaining} more turn(s)")]
    OnCooldown {
        /// Skill that was requested.
        skill: SkillId,
        /// Turns left before it can be used.
        remaining: u32,
    },
    /// The caster cannot pay the mana cost.
    #[error("skill '{skill}' costs {required} MP but only {available} MP is left")]
    InsufficientMana {
        /// Skill that was requested.
        skill: SkillId,
        /// Mana cost of the skill.
        required: u32,
        /// Mana the caster currently has.
        available: u32,
    },
    /// A single-target skill was submitted without a target.
    #[error("skill '{0}' needs a target")]
    MissingTarget(SkillId),
    /// The shape has no living candidates, so the skill cannot be executed.
    #[error("skill '{0}' has no legal targets")]
    NoTargets(SkillId),
    /// The target is not in the legal candidate set.
    #[error("fighter {target} is not a legal target for skill '{skill}'")]
    IllegalTarget {
        /// Skill that was requested.
        skill: SkillId,
        /// Rejected target.
        target: FighterId,
    },
    /// The fighter id is not part of this battle's roster.
    #[error("fighter {0} is not in the roster")]
    UnknownFighter(FighterId),
    /// Dead fighters do not act.
    #[error("fighter {0} is defeated and cannot act")]
    CasterDefeated(FighterId),
    /// The roster has not been set up yet.
    #[error("the battle has not started")]
    NotStarted,
    /// `start` was called on a battle that already has a roster.
    #[error("the battle has already started")]
    BattleAlreadyStarted,
    /// The battle has reached Victory or Defeat.
    #[error("the battle is over")]
    BattleFinished,
}

/// Catalog consulted when data goes missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataKind {
    /// Fighter profile (player, comrade or enemy).
    Profile,
    /// Skill definition.
    Skill,
}

impl fmt::Display for DataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Profile => write!(f, "profile"),
            Self::Skill => write!(f, "skill"),
        }
    }
}
