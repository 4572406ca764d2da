//! Structured battle events and their sinks.
//!
//! The core never renders anything. Every state change a UI, combat log or
//! save system could care about is emitted as a [`BattleEvent`] to the
//! battle's observers, in the order it happened.
//!
//! Two observers ship with the crate:
//!
//! - [`TracingObserver`]: writes every event as a `tracing` record. It is
//!   attached to every battle by default.
//! - [`EventLog`]: buffers events in memory; clone it before handing it to
//!   the battle and drain the clone with [`EventLog::take_events`].
//!
//! # Example
//!
//! ```
//! use myrpg_core::observer::{BattleEvent, BattleObserver, EventLog};
//! use myrpg_core::fighter::FighterId;
//!
//! let log = EventLog::new();
//! let mut sink = log.clone();
//! sink.on_event(&BattleEvent::TurnPassed { fighter: FighterId::new(0) });
//!
//! assert_eq!(log.event_count(), 1);
//! let events = log.take_events();
//! assert!(log.is_empty());
//! assert!(matches!(events[0], BattleEvent::TurnPassed { .. }));
//! ```

use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::ai::TacticalCue;
use crate::battle::DefeatReason;
use crate::combat::ResolutionReport;
use crate::error::DataKind;
use crate::fighter::FighterId;
use crate::loot::LootDrop;
use crate::roster::FighterSnapshot;

/// Something that happened in a battle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BattleEvent {
    /// The roster is built; turn order is the roster order.
    BattleStarted {
        /// Every fighter at full strength.
        roster: Vec<FighterSnapshot>,
    },
    /// A fighter became active.
    TurnStarted {
        /// Active fighter.
        fighter: FighterId,
        /// Its display name.
        name: String,
        /// Round number, starting at 1.
        round: u32,
    },
    /// A skill was applied.
    ActionResolved {
        /// What changed.
        report: ResolutionReport,
    },
    /// A fighter's HP reached zero.
    FighterDefeated {
        /// Defeated fighter.
        fighter: FighterId,
        /// Its display name.
        name: String,
    },
    /// An AI fighter had nothing it could do.
    TurnSkipped {
        /// Idle fighter.
        fighter: FighterId,
    },
    /// The player ended the turn without acting.
    TurnPassed {
        /// The player.
        fighter: FighterId,
    },
    /// An AI decision was rejected by the resolver; the turn is lost.
    ActionFailed {
        /// Acting fighter.
        fighter: FighterId,
        /// Rejection message.
        reason: String,
    },
    /// A profile or skill could not be resolved and was left out.
    DataMissing {
        /// Catalog consulted.
        kind: DataKind,
        /// Unresolved id.
        id: String,
    },
    /// Flavour cue from a tactical fighter.
    Cue {
        /// Fighter that raised it.
        fighter: FighterId,
        /// The cue.
        cue: TacticalCue,
    },
    /// Every enemy is down.
    Victory {
        /// Total experience earned.
        xp: u32,
        /// Items dropped.
        loot: Vec<LootDrop>,
    },
    /// The party lost.
    Defeat {
        /// Why.
        reason: DefeatReason,
    },
}

impl BattleEvent {
    /// Short name of the event kind.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::BattleStarted { .. } => "battle_started",
            Self::TurnStarted { .. } => "turn_started",
            Self::ActionResolved { .. } => "action_resolved",
            Self::FighterDefeated { .. } => "fighter_defeated",
            Self::TurnSkipped { .. } => "turn_skipped",
            Self::TurnPassed { .. } => "turn_passed",
            Self::ActionFailed { .. } => "action_failed",
            Self::DataMissing { .. } => "data_missing",
            Self::Cue { .. } => "cue",
            Self::Victory { .. } => "victory",
            Self::Defeat { .. } => "defeat",
        }
    }

    /// True for the final event of a battle.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Victory { .. } | Self::Defeat { .. })
    }
}

/// Sink for battle events.
pub trait BattleObserver: Send {
    /// Called once per event, in emission order.
    fn on_event(&mut self, event: &BattleEvent);
}

// =============================================================================
// EventLog
// =============================================================================

/// Shared in-memory event buffer.
///
/// Clones share the same buffer, so one clone can be boxed into the battle
/// while another is kept for reading.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Arc<Mutex<Vec<BattleEvent>>>,
}

impl EventLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // A panicking observer elsewhere must not make the log unreadable.
    fn lock(&self) -> MutexGuard<'_, Vec<BattleEvent>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Drains and returns all recorded events.
    pub fn take_events(&self) -> Vec<BattleEvent> {
        std::mem::take(&mut *self.lock())
    }

    /// Copies the recorded events without draining them.
    #[must_use]
    pub fn events(&self) -> Vec<BattleEvent> {
        self.lock().clone()
    }

    /// Returns the number of buffered events.
    #[must_use]
    pub fn event_count(&self) -> usize {
        self.lock().len()
    }

    /// Returns true if no events are buffered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Drops every buffered event.
    pub fn clear(&self) {
        self.lock().clear();
    }
}

impl BattleObserver for EventLog {
    fn on_event(&mut self, event: &BattleEvent) {
        self.lock().push(event.clone());
    }
}

// =============================================================================
// TracingObserver
// =============================================================================

/// Writes events to `tracing`, standing in for the on-screen combat log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl BattleObserver for TracingObserver {
    fn on_event(&mut self, event: &BattleEvent) {
        match event {
            BattleEvent::BattleStarted { roster } => {
                tracing::info!(fighters = roster.len(), "battle started");
            }
            BattleEvent::TurnStarted { fighter, name, round } => {
                tracing::debug!(fighter = %fighter, name = %name, round, "turn started");
            }
            BattleEvent::ActionResolved { report } => {
                for effect in &report.effects {
                    tracing::info!(
                        caster = %report.caster,
                        skill = %report.skill,
                        target = %effect.target,
                        effect = %effect.effect,
                        amount = effect.delta(),
                        hp = effect.hp_after,
                        "action resolved"
                    );
                }
            }
            BattleEvent::FighterDefeated { fighter, name } => {
                tracing::info!(fighter = %fighter, name = %name, "fighter defeated");
            }
            BattleEvent::TurnSkipped { fighter } => {
                tracing::warn!(fighter = %fighter, "no usable skill, turn skipped");
            }
            BattleEvent::TurnPassed { fighter } => {
                tracing::debug!(fighter = %fighter, "turn passed");
            }
            BattleEvent::ActionFailed { fighter, reason } => {
                tracing::warn!(fighter = %fighter, reason = %reason, "action failed");
            }
            BattleEvent::DataMissing { kind, id } => {
                tracing::warn!(kind = %kind, id = %id, "missing data");
            }
            BattleEvent::Cue { fighter, cue } => {
                tracing::info!(fighter = %fighter, "{cue}");
            }
            BattleEvent::Victory { xp, loot } => {
                tracing::info!(xp, drops = loot.len(), "victory");
            }
            BattleEvent::Defeat { reason } => {
                tracing::info!(reason = ?reason, "defeat");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod event_log_tests {
        use super::*;

        #[test]
        fn clones_share_the_buffer() {
            let log = EventLog::new();
            let mut sink = log.clone();
            sink.on_event(&BattleEvent::TurnSkipped {
                fighter: FighterId::new(3),
            });
            sink.on_event(&BattleEvent::TurnPassed {
                fighter: FighterId::new(0),
            });
            assert_eq!(log.event_count(), 2);
            assert_eq!(log.events().len(), 2);
            assert_eq!(log.event_count(), 2);
        }

        #[test]
        fn take_events_drains_in_order() {
            let log = EventLog::new();
            let mut sink = log.clone();
            for raw in 0..3 {
                sink.on_event(&BattleEvent::TurnPassed {
                    fighter: FighterId::new(raw),
                });
            }
            let ids: Vec<u32> = log
                .take_events()
                .into_iter()
                .map(|e| match e {
                    BattleEvent::TurnPassed { fighter } => fighter.as_u32(),
                    other => panic!("unexpected {other:?}"),
                })
                .collect();
            assert_eq!(ids, vec![0, 1, 2]);
            assert!(log.is_empty());
        }

        #[test]
        fn clear_empties() {
            let log = EventLog::new();
            log.clone().on_event(&BattleEvent::Defeat {
                reason: DefeatReason::PartyDefeated,
            });
            log.clear();
            assert!(log.is_empty());
        }
    }

    mod event_tests {
        use super::*;

        #[test]
        fn terminal_events() {
            assert!(BattleEvent::Victory { xp: 0, loot: Vec::new() }.is_terminal());
            assert!(!BattleEvent::TurnPassed {
                fighter: FighterId::new(0)
            }
            .is_terminal());
        }

        #[test]
        fn serializes_with_type_tag() {
            let event = BattleEvent::Cue {
                fighter: FighterId::new(4),
                cue: TacticalCue::AreaAssault,
            };
            let json = serde_json::to_value(&event).unwrap();
            assert_eq!(json["type"], "Cue");
            assert_eq!(json["cue"], "AreaAssault");
            assert_eq!(event.kind(), "cue");
        }

        #[test]
        fn tracing_observer_accepts_everything() {
            let mut obs = TracingObserver;
            obs.on_event(&BattleEvent::DataMissing {
                kind: DataKind::Skill,
                id: "ghost".into(),
            });
            obs.on_event(&BattleEvent::Defeat {
                reason: DefeatReason::TurnLimitReached,
            });
        }
    }
}
