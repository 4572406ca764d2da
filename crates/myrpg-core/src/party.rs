//! Active comrades travelling with the player.

use serde::{Deserialize, Serialize};

use crate::data::PartyRosterProvider;
use crate::fighter::ProfileId;

/// Ordered set of comrade profile ids that join the next battle.
///
/// ```
/// use myrpg_core::party::Party;
///
/// let mut party = Party::new();
/// assert!(party.add("mira"));
/// assert!(!party.add("mira"));
/// assert_eq!(party.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Party {
    active: Vec<ProfileId>,
}

impl Party {
    /// Empty party.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a comrade. Returns false if it was already active.
    pub fn add(&mut self, id: impl Into<ProfileId>) -> bool {
        let id = id.into();
        if self.active.contains(&id) {
            return false;
        }
        self.active.push(id);
        true
    }

    /// Removes a comrade. Returns false if it was not active.
    pub fn remove(&mut self, id: &ProfileId) -> bool {
        let before = self.active.len();
        self.active.retain(|active| active != id);
        self.active.len() != before
    }

    /// Dismisses every comrade.
    pub fn clear(&mut self) {
        self.active.clear();
    }

    /// True if the comrade is active.
    #[must_use]
    pub fn contains(&self, id: &ProfileId) -> bool {
        self.active.contains(id)
    }

    /// Active comrade ids in join order.
    #[must_use]
    pub fn members(&self) -> &[ProfileId] {
        &self.active
    }

    /// Number of active comrades.
    #[must_use]
    pub fn len(&self) -> usize {
        self.active.len()
    }

    /// True if no comrade is active.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}

impl PartyRosterProvider for Party {
    fn active_ally_ids(&self) -> Vec<ProfileId> {
        self.active.clone()
    }
}
