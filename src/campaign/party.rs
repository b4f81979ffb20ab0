//! Quest parties - which adventurers are out on which quest
//!
//! The relation belongs to neither the quest nor the adventurer, so it is
//! kept here and owned by the campaign controller. An adventurer appears in
//! at most one party at a time.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::types::{AdventurerId, QuestId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestParty {
    pub quest: QuestId,
    pub members: Vec<AdventurerId>,
    /// Weeks elapsed when the party set out
    pub departed_week: u64,
}

impl QuestParty {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, adventurer: AdventurerId) -> bool {
        self.members.contains(&adventurer)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartyRegistry {
    parties: AHashMap<QuestId, QuestParty>,
    engaged: AHashMap<AdventurerId, QuestId>,
}

impl PartyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Which active quest, if any, the adventurer is on
    pub fn engagement(&self, adventurer: AdventurerId) -> Option<QuestId> {
        self.engaged.get(&adventurer).copied()
    }

    pub fn is_engaged(&self, adventurer: AdventurerId) -> bool {
        self.engaged.contains_key(&adventurer)
    }

    pub fn party(&self, quest: QuestId) -> Option<&QuestParty> {
        self.parties.get(&quest)
    }

    /// Record a party. Callers validate first; members already engaged
    /// elsewhere are rejected here too so the registry can never hold an
    /// adventurer twice.
    pub fn assign(&mut self, party: QuestParty) -> Result<(), AdventurerId> {
        if let Some(taken) = party.members.iter().find(|m| self.engaged.contains_key(m)) {
            return Err(*taken);
        }
        for member in &party.members {
            self.engaged.insert(*member, party.quest);
        }
        self.parties.insert(party.quest, party);
        Ok(())
    }

    pub fn release(&mut self, quest: QuestId) -> Option<QuestParty> {
        let party = self.parties.remove(&quest)?;
        for member in &party.members {
            if self.engaged.get(member) == Some(&quest) {
                self.engaged.remove(member);
            }
        }
        Some(party)
    }

    /// Drop one adventurer from whatever party holds them
    pub fn remove_member(&mut self, adventurer: AdventurerId) {
        if let Some(quest) = self.engaged.remove(&adventurer) {
            if let Some(party) = self.parties.get_mut(&quest) {
                party.members.retain(|m| *m != adventurer);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.parties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parties.is_empty()
    }

    /// Parties ordered by quest id
    pub fn parties(&self) -> Vec<&QuestParty> {
        let mut parties: Vec<&QuestParty> = self.parties.values().collect();
        parties.sort_by_key(|p| p.quest);
        parties
    }

    /// Rebuild from persisted parties; fails on an adventurer listed twice
    pub fn from_parties(parties: Vec<QuestParty>) -> Result<Self, AdventurerId> {
        let mut registry = Self::new();
        for party in parties {
            registry.assign(party)?;
        }
        Ok(registry)
    }
}
