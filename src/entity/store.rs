//! Entity store - canonical records for adventurers and quests
//!
//! Every other component refers to adventurers and quests by id. Ids are
//! handed out from monotonically increasing counters and never reused, even
//! after a record is removed.

use ahash::AHashMap;

use crate::core::error::{GuildError, Result};
use crate::core::types::{AdventurerId, QuestId};
use crate::entity::adventurer::Adventurer;
use crate::entity::quest::Quest;

#[derive(Debug, Clone, PartialEq)]
pub struct EntityStore {
    adventurers: AHashMap<AdventurerId, Adventurer>,
    quests: AHashMap<QuestId, Quest>,
    next_adventurer_id: u32,
    next_quest_id: u32,
}

impl EntityStore {
    pub fn new() -> Self {
        Self {
            adventurers: AHashMap::new(),
            quests: AHashMap::new(),
            next_adventurer_id: 1,
            next_quest_id: 1,
        }
    }

    /// Rebuild a store from persisted records and id counters
    pub(crate) fn from_parts(
        adventurers: Vec<Adventurer>,
        quests: Vec<Quest>,
        next_adventurer_id: u32,
        next_quest_id: u32,
    ) -> Self {
        Self {
            adventurers: adventurers.into_iter().map(|a| (a.id, a)).collect(),
            quests: quests.into_iter().map(|q| (q.id, q)).collect(),
            next_adventurer_id,
            next_quest_id,
        }
    }

    pub(crate) fn id_counters(&self) -> (u32, u32) {
        (self.next_adventurer_id, self.next_quest_id)
    }

    /// Generate a new unique AdventurerId
    pub fn next_adventurer_id(&mut self) -> AdventurerId {
        let id = AdventurerId(self.next_adventurer_id);
        self.next_adventurer_id += 1;
        id
    }

    /// Generate a new unique QuestId
    pub fn next_quest_id(&mut self) -> QuestId {
        let id = QuestId(self.next_quest_id);
        self.next_quest_id += 1;
        id
    }

    pub fn insert_adventurer(&mut self, adventurer: Adventurer) {
        // Keep the counter ahead of externally built ids
        self.next_adventurer_id = self.next_adventurer_id.max(adventurer.id.0 + 1);
        self.adventurers.insert(adventurer.id, adventurer);
    }

    pub fn insert_quest(&mut self, quest: Quest) {
        self.next_quest_id = self.next_quest_id.max(quest.id.0 + 1);
        self.quests.insert(quest.id, quest);
    }

    pub fn adventurer(&self, id: AdventurerId) -> Result<&Adventurer> {
        self.adventurers.get(&id).ok_or(GuildError::AdventurerNotFound(id))
    }

    pub fn adventurer_mut(&mut self, id: AdventurerId) -> Result<&mut Adventurer> {
        self.adventurers.get_mut(&id).ok_or(GuildError::AdventurerNotFound(id))
    }

    pub fn quest(&self, id: QuestId) -> Result<&Quest> {
        self.quests.get(&id).ok_or(GuildError::QuestNotFound(id))
    }

    pub fn quest_mut(&mut self, id: QuestId) -> Result<&mut Quest> {
        self.quests.get_mut(&id).ok_or(GuildError::QuestNotFound(id))
    }

    pub fn contains_adventurer(&self, id: AdventurerId) -> bool {
        self.adventurers.contains_key(&id)
    }

    pub fn contains_quest(&self, id: QuestId) -> bool {
        self.quests.contains_key(&id)
    }

    pub fn remove_adventurer(&mut self, id: AdventurerId) -> Result<Adventurer> {
        self.adventurers.remove(&id).ok_or(GuildError::AdventurerNotFound(id))
    }

    pub fn adventurer_count(&self) -> usize {
        self.adventurers.len()
    }

    pub fn quest_count(&self) -> usize {
        self.quests.len()
    }

    pub fn adventurers(&self) -> impl Iterator<Item = &Adventurer> {
        self.adventurers.values()
    }

    pub fn adventurers_mut(&mut self) -> impl Iterator<Item = &mut Adventurer> {
        self.adventurers.values_mut()
    }

    pub fn quests(&self) -> impl Iterator<Item = &Quest> {
        self.quests.values()
    }

    /// Adventurer ids in ascending order
    pub fn roster_ids(&self) -> Vec<AdventurerId> {
        let mut ids: Vec<AdventurerId> = self.adventurers.keys().copied().collect();
        ids.sort();
        ids
    }

    /// Adventurers sorted by id
    pub fn roster(&self) -> Vec<&Adventurer> {
        let mut roster: Vec<&Adventurer> = self.adventurers.values().collect();
        roster.sort_by_key(|a| a.id);
        roster
    }
}

impl Default for EntityStore {
    fn default() -> Self {
        Self::new()
    }
}
