//! GameState - the aggregate root of a campaign

use serde::{Deserialize, Serialize};

use crate::campaign::events::EventLog;
use crate::campaign::party::PartyRegistry;
use crate::core::calendar::Calendar;
use crate::core::types::{CampaignId, Difficulty, QuestId};
use crate::entity::quest::QuestStatus;
use crate::entity::store::EntityStore;

/// The three ordered quest collections. A quest id lives in exactly one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestBoard {
    available: Vec<QuestId>,
    active: Vec<QuestId>,
    completed: Vec<QuestId>,
}

impl QuestBoard {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub(crate) fn from_parts(available: Vec<QuestId>, active: Vec<QuestId>, completed: Vec<QuestId>) -> Self {
        Self {
            available,
            active,
            completed,
        }
    }

    pub fn available(&self) -> &[QuestId] {
        &self.available
    }

    pub fn active(&self) -> &[QuestId] {
        &self.active
    }

    pub fn completed(&self) -> &[QuestId] {
        &self.completed
    }

    /// Which collection holds the quest
    pub fn location(&self, quest: QuestId) -> Option<QuestStatus> {
        if self.available.contains(&quest) {
            Some(QuestStatus::Available)
        } else if self.active.contains(&quest) {
            Some(QuestStatus::InProgress)
        } else if self.completed.contains(&quest) {
            Some(QuestStatus::Completed)
        } else {
            None
        }
    }

    /// Add a freshly generated quest to the available collection
    pub fn post(&mut self, quest: QuestId) {
        if self.location(quest).is_none() {
            self.available.push(quest);
        }
    }

    /// Move a quest from available to active
    pub fn activate(&mut self, quest: QuestId) -> bool {
        move_between(&mut self.available, &mut self.active, quest)
    }

    /// Move a quest from active to completed
    pub fn complete(&mut self, quest: QuestId) -> bool {
        move_between(&mut self.active, &mut self.completed, quest)
    }

    pub fn total(&self) -> usize {
        self.available.len() + self.active.len() + self.completed.len()
    }

    /// Every id in all three collections, in collection order
    pub fn all(&self) -> impl Iterator<Item = &QuestId> {
        self.available.iter().chain(&self.active).chain(&self.completed)
    }
}

fn move_between(from: &mut Vec<QuestId>, to: &mut Vec<QuestId>, quest: QuestId) -> bool {
    match from.iter().position(|q| *q == quest) {
        Some(index) => {
            from.remove(index);
            to.push(quest);
            true
        }
        None => false,
    }
}

/// Everything about a running campaign except the guild record and the
/// party relation, which the controller owns.
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub campaign_id: CampaignId,
    pub campaign_name: String,
    pub difficulty: Difficulty,
    pub calendar: Calendar,
    pub store: EntityStore,
    pub board: QuestBoard,
    pub log: EventLog,
}

impl GameState {
    pub fn new(campaign_name: String, difficulty: Difficulty) -> Self {
        Self {
            campaign_id: CampaignId::new(),
            campaign_name,
            difficulty,
            calendar: Calendar::new(),
            store: EntityStore::new(),
            board: QuestBoard::new(),
            log: EventLog::new(),
        }
    }

    /// Structural checks shared by tests and snapshot loading: each quest is
    /// in exactly one collection whose status matches its record, every
    /// active quest has a party, and every party belongs to an active quest
    /// and lists only known adventurers, none of them in two parties.
    pub fn verify_integrity(&self, parties: &PartyRegistry) -> Result<(), String> {
        let mut seen = ahash::AHashSet::new();
        for quest in self.board.all() {
            if !seen.insert(*quest) {
                return Err(format!("quest {quest} appears in more than one collection"));
            }
        }

        for quest in self.store.quests() {
            let Some(location) = self.board.location(quest.id) else {
                return Err(format!("quest {} is in no collection", quest.id));
            };
            if location != quest.status {
                return Err(format!(
                    "quest {} has status {:?} but sits in the {:?} collection",
                    quest.id, quest.status, location
                ));
            }
        }

        if let Some(missing) = self.board.all().find(|q| !self.store.contains_quest(**q)) {
            return Err(format!("collection references unknown quest {missing}"));
        }

        let mut engaged = ahash::AHashSet::new();
        for party in parties.parties() {
            if self.board.location(party.quest) != Some(QuestStatus::InProgress) {
                return Err(format!("party registered for inactive quest {}", party.quest));
            }
            for member in &party.members {
                if !engaged.insert(*member) {
                    return Err(format!("adventurer {member} is in more than one party"));
                }
                if !self.store.contains_adventurer(*member) {
                    return Err(format!("party for quest {} references unknown adventurer {member}", party.quest));
                }
            }
        }

        if let Some(orphan) = self.board.active().iter().find(|q| parties.party(**q).is_none()) {
            return Err(format!("active quest {orphan} has no party"));
        }

        if !self.calendar.is_valid() {
            return Err("calendar counters out of range".into());
        }

        Ok(())
    }
}
