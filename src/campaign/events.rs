//! Events and the campaign log

use serde::{Deserialize, Serialize};

use crate::core::calendar::GameDate;
use crate::core::types::{AdventurerId, EventId, QuestId};

/// The entity an event is about
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RelatedEntity {
    Adventurer(AdventurerId),
    Quest(QuestId),
    Guild,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameEventKind {
    CampaignStarted,

    // Quests
    QuestsPosted,
    QuestAccepted,
    QuestSucceeded,
    QuestPartiallySucceeded,
    QuestFailed,
    ResolutionDeferred,

    // Adventurers
    AdventurerRecruited,
    AdventurerDismissed,
    AdventurerInjured,
    AdventurerKilled,
    AdventurerRecovered,
    LevelUp,

    // Guild
    WeekSettled,
    FinancialTrouble,
    TierPromoted,
    StaffHired,
    StaffDismissed,
    FacilityBuilt,

    // Time
    SeasonPhaseChanged,
}

/// An immutable log entry
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameEvent {
    pub id: EventId,
    pub kind: GameEventKind,
    pub message: String,
    pub timestamp: GameDate,
    pub related: Option<RelatedEntity>,
}

/// Append-only, insertion-ordered campaign log
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EventLog {
    events: Vec<GameEvent>,
    next_event_id: u32,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(
        &mut self,
        kind: GameEventKind,
        message: impl Into<String>,
        timestamp: GameDate,
        related: Option<RelatedEntity>,
    ) -> EventId {
        let id = EventId(self.next_event_id);
        self.next_event_id += 1;

        self.events.push(GameEvent {
            id,
            kind,
            message: message.into(),
            timestamp,
            related,
        });

        id
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &GameEvent> {
        self.events.iter()
    }

    /// The most recent `count` events, oldest first
    pub fn recent(&self, count: usize) -> &[GameEvent] {
        let start = self.events.len().saturating_sub(count);
        &self.events[start..]
    }

    pub fn events_of_kind(&self, kind: GameEventKind) -> impl Iterator<Item = &GameEvent> {
        self.events.iter().filter(move |e| e.kind == kind)
    }

    pub fn events_for_quest(&self, quest: QuestId) -> impl Iterator<Item = &GameEvent> {
        self.events
            .iter()
            .filter(move |e| e.related == Some(RelatedEntity::Quest(quest)))
    }

    pub fn events_for_adventurer(&self, adventurer: AdventurerId) -> impl Iterator<Item = &GameEvent> {
        self.events
            .iter()
            .filter(move |e| e.related == Some(RelatedEntity::Adventurer(adventurer)))
    }
}
