//! Quests - contracts posted on the guild board
//!
//! A quest moves through `Available -> InProgress -> Completed`. Completed is
//! terminal; the resolved outcome is kept on the record.

use serde::{Deserialize, Serialize};

use crate::core::types::{Gold, GuildTier, QuestId};
use crate::entity::adventurer::Stat;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuestType {
    Hunt,
    Escort,
    Retrieval,
    Exploration,
    Defense,
}

impl QuestType {
    pub const ALL: [QuestType; 5] = [
        QuestType::Hunt,
        QuestType::Escort,
        QuestType::Retrieval,
        QuestType::Exploration,
        QuestType::Defense,
    ];

    /// Stats that count toward party power on this kind of quest
    pub fn relevant_stats(&self) -> [Stat; 2] {
        match self {
            QuestType::Hunt => [Stat::Strength, Stat::Agility],
            QuestType::Escort => [Stat::Vitality, Stat::Strength],
            QuestType::Retrieval => [Stat::Agility, Stat::Intellect],
            QuestType::Exploration => [Stat::Intellect, Stat::Spirit],
            QuestType::Defense => [Stat::Vitality, Stat::Spirit],
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            QuestType::Hunt => "Hunt",
            QuestType::Escort => "Escort",
            QuestType::Retrieval => "Retrieval",
            QuestType::Exploration => "Exploration",
            QuestType::Defense => "Defense",
        }
    }
}

/// Severity tier of a quest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Stakes {
    Low,
    Medium,
    High,
    Deadly,
}

impl Stakes {
    pub const ALL: [Stakes; 4] = [Stakes::Low, Stakes::Medium, Stakes::High, Stakes::Deadly];

    /// Party power required at tier multiplier 1.0
    pub fn base_difficulty(&self) -> u32 {
        match self {
            Stakes::Low => 30,
            Stakes::Medium => 55,
            Stakes::High => 90,
            Stakes::Deadly => 140,
        }
    }

    pub fn base_reward(&self) -> Gold {
        match self {
            Stakes::Low => 80,
            Stakes::Medium => 160,
            Stakes::High => 320,
            Stakes::Deadly => 600,
        }
    }

    pub fn base_experience(&self) -> u32 {
        match self {
            Stakes::Low => 40,
            Stakes::Medium => 70,
            Stakes::High => 120,
            Stakes::Deadly => 200,
        }
    }

    /// Fraction of the reward the guild forfeits on failure
    pub fn failure_penalty(&self) -> f32 {
        match self {
            Stakes::Low => 0.0,
            Stakes::Medium => 0.1,
            Stakes::High => 0.25,
            Stakes::Deadly => 0.5,
        }
    }

    /// Reputation gained on success
    pub fn reputation_swing(&self) -> i32 {
        match self {
            Stakes::Low => 3,
            Stakes::Medium => 6,
            Stakes::High => 12,
            Stakes::Deadly => 20,
        }
    }

    /// Share of the party hurt on a total failure
    pub fn casualty_fraction(&self) -> f32 {
        match self {
            Stakes::Low => 0.0,
            Stakes::Medium => 0.25,
            Stakes::High => 0.5,
            Stakes::Deadly => 0.75,
        }
    }

    /// Default (min, max) party size
    pub fn party_bounds(&self) -> (usize, usize) {
        match self {
            Stakes::Low => (1, 3),
            Stakes::Medium => (2, 4),
            Stakes::High => (3, 5),
            Stakes::Deadly => (4, 6),
        }
    }

    /// Reputation gate for accepting the quest
    pub fn required_reputation(&self) -> i32 {
        match self {
            Stakes::Low | Stakes::Medium => 0,
            Stakes::High => 25,
            Stakes::Deadly => 60,
        }
    }

    pub fn required_tier(&self) -> GuildTier {
        match self {
            Stakes::Low | Stakes::Medium | Stakes::High => GuildTier::Fledgling,
            Stakes::Deadly => GuildTier::Established,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuestStatus {
    Available,
    InProgress,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuestOutcome {
    Success,
    Partial,
    Failure,
}

/// A quest contract
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quest {
    pub id: QuestId,
    pub title: String,
    pub quest_type: QuestType,
    pub stakes: Stakes,
    /// Party power needed for an even chance (before campaign difficulty)
    pub difficulty: u32,
    pub reward: Gold,
    pub experience: u32,
    pub min_party_size: usize,
    pub max_party_size: usize,
    pub required_reputation: i32,
    pub required_tier: GuildTier,
    pub status: QuestStatus,
    /// Weeks elapsed when the quest was posted
    pub posted_week: u64,
    pub accepted_week: Option<u64>,
    pub outcome: Option<QuestOutcome>,
}

impl Quest {
    pub fn is_terminal(&self) -> bool {
        self.status == QuestStatus::Completed
    }

    pub fn accepts_party_size(&self, size: usize) -> bool {
        (self.min_party_size..=self.max_party_size).contains(&size)
    }

    /// Gold lost when this quest fails
    pub fn failure_cost(&self) -> Gold {
        (self.reward as f32 * self.stakes.failure_penalty()).round() as Gold
    }
}

#[cfg(test)]
pub(crate) fn sample_quest(id: u32, stakes: Stakes) -> Quest {
    let (min_party_size, max_party_size) = stakes.party_bounds();
    Quest {
        id: QuestId(id),
        title: format!("Test quest {id}"),
        quest_type: QuestType::Hunt,
        stakes,
        difficulty: stakes.base_difficulty(),
        reward: stakes.base_reward(),
        experience: stakes.base_experience(),
        min_party_size,
        max_party_size,
        required_reputation: 0,
        required_tier: GuildTier::Fledgling,
        status: QuestStatus::Available,
        posted_week: 0,
        accepted_week: None,
        outcome: None,
    }
}
