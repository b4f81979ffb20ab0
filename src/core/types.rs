//! Core type definitions used throughout the codebase

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a campaign (one playthrough)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CampaignId(pub Uuid);

impl CampaignId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CampaignId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CampaignId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for adventurers
///
/// Allocated sequentially by the entity store and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AdventurerId(pub u32);

impl fmt::Display for AdventurerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "A{}", self.0)
    }
}

/// Unique identifier for quests
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct QuestId(pub u32);

impl fmt::Display for QuestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Q{}", self.0)
    }
}

/// Unique identifier for game events
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EventId(pub u32);

/// Gold amounts; signed so shortfalls are representable
pub type Gold = i64;

/// Guild tier (political rank among guilds)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum GuildTier {
    Fledgling = 1,
    Established = 2,
    Renowned = 3,
    Legendary = 4,
}

impl GuildTier {
    pub const ALL: [GuildTier; 4] = [
        GuildTier::Fledgling,
        GuildTier::Established,
        GuildTier::Renowned,
        GuildTier::Legendary,
    ];

    /// Returns true if this tier outranks the other
    pub fn outranks(&self, other: &GuildTier) -> bool {
        (*self as u8) > (*other as u8)
    }

    pub fn next(&self) -> Option<GuildTier> {
        match self {
            GuildTier::Fledgling => Some(GuildTier::Established),
            GuildTier::Established => Some(GuildTier::Renowned),
            GuildTier::Renowned => Some(GuildTier::Legendary),
            GuildTier::Legendary => None,
        }
    }

    /// Position in the tier table (0-based)
    pub fn index(&self) -> usize {
        (*self as u8 - 1) as usize
    }
}

impl fmt::Display for GuildTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GuildTier::Fledgling => "Fledgling",
            GuildTier::Established => "Established",
            GuildTier::Renowned => "Renowned",
            GuildTier::Legendary => "Legendary",
        };
        f.write_str(name)
    }
}

/// Campaign difficulty setting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
    Brutal,
}

impl std::str::FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "normal" => Ok(Difficulty::Normal),
            "hard" => Ok(Difficulty::Hard),
            "brutal" => Ok(Difficulty::Brutal),
            other => Err(format!("unknown difficulty: {other}")),
        }
    }
}
