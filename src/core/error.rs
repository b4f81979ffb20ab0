use thiserror::Error;

use crate::core::types::{AdventurerId, Gold, GuildTier, QuestId};

/// Why an adventurer cannot join a party
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unavailability {
    /// Already assigned to another active quest
    Engaged(QuestId),
    /// Still recovering from an injury
    Injured,
    /// Listed twice in the same party
    Duplicate,
}

impl std::fmt::Display for Unavailability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Unavailability::Engaged(quest) => write!(f, "already on quest {quest}"),
            Unavailability::Injured => f.write_str("injured"),
            Unavailability::Duplicate => f.write_str("listed more than once"),
        }
    }
}

/// Broad class of a failure, used by callers to pick a presentation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Rejected command, nothing changed
    Validation,
    /// Cross-reference between entities is broken
    Consistency,
    /// Save/load failure
    Persistence,
}

#[derive(Error, Debug)]
pub enum GuildError {
    #[error("Adventurer not found: {0}")]
    AdventurerNotFound(AdventurerId),

    #[error("Quest not found: {0}")]
    QuestNotFound(QuestId),

    #[error("Quest {quest} needs at least {minimum} adventurers, party has {size}")]
    PartyTooSmall { quest: QuestId, size: usize, minimum: usize },

    #[error("Quest {quest} allows at most {maximum} adventurers, party has {size}")]
    PartyTooLarge { quest: QuestId, size: usize, maximum: usize },

    #[error("Adventurer {adventurer} is unavailable: {reason}")]
    MemberUnavailable {
        adventurer: AdventurerId,
        reason: Unavailability,
    },

    #[error("Quest {quest} requires reputation {required}, guild has {actual}")]
    ReputationTooLow { quest: QuestId, required: i32, actual: i32 },

    #[error("Quest {quest} requires a {required} guild, guild is {actual}")]
    TierTooLow {
        quest: QuestId,
        required: GuildTier,
        actual: GuildTier,
    },

    #[error("Quest {0} is not on the available board")]
    QuestNotAvailable(QuestId),

    #[error("Quest {0} is not in progress")]
    QuestNotActive(QuestId),

    #[error("Quest {0} has already been resolved")]
    QuestAlreadyResolved(QuestId),

    #[error("Quest {0} is in progress and cannot be cancelled")]
    CancellationUnsupported(QuestId),

    #[error("Party for quest {quest} references missing adventurer {adventurer}")]
    PartyInconsistent {
        quest: QuestId,
        adventurer: AdventurerId,
    },

    #[error("Quest {0} is active but has no party")]
    PartyMissing(QuestId),

    #[error("Roster is full ({capacity} adventurers)")]
    RosterFull { capacity: usize },

    #[error("Insufficient funds: need {needed}, treasury has {available}")]
    InsufficientFunds { needed: Gold, available: Gold },

    #[error("No staff member at position {0}")]
    StaffNotFound(usize),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl GuildError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            GuildError::PartyInconsistent { .. } | GuildError::PartyMissing(_) => ErrorCategory::Consistency,
            GuildError::Persistence(_) | GuildError::IoError(_) => ErrorCategory::Persistence,
            _ => ErrorCategory::Validation,
        }
    }
}

/// Errors raised while saving, listing or loading snapshots
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("No save named '{0}'")]
    SaveNotFound(String),

    #[error("Invalid save name: '{0}'")]
    InvalidSaveName(String),

    #[error("Save '{name}' is corrupt: {reason}")]
    Corrupt { name: String, reason: String },

    #[error("Save version mismatch: expected {expected}, found {found}")]
    IncompatibleVersion { expected: u32, found: u32 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GuildError>;
