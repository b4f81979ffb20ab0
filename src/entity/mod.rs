//! Campaign entities and their canonical store

pub mod adventurer;
pub mod guild;
pub mod quest;
pub mod store;

pub use adventurer::{Adventurer, AdventurerClass, Condition, Race, Stat, StatBlock};
pub use guild::{Facility, FacilityKind, Guild, Settlement, Staff, StaffRole};
pub use quest::{Quest, QuestOutcome, QuestStatus, QuestType, Stakes};
pub use store::EntityStore;
