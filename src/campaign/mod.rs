//! Campaign simulation: quests, parties, resolution and the weekly tick

pub mod acceptance;
pub mod controller;
pub mod events;
pub mod feedback;
pub mod generation;
pub mod party;
pub mod progression;
pub mod resolution;
pub mod roster;
pub mod state;

pub use controller::Campaign;
pub use events::{EventLog, GameEvent, GameEventKind, RelatedEntity};
pub use feedback::{Feedback, FeedbackSink, NullFeedback, RecordingFeedback, TracingFeedback};
pub use party::{PartyRegistry, QuestParty};
pub use progression::WeekReport;
pub use resolution::{FixedRoll, OutcomeSampler, QuestResult};
pub use state::{GameState, QuestBoard};
