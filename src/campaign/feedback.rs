//! Feedback signals for the presentation layer
//!
//! Fire-and-forget: sinks return nothing and must not panic, so a UI haptic
//! or sound hook can never block or fail a simulation operation.

use std::cell::RefCell;

use crate::core::types::QuestId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Feedback {
    QuestAccepted(QuestId),
    WeekAdvanced { weeks_elapsed: u64 },
    SaveCompleted(String),
    LoadCompleted(String),
    Error(String),
}

pub trait FeedbackSink {
    fn notify(&self, signal: Feedback);
}

/// Default sink: forwards signals to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingFeedback;

impl FeedbackSink for TracingFeedback {
    fn notify(&self, signal: Feedback) {
        tracing::debug!(?signal, "feedback");
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NullFeedback;

impl FeedbackSink for NullFeedback {
    fn notify(&self, _signal: Feedback) {}
}

/// Keeps every signal, for tests and replays
#[derive(Debug, Default)]
pub struct RecordingFeedback {
    signals: RefCell<Vec<Feedback>>,
}

impl RecordingFeedback {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn signals(&self) -> Vec<Feedback> {
        self.signals.borrow().clone()
    }
}

impl FeedbackSink for RecordingFeedback {
    fn notify(&self, signal: Feedback) {
        // A re-entrant notify would find the buffer borrowed; drop the signal
        if let Ok(mut signals) = self.signals.try_borrow_mut() {
            signals.push(signal);
        }
    }
}

impl<T: FeedbackSink + ?Sized> FeedbackSink for std::rc::Rc<T> {
    fn notify(&self, signal: Feedback) {
        (**self).notify(signal);
    }
}
