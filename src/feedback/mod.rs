//! Feedback generation
//!
//! [`FeedbackService`] drives the completion provider through the budget
//! retry policy; [`CompletionOutcome`] classifies the final response.

mod extract;
mod orchestrator;

pub use extract::CompletionOutcome;
pub use orchestrator::{FeedbackService, FeedbackSettings, initial_budget, retry_budget};
