pub mod error;
pub mod feedback;

pub use error::{ErrorCategory, ErrorClassifier, FeedbackError, LlmError, Result};
pub use feedback::{FeedbackRequest, FeedbackResponse, Issue, Severity};
