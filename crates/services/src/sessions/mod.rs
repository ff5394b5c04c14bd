mod progress;
mod service;
mod source;
mod workflow;

// Public API of the quiz session subsystem.
pub use crate::error::SessionError;
pub use progress::SessionProgress;
pub use service::{QuizPhase, QuizSession};
pub use source::{QuestionFetch, QuestionSource, ScoringService};
pub use workflow::{LoadRequest, QuizSessionController, SubmitRequest};
