mod account;
mod answers;
mod catalog;
mod history;
mod question;
mod result;
mod selector;
mod submission;

pub use account::{
    AccessToken, AccountError, DEFAULT_EMAIL_DOMAIN, LoginDraft, SignupDraft, SignupErrors,
};
pub use answers::{AnswerError, AnswerSet};
pub use catalog::{QuizAvailability, StudyMaterial};
pub use history::{AttemptRecord, PerformanceEntry, ScoringSummary, SubtopicTally, TopicAnalysis};
pub use question::{Question, QuestionError};
pub use result::{GradedResult, QuestionOutcome};
pub use selector::{QuizSelector, SelectorError};
pub use submission::SubmissionPayload;
