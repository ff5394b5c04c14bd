mod history_vm;
mod quiz_vm;
mod result_vm;
mod time_fmt;

pub use history_vm::{
    AttemptCardVm, QuizHistoryCardVm, SubtopicRowVm, TopicVm, map_attempt_cards,
    map_quiz_history_cards, map_topic_analysis,
};
pub use quiz_vm::{OptionVm, QuestionVm, QuizScreen, timer_label};
pub use result_vm::{NO_EXPLANATION, NOT_ANSWERED, OutcomeRowVm, ResultVm, format_score, map_result};
pub use time_fmt::{format_duration, format_progress, format_timer};
