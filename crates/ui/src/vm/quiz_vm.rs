use quiz_core::model::Question;
use services::{QuizPhase, QuizSession};

use crate::vm::result_vm::{ResultVm, map_result};
use crate::vm::time_fmt::{format_progress, format_timer};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionVm {
    pub index: usize,
    pub label: String,
    pub selected: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionVm {
    pub progress_label: String,
    pub text: String,
    pub options: Vec<OptionVm>,
    pub answered: usize,
    pub total: usize,
    pub can_go_back: bool,
    pub is_last: bool,
}

/// Everything the quiz page renders for the current phase.
#[derive(Clone, Debug, PartialEq)]
pub enum QuizScreen {
    Loading,
    Question(QuestionVm),
    Submitting,
    SubmitFailed { message: String },
    LoadFailed { message: String },
    AuthRequired,
    Finished(ResultVm),
}

impl QuizScreen {
    #[must_use]
    pub fn from_session(session: &QuizSession) -> Self {
        match session.phase() {
            QuizPhase::Loading => Self::Loading,
            QuizPhase::InProgress => session
                .current_question()
                .map_or(Self::Loading, |question| {
                    Self::Question(map_question(session, question))
                }),
            QuizPhase::Submitting => Self::Submitting,
            QuizPhase::SubmitFailed(_) => Self::SubmitFailed {
                message: failure_message(session),
            },
            QuizPhase::LoadFailed(_) => Self::LoadFailed {
                message: failure_message(session),
            },
            QuizPhase::AuthRequired => Self::AuthRequired,
            QuizPhase::Finished => session.result().map_or(Self::Loading, |result| {
                let time_taken = session
                    .pending_payload()
                    .map_or(session.elapsed_seconds(), |payload| {
                        payload.time_taken_seconds
                    });
                Self::Finished(map_result(result, session.questions(), time_taken))
            }),
        }
    }

    /// The clock keeps showing while the student can still act on the attempt.
    #[must_use]
    pub fn shows_timer(&self) -> bool {
        matches!(
            self,
            Self::Question(_) | Self::Submitting | Self::SubmitFailed { .. }
        )
    }
}

#[must_use]
pub fn timer_label(seconds: u64) -> String {
    format_timer(seconds)
}

fn map_question(session: &QuizSession, question: &Question) -> QuestionVm {
    let progress = session.progress();
    let selected = session.current_selection();
    let options = question
        .options()
        .iter()
        .enumerate()
        .map(|(index, label)| OptionVm {
            index,
            label: label.clone(),
            selected: selected == Some(index),
        })
        .collect();

    QuestionVm {
        progress_label: format_progress(progress.position, progress.total),
        text: question.text().to_string(),
        options,
        answered: progress.answered,
        total: progress.total,
        can_go_back: !progress.is_first,
        is_last: progress.is_last,
    }
}

fn failure_message(session: &QuizSession) -> String {
    session
        .failure()
        .map(|failure| failure.to_string())
        .unwrap_or_default()
}
