use quiz_core::model::{GradedResult, Question, QuestionOutcome};

use crate::vm::time_fmt::format_duration;

pub const NOT_ANSWERED: &str = "Not Answered";
pub const NO_EXPLANATION: &str = "No explanation available.";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutcomeRowVm {
    pub number: usize,
    pub question_text: String,
    pub your_answer: String,
    /// Only set when the student got the question wrong.
    pub correct_answer: Option<String>,
    pub is_correct: bool,
    pub explanation: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultVm {
    pub score_label: String,
    pub correct: usize,
    pub total: usize,
    pub time_label: String,
    pub rows: Vec<OutcomeRowVm>,
}

/// Scores are whole numbers unless the backend awards partial marks.
#[must_use]
pub fn format_score(value: f64) -> String {
    if value.fract().abs() < f64::EPSILON {
        format!("{value:.0}")
    } else {
        format!("{value:.1}")
    }
}

#[must_use]
pub fn map_result(result: &GradedResult, questions: &[Question], time_taken: u64) -> ResultVm {
    let rows = result
        .detailed_results
        .iter()
        .enumerate()
        .map(|(index, outcome)| map_outcome(index, outcome, questions.get(index)))
        .collect();

    ResultVm {
        score_label: format!(
            "{} / {}",
            format_score(result.total_score),
            format_score(result.max_score)
        ),
        correct: result.correct_count(),
        total: result.question_count(),
        time_label: format_duration(time_taken),
        rows,
    }
}

fn map_outcome(index: usize, outcome: &QuestionOutcome, question: Option<&Question>) -> OutcomeRowVm {
    let option_text = |choice: usize| -> String {
        outcome
            .options
            .as_ref()
            .and_then(|options| options.get(choice).cloned())
            .or_else(|| question.and_then(|q| q.option(choice)).map(str::to_string))
            .unwrap_or_else(|| format!("Option {}", choice + 1))
    };

    let question_text = if outcome.question_text.is_empty() {
        question.map(Question::text).unwrap_or_default().to_string()
    } else {
        outcome.question_text.clone()
    };

    let explanation = outcome
        .explanation
        .as_deref()
        .filter(|text| !text.trim().is_empty())
        .or_else(|| question.and_then(Question::explanation))
        .unwrap_or(NO_EXPLANATION)
        .to_string();

    OutcomeRowVm {
        number: index + 1,
        question_text,
        your_answer: outcome
            .student_answer_index
            .map_or_else(|| NOT_ANSWERED.to_string(), option_text),
        correct_answer: if outcome.is_correct {
            None
        } else {
            outcome.correct_answer_index.map(option_text)
        },
        is_correct: outcome.is_correct,
        explanation,
    }
}
