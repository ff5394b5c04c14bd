use quiz_core::model::{
    AttemptRecord, PerformanceEntry, QuizSelector, SubtopicTally, TopicAnalysis,
};

use crate::vm::result_vm::format_score;
use crate::vm::time_fmt::{format_attempt_time, format_duration};

#[derive(Clone, Debug, PartialEq)]
pub struct AttemptCardVm {
    /// 1-based, newest attempt first.
    pub number: usize,
    pub attempted_at: String,
    pub score_label: String,
    pub correct: u32,
    pub incorrect: u32,
    pub total: u32,
    pub duration: String,
    pub breakdown: Vec<PerformanceEntry>,
}

impl AttemptCardVm {
    #[must_use]
    pub fn can_analyze(&self) -> bool {
        !self.breakdown.is_empty()
    }

    fn from_record(number: usize, record: &AttemptRecord) -> Self {
        let summary = &record.scoring_summary;
        let score_label = match (summary.total_score, summary.max_score) {
            (Some(score), Some(max)) => format!("{} / {}", format_score(score), format_score(max)),
            _ => format!("{} / {}", record.correct_count(), record.question_count()),
        };

        Self {
            number,
            attempted_at: record
                .attempted_at()
                .map_or_else(|| "Unknown date".to_string(), format_attempt_time),
            score_label,
            correct: record.correct_count(),
            incorrect: record.incorrect_count(),
            total: record.question_count(),
            duration: record
                .time_taken_seconds
                .map_or_else(|| "-".to_string(), format_duration),
            breakdown: record.performance_breakdown.clone(),
        }
    }
}

#[must_use]
pub fn map_attempt_cards(records: &[AttemptRecord]) -> Vec<AttemptCardVm> {
    records
        .iter()
        .enumerate()
        .map(|(index, record)| AttemptCardVm::from_record(index + 1, record))
        .collect()
}

/// One quiz on the performance overview, with how often it was attempted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuizHistoryCardVm {
    pub name: String,
    pub attempts: usize,
    pub latest: Option<String>,
}

/// Cards for every unit plus the grand quiz, counting the attempts in `history`.
#[must_use]
pub fn map_quiz_history_cards(units: &[String], history: &[AttemptRecord]) -> Vec<QuizHistoryCardVm> {
    let grand = QuizSelector::Grand.title();
    units
        .iter()
        .map(String::as_str)
        .chain(std::iter::once(grand))
        .map(|name| {
            let attempts: Vec<&AttemptRecord> = history
                .iter()
                .filter(|record| record.quiz_name == name)
                .collect();
            QuizHistoryCardVm {
                name: name.to_string(),
                attempts: attempts.len(),
                latest: attempts
                    .iter()
                    .filter_map(|record| record.attempted_at())
                    .max()
                    .map(format_attempt_time),
            }
        })
        .collect()
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubtopicRowVm {
    pub name: String,
    pub correct: u32,
    pub total: u32,
    pub accuracy: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TopicVm {
    pub name: String,
    pub accuracy: String,
    pub subtopics: Vec<SubtopicRowVm>,
}

fn accuracy_label(tally: SubtopicTally) -> String {
    tally
        .accuracy_percent()
        .map_or_else(|| "-".to_string(), |percent| format!("{percent}%"))
}

#[must_use]
pub fn map_topic_analysis(analysis: &TopicAnalysis) -> Vec<TopicVm> {
    analysis
        .topics()
        .map(|(topic, subtopics)| TopicVm {
            name: topic.to_string(),
            accuracy: analysis
                .topic_total(topic)
                .map_or_else(|| "-".to_string(), accuracy_label),
            subtopics: subtopics
                .iter()
                .map(|(name, tally)| SubtopicRowVm {
                    name: name.clone(),
                    correct: tally.correct,
                    total: tally.total,
                    accuracy: accuracy_label(*tally),
                })
                .collect(),
        })
        .collect()
}
