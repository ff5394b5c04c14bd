use serde::{Deserialize, Serialize};

/// Outcome of one question as reported by the scoring service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionOutcome {
    #[serde(default)]
    pub question_text: String,
    #[serde(default)]
    pub options: Option<Vec<String>>,
    pub student_answer_index: Option<usize>,
    pub correct_answer_index: Option<usize>,
    #[serde(default)]
    pub is_correct: bool,
    #[serde(default)]
    pub marks_obtained: Option<f64>,
    #[serde(default)]
    pub marks_possible: Option<f64>,
    #[serde(default)]
    pub explanation: Option<String>,
}

impl QuestionOutcome {
    #[must_use]
    pub fn was_answered(&self) -> bool {
        self.student_answer_index.is_some()
    }
}

/// Graded attempt, received verbatim from the scoring service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradedResult {
    pub total_score: f64,
    pub max_score: f64,
    #[serde(default)]
    pub correct_answers_count: Option<u32>,
    #[serde(default)]
    pub total_questions: Option<u32>,
    #[serde(default)]
    pub detailed_results: Vec<QuestionOutcome>,
}

impl GradedResult {
    /// Correct answers, falling back to the per-question flags when the
    /// service omitted the aggregate.
    #[must_use]
    pub fn correct_count(&self) -> usize {
        self.correct_answers_count.map_or_else(
            || {
                self.detailed_results
                    .iter()
                    .filter(|outcome| outcome.is_correct)
                    .count()
            },
            |count| count as usize,
        )
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.total_questions
            .map_or(self.detailed_results.len(), |count| count as usize)
    }
}
