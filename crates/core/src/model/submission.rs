use serde::{Deserialize, Serialize};

use crate::model::{AnswerSet, Question};

/// Body sent to the scoring service when a quiz is submitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionPayload {
    pub quiz_questions: Vec<Question>,
    pub student_answers: Vec<Option<usize>>,
    pub time_taken_seconds: u64,
}

impl SubmissionPayload {
    #[must_use]
    pub fn new(questions: &[Question], answers: &AnswerSet, time_taken_seconds: u64) -> Self {
        Self {
            quiz_questions: questions.to_vec(),
            student_answers: answers.as_slice().to_vec(),
            time_taken_seconds,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unanswered_questions_serialize_as_null() {
        let questions = vec![
            Question::new("Q1", vec!["a".into(), "b".into(), "c".into()]),
            Question::new("Q2", vec!["a".into(), "b".into()]),
            Question::new("Q3", vec!["a".into(), "b".into()]),
        ];
        let mut answers = AnswerSet::unanswered(3);
        answers.select(0, 2, 3).unwrap();
        answers.select(2, 0, 2).unwrap();

        let payload = SubmissionPayload::new(&questions, &answers, 47);
        let body = serde_json::to_value(&payload).unwrap();

        assert_eq!(body["student_answers"], json!([2, null, 0]));
        assert_eq!(body["time_taken_seconds"], json!(47));
        assert_eq!(body["quiz_questions"].as_array().map(Vec::len), Some(3));
    }
}
