use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// A single multiple-choice question as delivered by the question source.
///
/// The backend object is kept whole in `raw` and serialized back as is, so a
/// submission echoes the questions exactly as they were received, `null`
/// fields and unknown keys included. The text and options are parsed once for
/// rendering; everything else is read on demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct Question {
    raw: Map<String, Value>,
    question_text: String,
    options: Vec<String>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question_text is missing or not a string")]
    MissingText,
}

impl TryFrom<Map<String, Value>> for Question {
    type Error = QuestionError;

    fn try_from(raw: Map<String, Value>) -> Result<Self, Self::Error> {
        let question_text = raw
            .get("question_text")
            .and_then(Value::as_str)
            .ok_or(QuestionError::MissingText)?
            .to_string();
        let options = raw
            .get("options")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .map(|item| match item {
                        Value::String(text) => text.clone(),
                        other => other.to_string(),
                    })
                    .collect()
            })
            .unwrap_or_default();
        Ok(Self {
            raw,
            question_text,
            options,
        })
    }
}

impl From<Question> for Map<String, Value> {
    fn from(question: Question) -> Self {
        question.raw
    }
}

impl Question {
    #[must_use]
    pub fn new(question_text: impl Into<String>, options: Vec<String>) -> Self {
        let question_text = question_text.into();
        let mut raw = Map::new();
        raw.insert("question_text".into(), Value::from(question_text.clone()));
        raw.insert("options".into(), Value::from(options.clone()));
        Self {
            raw,
            question_text,
            options,
        }
    }

    #[must_use]
    pub fn with_explanation(self, explanation: impl Into<String>) -> Self {
        self.with_field("explanation", explanation.into())
    }

    #[must_use]
    pub fn with_correct_answer(self, index: usize) -> Self {
        self.with_field("correct_answer_index", index)
    }

    /// Attach a backend field. `question_text` and `options` are fixed by `new`.
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let key = key.into();
        if key != "question_text" && key != "options" {
            self.raw.insert(key, value.into());
        }
        self
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.question_text
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn option(&self, index: usize) -> Option<&str> {
        self.options.get(index).map(String::as_str)
    }

    #[must_use]
    pub fn option_count(&self) -> usize {
        self.options.len()
    }

    #[must_use]
    pub fn explanation(&self) -> Option<&str> {
        self.field("explanation")
            .and_then(Value::as_str)
            .filter(|text| !text.trim().is_empty())
    }

    #[must_use]
    pub fn correct_answer_index(&self) -> Option<usize> {
        self.field("correct_answer_index")
            .and_then(Value::as_u64)
            .and_then(|index| usize::try_from(index).ok())
    }

    #[must_use]
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.raw.get(key)
    }

    #[must_use]
    pub fn topic_name(&self) -> Option<&str> {
        self.field("topic_name").and_then(Value::as_str)
    }
}
