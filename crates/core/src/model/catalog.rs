use serde::{Deserialize, Serialize};

/// Unit quizzes a student may take for a subject, and whether the grand quiz
/// is still locked behind them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizAvailability {
    #[serde(default)]
    pub units: Vec<String>,
    #[serde(default = "locked_by_default")]
    pub is_grand_quiz_locked: bool,
}

fn locked_by_default() -> bool {
    true
}

impl Default for QuizAvailability {
    fn default() -> Self {
        Self {
            units: Vec::new(),
            is_grand_quiz_locked: true,
        }
    }
}

/// Downloadable study resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudyMaterial {
    pub name: String,
    pub url: String,
}

impl StudyMaterial {
    /// Last path segment of the download URL.
    #[must_use]
    pub fn file_name(&self) -> &str {
        self.url
            .rsplit('/')
            .find(|segment| !segment.is_empty())
            .unwrap_or(self.url.as_str())
    }
}
