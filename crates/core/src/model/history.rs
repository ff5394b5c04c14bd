use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

//
// ─── ATTEMPT RECORDS ───────────────────────────────────────────────────────────
//

/// Aggregate scoring block stored with each attempt.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoringSummary {
    #[serde(default)]
    pub total_score: Option<f64>,
    #[serde(default)]
    pub max_score: Option<f64>,
    #[serde(default)]
    pub correct_answers_count: Option<u32>,
    #[serde(default)]
    pub total_questions: Option<u32>,
    #[serde(default)]
    pub difficulty_breakdown: BTreeMap<String, u32>,
    #[serde(default)]
    pub type_breakdown: BTreeMap<String, u32>,
    #[serde(default)]
    pub topics_covered: Vec<String>,
    #[serde(default)]
    pub subtopics_covered: Vec<String>,
}

/// Per-question line of an attempt, the input of topic analysis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceEntry {
    #[serde(default)]
    pub template_id: Option<String>,
    #[serde(default)]
    pub topic_name: Option<String>,
    #[serde(default)]
    pub subtopic_name: Option<String>,
    #[serde(default)]
    pub difficulty_level: Option<String>,
    #[serde(default)]
    pub difficulty_type: Option<String>,
    #[serde(default)]
    pub is_correct: bool,
    #[serde(default)]
    pub marks_obtained: Option<f64>,
    #[serde(default)]
    pub marks_possible: Option<f64>,
}

/// One saved quiz attempt from the performance history endpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttemptRecord {
    #[serde(default)]
    pub quiz_name: String,
    #[serde(default)]
    pub quiz_type: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub time_taken_seconds: Option<u64>,
    #[serde(default)]
    pub scoring_summary: ScoringSummary,
    #[serde(default)]
    pub performance_breakdown: Vec<PerformanceEntry>,
}

impl AttemptRecord {
    /// Attempt time, when the backend sent a parseable ISO-8601 timestamp.
    #[must_use]
    pub fn attempted_at(&self) -> Option<NaiveDateTime> {
        let raw = self.timestamp.as_deref()?;
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .or_else(|| {
                chrono::DateTime::parse_from_rfc3339(raw)
                    .ok()
                    .map(|dt| dt.naive_utc())
            })
    }

    #[must_use]
    pub fn correct_count(&self) -> u32 {
        self.scoring_summary.correct_answers_count.unwrap_or_else(|| {
            let count = self
                .performance_breakdown
                .iter()
                .filter(|entry| entry.is_correct)
                .count();
            u32::try_from(count).unwrap_or(u32::MAX)
        })
    }

    #[must_use]
    pub fn question_count(&self) -> u32 {
        self.scoring_summary.total_questions.unwrap_or_else(|| {
            u32::try_from(self.performance_breakdown.len()).unwrap_or(u32::MAX)
        })
    }

    #[must_use]
    pub fn incorrect_count(&self) -> u32 {
        self.question_count().saturating_sub(self.correct_count())
    }
}

//
// ─── TOPIC ANALYSIS ────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubtopicTally {
    pub total: u32,
    pub correct: u32,
}

impl SubtopicTally {
    /// Share of correct answers in percent, `None` when nothing was asked.
    #[must_use]
    pub fn accuracy_percent(&self) -> Option<u32> {
        if self.total == 0 {
            return None;
        }
        Some(self.correct.min(self.total) * 100 / self.total)
    }
}

/// Topic → subtopic → tally, as returned by the analysis endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TopicAnalysis(BTreeMap<String, BTreeMap<String, SubtopicTally>>);

impl TopicAnalysis {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn topics(&self) -> impl Iterator<Item = (&str, &BTreeMap<String, SubtopicTally>)> {
        self.0.iter().map(|(name, subtopics)| (name.as_str(), subtopics))
    }

    /// Sum of all subtopic tallies under one topic.
    #[must_use]
    pub fn topic_total(&self, topic: &str) -> Option<SubtopicTally> {
        self.0.get(topic).map(|subtopics| {
            subtopics
                .values()
                .fold(SubtopicTally::default(), |acc, tally| SubtopicTally {
                    total: acc.total + tally.total,
                    correct: acc.correct + tally.correct,
                })
        })
    }
}
