use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SelectorError {
    #[error("unit name cannot be empty")]
    EmptyUnitName,

    #[error("unknown quiz kind: {0}")]
    UnknownKind(String),
}

/// Which quiz to fetch: a single unit's quiz or the grand quiz over all units.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuizSelector {
    Unit(String),
    Grand,
}

impl QuizSelector {
    pub const UNIT_QUESTION_COUNT: u32 = 15;
    pub const GRAND_QUESTION_COUNT: u32 = 75;

    /// # Errors
    ///
    /// Returns `SelectorError::EmptyUnitName` for a blank name.
    pub fn unit(name: impl Into<String>) -> Result<Self, SelectorError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(SelectorError::EmptyUnitName);
        }
        Ok(Self::Unit(name))
    }

    /// Parse the `(kind, name)` pair carried by quiz routes.
    ///
    /// For the grand quiz the name slot holds the subject and is ignored.
    ///
    /// # Errors
    ///
    /// Returns `SelectorError::UnknownKind` for anything other than `unit` or
    /// `grand`, and `SelectorError::EmptyUnitName` for a blank unit.
    pub fn from_route(kind: &str, name: &str) -> Result<Self, SelectorError> {
        match kind {
            "unit" => Self::unit(name),
            "grand" => Ok(Self::Grand),
            other => Err(SelectorError::UnknownKind(other.to_string())),
        }
    }

    /// Route/endpoint segment for this kind of quiz.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Unit(_) => "unit",
            Self::Grand => "grand",
        }
    }

    #[must_use]
    pub fn is_grand(&self) -> bool {
        matches!(self, Self::Grand)
    }

    #[must_use]
    pub fn title(&self) -> &str {
        match self {
            Self::Unit(name) => name,
            Self::Grand => "Grand Quiz",
        }
    }

    /// Number of questions the backend generates for this kind of quiz.
    #[must_use]
    pub fn expected_question_count(&self) -> u32 {
        match self {
            Self::Unit(_) => Self::UNIT_QUESTION_COUNT,
            Self::Grand => Self::GRAND_QUESTION_COUNT,
        }
    }
}

impl fmt::Display for QuizSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unit(name) => write!(f, "unit:{name}"),
            Self::Grand => f.write_str("grand"),
        }
    }
}
