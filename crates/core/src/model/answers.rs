use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AnswerError {
    #[error("question {position} does not exist (quiz has {len} questions)")]
    UnknownQuestion { position: usize, len: usize },

    #[error("option {option} is out of range for a question with {option_count} options")]
    OptionOutOfRange { option: usize, option_count: usize },
}

/// Per-question answer slots for one quiz attempt.
///
/// Created with every slot unanswered; slots are overwritten by selection and
/// never removed, so the set always has one entry per question.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerSet {
    slots: Vec<Option<usize>>,
}

impl AnswerSet {
    #[must_use]
    pub fn unanswered(len: usize) -> Self {
        Self {
            slots: vec![None; len],
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Selected option for a question, `None` when unanswered or unknown.
    #[must_use]
    pub fn selected(&self, position: usize) -> Option<usize> {
        self.slots.get(position).copied().flatten()
    }

    /// Record `option` for the question at `position`.
    ///
    /// # Errors
    ///
    /// Returns `AnswerError::UnknownQuestion` for a position past the end and
    /// `AnswerError::OptionOutOfRange` when `option >= option_count`.
    pub fn select(
        &mut self,
        position: usize,
        option: usize,
        option_count: usize,
    ) -> Result<(), AnswerError> {
        let len = self.slots.len();
        let slot = self
            .slots
            .get_mut(position)
            .ok_or(AnswerError::UnknownQuestion { position, len })?;
        if option >= option_count {
            return Err(AnswerError::OptionOutOfRange {
                option,
                option_count,
            });
        }
        *slot = Some(option);
        Ok(())
    }

    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Slots in question order.
    #[must_use]
    pub fn as_slice(&self) -> &[Option<usize>] {
        &self.slots
    }
}
