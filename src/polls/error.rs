//! Poll errors
//!
//! Every failure here is a user-correctable input error. None of them leave
//! a poll partially mutated.

use thiserror::Error;

use super::model::{OptionId, PollId, SlotId};

/// Poll error types
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PollError {
    #[error("Poll question is required")]
    EmptyQuestion,

    #[error("Poll question is {len} characters, the limit is {max}")]
    QuestionTooLong { len: usize, max: usize },

    #[error("Poll needs at least {min} non-empty options, found {found}")]
    InsufficientOptions { found: usize, min: usize },

    #[error("Poll cannot have more than {max} options")]
    TooManyOptions { max: usize },

    #[error("Poll must keep at least {min} options")]
    TooFewOptions { min: usize },

    #[error("Option slot {0} does not exist in this draft")]
    UnknownSlot(SlotId),

    #[error("Option '{0}' does not belong to this poll")]
    UnknownOption(OptionId),

    #[error("Poll '{0}' not found")]
    PollNotFound(PollId),
}

impl PollError {
    /// Stable machine-readable name of the error kind
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyQuestion => "empty_question",
            Self::QuestionTooLong { .. } => "question_too_long",
            Self::InsufficientOptions { .. } => "insufficient_options",
            Self::TooManyOptions { .. } => "too_many_options",
            Self::TooFewOptions { .. } => "too_few_options",
            Self::UnknownSlot(_) => "unknown_slot",
            Self::UnknownOption(_) => "unknown_option",
            Self::PollNotFound(_) => "poll_not_found",
        }
    }

    /// Whether the error comes from draft validation rather than voting
    pub fn is_authoring(&self) -> bool {
        matches!(
            self,
            Self::EmptyQuestion
                | Self::QuestionTooLong { .. }
                | Self::InsufficientOptions { .. }
                | Self::TooManyOptions { .. }
                | Self::TooFewOptions { .. }
                | Self::UnknownSlot(_)
        )
    }
}
