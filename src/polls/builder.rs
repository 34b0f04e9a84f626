//! Poll Builder
//!
//! Turns an authored draft into a [`Poll`]. Validation and confirmation are
//! separate steps so the caller can prompt the author in between.

use serde::Deserialize;

use super::error::PollError;
use super::model::{Poll, MAX_OPTION_CHARS, MAX_QUESTION_CHARS};
use super::options::PollOptionSet;

/// A draft as received from a client
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PollDraft {
    pub question: String,
    pub options: Vec<String>,
    #[serde(default)]
    pub allow_multiple_answers: bool,
}

impl PollDraft {
    /// Validate the draft and return what would be built
    ///
    /// Blank rows are dropped before the option limit is checked.
    pub fn validate(&self) -> Result<ValidatedDraft, PollError> {
        let options = PollOptionSet::from_texts(
            self.options
                .iter()
                .filter(|text| !text.trim().is_empty())
                .cloned(),
        )?;
        PollBuilder::validate(&self.question, &options, self.allow_multiple_answers)
    }
}

/// A draft that passed validation and is waiting for confirmation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedDraft {
    question: String,
    options: Vec<String>,
    allow_multiple_answers: bool,
}

impl ValidatedDraft {
    /// Normalized question text
    pub fn question(&self) -> &str {
        &self.question
    }

    /// Normalized option texts, in order
    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn allows_multiple_answers(&self) -> bool {
        self.allow_multiple_answers
    }

    /// Create the poll. Assigns fresh poll and option IDs.
    pub fn confirm(self, author_id: impl Into<String>) -> Poll {
        Poll::new(
            self.question,
            self.options,
            self.allow_multiple_answers,
            author_id.into(),
        )
    }
}

/// Builds polls from drafts
pub struct PollBuilder;

impl PollBuilder {
    /// Check a draft without creating anything
    pub fn validate(
        question: &str,
        options: &PollOptionSet,
        allow_multiple_answers: bool,
    ) -> Result<ValidatedDraft, PollError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(PollError::EmptyQuestion);
        }
        let len = question.chars().count();
        if len > MAX_QUESTION_CHARS {
            return Err(PollError::QuestionTooLong {
                len,
                max: MAX_QUESTION_CHARS,
            });
        }

        let options: Vec<String> = options
            .finalize()?
            .iter()
            .map(|text| text.trim().chars().take(MAX_OPTION_CHARS).collect())
            .collect();

        Ok(ValidatedDraft {
            question: question.to_string(),
            options,
            allow_multiple_answers,
        })
    }

    /// Validate and confirm in one step
    pub fn build(
        question: &str,
        options: &PollOptionSet,
        allow_multiple_answers: bool,
        author_id: impl Into<String>,
    ) -> Result<Poll, PollError> {
        let poll = Self::validate(question, options, allow_multiple_answers)?.confirm(author_id);
        tracing::debug!(
            poll_id = %poll.id(),
            options = poll.options().len(),
            multiple = allow_multiple_answers,
            "Poll built"
        );
        Ok(poll)
    }
}
