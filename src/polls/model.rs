//! Poll Model
//!
//! The poll entity, its options, and the identifiers used to address them.
//! Identity fields are fixed at build time; only option voter lists change,
//! and only through the vote engine.

use chrono::{DateTime, Utc};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Maximum question length, in characters
pub const MAX_QUESTION_CHARS: usize = 255;
/// Maximum option text length, in characters
pub const MAX_OPTION_CHARS: usize = 100;
/// Minimum number of options a poll can have
pub const MIN_OPTIONS: usize = 2;
/// Maximum number of options a poll can have
pub const MAX_OPTIONS: usize = 12;

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Generate a fresh random identifier
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s).map(Self)
            }
        }
    };
}

uuid_id!(
    /// Unique poll identifier
    PollId
);

uuid_id!(
    /// Option identifier, unique within its poll
    OptionId
);

/// Identifier of an editable row in a draft option set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlotId(pub u32);

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Poll option/choice
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollOption {
    id: OptionId,
    text: String,
    /// Voters in the order they selected this option, no duplicates
    voters: Vec<String>,
}

impl PollOption {
    pub(crate) fn new(text: String) -> Self {
        Self {
            id: OptionId::new(),
            text,
            voters: Vec::new(),
        }
    }

    pub fn id(&self) -> OptionId {
        self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Voters currently selecting this option, oldest first
    pub fn voters(&self) -> &[String] {
        &self.voters
    }

    /// Always equal to the number of voters
    pub fn vote_count(&self) -> usize {
        self.voters.len()
    }

    pub fn has_voter(&self, voter_id: &str) -> bool {
        self.voters.iter().any(|v| v == voter_id)
    }

    /// Returns false if the voter was already present
    pub(crate) fn add_voter(&mut self, voter_id: &str) -> bool {
        if self.has_voter(voter_id) {
            return false;
        }
        self.voters.push(voter_id.to_string());
        true
    }

    /// Returns false if the voter was not present
    pub(crate) fn remove_voter(&mut self, voter_id: &str) -> bool {
        let before = self.voters.len();
        self.voters.retain(|v| v != voter_id);
        self.voters.len() != before
    }
}

impl Serialize for PollOption {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("PollOption", 4)?;
        state.serialize_field("id", &self.id)?;
        state.serialize_field("text", &self.text)?;
        state.serialize_field("voters", &self.voters)?;
        state.serialize_field("voteCount", &self.vote_count())?;
        state.end()
    }
}

/// A poll: a question paired with a bounded, ordered set of options
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Poll {
    id: PollId,
    question: String,
    options: Vec<PollOption>,
    allow_multiple_answers: bool,
    created_by: String,
    created_at: DateTime<Utc>,
}

impl Poll {
    /// Assemble a poll from already validated parts
    pub(crate) fn new(
        question: String,
        option_texts: Vec<String>,
        allow_multiple_answers: bool,
        created_by: String,
    ) -> Self {
        Self {
            id: PollId::new(),
            question,
            options: option_texts.into_iter().map(PollOption::new).collect(),
            allow_multiple_answers,
            created_by,
            created_at: Utc::now(),
        }
    }

    pub fn id(&self) -> PollId {
        self.id
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn options(&self) -> &[PollOption] {
        &self.options
    }

    pub fn allows_multiple_answers(&self) -> bool {
        self.allow_multiple_answers
    }

    pub fn created_by(&self) -> &str {
        &self.created_by
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Look up an option by ID
    pub fn option(&self, option_id: OptionId) -> Option<&PollOption> {
        self.options.iter().find(|o| o.id == option_id)
    }

    pub(crate) fn option_index(&self, option_id: OptionId) -> Option<usize> {
        self.options.iter().position(|o| o.id == option_id)
    }

    pub(crate) fn options_mut(&mut self) -> &mut [PollOption] {
        &mut self.options
    }

    /// Options the voter currently has selected, in poll order
    pub fn selections_of(&self, voter_id: &str) -> Vec<OptionId> {
        self.options
            .iter()
            .filter(|o| o.has_voter(voter_id))
            .map(|o| o.id)
            .collect()
    }

    /// Check if a voter has any option selected
    pub fn has_voted(&self, voter_id: &str) -> bool {
        self.options.iter().any(|o| o.has_voter(voter_id))
    }
}

/// Poll filter for listing polls
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PollFilter {
    /// Filter by creator
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    /// Limit results (0 = unlimited)
    #[serde(default)]
    pub limit: usize,
    /// Offset for pagination
    #[serde(default)]
    pub offset: usize,
}

impl PollFilter {
    /// Create a new filter
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter by creator
    pub fn created_by(mut self, user_id: impl Into<String>) -> Self {
        self.created_by = Some(user_id.into());
        self
    }

    /// Set limit
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Set offset
    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }
}
