//! Polling Module
//!
//! Poll authoring, voting and tallying for chats.
//! Supports single-choice and multiple-choice polls.

pub mod builder;
pub mod engine;
pub mod error;
pub mod model;
pub mod options;
pub mod store;
pub mod tally;

pub use builder::{PollBuilder, PollDraft, ValidatedDraft};
pub use engine::{Ballot, OptionVoters, VoteDelta, VoteEngine, VoteOutcome};
pub use error::PollError;
pub use model::{
    OptionId, Poll, PollFilter, PollId, PollOption, SlotId, MAX_OPTIONS, MAX_OPTION_CHARS,
    MAX_QUESTION_CHARS, MIN_OPTIONS,
};
pub use options::{OptionSlot, PollOptionSet};
pub use store::{create_store, PollObserver, PollStore, PollStoreStats};
pub use tally::{OptionTally, PollTally, TallyCalculator};
