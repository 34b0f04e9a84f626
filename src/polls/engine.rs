//! Vote Engine
//!
//! Applies a voter's choice to a poll. Single-choice polls keep at most one
//! selection per voter; multi-choice polls toggle each option independently.
//! Re-selecting a selected option always removes it.

use serde::Serialize;

use super::error::PollError;
use super::model::{OptionId, Poll, PollId};

/// What a vote did to the voter's selections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum VoteOutcome {
    /// The option was selected
    Added,
    /// The option was already selected and is now deselected
    Removed,
    /// Single-choice only: the voter moved from `previous` to the option
    Replaced { previous: OptionId },
}

/// Voter list of one option after a vote
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionVoters {
    pub option_id: OptionId,
    pub voters: Vec<String>,
}

/// Everything a persistence collaborator needs to mirror one vote
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteDelta {
    pub poll_id: PollId,
    pub voter_id: String,
    pub option_id: OptionId,
    pub outcome: VoteOutcome,
    /// Options whose voter list changed, in poll order
    pub changes: Vec<OptionVoters>,
}

/// A voter's current state in one poll
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "options", rename_all = "snake_case")]
pub enum Ballot {
    Unvoted,
    /// Single-choice poll with one selection
    VotedFor(OptionId),
    /// Multi-choice poll with at least one selection
    Selected(Vec<OptionId>),
}

/// Vote state transitions
pub struct VoteEngine;

impl VoteEngine {
    /// Toggle `option_id` for `voter_id`
    ///
    /// In a single-choice poll, selecting a new option drops the previous one
    /// in the same step. Applying the same vote twice returns to the original
    /// state; callers that want "set" semantics should check [`Self::ballot`]
    /// first.
    pub fn apply_vote(
        poll: &mut Poll,
        voter_id: &str,
        option_id: OptionId,
    ) -> Result<VoteDelta, PollError> {
        let target = poll
            .option_index(option_id)
            .ok_or(PollError::UnknownOption(option_id))?;
        let poll_id = poll.id();
        let multiple = poll.allows_multiple_answers();
        let options = poll.options_mut();

        let mut changed = vec![target];
        let outcome = if options[target].remove_voter(voter_id) {
            VoteOutcome::Removed
        } else if multiple {
            options[target].add_voter(voter_id);
            VoteOutcome::Added
        } else {
            let mut previous = None;
            for (index, option) in options.iter_mut().enumerate() {
                if index != target && option.remove_voter(voter_id) {
                    previous = Some(option.id());
                    changed.push(index);
                }
            }
            options[target].add_voter(voter_id);
            match previous {
                Some(previous) => VoteOutcome::Replaced { previous },
                None => VoteOutcome::Added,
            }
        };

        changed.sort_unstable();
        let changes = changed
            .into_iter()
            .map(|index| OptionVoters {
                option_id: options[index].id(),
                voters: options[index].voters().to_vec(),
            })
            .collect();

        tracing::debug!(
            poll_id = %poll_id,
            option_id = %option_id,
            voter = voter_id,
            outcome = ?outcome,
            "Vote applied"
        );

        Ok(VoteDelta {
            poll_id,
            voter_id: voter_id.to_string(),
            option_id,
            outcome,
            changes,
        })
    }

    /// The voter's current selections
    pub fn ballot(poll: &Poll, voter_id: &str) -> Ballot {
        let selections = poll.selections_of(voter_id);
        match (poll.allows_multiple_answers(), selections.as_slice()) {
            (_, []) => Ballot::Unvoted,
            (false, [only]) => Ballot::VotedFor(*only),
            _ => Ballot::Selected(selections),
        }
    }
}
