//! Poll Store
//!
//! Hosted poll registry. Each poll sits behind its own mutex so votes on
//! different polls never contend, and votes on the same poll are applied
//! one at a time.

use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;

use super::builder::PollDraft;
use super::engine::{Ballot, VoteDelta, VoteEngine};
use super::error::PollError;
use super::model::{OptionId, Poll, PollFilter, PollId};
use super::tally::{PollTally, TallyCalculator};

/// Receives poll changes, e.g. to persist or sync them
///
/// Callbacks run while the affected poll is locked, so one poll's events
/// arrive in the order they were applied. A callback must not call back
/// into the store for that same poll.
pub trait PollObserver: Send + Sync {
    fn poll_created(&self, poll: &Poll);
    fn vote_applied(&self, delta: &VoteDelta);
    fn poll_removed(&self, _poll_id: PollId) {}
}

/// Poll store for managing polls
#[derive(Default)]
pub struct PollStore {
    /// Stored polls by ID
    polls: RwLock<HashMap<PollId, Arc<Mutex<Poll>>>>,
    observers: RwLock<Vec<Arc<dyn PollObserver>>>,
}

impl std::fmt::Debug for PollStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PollStore")
            .field("polls", &self.polls.read().len())
            .field("observers", &self.observers.read().len())
            .finish()
    }
}

impl PollStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer for creations and votes
    pub fn subscribe(&self, observer: Arc<dyn PollObserver>) {
        self.observers.write().push(observer);
    }

    /// Observers are cloned out so callbacks may subscribe more observers
    fn observers(&self) -> Vec<Arc<dyn PollObserver>> {
        self.observers.read().clone()
    }

    fn entry(&self, poll_id: PollId) -> Result<Arc<Mutex<Poll>>, PollError> {
        self.polls
            .read()
            .get(&poll_id)
            .cloned()
            .ok_or(PollError::PollNotFound(poll_id))
    }

    /// Store an already built poll
    pub fn insert(&self, poll: Poll) -> Poll {
        let id = poll.id();
        let entry = Arc::new(Mutex::new(poll.clone()));
        // Held until observers have seen the poll, so no vote is reported first
        let _guard = entry.lock();
        self.polls.write().insert(id, Arc::clone(&entry));

        tracing::info!(
            poll_id = %id,
            created_by = poll.created_by(),
            options = poll.options().len(),
            "Poll created"
        );
        for observer in self.observers() {
            observer.poll_created(&poll);
        }
        poll
    }

    /// Validate, build and store a draft
    pub fn create_poll(
        &self,
        draft: &PollDraft,
        author_id: impl Into<String>,
    ) -> Result<Poll, PollError> {
        let poll = draft.validate()?.confirm(author_id);
        Ok(self.insert(poll))
    }

    /// Get a snapshot of a poll by ID
    pub fn get_poll(&self, poll_id: PollId) -> Option<Poll> {
        self.entry(poll_id).ok().map(|p| p.lock().clone())
    }

    /// Remove a poll and all its votes
    pub fn delete_poll(&self, poll_id: PollId) -> bool {
        let Some(entry) = self.polls.write().remove(&poll_id) else {
            return false;
        };
        // Waits for an in-flight vote to be reported before the removal
        let _guard = entry.lock();
        tracing::info!(poll_id = %poll_id, "Poll removed");
        for observer in self.observers() {
            observer.poll_removed(poll_id);
        }
        true
    }

    /// List polls with optional filter, newest first
    pub fn list_polls(&self, filter: Option<&PollFilter>) -> Vec<Poll> {
        let mut results: Vec<Poll> = self
            .polls
            .read()
            .values()
            .map(|p| p.lock().clone())
            .collect();

        // Sort by creation date (newest first)
        results.sort_by(|a, b| b.created_at().cmp(&a.created_at()));

        if let Some(filter) = filter {
            if let Some(created_by) = &filter.created_by {
                results.retain(|p| p.created_by() == created_by);
            }

            let limit = if filter.limit > 0 {
                filter.limit
            } else {
                results.len()
            };
            results = results.into_iter().skip(filter.offset).take(limit).collect();
        }

        results
    }

    /// Apply a vote to a stored poll
    pub fn apply_vote(
        &self,
        poll_id: PollId,
        voter_id: &str,
        option_id: OptionId,
    ) -> Result<VoteDelta, PollError> {
        let entry = self.entry(poll_id)?;
        let mut poll = entry.lock();
        let delta = VoteEngine::apply_vote(&mut poll, voter_id, option_id).inspect_err(|err| {
            tracing::warn!(poll_id = %poll_id, voter = voter_id, error = %err, "Vote rejected");
        })?;

        // Still under the poll lock: deltas reach observers in apply order
        for observer in self.observers() {
            observer.vote_applied(&delta);
        }
        Ok(delta)
    }

    /// A voter's current selections in a poll
    pub fn ballot(&self, poll_id: PollId, voter_id: &str) -> Result<Ballot, PollError> {
        let entry = self.entry(poll_id)?;
        let poll = entry.lock();
        Ok(VoteEngine::ballot(&poll, voter_id))
    }

    /// Current results for a poll
    pub fn tally(&self, poll_id: PollId) -> Result<PollTally, PollError> {
        let entry = self.entry(poll_id)?;
        let poll = entry.lock();
        Ok(TallyCalculator::summarize(&poll))
    }

    /// Voters of one option, oldest first
    pub fn voters_for(&self, poll_id: PollId, option_id: OptionId) -> Result<Vec<String>, PollError> {
        let entry = self.entry(poll_id)?;
        let poll = entry.lock();
        TallyCalculator::voters_for(&poll, option_id)
    }

    /// Get store statistics
    pub fn stats(&self) -> PollStoreStats {
        let polls = self.polls.read();
        let total_votes = polls
            .values()
            .map(|p| TallyCalculator::total_votes(&p.lock()))
            .sum();

        PollStoreStats {
            total_polls: polls.len(),
            total_votes,
        }
    }
}

/// Statistics for the poll store
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PollStoreStats {
    /// Total number of polls
    pub total_polls: usize,
    /// Total (voter, option) selections across all polls
    pub total_votes: usize,
}

/// Create a shared poll store
pub fn create_store() -> Arc<PollStore> {
    Arc::new(PollStore::new())
}
