//! Tally Calculator
//!
//! Read-only summaries of a poll's current votes.

use serde::Serialize;
use std::collections::HashSet;

use super::error::PollError;
use super::model::{OptionId, Poll, PollId};

/// Per-option line of a tally
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionTally {
    pub option_id: OptionId,
    pub text: String,
    pub vote_count: usize,
    pub percentage: f64,
    pub is_leading: bool,
}

/// Presentation-ready poll results
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PollTally {
    pub poll_id: PollId,
    pub question: String,
    pub allow_multiple_answers: bool,
    /// Sum of option counts; one voter may count several times
    pub total_votes: usize,
    /// Number of voters with at least one selection
    pub distinct_voters: usize,
    pub options: Vec<OptionTally>,
}

/// Derives counts, percentages and leaders from a poll
pub struct TallyCalculator;

impl TallyCalculator {
    /// Sum of vote counts across all options
    ///
    /// In a multi-choice poll this is not the number of voters, see
    /// [`Self::distinct_voters`].
    pub fn total_votes(poll: &Poll) -> usize {
        poll.options().iter().map(|o| o.vote_count()).sum()
    }

    /// Number of voters with at least one selection
    pub fn distinct_voters(poll: &Poll) -> usize {
        poll.options()
            .iter()
            .flat_map(|o| o.voters())
            .collect::<HashSet<_>>()
            .len()
    }

    /// Share of all votes held by the option, 0-100. Zero when nobody voted.
    pub fn percentage(poll: &Poll, option_id: OptionId) -> Result<f64, PollError> {
        let option = poll
            .option(option_id)
            .ok_or(PollError::UnknownOption(option_id))?;
        Ok(Self::share(option.vote_count(), Self::total_votes(poll)))
    }

    fn share(count: usize, total: usize) -> f64 {
        if total == 0 {
            return 0.0;
        }
        (count as f64 / total as f64) * 100.0
    }

    /// Options tied at the highest non-zero count, in poll order
    pub fn leading_options(poll: &Poll) -> Vec<OptionId> {
        let max = poll
            .options()
            .iter()
            .map(|o| o.vote_count())
            .max()
            .unwrap_or(0);
        if max == 0 {
            return Vec::new();
        }
        poll.options()
            .iter()
            .filter(|o| o.vote_count() == max)
            .map(|o| o.id())
            .collect()
    }

    /// Voters of an option, oldest first
    pub fn voters_for(poll: &Poll, option_id: OptionId) -> Result<Vec<String>, PollError> {
        poll.option(option_id)
            .map(|o| o.voters().to_vec())
            .ok_or(PollError::UnknownOption(option_id))
    }

    /// Full summary for rendering
    pub fn summarize(poll: &Poll) -> PollTally {
        let total = Self::total_votes(poll);
        let leaders = Self::leading_options(poll);

        let options = poll
            .options()
            .iter()
            .map(|o| OptionTally {
                option_id: o.id(),
                text: o.text().to_string(),
                vote_count: o.vote_count(),
                percentage: Self::share(o.vote_count(), total),
                is_leading: leaders.contains(&o.id()),
            })
            .collect();

        PollTally {
            poll_id: poll.id(),
            question: poll.question().to_string(),
            allow_multiple_answers: poll.allows_multiple_answers(),
            total_votes: total,
            distinct_voters: Self::distinct_voters(poll),
            options,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polls::builder::PollBuilder;
    use crate::polls::engine::VoteEngine;
    use crate::polls::options::PollOptionSet;

    /// Build a poll and cast `votes[i]` distinct votes on option `i`
    fn poll_with_votes(votes: &[usize], multiple: bool) -> Poll {
        let texts: Vec<String> = (0..votes.len()).map(|i| format!("Option {}", i)).collect();
        let options = PollOptionSet::from_texts(texts).unwrap();
        let mut poll = PollBuilder::build("Question?", &options, multiple, "author").unwrap();
        for (index, count) in votes.iter().enumerate() {
            let option_id = poll.options()[index].id();
            for n in 0..*count {
                let voter = format!("voter-{}-{}", index, n);
                VoteEngine::apply_vote(&mut poll, &voter, option_id).unwrap();
            }
        }
        poll
    }

    #[test]
    fn test_total_votes() {
        let poll = poll_with_votes(&[5, 8, 3], false);
        assert_eq!(TallyCalculator::total_votes(&poll), 16);
    }

    #[test]
    fn test_percentage() {
        let poll = poll_with_votes(&[5, 8, 3], false);
        let second = poll.options()[1].id();
        assert_eq!(TallyCalculator::percentage(&poll, second).unwrap(), 50.0);

        let first = poll.options()[0].id();
        let pct = TallyCalculator::percentage(&poll, first).unwrap();
        assert!((pct - 31.25).abs() < f64::EPSILON);
    }

    #[test]
    fn test_percentage_no_votes() {
        let poll = poll_with_votes(&[0, 0], false);
        let first = poll.options()[0].id();
        assert_eq!(TallyCalculator::percentage(&poll, first).unwrap(), 0.0);
    }

    #[test]
    fn test_percentage_unknown_option() {
        let poll = poll_with_votes(&[1, 0], false);
        let stray = OptionId::new();
        assert_eq!(
            TallyCalculator::percentage(&poll, stray),
            Err(PollError::UnknownOption(stray))
        );
    }

    #[test]
    fn test_leading_single() {
        let poll = poll_with_votes(&[5, 8, 3], false);
        assert_eq!(
            TallyCalculator::leading_options(&poll),
            vec![poll.options()[1].id()]
        );
    }

    #[test]
    fn test_leading_tie() {
        let poll = poll_with_votes(&[4, 1, 4], false);
        assert_eq!(
            TallyCalculator::leading_options(&poll),
            vec![poll.options()[0].id(), poll.options()[2].id()]
        );
    }

    #[test]
    fn test_no_leader_without_votes() {
        let poll = poll_with_votes(&[0, 0, 0], false);
        assert!(TallyCalculator::leading_options(&poll).is_empty());
    }

    #[test]
    fn test_multi_choice_total_vs_distinct() {
        let mut poll = poll_with_votes(&[0, 0, 0], true);
        let ids: Vec<OptionId> = poll.options().iter().map(|o| o.id()).collect();
        VoteEngine::apply_vote(&mut poll, "u1", ids[0]).unwrap();
        VoteEngine::apply_vote(&mut poll, "u1", ids[1]).unwrap();
        VoteEngine::apply_vote(&mut poll, "u2", ids[1]).unwrap();

        assert_eq!(TallyCalculator::total_votes(&poll), 3);
        assert_eq!(TallyCalculator::distinct_voters(&poll), 2);
    }

    #[test]
    fn test_voters_for_keeps_vote_order() {
        let mut poll = poll_with_votes(&[0, 0], false);
        let first = poll.options()[0].id();
        for voter in ["carol", "alice", "bob"] {
            VoteEngine::apply_vote(&mut poll, voter, first).unwrap();
        }
        assert_eq!(
            TallyCalculator::voters_for(&poll, first).unwrap(),
            vec!["carol", "alice", "bob"]
        );
    }

    #[test]
    fn test_summarize() {
        let poll = poll_with_votes(&[1, 3], false);
        let tally = TallyCalculator::summarize(&poll);

        assert_eq!(tally.poll_id, poll.id());
        assert_eq!(tally.total_votes, 4);
        assert_eq!(tally.distinct_voters, 4);
        assert_eq!(tally.options[0].percentage, 25.0);
        assert!(!tally.options[0].is_leading);
        assert_eq!(tally.options[1].percentage, 75.0);
        assert!(tally.options[1].is_leading);

        let json = serde_json::to_value(&tally).unwrap();
        assert_eq!(json["totalVotes"], 4);
        assert_eq!(json["options"][1]["isLeading"], true);
    }
}
