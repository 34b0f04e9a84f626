//! End-to-end poll scenarios
//!
//! Builds polls through the public API, votes on them and checks the
//! resulting tallies and invariants.

use chatpoll::polls::{
    Ballot, OptionId, Poll, PollBuilder, PollError, PollOptionSet, TallyCalculator, VoteEngine,
    VoteOutcome,
};
use std::collections::{HashMap, HashSet};

fn build(question: &str, options: &[&str], multiple: bool) -> Poll {
    let set = PollOptionSet::from_texts(options.iter().copied()).unwrap();
    PollBuilder::build(question, &set, multiple, "u1").unwrap()
}

fn find(poll: &Poll, text: &str) -> OptionId {
    poll.options()
        .iter()
        .find(|o| o.text() == text)
        .map(|o| o.id())
        .unwrap()
}

fn count(poll: &Poll, text: &str) -> usize {
    poll.option(find(poll, text)).unwrap().vote_count()
}

/// Check the vote-relation invariants on a poll
fn assert_consistent(poll: &Poll, voters: &[String]) {
    let mut per_voter = 0;
    for voter in voters {
        let selections = poll.selections_of(voter);
        if !poll.allows_multiple_answers() {
            assert!(selections.len() <= 1, "{} holds {:?}", voter, selections);
        }
        per_voter += selections.len();
    }
    assert_eq!(TallyCalculator::total_votes(poll), per_voter);

    for option in poll.options() {
        let unique: HashSet<_> = option.voters().iter().collect();
        assert_eq!(unique.len(), option.vote_count());
    }
}

/// Small deterministic generator so the sequences are reproducible
struct Lcg(u64);

impl Lcg {
    fn next(&mut self, bound: usize) -> usize {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        ((self.0 >> 33) as usize) % bound
    }
}

#[test]
fn scenario_single_choice_switch() {
    let mut poll = build("Lunch?", &["Pizza", "Sushi"], false);
    let pizza = find(&poll, "Pizza");
    let sushi = find(&poll, "Sushi");

    VoteEngine::apply_vote(&mut poll, "u1", pizza).unwrap();
    VoteEngine::apply_vote(&mut poll, "u1", sushi).unwrap();

    assert_eq!(count(&poll, "Pizza"), 0);
    assert_eq!(count(&poll, "Sushi"), 1);
}

#[test]
fn scenario_single_choice_double_tap() {
    let mut poll = build("Lunch?", &["Pizza", "Sushi"], false);
    let pizza = find(&poll, "Pizza");

    VoteEngine::apply_vote(&mut poll, "u1", pizza).unwrap();
    let delta = VoteEngine::apply_vote(&mut poll, "u1", pizza).unwrap();

    assert_eq!(delta.outcome, VoteOutcome::Removed);
    assert_eq!(count(&poll, "Pizza"), 0);
}

#[test]
fn scenario_multi_choice_toggles() {
    let mut poll = build("Pick any", &["A", "B", "C"], true);
    let a = find(&poll, "A");
    let b = find(&poll, "B");

    VoteEngine::apply_vote(&mut poll, "u1", a).unwrap();
    VoteEngine::apply_vote(&mut poll, "u1", b).unwrap();
    assert_eq!(count(&poll, "A"), 1);
    assert_eq!(count(&poll, "B"), 1);

    VoteEngine::apply_vote(&mut poll, "u1", a).unwrap();
    assert_eq!(count(&poll, "A"), 0);
    assert_eq!(count(&poll, "B"), 1);
    assert_eq!(VoteEngine::ballot(&poll, "u1"), Ballot::Selected(vec![b]));
}

#[test]
fn scenario_empty_question_rejected() {
    let set = PollOptionSet::from_texts(["A", "B"]).unwrap();
    let result = PollBuilder::build("", &set, false, "u1");
    assert_eq!(result, Err(PollError::EmptyQuestion));
}

#[test]
fn option_count_boundaries() {
    let two = PollOptionSet::from_texts(["A", "B"]).unwrap();
    assert!(PollBuilder::build("Q", &two, false, "u1").is_ok());

    let one = PollOptionSet::from_texts(["A"]).unwrap();
    assert!(matches!(
        PollBuilder::build("Q", &one, false, "u1"),
        Err(PollError::InsufficientOptions { .. })
    ));

    let mut twelve = PollOptionSet::from_texts((0..12).map(|i| format!("Option {}", i))).unwrap();
    assert!(matches!(
        twelve.add("Option 12"),
        Err(PollError::TooManyOptions { .. })
    ));
}

#[test]
fn percentages_and_ties() {
    let mut poll = build("Q", &["A", "B", "C"], false);
    let ids: Vec<OptionId> = poll.options().iter().map(|o| o.id()).collect();
    for (index, votes) in [5, 8, 3].into_iter().enumerate() {
        for n in 0..votes {
            VoteEngine::apply_vote(&mut poll, &format!("v{}-{}", index, n), ids[index]).unwrap();
        }
    }
    assert_eq!(TallyCalculator::percentage(&poll, ids[1]).unwrap(), 50.0);
    assert_eq!(TallyCalculator::leading_options(&poll), vec![ids[1]]);

    // All three C voters move to A, leaving A and B tied at 8
    for n in 0..3 {
        VoteEngine::apply_vote(&mut poll, &format!("v2-{}", n), ids[0]).unwrap();
    }
    assert_eq!(
        TallyCalculator::leading_options(&poll),
        vec![ids[0], ids[1]]
    );
}

#[test]
fn repeated_votes_alternate() {
    for multiple in [false, true] {
        let mut poll = build("Q", &["A", "B"], multiple);
        let a = find(&poll, "A");
        let b = find(&poll, "B");
        VoteEngine::apply_vote(&mut poll, "u1", b).unwrap();
        let before = poll.selections_of("u1");

        for n in 1..=6 {
            VoteEngine::apply_vote(&mut poll, "u1", a).unwrap();
            let has_a = poll.option(a).unwrap().has_voter("u1");
            assert_eq!(has_a, n % 2 == 1, "after {} votes (multiple={})", n, multiple);
        }
        // Even number of taps: A is back to unselected
        assert!(!poll.option(a).unwrap().has_voter("u1"));
        if multiple {
            assert_eq!(poll.selections_of("u1"), before);
        }
    }
}

#[test]
fn random_vote_sequences_stay_consistent() {
    let voters: Vec<String> = (0..6).map(|i| format!("voter{}", i)).collect();

    for (seed, multiple) in [(1u64, false), (2, true), (3, false), (4, true)] {
        let mut rng = Lcg(seed);
        let mut poll = build("Q", &["A", "B", "C", "D"], multiple);
        let ids: Vec<OptionId> = poll.options().iter().map(|o| o.id()).collect();
        let mut expected: HashMap<(usize, usize), bool> = HashMap::new();

        for _ in 0..500 {
            let voter = rng.next(voters.len());
            let option = rng.next(ids.len());
            VoteEngine::apply_vote(&mut poll, &voters[voter], ids[option]).unwrap();

            let was = expected.get(&(voter, option)).copied().unwrap_or(false);
            if !multiple && !was {
                for other in 0..ids.len() {
                    expected.insert((voter, other), false);
                }
            }
            expected.insert((voter, option), !was);

            assert_consistent(&poll, &voters);
        }

        for ((voter, option), selected) in expected {
            assert_eq!(
                poll.option(ids[option]).unwrap().has_voter(&voters[voter]),
                selected
            );
        }
    }
}

#[test]
fn rejected_vote_changes_nothing() {
    let mut poll = build("Q", &["A", "B"], false);
    let a = find(&poll, "A");
    VoteEngine::apply_vote(&mut poll, "u1", a).unwrap();
    let snapshot = poll.clone();

    let other = build("Q", &["A", "B"], false);
    let stale = find(&other, "A");
    assert_eq!(
        VoteEngine::apply_vote(&mut poll, "u1", stale),
        Err(PollError::UnknownOption(stale))
    );
    assert_eq!(poll, snapshot);
}

#[test]
fn duplicate_option_texts_are_separate_options() {
    let mut poll = build("Q", &["Same", "Same"], false);
    let first = poll.options()[0].id();
    let second = poll.options()[1].id();
    assert_ne!(first, second);

    VoteEngine::apply_vote(&mut poll, "u1", first).unwrap();
    VoteEngine::apply_vote(&mut poll, "u2", second).unwrap();
    assert_eq!(
        TallyCalculator::leading_options(&poll),
        vec![first, second]
    );
}
