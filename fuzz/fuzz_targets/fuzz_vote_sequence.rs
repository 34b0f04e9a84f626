#![no_main]

use libfuzzer_sys::fuzz_target;

use chatpoll::polls::{OptionId, PollBuilder, PollOptionSet, TallyCalculator, VoteEngine};

const VOTERS: [&str; 4] = ["alice", "bob", "carol", "dave"];

/// Replays a byte stream as votes and checks the vote relation after each one.
///
/// Byte 0 picks single or multi choice and the option count. Every following
/// byte is one vote: the low nibble selects the option, the high nibble the
/// voter. Option indexes past the end are sent as ids from another poll and
/// must be rejected without touching state.
fuzz_target!(|data: &[u8]| {
    let Some((&header, votes)) = data.split_first() else {
        return;
    };
    let multiple = header & 0x80 != 0;
    let option_count = 2 + (header as usize & 0x0f) % 11;

    let texts: Vec<String> = (0..option_count).map(|i| format!("Option {}", i)).collect();
    let Ok(set) = PollOptionSet::from_texts(texts) else {
        return;
    };
    let Ok(mut poll) = PollBuilder::build("Fuzz?", &set, multiple, "fuzzer") else {
        return;
    };
    let ids: Vec<OptionId> = poll.options().iter().map(|o| o.id()).collect();

    for &byte in votes {
        let voter = VOTERS[(byte >> 4) as usize % VOTERS.len()];
        let index = (byte & 0x0f) as usize;

        if index >= ids.len() {
            let before = poll.clone();
            assert!(VoteEngine::apply_vote(&mut poll, voter, OptionId::new()).is_err());
            assert_eq!(poll, before);
            continue;
        }

        let was_selected = poll.options()[index].has_voter(voter);
        let delta = VoteEngine::apply_vote(&mut poll, voter, ids[index])
            .expect("known option must accept votes");
        assert_eq!(poll.options()[index].has_voter(voter), !was_selected);
        assert!(delta.changes.iter().any(|c| c.option_id == ids[index]));

        let mut per_voter = 0;
        for v in VOTERS {
            let selections = poll.selections_of(v);
            if !multiple {
                assert!(selections.len() <= 1);
            }
            per_voter += selections.len();
        }
        assert_eq!(TallyCalculator::total_votes(&poll), per_voter);

        let total = TallyCalculator::total_votes(&poll);
        let sum: f64 = ids
            .iter()
            .map(|id| TallyCalculator::percentage(&poll, *id).unwrap_or(0.0))
            .sum();
        if total > 0 {
            assert!((sum - 100.0).abs() < 1e-6);
        } else {
            assert_eq!(sum, 0.0);
        }
    }
});
