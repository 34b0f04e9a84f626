#![no_main]

use libfuzzer_sys::fuzz_target;

use chatpoll::polls::{PollDraft, MAX_OPTIONS, MAX_OPTION_CHARS, MAX_QUESTION_CHARS, MIN_OPTIONS};

/// Parses arbitrary bytes as a client draft and validates it.
///
/// Validation must never panic, and anything it accepts must respect the
/// authoring limits.
fuzz_target!(|data: &[u8]| {
    let Ok(draft) = serde_json::from_slice::<PollDraft>(data) else {
        return;
    };
    let Ok(validated) = draft.validate() else {
        return;
    };

    let question_len = validated.question().chars().count();
    assert!(question_len >= 1 && question_len <= MAX_QUESTION_CHARS);
    assert!(validated.options().len() >= MIN_OPTIONS);
    assert!(validated.options().len() <= MAX_OPTIONS);
    for option in validated.options() {
        assert!(option.chars().count() <= MAX_OPTION_CHARS);
    }

    let expected = validated.options().to_vec();
    let poll = validated.confirm("fuzzer");
    let texts: Vec<&str> = poll.options().iter().map(|o| o.text()).collect();
    assert_eq!(texts, expected);
});
