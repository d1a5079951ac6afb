// Property: a partial-safe rule that rejects a prefix rejects every
// extension of it, including the finished contour. This is what makes
// pruning sound.

use proptest::prelude::*;
use strict_cantus_gen::{LEAPS, Phrase, Rule, RuleBook, STEPS};

fn partial_rules() -> Vec<Rule> {
    RuleBook::strict_style()
        .partial_rules()
        .iter()
        .cloned()
        .chain(RuleBook::catalog())
        .collect()
}

fn interval() -> impl Strategy<Value = i32> {
    prop::sample::select(STEPS.iter().chain(LEAPS.iter()).copied().collect::<Vec<_>>())
}

proptest! {
    #[test]
    fn rejected_prefixes_stay_rejected(
        intervals in prop::collection::vec(interval(), 1..16),
        cut in 0usize..16,
    ) {
        let cut = cut.min(intervals.len());
        for rule in partial_rules() {
            if !rule.check(&Phrase::prefix(&intervals[..cut])) {
                prop_assert!(!rule.check(&Phrase::prefix(&intervals)), "{} prefix", rule.name());
                prop_assert!(!rule.check(&Phrase::complete(&intervals)), "{} complete", rule.name());
            }
        }
    }

    #[test]
    fn complete_phrase_is_no_more_lenient(intervals in prop::collection::vec(interval(), 0..16)) {
        for rule in partial_rules() {
            if !rule.check(&Phrase::prefix(&intervals)) {
                prop_assert!(!rule.check(&Phrase::complete(&intervals)), "{}", rule.name());
            }
        }
    }
}
