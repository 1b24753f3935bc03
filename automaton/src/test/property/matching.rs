use std::sync::Arc;

use matchgen_expr::Expr;
use matchgen_pattern::test::property::generators::arb_abstraction;
use matchgen_pattern::{Pattern, PatternExpr};
use matchgen_runtime::Substitution;
use proptest::prelude::*;

use crate::Automaton;

fn sorted(results: impl Iterator<Item = (usize, Substitution)>) -> Vec<String> {
    let mut rendered: Vec<String> = results.map(|(index, subst)| format!("{index} {subst}")).collect();
    rendered.sort();
    rendered
}

fn single_automaton(pattern: &PatternExpr) -> Automaton {
    Automaton::from_patterns([&Pattern::new(pattern.clone()).unwrap()])
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn every_result_rebuilds_the_subject((subject, pattern, _expected) in arb_abstraction(2)) {
        let automaton = single_automaton(&pattern);
        for (index, subst) in automaton.match_expr(&subject) {
            prop_assert_eq!(index, 0);
            prop_assert_eq!(pattern.substitute(&subst), Some(subject.clone()), "substitution {}", subst);
        }
    }

    #[test]
    fn the_abstracted_substitution_is_found((subject, pattern, expected) in arb_abstraction(2)) {
        let automaton = single_automaton(&pattern);
        let found: Vec<Substitution> = automaton.match_expr(&subject).map(|(_, subst)| subst).collect();
        prop_assert!(found.contains(&expected), "{} not among {:?}", expected, found);
    }

    #[test]
    fn repeated_runs_agree((subject, pattern, _expected) in arb_abstraction(2)) {
        let automaton = single_automaton(&pattern);
        let first: Vec<_> = automaton.match_expr(&subject).collect();
        let second: Vec<_> = automaton.match_expr(&subject).collect();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn shared_automaton_matches_like_separate_ones(
        abstractions in prop::collection::vec(arb_abstraction(2), 1..=4),
    ) {
        let patterns: Vec<Pattern> =
            abstractions.iter().map(|(_, pattern, _)| Pattern::new(pattern.clone()).unwrap()).collect();
        let shared = Automaton::from_patterns(&patterns);
        let subjects: Vec<Arc<Expr>> = abstractions.iter().map(|(subject, _, _)| subject.clone()).collect();

        for subject in &subjects {
            let mut expected = Vec::new();
            for (index, pattern) in patterns.iter().enumerate() {
                let alone = Automaton::from_patterns([pattern]);
                expected.extend(alone.match_expr(subject).map(|(_, subst)| (index, subst)));
            }
            prop_assert_eq!(sorted(shared.match_expr(subject)), sorted(expected.into_iter()));
        }
    }
}
