use proptest::prelude::*;

use super::generators::{arb_abstraction, arb_wildcard};
use crate::parse;
use crate::pattern::{Pattern, PatternExpr};

proptest! {
    #[test]
    fn substituting_an_abstraction_rebuilds_the_subject((subject, pattern, subst) in arb_abstraction(3)) {
        prop_assert_eq!(pattern.substitute(&subst), Some(subject));
    }

    #[test]
    fn abstractions_are_valid_patterns((_subject, pattern, subst) in arb_abstraction(3)) {
        let validated = Pattern::new(pattern).unwrap();
        prop_assert_eq!(validated.variables().len(), subst.len());
    }

    #[test]
    fn printed_patterns_parse_back((_subject, pattern, _subst) in arb_abstraction(3)) {
        let reparsed = parse::pattern(&pattern.to_string()).unwrap();
        prop_assert_eq!(reparsed, pattern);
    }

    #[test]
    fn printed_wildcards_parse_back(wildcard in arb_wildcard()) {
        let reparsed = parse::pattern(&wildcard.to_string()).unwrap();
        prop_assert_eq!(reparsed, PatternExpr::Wildcard(wildcard));
    }
}
