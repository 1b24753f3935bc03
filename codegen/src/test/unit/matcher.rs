use crate::test::helpers::{functions, generate, operand_matchers, public_functions, structs};

#[test]
fn test_one_matcher_type_per_head() {
    let code = generate(&["x_ + y_", "x_ + 1"]);
    assert_eq!(code.matcher_count(), 1);
    assert_eq!(structs(&code), ["CommutativeMatcher0"]);
    assert_eq!(operand_matchers(&code), ["CommutativeMatcher0"]);
}

#[test]
fn test_nested_matchers() {
    let code = generate(&["f(x_ + a)*y_"]);
    assert_eq!(code.matcher_count(), 2);

    let mut types = structs(&code);
    types.sort();
    assert_eq!(types, ["CommutativeMatcher0", "CommutativeMatcher1"]);
    let mut impls = operand_matchers(&code);
    impls.sort();
    assert_eq!(impls, types);

    let functions = functions(&code);
    assert!(functions.iter().any(|name| name == "match_operands_0"), "{functions:?}");
    assert!(functions.iter().any(|name| name == "match_operands_1"), "{functions:?}");
    assert_eq!(public_functions(&code), ["match_root"]);
}

#[test]
fn test_matcher_is_initialised_once() {
    let code = generate(&["x_*Sym(s_, Dummy)", "Optional(w_, 1)*x__"]).to_string();
    assert!(code.contains("OnceLock"), "Missing lazy pattern table:\n{code}");
    assert!(code.contains("match_commutative"), "Missing commutative matching:\n{code}");
    assert!(code.contains("SequenceVariable"), "Missing sequence variables:\n{code}");
}

#[test]
fn test_plain_patterns_have_no_matchers() {
    let code = generate(&["Pow(x_, y_)", "f(a, x___)"]);
    assert_eq!(code.matcher_count(), 0);
    assert!(structs(&code).is_empty());
}
