use std::collections::BTreeSet;

use matchgen_expr::SymbolKind;
use matchgen_pattern::{Constraint, Pattern};
use matchgen_runtime::Predicate;
use test_case::test_case;

use crate::Automaton;
use crate::test::helpers::{build, matches, run};

fn found(texts: &[&str], subject: &str) -> BTreeSet<(usize, String)> {
    matches(texts, subject).into_iter().collect()
}

fn single(index: usize, subst: &str) -> Vec<(usize, String)> {
    vec![(index, subst.to_owned())]
}

#[test_case(&["x_"], "x", single(0, "{x: x}"); "bare variable")]
#[test_case(&["Pow(x_, y_)"], "Pow(x, y)", single(0, "{x: x, y: y}"); "power")]
#[test_case(&["Pow(x_, y)"], "Pow(x, z)", vec![]; "structural mismatch")]
#[test_case(&["Pow(x_, y_)", "Optional(w_, 0)"], "x", single(1, "{w: x}"); "optional binds whole subject")]
#[test_case(&["Pow(x_, y_)", "Optional(w_, 0)"], "x + y", single(1, "{w: x + y}"); "optional binds sum")]
#[test_case(&["x_ + y_", "Pow(x_, 2)"], "Pow(x, 2)", single(1, "{x: x}"); "second pattern")]
#[test_case(&["x_ + y_", "Pow(x_, 2)"], "Pow(x, 3)", vec![]; "no pattern")]
#[test_case(&["Pow(x_, Optional(w_, 0))"], "Pow(x, 2)", single(0, "{w: 2, x: x}"); "optional exponent two")]
#[test_case(&["Pow(x_, Optional(w_, 0))"], "Pow(x, 3)", single(0, "{w: 3, x: x}"); "optional exponent three")]
#[test_case(&["Pow(x_, Optional(w_, 0))"], "x + y", vec![]; "optional exponent on sum")]
fn test_scenarios(texts: &[&str], subject: &str, expected: Vec<(usize, String)>) {
    assert_eq!(matches(texts, subject), expected);
}

#[test]
fn test_results_follow_pattern_order() {
    let expected = vec![(0, "{x: x, y: y}".to_owned()), (1, "{w: Pow(x, y)}".to_owned())];
    assert_eq!(matches(&["Pow(x_, y_)", "Optional(w_, 0)"], "Pow(x, y)"), expected);
}

#[test]
fn test_commutative_pairings() {
    let expected = BTreeSet::from([(0, "{x: x, y: y}".to_owned()), (0, "{x: y, y: x}".to_owned())]);
    assert_eq!(found(&["x_ + y_"], "y + x"), expected);
}

#[test]
fn test_associative_leftovers_are_wrapped() {
    assert_eq!(matches(&["x_ + a"], "a + b + c"), single(0, "{x: b + c}"));
    assert_eq!(matches(&["x_ + a"], "a + b"), single(0, "{x: b}"));
    assert_eq!(matches(&["Assoc::h(x_, c)"], "Assoc::h(a, b, c)"), single(0, "{x: Assoc::h(a, b)}"));
    assert_eq!(matches(&["Assoc::h(x_, c)"], "Assoc::h(a, c)"), single(0, "{x: a}"));
}

#[test]
fn test_sequence_wildcards_under_associative_heads_are_wrapped() {
    assert_eq!(matches(&["x__ + a"], "a + b + c"), single(0, "{x: b + c}"));
    assert_eq!(matches(&["x__ + a"], "a + b"), single(0, "{x: b}"));
    assert_eq!(matches(&["x___ + a + b"], "a + b"), single(0, "{x: []}"));
    assert_eq!(matches(&["Assoc::h(x__, c)"], "Assoc::h(a, b, c)"), single(0, "{x: Assoc::h(a, b)}"));
    assert_eq!(matches(&["Assoc::h(x___, c)"], "Assoc::h(c)"), single(0, "{x: []}"));
    assert_eq!(matches(&["f(x__, c)"], "f(a, b, c)"), single(0, "{x: [a, b]}"), "plain heads keep lists");
}

#[test]
fn test_commutative_without_associativity() {
    assert_eq!(matches(&["Comm::g(x_, a)"], "Comm::g(b, a)"), single(0, "{x: b}"));
    assert_eq!(matches(&["Comm::g(x_, a)"], "Comm::g(b, c)"), vec![]);
    assert_eq!(matches(&["Comm::g(x_, Optional(w_, 0))"], "Comm::g(b)"), single(0, "{w: 0, x: b}"));
}

#[test]
fn test_optional_operand_defaults() {
    let texts = ["Pow(x_, x_ + Optional(w_, 0))", "x_ + y_ + Optional(w_, 0)"];
    let results = matches(&texts, "y + x");
    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|(index, subst)| *index == 1 && subst.starts_with("{w: 0, ")), "{results:?}");

    assert_eq!(matches(&texts, "Pow(x, y + x)"), single(0, "{w: y, x: x}"));
    assert_eq!(matches(&texts, "Pow(x, 2 + x)"), single(0, "{w: 2, x: x}"));
    assert_eq!(matches(&texts, "Pow(x, 2)"), vec![]);
}

#[test]
fn test_sequence_lengths() {
    let expected = vec![(0, "{x: [a], y: [b, c]}".to_owned()), (0, "{x: [a, b], y: [c]}".to_owned())];
    assert_eq!(matches(&["f(x__, y__)"], "f(a, b, c)"), expected);
    assert_eq!(matches(&["f(x___, y__)"], "f(a)"), single(0, "{x: [], y: [a]}"));
    assert_eq!(matches(&["f(Seq(x__, 2))"], "f(a)"), vec![]);
    assert_eq!(matches(&["f(Seq(x__, 2))"], "f(a, b)"), single(0, "{x: [a, b]}"));
}

#[test]
fn test_repeated_variables() {
    assert_eq!(matches(&["f(x_, x_)"], "f(a, a)"), single(0, "{x: a}"));
    assert_eq!(matches(&["f(x_, x_)"], "f(a, b)"), vec![]);
    assert_eq!(matches(&["f(x_ + a, x_)"], "f(a + b, b)"), single(0, "{x: b}"));
    assert_eq!(matches(&["f(x_ + a, x_)"], "f(a + b, c)"), vec![]);
}

#[test]
fn test_nested_commutative_operands() {
    assert_eq!(matches(&["f(x_ + a)*y_"], "f(a + b)*c"), single(0, "{x: b, y: c}"));
    assert_eq!(matches(&["f(x_ + a)*y_"], "f(b + c)*c"), vec![]);
}

#[test]
fn test_symbol_wildcards() {
    assert_eq!(matches(&["f(Sym(s_, Dummy))"], "f(Dummy::d)"), single(0, "{s: Dummy::d}"));
    assert_eq!(matches(&["f(Sym(s_, Dummy))"], "f(d)"), vec![]);
}

#[test]
fn test_failed_constraint_only_refutes_its_owner() {
    let constrained = Pattern::parse("Pow(x_, n_)")
        .unwrap()
        .with_constraint("n", Constraint::builtin(Predicate::IsInteger, ["n"]).unwrap())
        .unwrap();
    let free = Pattern::parse("Pow(x_, y_)").unwrap();
    let automaton = Automaton::from_patterns([&constrained, &free]);

    assert_eq!(run(&automaton, "Pow(a, b)"), single(1, "{x: a, y: b}"));
    let expected = vec![(0, "{n: 2, x: a}".to_owned()), (1, "{x: a, y: 2}".to_owned())];
    assert_eq!(run(&automaton, "Pow(a, 2)"), expected);
}

#[test]
fn test_constraints_inside_operands() {
    let pattern = Pattern::parse("x_*f(y_)")
        .unwrap()
        .with_constraint("y", Constraint::builtin(Predicate::IsInteger, ["y"]).unwrap())
        .unwrap();
    let automaton = Automaton::from_patterns([&pattern]);
    assert_eq!(run(&automaton, "a*f(2)"), single(0, "{x: a, y: 2}"));
    assert_eq!(run(&automaton, "a*f(b)"), vec![]);
}

#[test]
fn test_global_constraints() {
    let pattern = Pattern::parse("f(x_, y_)")
        .unwrap()
        .with_global(Constraint::builtin(Predicate::NotEqual, ["x", "y"]).unwrap())
        .unwrap();
    let automaton = Automaton::from_patterns([&pattern]);
    assert_eq!(run(&automaton, "f(a, b)"), single(0, "{x: a, y: b}"));
    assert_eq!(run(&automaton, "f(a, a)"), vec![]);
}

#[test]
fn test_custom_constraints() {
    let is_a = Constraint::custom("checks::is_a", ["x"], |args| {
        args[0].as_single().is_some_and(|expr| expr.is_symbol_with("a", SymbolKind::Plain))
    });
    let pattern = Pattern::parse("f(x_)").unwrap().with_constraint("x", is_a).unwrap();
    let automaton = Automaton::from_patterns([&pattern]);
    assert_eq!(run(&automaton, "f(a)"), single(0, "{x: a}"));
    assert_eq!(run(&automaton, "f(b)"), vec![]);
}

#[test]
fn test_repeated_runs_are_identical() {
    let automaton = build(&["x_ + y_ + Optional(w_, 0)", "x__*y_", "f(x__, y___)"]);
    for subject in ["a + b + c", "a*b*c", "f(a, b, c)"] {
        assert_eq!(run(&automaton, subject), run(&automaton, subject));
    }
}
