use matchgen_expr::{Expr, Head, OpKind, SymbolKind};
use matchgen_pattern::{Constraint, ConstraintId, Pattern};
use matchgen_runtime::Predicate;

use crate::test::helpers::{accept_states, binding_transition, build};
use crate::{Automaton, Label, State, StateId};

#[test]
fn test_empty_automaton() {
    let automaton = Automaton::new();
    assert_eq!(automaton.state_count(), 1);
    assert_eq!(automaton.pattern_count(), 0);
    assert!(automaton.state(StateId::ROOT).transitions().is_empty());
}

#[test]
fn test_renamed_patterns_share_every_state() {
    let automaton = build(&["Pow(x_, y_)", "Pow(a_, b_)"]);
    assert_eq!(automaton.pattern_count(), 2);
    assert_eq!(automaton.state_count(), 5);
    assert_eq!(automaton.transition_count(), 4);

    let accepts = accept_states(&automaton);
    let [State::Accept { markers }] = accepts.as_slice() else { panic!("expected one accepting state") };
    assert_eq!(markers.len(), 2);
    assert_eq!(markers[0].pattern, 0);
    assert_eq!(markers[0].renaming, [("x".to_owned(), "i0".to_owned()), ("y".to_owned(), "i1".to_owned())]);
    assert_eq!(markers[1].renaming, [("a".to_owned(), "i0".to_owned()), ("b".to_owned(), "i1".to_owned())]);
}

#[test]
fn test_patterns_diverge_after_common_prefix() {
    let automaton = build(&["Pow(x_, 2)", "Pow(x_, 3)"]);
    assert_eq!(automaton.state_count(), 7);
    assert_eq!(automaton.transition_count(), 6);
    assert_eq!(accept_states(&automaton).len(), 2);

    let shared = binding_transition(&automaton, "i0");
    assert_eq!(shared.patterns, [0, 1]);
    assert_eq!(automaton.state(shared.target).transitions().len(), 2);
}

#[test]
fn test_transitions_keep_insertion_order() {
    let automaton = build(&["f(a)", "f(x_)", "f(b)"]);
    let open = &automaton.state(StateId::ROOT).transitions()[0];
    let labels: Vec<String> =
        automaton.state(open.target).transitions().iter().map(|t| t.label.to_string()).collect();
    assert_eq!(labels, ["a", "_", "b"]);
}

#[test]
fn test_root_variable_is_named_i() {
    let automaton = build(&["x_"]);
    let transition = binding_transition(&automaton, "i");
    assert_eq!(transition.label, Label::Wildcard { symbol_kind: None, default: None });
}

#[test]
fn test_wildcard_labels() {
    let automaton = build(&["f(x__, y___, Sym(s_, Dummy), Optional(o_, 1))"]);

    let label = |variable: &str| binding_transition(&automaton, variable).label.clone();
    assert_eq!(label("i0"), Label::Sequence { min_count: 1, wrap: None, default: None });
    assert_eq!(label("i1"), Label::Sequence { min_count: 0, wrap: None, default: None });
    assert_eq!(label("i2"), Label::Wildcard { symbol_kind: Some(SymbolKind::Dummy), default: None });
    assert_eq!(label("i3"), Label::Wildcard { symbol_kind: None, default: Some(Expr::integer(1)) });

    let h = Head::new("h", OpKind::Associative);
    let automaton = build(&["Assoc::h(z_, c)"]);
    let wrapped = automaton
        .states()
        .flat_map(|(_, state)| state.transitions())
        .find(|t| matches!(&t.label, Label::Sequence { wrap: Some(head), .. } if *head == h));
    assert!(wrapped.is_some(), "fixed wildcard under associative head should be a wrapping sequence");

    let automaton = build(&["Assoc::h(z__, c)"]);
    let expected = Label::Sequence { min_count: 1, wrap: Some(h), default: None };
    assert_eq!(binding_transition(&automaton, "i0").label, expected);
}

#[test]
fn test_constraints_scheduled_when_last_variable_is_bound() {
    let pattern = Pattern::parse("f(x_, y_)")
        .unwrap()
        .with_constraint("x", Constraint::builtin(Predicate::IsInteger, ["x"]).unwrap())
        .unwrap()
        .with_constraint("y", Constraint::builtin(Predicate::FreeOf, ["y", "x"]).unwrap())
        .unwrap();
    let automaton = Automaton::from_patterns([&pattern]);

    assert_eq!(automaton.registry().len(), 2);
    assert_eq!(binding_transition(&automaton, "i0").constraints, [ConstraintId(0)]);
    assert_eq!(binding_transition(&automaton, "i1").constraints, [ConstraintId(1)]);
    assert_eq!(automaton.registry().get(ConstraintId(1)).to_string(), "FreeOf(i1, i0)");
}

#[test]
fn test_shared_constraint_is_registered_once() {
    let integer = |name: &str| Constraint::builtin(Predicate::IsInteger, [name]).unwrap();
    let first = Pattern::parse("Pow(x_, 2)").unwrap().with_constraint("x", integer("x")).unwrap();
    let second = Pattern::parse("Pow(y_, 3)").unwrap().with_constraint("y", integer("y")).unwrap();
    let automaton = Automaton::from_patterns([&first, &second]);

    assert_eq!(automaton.registry().len(), 1);
    assert_eq!(automaton.registry().owners(ConstraintId(0)).len(), 2);
    assert_eq!(binding_transition(&automaton, "i0").constraints, [ConstraintId(0)]);
}

#[test]
fn test_global_constraints_go_to_markers() {
    let pattern = Pattern::parse("f(x_, y_)")
        .unwrap()
        .with_global(Constraint::builtin(Predicate::NotEqual, ["x", "y"]).unwrap())
        .unwrap();
    let automaton = Automaton::from_patterns([&pattern]);

    assert!(automaton.states().all(|(_, state)| state.transitions().iter().all(|t| t.constraints.is_empty())));
    let accepts = accept_states(&automaton);
    let [State::Accept { markers }] = accepts.as_slice() else { panic!("expected one accepting state") };
    assert_eq!(markers[0].globals, [ConstraintId(0)]);
}

#[test]
fn test_display_lists_states() {
    let automaton = build(&["Pow(x_, 2)"]);
    let printed = automaton.to_string();
    assert!(printed.starts_with("s0:\n  Pow( -> s1\n"), "{printed}");
    assert!(printed.contains("_ as i0 -> s2"), "{printed}");
    assert!(printed.contains("accept [0]"), "{printed}");
}

#[test]
fn test_automaton_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Automaton>();
}
