use std::sync::Arc;

use matchgen_expr::{Expr, Head};

use crate::{Binding, CommutativePattern, OperandMatcher, SequenceVariable, Substitution, match_commutative};

/// Operand 0 is the literal `x`, operand 1 binds anything to `i1`, operand 2 binds integers to `i2`.
struct ToyMatcher {
    patterns: Vec<CommutativePattern>,
}

impl OperandMatcher for ToyMatcher {
    fn head(&self) -> &Head {
        static ADD: Head = Head::ADD;
        &ADD
    }

    fn patterns(&self) -> &[CommutativePattern] {
        &self.patterns
    }

    fn match_operand(&self, operand: &Arc<Expr>) -> Vec<(usize, Substitution)> {
        let mut found = Vec::new();
        if **operand == *Expr::symbol("x") {
            found.push((0, Substitution::new()));
        }
        found.push((1, Substitution::new().extended("i1", Binding::Single(operand.clone())).unwrap()));
        if operand.as_integer().is_some() {
            found.push((2, Substitution::new().extended("i2", Binding::Single(operand.clone())).unwrap()));
        }
        found
    }
}

fn rest(name: &str, min_count: usize) -> SequenceVariable {
    SequenceVariable { name: Some(name.to_owned()), count: 1, min_count, default: None, fixed: false, wrap: true }
}

fn args(exprs: &[Arc<Expr>]) -> Vec<Arc<Expr>> {
    exprs.to_vec()
}

#[test]
fn test_literal_plus_wildcard() {
    let matcher = ToyMatcher { patterns: vec![CommutativePattern { operands: vec![0, 1], sequence_vars: vec![] }] };
    let subject = args(&[Expr::symbol("y"), Expr::symbol("x")]);
    let results = match_commutative(&matcher, &subject, &Substitution::new(), &[0]);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].1.single("i1"), Some(&Expr::symbol("y")));
}

#[test]
fn test_two_wildcards_enumerate_both_pairings() {
    let matcher = ToyMatcher { patterns: vec![CommutativePattern { operands: vec![1, 2], sequence_vars: vec![] }] };
    let subject = args(&[Expr::integer(1), Expr::integer(2)]);
    let results = match_commutative(&matcher, &subject, &Substitution::new(), &[0]);
    assert_eq!(results.len(), 2);
}

#[test]
fn test_leftovers_wrapped_into_sequence_variable() {
    let matcher =
        ToyMatcher { patterns: vec![CommutativePattern { operands: vec![0], sequence_vars: vec![rest("w", 1)] }] };
    let subject = args(&[Expr::symbol("x"), Expr::symbol("a"), Expr::symbol("b")]);
    let results = match_commutative(&matcher, &subject, &Substitution::new(), &[0]);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].1.single("w"), Some(&Expr::add([Expr::symbol("a"), Expr::symbol("b")])));

    let single_leftover = args(&[Expr::symbol("x"), Expr::integer(3)]);
    let results = match_commutative(&matcher, &single_leftover, &Substitution::new(), &[0]);
    assert_eq!(results[0].1.single("w"), Some(&Expr::integer(3)));
}

#[test]
fn test_default_bound_when_nothing_is_left() {
    let optional = SequenceVariable { default: Some(Expr::integer(0)), ..rest("w", 1) };
    let matcher =
        ToyMatcher { patterns: vec![CommutativePattern { operands: vec![0, 1], sequence_vars: vec![optional] }] };
    let subject = args(&[Expr::symbol("x"), Expr::symbol("y")]);
    let results = match_commutative(&matcher, &subject, &Substitution::new(), &[0]);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].1.single("w"), Some(&Expr::integer(0)));
    assert_eq!(results[0].1.single("i1"), Some(&Expr::symbol("y")));
}

#[test]
fn test_existing_bindings_constrain_assignment() {
    let matcher =
        ToyMatcher { patterns: vec![CommutativePattern { operands: vec![1], sequence_vars: vec![rest("w", 1)] }] };
    let bound = Substitution::new().extended("i1", Binding::Single(Expr::symbol("b"))).unwrap();
    let subject = args(&[Expr::symbol("a"), Expr::symbol("b")]);
    let results = match_commutative(&matcher, &subject, &bound, &[0]);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].1.single("w"), Some(&Expr::symbol("a")));
}

#[test]
fn test_identical_arguments_do_not_duplicate_results() {
    let matcher =
        ToyMatcher { patterns: vec![CommutativePattern { operands: vec![1], sequence_vars: vec![rest("w", 1)] }] };
    let subject = args(&[Expr::symbol("a"), Expr::symbol("a")]);
    let results = match_commutative(&matcher, &subject, &Substitution::new(), &[0]);
    assert_eq!(results.len(), 1);
}

#[test]
fn test_unwanted_and_unknown_patterns_skipped() {
    let matcher = ToyMatcher { patterns: vec![CommutativePattern { operands: vec![0], sequence_vars: vec![] }] };
    let subject = args(&[Expr::symbol("x")]);
    assert!(match_commutative(&matcher, &subject, &Substitution::new(), &[]).is_empty());
    assert!(match_commutative(&matcher, &subject, &Substitution::new(), &[7]).is_empty());
    assert_eq!(match_commutative(&matcher, &subject, &Substitution::new(), &[0]).len(), 1);
}

#[test]
fn test_too_few_arguments() {
    let matcher = ToyMatcher { patterns: vec![CommutativePattern { operands: vec![1, 1], sequence_vars: vec![] }] };
    let subject = args(&[Expr::symbol("a")]);
    assert!(match_commutative(&matcher, &subject, &Substitution::new(), &[0]).is_empty());
}
