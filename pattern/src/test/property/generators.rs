//! Generators for property-based testing.
//!
//! Patterns are produced by abstracting random subexpressions of a random subject into fixed
//! wildcards, which yields a pattern together with a substitution known to match.

use std::sync::Arc;

use matchgen_expr::Expr;
use matchgen_expr::test::property::generators::arb_expr;
use matchgen_runtime::{Binding, Substitution};
use proptest::prelude::*;

use crate::pattern::{PatternExpr, Wildcard};

/// `(subject, pattern, expected substitution)` with `pattern` matching `subject` via the expected
/// substitution.
pub fn arb_abstraction(depth: u32) -> impl Strategy<Value = (Arc<Expr>, PatternExpr, Substitution)> {
    arb_expr(depth)
        .prop_flat_map(|expr| {
            let size = expr.size();
            (Just(expr), prop::collection::vec(prop::bool::weighted(0.3), size))
        })
        .prop_map(|(expr, mask)| {
            let (pattern, subst) = abstract_expr(&expr, &mask);
            (expr, pattern, subst)
        })
}

/// Replace the subexpressions at preorder positions set in `mask` by wildcards named `v{position}`.
pub fn abstract_expr(expr: &Arc<Expr>, mask: &[bool]) -> (PatternExpr, Substitution) {
    let mut subst = Substitution::new();
    let mut position = 0;
    let pattern = abstract_node(expr, mask, &mut position, &mut subst);
    (pattern, subst)
}

fn abstract_node(expr: &Arc<Expr>, mask: &[bool], position: &mut usize, subst: &mut Substitution) -> PatternExpr {
    let here = *position;
    if mask.get(here).copied().unwrap_or(false) {
        *position += expr.size();
        let name = format!("v{here}");
        subst.try_bind(&name, Binding::Single(expr.clone()));
        return PatternExpr::Wildcard(Wildcard::fixed(Some(&name)));
    }
    *position += 1;
    match expr.head() {
        Some(head) => {
            let args: Vec<PatternExpr> =
                expr.args().iter().map(|arg| abstract_node(arg, mask, position, subst)).collect();
            PatternExpr::operation(head.clone(), args)
        }
        None => PatternExpr::Atom(expr.clone()),
    }
}

pub fn arb_wildcard() -> impl Strategy<Value = Wildcard> {
    let name = prop::option::of(prop::sample::select(&["x", "y", "z"][..]));
    prop_oneof![
        name.clone().prop_map(Wildcard::fixed),
        (name.clone(), 0usize..=2).prop_map(|(name, min)| Wildcard::sequence(name, min)),
        name.prop_map(|name| Wildcard::optional(name, Expr::integer(0))),
    ]
}
