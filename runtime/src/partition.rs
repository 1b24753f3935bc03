//! Distribution of leftover commutative arguments over sequence variables.

use std::sync::Arc;

use itertools::Itertools;
use matchgen_expr::Expr;

/// Sequence variable of a commutative pattern.
///
/// `count` is the number of times the variable occurs among the operands: it receives one multiset
/// that must be present `count` times in the leftovers. `fixed` variables (optional fixed
/// wildcards) take at most one argument; `wrap` variables are re-wrapped into the commutative
/// head.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SequenceVariable {
    pub name: Option<String>,
    pub count: usize,
    pub min_count: usize,
    pub default: Option<Arc<Expr>>,
    pub fixed: bool,
    pub wrap: bool,
}

impl SequenceVariable {
    fn admits(&self, size: usize) -> bool {
        let floor = size >= self.min_count || (size == 0 && self.default.is_some());
        floor && (!self.fixed || size <= 1)
    }
}

/// Every way to split `leftover` among `variables`.
///
/// Each partition holds one sorted multiset per variable, in variable order; the multiset of
/// variable `i` is removed `variables[i].count` times from `leftover`. Without variables the only
/// partition is the empty one, and only when nothing is left over.
pub fn sequence_partitions(leftover: &[Arc<Expr>], variables: &[SequenceVariable]) -> Vec<Vec<Vec<Arc<Expr>>>> {
    let mut sorted = leftover.to_vec();
    sorted.sort();
    let distinct: Vec<(Arc<Expr>, usize)> =
        sorted.into_iter().dedup_with_count().map(|(count, expr)| (expr, count)).collect();
    let mut remaining: Vec<usize> = distinct.iter().map(|(_, count)| *count).collect();

    let mut out = Vec::new();
    let mut current = Vec::with_capacity(variables.len());
    assign(&distinct, &mut remaining, variables, &mut current, &mut out);
    out
}

fn assign(
    distinct: &[(Arc<Expr>, usize)],
    remaining: &mut [usize],
    variables: &[SequenceVariable],
    current: &mut Vec<Vec<Arc<Expr>>>,
    out: &mut Vec<Vec<Vec<Arc<Expr>>>>,
) {
    let Some((variable, rest)) = variables.split_first() else {
        if remaining.iter().all(|&count| count == 0) {
            out.push(current.clone());
        }
        return;
    };

    let mut takes = vec![0usize; distinct.len()];
    let mut visit = |takes: &[usize], remaining: &mut [usize]| {
        let multiset: Vec<Arc<Expr>> = distinct
            .iter()
            .zip(takes)
            .flat_map(|((expr, _), &take)| std::iter::repeat_n(expr.clone(), take))
            .collect();
        current.push(multiset);
        assign(distinct, remaining, rest, current, out);
        current.pop();
    };
    choose(distinct, remaining, variable, rest.is_empty(), 0, &mut takes, &mut visit);
}

/// Enumerate how many copies of each distinct argument `variable` takes.
///
/// The last variable must take everything that is left.
fn choose(
    distinct: &[(Arc<Expr>, usize)],
    remaining: &mut [usize],
    variable: &SequenceVariable,
    last: bool,
    index: usize,
    takes: &mut Vec<usize>,
    visit: &mut dyn FnMut(&[usize], &mut [usize]),
) {
    if index == distinct.len() {
        if variable.admits(takes.iter().sum()) {
            visit(takes, remaining);
        }
        return;
    }

    let count = variable.count.max(1);
    let available = remaining[index] / count;
    let options: Vec<usize> = if last {
        if remaining[index] % count != 0 {
            return;
        }
        vec![available]
    } else {
        (0..=available).collect()
    };

    for take in options {
        takes[index] = take;
        remaining[index] -= take * count;
        choose(distinct, remaining, variable, last, index + 1, takes, visit);
        remaining[index] += take * count;
    }
    takes[index] = 0;
}
