//! Commutative and associative-commutative argument matching.
//!
//! A commutative pattern is a multiset of operand patterns plus sequence variables. Operand patterns
//! are matched one subject argument at a time by an [`OperandMatcher`] (the compiled sub-automaton);
//! the results form a bipartite graph between operand slots and arguments, every complete matching
//! of which is a candidate assignment. Arguments left over by an assignment are distributed among
//! the sequence variables.

use std::collections::BTreeMap;
use std::sync::Arc;

use matchgen_expr::{Expr, Head};
use tracing::trace;

use crate::bipartite::BipartiteGraph;
use crate::partition::{SequenceVariable, sequence_partitions};
use crate::substitution::{Binding, Substitution};

/// Arguments of one commutative pattern.
///
/// `operands` are operand pattern indices of the owning [`OperandMatcher`], sorted so that
/// repeated operand patterns are adjacent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct CommutativePattern {
    pub operands: Vec<usize>,
    pub sequence_vars: Vec<SequenceVariable>,
}

/// Matcher for the arguments of one commutative operation type.
pub trait OperandMatcher {
    /// Head of the operation whose arguments are matched.
    fn head(&self) -> &Head;

    /// Commutative patterns, addressed by index.
    fn patterns(&self) -> &[CommutativePattern];

    /// All `(operand pattern index, substitution)` matches of a single argument.
    fn match_operand(&self, operand: &Arc<Expr>) -> Vec<(usize, Substitution)>;
}

/// Match `args` against the commutative patterns listed in `wanted`.
///
/// Yields `(commutative pattern index, substitution)` for every distinct assignment, each
/// substitution extending `subst`. Results are ordered by `wanted`, then by assignment.
pub fn match_commutative<M>(
    matcher: &M,
    args: &[Arc<Expr>],
    subst: &Substitution,
    wanted: &[usize],
) -> Vec<(usize, Substitution)>
where
    M: OperandMatcher + ?Sized,
{
    let mut subjects = args.to_vec();
    subjects.sort();

    let operand_matches: Vec<BTreeMap<usize, Vec<Substitution>>> = subjects
        .iter()
        .map(|subject| {
            let mut by_operand: BTreeMap<usize, Vec<Substitution>> = BTreeMap::new();
            for (operand, found) in matcher.match_operand(subject) {
                by_operand.entry(operand).or_default().push(found);
            }
            by_operand
        })
        .collect();

    let mut results = Vec::new();
    for &index in wanted {
        let Some(pattern) = matcher.patterns().get(index) else { continue };
        let before = results.len();
        match_pattern(matcher.head(), index, pattern, &subjects, &operand_matches, subst, &mut results);
        trace!(head = matcher.head().name(), pattern = index, found = results.len() - before, "commutative match");
    }
    results
}

fn match_pattern(
    head: &Head,
    index: usize,
    pattern: &CommutativePattern,
    subjects: &[Arc<Expr>],
    operand_matches: &[BTreeMap<usize, Vec<Substitution>>],
    subst: &Substitution,
    results: &mut Vec<(usize, Substitution)>,
) {
    let slots = &pattern.operands;
    if slots.len() > subjects.len() {
        return;
    }

    let mut graph: BipartiteGraph<&[Substitution]> = BipartiteGraph::new(slots.len(), subjects.len());
    for (slot, operand) in slots.iter().enumerate() {
        for (subject, matches) in operand_matches.iter().enumerate() {
            if let Some(found) = matches.get(operand) {
                graph.add_edge(slot, subject, found.as_slice());
            }
        }
    }
    if graph.maximum_matching_size() < slots.len() {
        return;
    }

    let matchings = graph.complete_matchings(|a, b| slots[a] == slots[b], |a, b| subjects[a] == subjects[b]);
    for assignment in matchings {
        let mut partials = vec![subst.clone()];
        for (slot, &subject) in assignment.iter().enumerate() {
            let Some(found) = graph.edge(slot, subject) else {
                partials.clear();
                break;
            };
            partials = partials.iter().flat_map(|partial| found.iter().filter_map(|s| partial.union(s))).collect();
            if partials.is_empty() {
                break;
            }
        }
        if partials.is_empty() {
            continue;
        }

        let leftover: Vec<Arc<Expr>> = subjects
            .iter()
            .enumerate()
            .filter(|(i, _)| !assignment.contains(i))
            .map(|(_, subject)| subject.clone())
            .collect();

        for partition in sequence_partitions(&leftover, &pattern.sequence_vars) {
            for partial in &partials {
                if let Some(bound) = bind_sequence_vars(head, partial, &pattern.sequence_vars, &partition) {
                    results.push((index, bound));
                }
            }
        }
    }
}

fn bind_sequence_vars(
    head: &Head,
    subst: &Substitution,
    variables: &[SequenceVariable],
    partition: &[Vec<Arc<Expr>>],
) -> Option<Substitution> {
    let mut bound = subst.clone();
    for (variable, run) in variables.iter().zip(partition) {
        let Some(name) = &variable.name else { continue };
        let binding = match (&variable.default, run.as_slice()) {
            (Some(default), []) => Binding::Single(default.clone()),
            (_, run) if (variable.wrap || variable.fixed) && !run.is_empty() => match run {
                [single] => Binding::Single(single.clone()),
                _ => Binding::Single(Expr::rewrap(head, run)),
            },
            (_, run) => Binding::sequence(run.iter().cloned()),
        };
        if !bound.try_bind(name, binding) {
            return None;
        }
    }
    Some(bound)
}
