//! In-process execution of an automaton.
//!
//! The interpreter walks the automaton exactly like a generated matcher does: depth-first over
//! transitions in insertion order, restoring the subject queue through guards, extending the
//! substitution only at binding points and narrowing the active pattern set when a constraint
//! fails. Generated code and the interpreter therefore yield the same results in the same order.

use std::sync::Arc;

use matchgen_expr::{Expr, Head};
use matchgen_runtime::{Binding, PatternSet, Subjects, Substitution, match_commutative};
use smallvec::SmallVec;
use tracing::trace;

use crate::automaton::{Automaton, Label, State, StateId, Transition};

impl Automaton {
    /// Every `(pattern index, substitution)` match of `subject`.
    ///
    /// Substitutions use the declared variable names of the pattern.
    pub fn match_expr(&self, subject: &Arc<Expr>) -> std::vec::IntoIter<(usize, Substitution)> {
        let mut run = Run { automaton: self, results: Vec::new() };
        let mut subjects = Subjects::new(subject.clone());
        let active = PatternSet::full(self.pattern_count);
        run.visit(StateId::ROOT, &mut subjects, &Substitution::new(), &active);
        run.results.into_iter()
    }
}

struct Run<'a> {
    automaton: &'a Automaton,
    results: Vec<(usize, Substitution)>,
}

impl Run<'_> {
    fn visit(&mut self, id: StateId, subjects: &mut Subjects, subst: &Substitution, active: &PatternSet) {
        let automaton = self.automaton;
        match automaton.state(id) {
            State::Branch { transitions } => {
                for transition in transitions {
                    if active.intersects_any(&transition.patterns) {
                        self.take(transition, subjects, subst, active);
                    }
                }
            }
            State::Accept { markers } => {
                if !subjects.is_exhausted() {
                    return;
                }
                for marker in markers {
                    let globals = marker.globals.iter().all(|&c| automaton.registry.get(c).evaluate(subst));
                    if active.contains(marker.pattern) && globals {
                        trace!(pattern = marker.pattern, state = %id, "accept");
                        self.results.push((marker.pattern, subst.renamed(&marker.renaming_pairs())));
                    }
                }
            }
            State::Commutative { .. } => unreachable!("commutative state {id} entered without its operation"),
        }
    }

    fn take(&mut self, transition: &Transition, subjects: &mut Subjects, subst: &Substitution, active: &PatternSet) {
        match &transition.label {
            Label::Open(head) => {
                if let Some(mut entered) = subjects.enter(head) {
                    self.proceed(transition, &mut entered, subst, active);
                }
            }
            Label::Close => {
                if let Some(mut closed) = subjects.close() {
                    self.proceed(transition, &mut closed, subst, active);
                }
            }
            Label::Atom(expected) => {
                if let Some(mut taken) = subjects.take_if(|expr| expr == expected.as_ref()) {
                    self.proceed(transition, &mut taken, subst, active);
                }
            }
            Label::Wildcard { symbol_kind, default } => {
                if let Some(default) = default {
                    self.bind(transition, subjects, subst, active, Binding::Single(default.clone()));
                }
                let admits = |expr: &Expr| symbol_kind.is_none_or(|kind| expr.is_symbol_of(kind));
                if let Some(mut taken) = subjects.take_if(admits) {
                    let value = taken.item().clone();
                    self.bind(transition, &mut taken, subst, active, Binding::Single(value));
                }
            }
            Label::Sequence { min_count, wrap, default } => {
                let mut floor = *min_count;
                if let Some(default) = default {
                    self.bind(transition, subjects, subst, active, Binding::Single(default.clone()));
                    floor = floor.max(1);
                }
                let Some(mut run) = subjects.take_sequence(floor) else { return };
                loop {
                    let binding = run.binding(wrap.as_ref());
                    self.bind(transition, &mut run, subst, active, binding);
                    if !run.grow() {
                        break;
                    }
                }
            }
            Label::Commutative(head) => self.commutative(transition, head, subjects, subst, active),
            Label::Operands(_) => unreachable!("operand branches are taken from commutative states"),
        }
    }

    fn commutative(
        &mut self,
        transition: &Transition,
        head: &Head,
        subjects: &mut Subjects,
        subst: &Substitution,
        active: &PatternSet,
    ) {
        let automaton = self.automaton;
        let State::Commutative { matcher, branches } = automaton.state(transition.target) else {
            unreachable!("commutative transition to {} without a matcher", transition.target)
        };

        let wanted: SmallVec<[usize; 4]> = branches
            .iter()
            .filter(|branch| active.intersects_any(&branch.patterns))
            .filter_map(|branch| match branch.label {
                Label::Operands(pattern) => Some(pattern),
                _ => None,
            })
            .collect();
        if wanted.is_empty() {
            return;
        }

        let Some(mut taken) = subjects.take_if(|expr| expr.is_operation(head)) else { return };
        let operation = taken.item().clone();
        for (pattern, found) in match_commutative(automaton.matcher(*matcher), operation.args(), subst, &wanted) {
            if let Some(branch) = branches.iter().find(|branch| branch.label == Label::Operands(pattern)) {
                self.proceed(branch, &mut taken, &found, active);
            }
        }
    }

    fn bind(
        &mut self,
        transition: &Transition,
        subjects: &mut Subjects,
        subst: &Substitution,
        active: &PatternSet,
        binding: Binding,
    ) {
        match &transition.variable {
            Some(name) => {
                if let Some(extended) = subst.extended(name, binding) {
                    self.proceed(transition, subjects, &extended, active);
                }
            }
            None => self.proceed(transition, subjects, subst, active),
        }
    }

    /// Check the transition's constraints, then continue in its target unless every pattern using
    /// it has been refuted.
    fn proceed(&mut self, transition: &Transition, subjects: &mut Subjects, subst: &Substitution, active: &PatternSet) {
        let automaton = self.automaton;
        let registry = &automaton.registry;
        let mut narrowed: Option<PatternSet> = None;
        for &id in &transition.constraints {
            if !registry.get(id).evaluate(subst) {
                let set = narrowed.get_or_insert_with(|| active.clone());
                for &owner in registry.owners(id) {
                    set.remove(owner);
                }
            }
        }

        let active = narrowed.as_ref().unwrap_or(active);
        if active.intersects_any(&transition.patterns) {
            self.visit(transition.target, subjects, subst, active);
        }
    }
}
