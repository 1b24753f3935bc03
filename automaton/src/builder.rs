//! Incremental construction of the shared automaton.
//!
//! Every pattern is renamed to automaton-local variable names (`i` followed by the dotted argument
//! path of the variable's first occurrence), turned into a sequence of [`Step`]s and threaded
//! through the graph from the root. A step reuses an outgoing transition with the same label and
//! variable, which is how patterns with a common prefix share states.
//!
//! Operations with commutative heads are not expanded positionally. Their arguments are registered
//! as a commutative pattern with the automaton's sub-matcher for that head, and the pattern's step
//! sequence gets an opaque [`Label::Commutative`] step followed by a [`Label::Operands`] branch.

use std::collections::{BTreeMap, BTreeSet};

use itertools::Itertools;
use matchgen_expr::Head;
use matchgen_pattern::{Constraint, ConstraintId, Pattern, PatternExpr, Wildcard};
use matchgen_runtime::{CommutativePattern, SequenceVariable};
use tracing::{debug, trace};

use crate::automaton::{Automaton, FinalMarker, Label, OperandPattern, State, StateId, SubMatcher, Transition};

/// A pattern ready for insertion, its variables already automaton-local.
struct Entry {
    index: usize,
    expression: PatternExpr,
    /// `(declared, local)`.
    renaming: Vec<(String, String)>,
    locals: Vec<Constraint>,
    globals: Vec<Constraint>,
}

/// One transition of a pattern's sequence.
struct Step {
    label: Label,
    variable: Option<String>,
    /// Variables bound once the step has been taken.
    binds: Vec<String>,
}

impl Step {
    fn unbound(label: Label) -> Self {
        Self { label, variable: None, binds: Vec::new() }
    }
}

impl Automaton {
    /// Build an automaton from `patterns`; pattern indices follow iteration order.
    pub fn from_patterns<'a>(patterns: impl IntoIterator<Item = &'a Pattern>) -> Self {
        let mut automaton = Self::new();
        for pattern in patterns {
            automaton.add(pattern);
        }
        automaton
    }

    /// Add `pattern` and return its index.
    pub fn add(&mut self, pattern: &Pattern) -> usize {
        let index = self.pattern_count;
        let names = positional_names(pattern.expression());
        let local = |name: &str| names.get(name).cloned().unwrap_or_else(|| name.to_owned());

        self.insert(Entry {
            index,
            expression: pattern.expression().map_variables(&local),
            renaming: names.iter().map(|(declared, local)| (declared.clone(), local.clone())).collect(),
            locals: pattern.constraints().iter().map(|c| c.renamed(&names)).collect(),
            globals: pattern.global_constraints().iter().map(|c| c.renamed(&names)).collect(),
        });
        index
    }

    fn insert(&mut self, entry: Entry) {
        let Entry { index, expression, renaming, locals, globals } = entry;
        self.pattern_count = self.pattern_count.max(index + 1);

        let steps = self.steps(&expression, &locals);
        let step_count = steps.len();
        let locals: BTreeSet<ConstraintId> = locals.into_iter().map(|c| self.registry.register(c, index)).collect();
        let globals: Vec<ConstraintId> =
            globals.into_iter().map(|c| self.registry.register(c, index)).unique().collect();

        let mut state = StateId::ROOT;
        let mut bound: BTreeSet<String> = BTreeSet::new();
        let mut scheduled: BTreeSet<ConstraintId> = BTreeSet::new();
        let mut created = 0;

        for step in steps {
            let mut ready = Vec::new();
            for name in &step.binds {
                if bound.insert(name.clone()) {
                    ready.extend(self.registry.candidates(name).filter(|id| locals.contains(id)));
                }
            }
            ready.sort_unstable();
            ready.dedup();
            ready.retain(|&id| {
                self.registry.get(id).variables().iter().all(|name| bound.contains(name)) && scheduled.insert(id)
            });

            let (position, fresh) = self.transition(state, step.label, step.variable);
            created += usize::from(fresh);

            let transition = &mut self.transitions_mut(state)[position];
            if let Err(at) = transition.patterns.binary_search(&index) {
                transition.patterns.insert(at, index);
            }
            for id in ready {
                if !transition.constraints.contains(&id) {
                    transition.constraints.push(id);
                }
            }
            transition.constraints.sort_unstable();
            state = transition.target;
        }

        let marker = FinalMarker { pattern: index, renaming, globals };
        match &mut self.states[state.0] {
            State::Accept { markers } => markers.push(marker),
            slot => {
                if !slot.transitions().is_empty() {
                    unreachable!("pattern {index} ends in a state with successors");
                }
                *slot = State::Accept { markers: vec![marker] };
            }
        }

        debug!(
            pattern = index,
            steps = step_count,
            created,
            shared = step_count - created,
            states = self.states.len(),
            "pattern added"
        );
    }

    /// Position of the transition out of `from` with this label and variable, creating it (and its
    /// target state) when missing. The flag tells whether it was created.
    fn transition(&mut self, from: StateId, label: Label, variable: Option<String>) -> (usize, bool) {
        let existing =
            self.states[from.0].transitions().iter().position(|t| t.label == label && t.variable == variable);
        if let Some(position) = existing {
            return (position, false);
        }

        let target = StateId(self.states.len());
        let state = match &label {
            Label::Commutative(head) => State::Commutative { matcher: self.matcher_for(head), branches: Vec::new() },
            _ => State::Branch { transitions: Vec::new() },
        };
        self.states.push(state);

        let transitions = self.transitions_mut(from);
        transitions.push(Transition { label, variable, target, patterns: Vec::new(), constraints: Vec::new() });
        (transitions.len() - 1, true)
    }

    fn transitions_mut(&mut self, id: StateId) -> &mut Vec<Transition> {
        match &mut self.states[id.0] {
            State::Branch { transitions } => transitions,
            State::Commutative { branches, .. } => branches,
            State::Accept { .. } => unreachable!("accepting state {id} has no successors"),
        }
    }

    fn matcher_for(&mut self, head: &Head) -> usize {
        match self.matchers.iter().position(|matcher| matcher.head == *head) {
            Some(index) => index,
            None => {
                self.matchers.push(SubMatcher::new(head.clone()));
                self.matchers.len() - 1
            }
        }
    }

    fn steps(&mut self, expression: &PatternExpr, constraints: &[Constraint]) -> Vec<Step> {
        let mut steps = Vec::new();
        self.collect_steps(expression, None, constraints, &mut steps);
        steps
    }

    fn collect_steps(
        &mut self,
        expression: &PatternExpr,
        parent: Option<&Head>,
        constraints: &[Constraint],
        steps: &mut Vec<Step>,
    ) {
        match expression {
            PatternExpr::Atom(atom) => steps.push(Step::unbound(Label::Atom(atom.clone()))),
            PatternExpr::Wildcard(wildcard) => steps.push(wildcard_step(wildcard, parent)),
            PatternExpr::Operation { head, args } if head.is_commutative() => {
                let matcher = self.matcher_for(head);
                let pattern = self.register_commutative(matcher, args, constraints);
                steps.push(Step::unbound(Label::Commutative(head.clone())));
                steps.push(Step { label: Label::Operands(pattern), variable: None, binds: variables(expression) });
            }
            PatternExpr::Operation { head, args } => {
                steps.push(Step::unbound(Label::Open(head.clone())));
                for arg in args {
                    self.collect_steps(arg, Some(head), constraints, steps);
                }
                steps.push(Step::unbound(Label::Close));
            }
        }
    }

    /// Register the arguments of one commutative operation with sub-matcher `matcher`.
    ///
    /// Wildcards that can take a variable number of arguments become sequence variables; every
    /// other argument becomes an operand pattern, together with the constraints that only mention
    /// its variables so they are checked while matching the operand.
    fn register_commutative(&mut self, matcher: usize, args: &[PatternExpr], constraints: &[Constraint]) -> usize {
        let head = self.matchers[matcher].head.clone();
        let mut operands = Vec::new();
        let mut sequence_vars: Vec<SequenceVariable> = Vec::new();

        for arg in args {
            if let PatternExpr::Wildcard(wildcard) = arg
                && let Some(variable) = sequence_variable(&head, wildcard)
            {
                let same = |known: &SequenceVariable| {
                    known.name.is_some() && SequenceVariable { count: known.count, ..variable.clone() } == *known
                };
                let repeated = sequence_vars.iter_mut().find(|known| same(known));
                match repeated {
                    Some(known) => known.count += 1,
                    None => sequence_vars.push(variable),
                }
                continue;
            }

            let names = variables(arg);
            let local = constraints
                .iter()
                .filter(|c| !c.variables().is_empty() && c.variables().iter().all(|name| names.contains(name)))
                .cloned()
                .collect();
            operands.push(self.matchers[matcher].operand(arg, local));
        }
        operands.sort_unstable();

        let pattern = CommutativePattern { operands, sequence_vars };
        let index = self.matchers[matcher].register(pattern);
        trace!(head = head.name(), matcher, pattern = index, "commutative pattern registered");
        index
    }
}

impl SubMatcher {
    /// Index of the operand pattern, adding it to the operand automaton when new.
    fn operand(&mut self, expression: &PatternExpr, constraints: Vec<Constraint>) -> usize {
        let pattern = OperandPattern { expression: expression.clone(), constraints };
        if let Some(index) = self.operands.iter().position(|known| *known == pattern) {
            return index;
        }

        let index = self.operands.len();
        let renaming = variables(expression).into_iter().map(|name| (name.clone(), name)).collect();
        self.automaton.insert(Entry {
            index,
            expression: pattern.expression.clone(),
            renaming,
            locals: pattern.constraints.clone(),
            globals: Vec::new(),
        });
        self.operands.push(pattern);
        index
    }

    fn register(&mut self, pattern: CommutativePattern) -> usize {
        match self.patterns.iter().position(|known| *known == pattern) {
            Some(index) => index,
            None => {
                self.patterns.push(pattern);
                self.patterns.len() - 1
            }
        }
    }
}

fn wildcard_step(wildcard: &Wildcard, parent: Option<&Head>) -> Step {
    let default = wildcard.default().cloned();
    let label = match parent {
        _ if wildcard.is_sequence() => {
            let wrap = parent.filter(|head| head.is_associative()).cloned();
            Label::Sequence { min_count: wildcard.min_count(), wrap, default }
        }
        Some(head) if head.is_associative() && wildcard.symbol_kind().is_none() => {
            Label::Sequence { min_count: 1, wrap: Some(head.clone()), default }
        }
        _ => Label::Wildcard { symbol_kind: wildcard.symbol_kind(), default },
    };
    let variable = wildcard.name().map(str::to_owned);
    Step { label, binds: variable.iter().cloned().collect(), variable }
}

/// The sequence variable a commutative argument turns into, if any.
///
/// Sequence wildcards keep their minimum; fixed wildcards under associative heads take one or more
/// arguments. Both are re-wrapped into associative heads. Optional fixed wildcards take at most one.
fn sequence_variable(head: &Head, wildcard: &Wildcard) -> Option<SequenceVariable> {
    let (min_count, fixed, wrap) = if wildcard.is_sequence() {
        (wildcard.min_count(), false, head.is_associative())
    } else if head.is_associative() && wildcard.symbol_kind().is_none() {
        (1, false, true)
    } else if wildcard.is_optional() {
        (1, true, false)
    } else {
        return None;
    };
    Some(SequenceVariable {
        name: wildcard.name().map(str::to_owned),
        count: 1,
        min_count,
        default: wildcard.default().cloned(),
        fixed,
        wrap,
    })
}

/// Named variables of `expression`, in order of first occurrence.
fn variables(expression: &PatternExpr) -> Vec<String> {
    expression.wildcards().into_iter().filter_map(Wildcard::name).unique().map(str::to_owned).collect()
}

/// Declared name to automaton-local name, derived from each variable's first position.
pub(crate) fn positional_names(expression: &PatternExpr) -> BTreeMap<String, String> {
    fn visit(expression: &PatternExpr, path: &mut Vec<usize>, names: &mut BTreeMap<String, String>) {
        match expression {
            PatternExpr::Atom(_) => {}
            PatternExpr::Wildcard(wildcard) => {
                if let Some(name) = wildcard.name() {
                    names.entry(name.to_owned()).or_insert_with(|| format!("i{}", path.iter().join(".")));
                }
            }
            PatternExpr::Operation { args, .. } => {
                for (position, arg) in args.iter().enumerate() {
                    path.push(position);
                    visit(arg, path, names);
                    path.pop();
                }
            }
        }
    }

    let mut names = BTreeMap::new();
    visit(expression, &mut Vec::new(), &mut names);
    names
}
