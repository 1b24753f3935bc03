//! Automaton data model.
//!
//! An [`Automaton`] is an arena of [`State`]s rooted at [`StateId::ROOT`]. Transitions carry a
//! closed [`Label`] describing what they consume from the subject, the automaton-local variable
//! they bind, the patterns that use them and the constraints that become checkable once they are
//! taken. Operations with commutative heads are matched by a [`SubMatcher`] that owns an automaton
//! of its own over single operands.

use std::fmt;
use std::sync::Arc;

use itertools::Itertools;
use matchgen_expr::{Expr, Head, SymbolKind};
use matchgen_pattern::{Constraint, ConstraintId, ConstraintRegistry, PatternExpr};
use matchgen_runtime::{CommutativePattern, OperandMatcher, Substitution};

/// Index of a state in its automaton.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
#[display("s{_0}")]
pub struct StateId(pub usize);

impl StateId {
    pub const ROOT: StateId = StateId(0);
}

/// What a transition consumes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Label {
    /// Enter an operation with this head; its arguments become the current level.
    Open(Head),
    /// Exactly this expression.
    Atom(Arc<Expr>),
    /// One expression, optionally restricted to symbols of a kind. With a default, the wildcard may
    /// also bind the default without consuming anything.
    Wildcard { symbol_kind: Option<SymbolKind>, default: Option<Arc<Expr>> },
    /// A run of at least `min_count` expressions. With `wrap`, the run is bound as one operation of
    /// that (associative) head.
    Sequence { min_count: usize, wrap: Option<Head>, default: Option<Arc<Expr>> },
    /// Leave the current operation once all of its arguments are consumed.
    Close,
    /// One operation with a commutative head, matched as a whole by the head's sub-matcher.
    Commutative(Head),
    /// Branch of a commutative state taken for results of this commutative pattern.
    Operands(usize),
}

impl Label {
    /// Value bound when the wildcard is skipped.
    pub fn default_value(&self) -> Option<&Arc<Expr>> {
        match self {
            Self::Wildcard { default, .. } | Self::Sequence { default, .. } => default.as_ref(),
            _ => None,
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open(head) => write!(f, "{}(", head.name()),
            Self::Atom(expr) => write!(f, "{expr}"),
            Self::Wildcard { symbol_kind, default } => {
                f.write_str("_")?;
                if let Some(kind) = symbol_kind {
                    write!(f, ":{kind}")?;
                }
                if let Some(default) = default {
                    write!(f, "={default}")?;
                }
                Ok(())
            }
            Self::Sequence { min_count, wrap, default } => {
                write!(f, "_{{{min_count},}}")?;
                if let Some(head) = wrap {
                    write!(f, "@{}", head.name())?;
                }
                if let Some(default) = default {
                    write!(f, "={default}")?;
                }
                Ok(())
            }
            Self::Close => f.write_str(")"),
            Self::Commutative(head) => write!(f, "{}{{..}}", head.name()),
            Self::Operands(index) => write!(f, "#{index}"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Transition {
    pub label: Label,
    pub variable: Option<String>,
    pub target: StateId,
    /// Patterns whose transition sequence uses this transition, ascending.
    pub patterns: Vec<usize>,
    /// Constraints checked right after taking the transition, in registration order.
    pub constraints: Vec<ConstraintId>,
}

/// Accepting information for one pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalMarker {
    pub pattern: usize,
    /// `(declared, local)` variable names.
    pub renaming: Vec<(String, String)>,
    pub globals: Vec<ConstraintId>,
}

impl FinalMarker {
    pub fn renaming_pairs(&self) -> Vec<(&str, &str)> {
        self.renaming.iter().map(|(declared, local)| (declared.as_str(), local.as_str())).collect()
    }
}

#[derive(Debug, Clone)]
pub enum State {
    Branch { transitions: Vec<Transition> },
    /// Reached through a [`Label::Commutative`] transition; `branches` are [`Label::Operands`]
    /// transitions keyed by the commutative pattern index of `matcher`.
    Commutative { matcher: usize, branches: Vec<Transition> },
    /// Markers are ordered by pattern index.
    Accept { markers: Vec<FinalMarker> },
}

impl State {
    pub fn transitions(&self) -> &[Transition] {
        match self {
            Self::Branch { transitions } => transitions,
            Self::Commutative { branches, .. } => branches,
            Self::Accept { .. } => &[],
        }
    }
}

/// Operand pattern of a sub-matcher: one argument of a commutative operation plus the constraints
/// that only mention its variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperandPattern {
    pub expression: PatternExpr,
    pub constraints: Vec<Constraint>,
}

/// Matcher for the arguments of operations with one commutative head.
#[derive(Debug, Clone)]
pub struct SubMatcher {
    pub(crate) head: Head,
    pub(crate) automaton: Automaton,
    pub(crate) operands: Vec<OperandPattern>,
    pub(crate) patterns: Vec<CommutativePattern>,
}

impl SubMatcher {
    pub(crate) fn new(head: Head) -> Self {
        Self { head, automaton: Automaton::new(), operands: Vec::new(), patterns: Vec::new() }
    }

    /// Automaton over single operands; its pattern indices are operand pattern indices.
    pub fn automaton(&self) -> &Automaton {
        &self.automaton
    }

    pub fn operands(&self) -> &[OperandPattern] {
        &self.operands
    }
}

impl OperandMatcher for SubMatcher {
    fn head(&self) -> &Head {
        &self.head
    }

    fn patterns(&self) -> &[CommutativePattern] {
        &self.patterns
    }

    fn match_operand(&self, operand: &Arc<Expr>) -> Vec<(usize, Substitution)> {
        self.automaton.match_expr(operand).collect()
    }
}

/// Shared decision graph of a set of patterns.
#[derive(Debug, Clone)]
pub struct Automaton {
    pub(crate) states: Vec<State>,
    pub(crate) registry: ConstraintRegistry,
    pub(crate) matchers: Vec<SubMatcher>,
    pub(crate) pattern_count: usize,
}

impl Default for Automaton {
    fn default() -> Self {
        Self::new()
    }
}

impl Automaton {
    /// Automaton without patterns: a root state without transitions.
    pub fn new() -> Self {
        Self {
            states: vec![State::Branch { transitions: Vec::new() }],
            registry: ConstraintRegistry::new(),
            matchers: Vec::new(),
            pattern_count: 0,
        }
    }

    pub fn state(&self, id: StateId) -> &State {
        &self.states[id.0]
    }

    pub fn states(&self) -> impl Iterator<Item = (StateId, &State)> {
        self.states.iter().enumerate().map(|(i, state)| (StateId(i), state))
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    pub fn transition_count(&self) -> usize {
        self.states.iter().map(|state| state.transitions().len()).sum()
    }

    pub fn pattern_count(&self) -> usize {
        self.pattern_count
    }

    pub fn registry(&self) -> &ConstraintRegistry {
        &self.registry
    }

    /// Commutative sub-matchers, one per head, in creation order.
    pub fn matchers(&self) -> &[SubMatcher] {
        &self.matchers
    }

    pub fn matcher(&self, index: usize) -> &SubMatcher {
        &self.matchers[index]
    }
}

impl fmt::Display for Automaton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (id, state) in self.states() {
            match state {
                State::Accept { markers } => {
                    let patterns = markers.iter().map(|marker| marker.pattern).format(", ");
                    writeln!(f, "{id}: accept [{patterns}]")?;
                }
                State::Commutative { matcher, .. } => writeln!(f, "{id}: matcher {matcher}")?,
                State::Branch { .. } => writeln!(f, "{id}:")?,
            }
            for transition in state.transitions() {
                write!(f, "  {}", transition.label)?;
                if let Some(variable) = &transition.variable {
                    write!(f, " as {variable}")?;
                }
                write!(f, " -> {}", transition.target)?;
                if !transition.constraints.is_empty() {
                    write!(f, " if {}", transition.constraints.iter().format(", "))?;
                }
                writeln!(f)?;
            }
        }
        for (index, matcher) in self.matchers.iter().enumerate() {
            writeln!(f, "matcher {index} ({}):", matcher.head.name())?;
            for (operand, pattern) in matcher.operands.iter().enumerate() {
                writeln!(f, "  operand {operand}: {}", pattern.expression)?;
            }
            for (k, pattern) in matcher.patterns.iter().enumerate() {
                let variables = pattern.sequence_vars.iter().map(|var| var.name.as_deref().unwrap_or("_"));
                writeln!(f, "  #{k}: {:?} + [{}]", pattern.operands, variables.format(", "))?;
            }
            for line in matcher.automaton.to_string().lines() {
                writeln!(f, "  | {line}")?;
            }
        }
        Ok(())
    }
}
