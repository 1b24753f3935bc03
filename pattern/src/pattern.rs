//! Pattern trees.
//!
//! A pattern is an expression tree whose leaves may be wildcards. Patterns are validated once when
//! built and immutable afterwards; the set of variables (with the kind of wildcard each is bound
//! by) is computed at construction.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use bon::bon;
use itertools::Itertools;
use matchgen_expr::{Expr, Head, SymbolKind};
use matchgen_runtime::{Binding, Substitution};
use snafu::ensure;

use crate::constraint::Constraint;
use crate::error::*;

// ============================================================================
// WILDCARDS
// ============================================================================

/// Placeholder matching one (fixed) or a run of (sequence) expressions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Wildcard {
    name: Option<String>,
    min_count: usize,
    fixed_size: bool,
    default: Option<Arc<Expr>>,
    symbol_kind: Option<SymbolKind>,
}

#[bon]
impl Wildcard {
    /// Validating constructor.
    ///
    /// Defaults to an anonymous fixed wildcard. A wildcard with a `default` is optional: when the
    /// matched position is absent, the default is bound instead.
    #[builder]
    pub fn new(
        #[builder(into)] name: Option<String>,
        #[builder(default = 1)] min_count: i64,
        #[builder(default = true)] fixed_size: bool,
        default: Option<Arc<Expr>>,
        symbol_kind: Option<SymbolKind>,
    ) -> Result<Self> {
        ensure!(min_count >= 0, NegativeMinCountSnafu { name, min_count });
        ensure!(!fixed_size || min_count == 1, FixedWildcardCountSnafu { name, min_count });
        ensure!(symbol_kind.is_none() || fixed_size, SymbolWildcardNotFixedSnafu { name });
        Ok(Self { name, min_count: min_count as usize, fixed_size, default, symbol_kind })
    }
}

impl Wildcard {
    pub fn fixed(name: Option<&str>) -> Self {
        Self { name: name.map(str::to_owned), min_count: 1, fixed_size: true, default: None, symbol_kind: None }
    }

    pub fn sequence(name: Option<&str>, min_count: usize) -> Self {
        Self { name: name.map(str::to_owned), min_count, fixed_size: false, default: None, symbol_kind: None }
    }

    pub fn symbol(name: Option<&str>, kind: SymbolKind) -> Self {
        Self { symbol_kind: Some(kind), ..Self::fixed(name) }
    }

    pub fn optional(name: Option<&str>, default: Arc<Expr>) -> Self {
        Self { default: Some(default), ..Self::fixed(name) }
    }

    pub fn with_default(self, default: Arc<Expr>) -> Self {
        Self { default: Some(default), ..self }
    }

    pub fn with_symbol_kind(self, kind: SymbolKind) -> Result<Self> {
        ensure!(self.fixed_size, SymbolWildcardNotFixedSnafu { name: self.name });
        Ok(Self { symbol_kind: Some(kind), ..self })
    }

    pub fn with_min_count(self, min_count: i64) -> Result<Self> {
        Self::builder()
            .maybe_name(self.name)
            .min_count(min_count)
            .fixed_size(self.fixed_size)
            .maybe_default(self.default)
            .maybe_symbol_kind(self.symbol_kind)
            .build()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn min_count(&self) -> usize {
        self.min_count
    }

    pub fn is_fixed(&self) -> bool {
        self.fixed_size
    }

    pub fn is_sequence(&self) -> bool {
        !self.fixed_size
    }

    pub fn default(&self) -> Option<&Arc<Expr>> {
        self.default.as_ref()
    }

    pub fn is_optional(&self) -> bool {
        self.default.is_some()
    }

    pub fn symbol_kind(&self) -> Option<SymbolKind> {
        self.symbol_kind
    }

    pub fn variable_kind(&self) -> VariableKind {
        if self.fixed_size { VariableKind::Single } else { VariableKind::Sequence }
    }

    /// Same wildcard bound to another variable name.
    pub fn renamed(&self, name: Option<String>) -> Self {
        Self { name, ..self.clone() }
    }

    /// The wildcard with its name removed, as used in transition labels.
    pub fn anonymous(&self) -> Self {
        self.renamed(None)
    }
}

impl fmt::Display for Wildcard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.name.as_deref().unwrap_or("");
        let base = match (self.fixed_size, self.min_count) {
            (true, _) => format!("{name}_"),
            (false, 0) => format!("{name}___"),
            (false, 1) => format!("{name}__"),
            (false, n) => format!("Seq({name}__, {n})"),
        };
        let base = match self.symbol_kind {
            Some(kind) => format!("Sym({base}, {kind})"),
            None => base,
        };
        match &self.default {
            Some(default) => write!(f, "Optional({base}, {default})"),
            None => f.write_str(&base),
        }
    }
}

/// How a variable is bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum VariableKind {
    Single,
    Sequence,
}

// ============================================================================
// PATTERN EXPRESSIONS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PatternExpr {
    /// Symbol or literal matched by structural equality.
    Atom(Arc<Expr>),
    Operation { head: Head, args: Vec<PatternExpr> },
    Wildcard(Wildcard),
}

impl PatternExpr {
    pub fn atom(expr: Arc<Expr>) -> Self {
        Self::Atom(expr)
    }

    pub fn symbol(name: &str) -> Self {
        Self::Atom(Expr::symbol(name))
    }

    pub fn integer(value: i64) -> Self {
        Self::Atom(Expr::integer(value))
    }

    pub fn wildcard(wildcard: Wildcard) -> Self {
        Self::Wildcard(wildcard)
    }

    /// Build an operation in canonical form.
    ///
    /// Same-head operands of associative heads are spliced in; operands of commutative heads are
    /// ordered fixed first, then sequence wildcards, then optional wildcards, ties broken by their
    /// printed form.
    pub fn operation(head: Head, args: impl IntoIterator<Item = PatternExpr>) -> Self {
        let mut flat = Vec::new();
        for arg in args {
            match arg {
                Self::Operation { head: inner, args: inner_args } if head.is_associative() && inner == head => {
                    flat.extend(inner_args)
                }
                other => flat.push(other),
            }
        }
        if head.is_commutative() {
            flat.sort_by_cached_key(|arg| (arg.operand_class(), arg.to_string()));
        }
        Self::Operation { head, args: flat }
    }

    fn operand_class(&self) -> u8 {
        match self {
            Self::Wildcard(w) if w.is_optional() => 2,
            Self::Wildcard(w) if w.is_sequence() => 1,
            _ => 0,
        }
    }

    pub fn add(args: impl IntoIterator<Item = PatternExpr>) -> Self {
        Self::operation(Head::ADD, args)
    }

    pub fn mul(args: impl IntoIterator<Item = PatternExpr>) -> Self {
        Self::operation(Head::MUL, args)
    }

    pub fn pow(base: PatternExpr, exponent: PatternExpr) -> Self {
        Self::operation(Head::POW, [base, exponent])
    }

    pub fn as_wildcard(&self) -> Option<&Wildcard> {
        match self {
            Self::Wildcard(wildcard) => Some(wildcard),
            _ => None,
        }
    }

    pub fn is_ground(&self) -> bool {
        match self {
            Self::Atom(_) => true,
            Self::Wildcard(_) => false,
            Self::Operation { args, .. } => args.iter().all(Self::is_ground),
        }
    }

    /// Wildcards in preorder.
    pub fn wildcards(&self) -> Vec<&Wildcard> {
        let mut out = Vec::new();
        self.collect_wildcards(&mut out);
        out
    }

    fn collect_wildcards<'a>(&'a self, out: &mut Vec<&'a Wildcard>) {
        match self {
            Self::Atom(_) => {}
            Self::Wildcard(wildcard) => out.push(wildcard),
            Self::Operation { args, .. } => args.iter().for_each(|arg| arg.collect_wildcards(out)),
        }
    }

    /// Variable names with their binding kind.
    pub fn variables(&self) -> Result<BTreeMap<String, VariableKind>> {
        let mut variables = BTreeMap::new();
        for wildcard in self.wildcards() {
            let Some(name) = wildcard.name() else { continue };
            let kind = *variables.entry(name.to_owned()).or_insert(wildcard.variable_kind());
            ensure!(kind == wildcard.variable_kind(), InconsistentVariableSnafu { name });
        }
        Ok(variables)
    }

    /// Rename every variable through `rename`.
    pub fn map_variables(&self, rename: &impl Fn(&str) -> String) -> Self {
        match self {
            Self::Atom(expr) => Self::Atom(expr.clone()),
            Self::Wildcard(wildcard) => Self::Wildcard(wildcard.renamed(wildcard.name().map(rename))),
            Self::Operation { head, args } => {
                Self::operation(head.clone(), args.iter().map(|arg| arg.map_variables(rename)))
            }
        }
    }

    /// The expression itself when it contains no wildcard.
    pub fn to_expr(&self) -> Option<Arc<Expr>> {
        match self {
            Self::Atom(expr) => Some(expr.clone()),
            Self::Wildcard(_) => None,
            Self::Operation { head, args } => {
                let args: Option<Vec<_>> = args.iter().map(Self::to_expr).collect();
                Some(Expr::operation(head.clone(), args?))
            }
        }
    }

    /// Replace variables by their bindings.
    ///
    /// Sequence bindings are spliced into the enclosing operation. Returns `None` if a wildcard is
    /// anonymous or unbound, or if the top level would not be a single expression.
    pub fn substitute(&self, subst: &Substitution) -> Option<Arc<Expr>> {
        match self.substitute_run(subst)?.as_slice() {
            [single] => Some(single.clone()),
            _ => None,
        }
    }

    fn substitute_run(&self, subst: &Substitution) -> Option<Vec<Arc<Expr>>> {
        match self {
            Self::Atom(expr) => Some(vec![expr.clone()]),
            Self::Wildcard(wildcard) => match subst.get(wildcard.name()?)? {
                Binding::Single(expr) => Some(vec![expr.clone()]),
                Binding::Sequence(exprs) => Some(exprs.clone()),
            },
            Self::Operation { head, args } => {
                let mut flat = Vec::with_capacity(args.len());
                for arg in args {
                    flat.extend(arg.substitute_run(subst)?);
                }
                Some(vec![Expr::operation(head.clone(), flat)])
            }
        }
    }
}

impl fmt::Display for PatternExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Atom(expr) => write!(f, "{expr}"),
            Self::Wildcard(wildcard) => write!(f, "{wildcard}"),
            Self::Operation { head, args } => {
                let infix = if *head == Head::ADD && args.len() >= 2 {
                    Some(" + ")
                } else if *head == Head::MUL && args.len() >= 2 {
                    Some("*")
                } else {
                    None
                };
                match infix {
                    Some(op) => {
                        let parts = args.iter().map(|arg| match arg {
                            Self::Operation { head: inner, .. } if *inner == Head::ADD || inner == head => {
                                format!("({arg})")
                            }
                            _ => arg.to_string(),
                        });
                        f.write_str(&parts.format(op).to_string())
                    }
                    None => {
                        let prefix = head.kind().prefix();
                        if !prefix.is_empty() {
                            write!(f, "{prefix}::")?;
                        }
                        write!(f, "{}({})", head.name(), args.iter().format(", "))
                    }
                }
            }
        }
    }
}

// ============================================================================
// PATTERNS
// ============================================================================

/// A validated pattern with its constraints.
///
/// Local constraints are scheduled as soon as their variables are bound; global constraints are
/// checked once the whole pattern has matched.
#[derive(Debug, Clone)]
pub struct Pattern {
    expression: PatternExpr,
    variables: BTreeMap<String, VariableKind>,
    constraints: Vec<Constraint>,
    global_constraints: Vec<Constraint>,
}

impl Pattern {
    pub fn new(expression: PatternExpr) -> Result<Self> {
        let variables = expression.variables()?;
        Ok(Self { expression, variables, constraints: Vec::new(), global_constraints: Vec::new() })
    }

    /// Parse the pattern DSL (see [`crate::parse`]).
    pub fn parse(text: &str) -> Result<Self> {
        Self::new(crate::parse::pattern(text)?)
    }

    /// Attach a constraint to `variable`.
    pub fn with_constraint(mut self, variable: &str, constraint: Constraint) -> Result<Self> {
        ensure!(self.variables.contains_key(variable), UnknownVariableSnafu { name: variable });
        self.check_variables(&constraint)?;
        self.constraints.push(constraint);
        Ok(self)
    }

    pub fn with_global(mut self, constraint: Constraint) -> Result<Self> {
        self.check_variables(&constraint)?;
        self.global_constraints.push(constraint);
        Ok(self)
    }

    fn check_variables(&self, constraint: &Constraint) -> Result<()> {
        ensure!(
            !constraint.variables().is_empty(),
            ConstraintWithoutVariablesSnafu { constraint: constraint.to_string() }
        );
        for name in constraint.variables() {
            ensure!(self.variables.contains_key(name), UnknownVariableSnafu { name });
        }
        Ok(())
    }

    pub fn expression(&self) -> &PatternExpr {
        &self.expression
    }

    pub fn variables(&self) -> &BTreeMap<String, VariableKind> {
        &self.variables
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn global_constraints(&self) -> &[Constraint] {
        &self.global_constraints
    }

    /// Whether `subst` satisfies every constraint of this pattern.
    pub fn accepts(&self, subst: &Substitution) -> bool {
        self.constraints.iter().chain(&self.global_constraints).all(|c| c.evaluate(subst))
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.expression)?;
        let all = self.constraints.iter().chain(&self.global_constraints);
        if self.constraints.len() + self.global_constraints.len() > 0 {
            write!(f, " where {}", all.format(", "))?;
        }
        Ok(())
    }
}
