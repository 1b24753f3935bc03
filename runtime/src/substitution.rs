//! Variable bindings produced by matching.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use itertools::Itertools;
use matchgen_expr::{Expr, Head};
use smallvec::SmallVec;

/// Value bound to a variable: one expression for fixed wildcards, an ordered list for sequence
/// wildcards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Binding {
    Single(Arc<Expr>),
    Sequence(Vec<Arc<Expr>>),
}

impl Binding {
    pub fn single(expr: Arc<Expr>) -> Self {
        Self::Single(expr)
    }

    pub fn sequence(exprs: impl IntoIterator<Item = Arc<Expr>>) -> Self {
        Self::Sequence(exprs.into_iter().collect())
    }

    /// Binding for a run of consumed arguments.
    ///
    /// With `wrap`, a non-empty run becomes one node of that associative head (a single argument
    /// stays unwrapped); otherwise the run is kept as a sequence.
    pub fn from_run(run: &[Arc<Expr>], wrap: Option<&Head>) -> Self {
        match wrap {
            Some(head) if !run.is_empty() => Self::Single(Expr::rewrap(head, run)),
            _ => Self::Sequence(run.to_vec()),
        }
    }

    pub fn as_single(&self) -> Option<&Arc<Expr>> {
        match self {
            Self::Single(expr) => Some(expr),
            Self::Sequence(_) => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Arc<Expr>]> {
        match self {
            Self::Single(_) => None,
            Self::Sequence(exprs) => Some(exprs),
        }
    }

    /// All bound expressions; a single binding is a one-element slice.
    pub fn elements(&self) -> &[Arc<Expr>] {
        match self {
            Self::Single(expr) => std::slice::from_ref(expr),
            Self::Sequence(exprs) => exprs,
        }
    }
}

impl fmt::Display for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single(expr) => write!(f, "{expr}"),
            Self::Sequence(exprs) => write!(f, "[{}]", exprs.iter().format(", ")),
        }
    }
}

/// Mapping from variable name to binding, ordered by name.
///
/// Clones are the branch copies of the matcher: a branch that binds clones the substitution it
/// received, so siblings never observe each other's bindings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Substitution {
    bindings: BTreeMap<String, Binding>,
}

impl Substitution {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Binding> {
        self.bindings.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    pub fn single(&self, name: &str) -> Option<&Arc<Expr>> {
        self.get(name).and_then(Binding::as_single)
    }

    pub fn sequence(&self, name: &str) -> Option<&[Arc<Expr>]> {
        self.get(name).and_then(Binding::as_sequence)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Binding)> {
        self.bindings.iter().map(|(name, binding)| (name.as_str(), binding))
    }

    /// Bind `name`, or check that the existing binding is equal.
    ///
    /// Returns `false` on a conflicting rebinding; the substitution is left unchanged then.
    pub fn try_bind(&mut self, name: &str, binding: Binding) -> bool {
        match self.bindings.get(name) {
            Some(existing) => *existing == binding,
            None => {
                self.bindings.insert(name.to_owned(), binding);
                true
            }
        }
    }

    /// Copy-on-bind: a new substitution extended with `name`, or `None` on conflict.
    pub fn extended(&self, name: &str, binding: Binding) -> Option<Self> {
        if let Some(existing) = self.bindings.get(name) {
            return (*existing == binding).then(|| self.clone());
        }
        let mut next = self.clone();
        next.bindings.insert(name.to_owned(), binding);
        Some(next)
    }

    /// Merge two substitutions; `None` if they disagree on a shared name.
    pub fn union(&self, other: &Substitution) -> Option<Self> {
        let mut merged = self.clone();
        for (name, binding) in &other.bindings {
            if !merged.try_bind(name, binding.clone()) {
                return None;
            }
        }
        Some(merged)
    }

    /// Translate automaton-local names back to declared names.
    ///
    /// `pairs` holds `(declared, local)`; unbound locals are skipped.
    pub fn renamed(&self, pairs: &[(&str, &str)]) -> Self {
        let bindings = pairs
            .iter()
            .filter_map(|(declared, local)| Some(((*declared).to_owned(), self.bindings.get(*local)?.clone())))
            .collect();
        Self { bindings }
    }

    /// Evaluate `check` over the bindings of `names`, in order.
    ///
    /// Returns `true` without calling `check` while any of the names is still unbound.
    pub fn satisfies(&self, names: &[&str], check: impl FnOnce(&[&Binding]) -> bool) -> bool {
        let mut args: SmallVec<[&Binding; 4]> = SmallVec::with_capacity(names.len());
        for name in names {
            match self.bindings.get(*name) {
                Some(binding) => args.push(binding),
                None => return true,
            }
        }
        check(&args)
    }
}

impl FromIterator<(String, Binding)> for Substitution {
    fn from_iter<I: IntoIterator<Item = (String, Binding)>>(iter: I) -> Self {
        Self { bindings: iter.into_iter().collect() }
    }
}

impl fmt::Display for Substitution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", self.bindings.iter().map(|(name, binding)| format!("{name}: {binding}")).format(", "))
    }
}
