//! Constraints and their registry.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use itertools::Itertools;
use matchgen_runtime::{Binding, Predicate, Substitution};
use smallvec::SmallVec;
use snafu::ensure;

use crate::error::*;

/// In-process implementation of a custom constraint.
pub type CustomFn = Arc<dyn Fn(&[&Binding]) -> bool + Send + Sync>;

/// What a constraint checks.
#[derive(Clone)]
pub enum Check {
    Builtin(Predicate),
    /// `path` names the function generated matchers call with the bindings; `function` is the same
    /// check for the interpreter.
    Custom { path: String, function: CustomFn },
}

impl Check {
    fn key(&self) -> (Option<Predicate>, &str) {
        match self {
            Self::Builtin(predicate) => (Some(*predicate), ""),
            Self::Custom { path, .. } => (None, path),
        }
    }
}

impl fmt::Debug for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Builtin(predicate) => f.debug_tuple("Builtin").field(predicate).finish(),
            Self::Custom { path, .. } => f.debug_struct("Custom").field("path", path).finish_non_exhaustive(),
        }
    }
}

/// Predicate over an ordered list of variables.
///
/// Constraints compare equal when they check the same predicate (or call the same custom path) over
/// the same variables, which is what the registry deduplicates on.
#[derive(Debug, Clone)]
pub struct Constraint {
    check: Check,
    variables: Vec<String>,
}

impl Constraint {
    pub fn builtin<S: Into<String>>(predicate: Predicate, variables: impl IntoIterator<Item = S>) -> Result<Self> {
        let variables: Vec<String> = variables.into_iter().map(Into::into).collect();
        ensure!(
            variables.len() == predicate.arity(),
            ConstraintAritySnafu { predicate, expected: predicate.arity(), actual: variables.len() }
        );
        Ok(Self { check: Check::Builtin(predicate), variables })
    }

    pub fn custom<S: Into<String>>(
        path: impl Into<String>,
        variables: impl IntoIterator<Item = S>,
        function: impl Fn(&[&Binding]) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            check: Check::Custom { path: path.into(), function: Arc::new(function) },
            variables: variables.into_iter().map(Into::into).collect(),
        }
    }

    pub fn check(&self) -> &Check {
        &self.check
    }

    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    /// Evaluate against `subst`; holds vacuously while a variable is unbound.
    pub fn evaluate(&self, subst: &Substitution) -> bool {
        let names: SmallVec<[&str; 4]> = self.variables.iter().map(String::as_str).collect();
        subst.satisfies(&names, |args| match &self.check {
            Check::Builtin(predicate) => predicate.check(args),
            Check::Custom { function, .. } => function(args),
        })
    }

    /// Same check over renamed variables; names missing from `renaming` are kept.
    pub fn renamed(&self, renaming: &BTreeMap<String, String>) -> Self {
        let variables =
            self.variables.iter().map(|name| renaming.get(name).cloned().unwrap_or_else(|| name.clone())).collect();
        Self { check: self.check.clone(), variables }
    }
}

impl PartialEq for Constraint {
    fn eq(&self, other: &Self) -> bool {
        self.check.key() == other.check.key() && self.variables == other.variables
    }
}

impl Eq for Constraint {}

impl Hash for Constraint {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.check.key().hash(state);
        self.variables.hash(state);
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.check {
            Check::Builtin(predicate) => write!(f, "{predicate}({})", self.variables.iter().format(", ")),
            Check::Custom { path, .. } => write!(f, "{path}({})", self.variables.iter().format(", ")),
        }
    }
}

// ============================================================================
// REGISTRY
// ============================================================================

/// Index of a constraint in its [`ConstraintRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
#[display("c{_0}")]
pub struct ConstraintId(pub usize);

#[derive(Debug, Clone)]
struct Entry {
    constraint: Constraint,
    owners: BTreeSet<usize>,
}

/// Deduplicated constraint storage.
///
/// Every registered constraint remembers the patterns that own it, so a failing check only
/// refutes those patterns.
#[derive(Debug, Clone, Default)]
pub struct ConstraintRegistry {
    entries: Vec<Entry>,
    index: HashMap<Constraint, ConstraintId>,
}

impl ConstraintRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `constraint` for pattern `owner`, reusing an equal constraint if present.
    pub fn register(&mut self, constraint: Constraint, owner: usize) -> ConstraintId {
        if let Some(&id) = self.index.get(&constraint) {
            self.entries[id.0].owners.insert(owner);
            return id;
        }
        let id = ConstraintId(self.entries.len());
        self.index.insert(constraint.clone(), id);
        self.entries.push(Entry { constraint, owners: BTreeSet::from([owner]) });
        id
    }

    pub fn get(&self, id: ConstraintId) -> &Constraint {
        &self.entries[id.0].constraint
    }

    pub fn owners(&self, id: ConstraintId) -> &BTreeSet<usize> {
        &self.entries[id.0].owners
    }

    /// Constraints mentioning `variable`, in registration order.
    ///
    /// Necessary but not sufficient for checkability: the other variables may still be unbound.
    pub fn candidates<'a>(&'a self, variable: &'a str) -> impl Iterator<Item = ConstraintId> + 'a {
        self.entries
            .iter()
            .enumerate()
            .filter(move |(_, entry)| entry.constraint.variables.iter().any(|name| name == variable))
            .map(|(i, _)| ConstraintId(i))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ConstraintId, &Constraint)> {
        self.entries.iter().enumerate().map(|(i, entry)| (ConstraintId(i), &entry.constraint))
    }
}
