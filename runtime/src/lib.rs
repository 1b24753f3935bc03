//! Runtime support for matchgen matchers.
//!
//! Everything a compiled matcher needs at run time lives here, so that generated code only depends
//! on this crate and `matchgen-expr`. The in-process interpreter in `matchgen-automaton` uses the
//! same pieces, which keeps both execution paths on one implementation of the tricky parts.
//!
//! # Module Organization
//!
//! - [`substitution`] - Variable bindings with idempotent rebinding
//! - [`subjects`] - Argument queue stack with restore-on-drop guards for backtracking
//! - [`predicate`] - Built-in constraint predicates
//! - [`pattern_set`] - Set of patterns not yet refuted on the current branch
//! - [`bipartite`] - Bipartite graph with augmenting-path matching and matching enumeration
//! - [`partition`] - Distribution of leftover operands over sequence variables
//! - [`commutative`] - Commutative/associative argument matching

pub mod bipartite;
pub mod commutative;
pub mod partition;
pub mod pattern_set;
pub mod predicate;
pub mod subjects;
pub mod substitution;


pub use bipartite::BipartiteGraph;
pub use commutative::{CommutativePattern, OperandMatcher, match_commutative};
pub use partition::{SequenceVariable, sequence_partitions};
pub use pattern_set::PatternSet;
pub use predicate::Predicate;
pub use subjects::{Closed, Entered, Subjects, Taken, TakenSequence};
pub use substitution::{Binding, Substitution};
