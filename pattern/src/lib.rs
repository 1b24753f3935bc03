//! Patterns, constraints and the pattern DSL.
//!
//! # Module Organization
//!
//! - [`pattern`] - Wildcards, pattern trees and validated patterns
//! - [`constraint`] - Constraints and the deduplicating [`ConstraintRegistry`]
//! - [`parse`] - Textual pattern syntax
//!
//! ```
//! use matchgen_pattern::{Constraint, Pattern};
//! use matchgen_runtime::Predicate;
//!
//! let pattern = Pattern::parse("Pow(x_, n_)")?
//!     .with_constraint("n", Constraint::builtin(Predicate::IsInteger, ["n"])?)?;
//! assert_eq!(pattern.variables().len(), 2);
//! # Ok::<(), matchgen_pattern::Error>(())
//! ```

pub mod constraint;
pub mod error;
pub mod parse;
pub mod pattern;


pub use constraint::{Check, Constraint, ConstraintId, ConstraintRegistry, CustomFn};
pub use error::{Error, Result};
pub use pattern::{Pattern, PatternExpr, VariableKind, Wildcard};
