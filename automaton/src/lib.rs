//! Many-to-one matching automaton.
//!
//! Patterns are merged into one decision graph so that matching work common to several patterns
//! is done once. The automaton is built offline, is immutable afterwards and can either be run
//! in-process ([`Automaton::match_expr`]) or turned into Rust source by `matchgen-codegen`.
//!
//! # Module Organization
//!
//! - [`automaton`] - States, transitions, labels and commutative sub-matchers
//! - [`builder`] - Pattern insertion, variable renaming and constraint scheduling
//! - [`interpret`] - Backtracking execution against a subject
//!
//! ```
//! use matchgen_automaton::Automaton;
//! use matchgen_pattern::{Pattern, parse};
//!
//! let patterns = [Pattern::parse("Pow(x_, 2)")?, Pattern::parse("x_ + y_")?];
//! let automaton = Automaton::from_patterns(&patterns);
//!
//! let subject = parse::subject("Pow(a, 2)")?;
//! let (index, subst) = automaton.match_expr(&subject).next().unwrap();
//! assert_eq!(index, 0);
//! assert_eq!(subst.to_string(), "{x: a}");
//! # Ok::<(), matchgen_pattern::Error>(())
//! ```

pub mod automaton;
pub mod builder;
pub mod interpret;


pub use automaton::{Automaton, FinalMarker, Label, OperandPattern, State, StateId, SubMatcher, Transition};
