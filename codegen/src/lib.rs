//! Rust source generation for matchgen automata.
//!
//! A [`CodeGenerator`] turns an [`Automaton`](matchgen_automaton::Automaton) into a standalone
//! Rust module: one function per automaton state, a public entry point, and one
//! `CommutativeMatcherN` type per commutative sub-matcher. Generated code depends only on
//! `matchgen-expr` and `matchgen-runtime` and yields the same results, in the same order, as
//! [`Automaton::match_expr`](matchgen_automaton::Automaton::match_expr).
//!
//! # Module Organization
//!
//! - [`generator`] - Generator state, shared items and the validated [`GeneratedCode`]
//! - [`state`] - States, transitions and constraint guards
//! - [`matcher`] - Commutative sub-matcher types and their pattern tables
//!
//! ```
//! use matchgen_automaton::Automaton;
//! use matchgen_codegen::CodeGenerator;
//! use matchgen_pattern::Pattern;
//!
//! let automaton = Automaton::from_patterns([&Pattern::parse("Pow(x_, 2)")?]);
//! let code = CodeGenerator::builder().function_name("match_power").build().generate(&automaton)?;
//! assert!(code.to_string().contains("pub fn match_power"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod error;
pub mod generator;
pub mod matcher;
pub mod state;


pub use error::{Error, Result};
pub use generator::{CodeGenerator, DEFAULT_FUNCTION, GeneratedCode, construct_expr};
