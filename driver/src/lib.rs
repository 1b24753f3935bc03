//! Emission driver for matchgen.
//!
//! A [`Suite`] is a named list of patterns (with constraints) plus test cases, stored as JSON. The
//! driver compiles suites into matcher modules with a generated `#[cfg(test)]` module per suite,
//! and checks the cases in-process against the automaton interpreter.
//!
//! # Module Organization
//!
//! - [`config`] - [`DriverConfig`] with builder and environment fallbacks
//! - [`suite`] - Suite files and the builtin reference suites
//! - [`emit`] - Compilation of suites and writing of generated modules
//! - [`verify`] - Checking suite cases with the interpreter
//!
//! ```no_run
//! use matchgen_driver::{DriverConfig, Suite, emit_all, verify_suite};
//!
//! let suites = Suite::builtin();
//! for suite in &suites {
//!     verify_suite(suite)?.into_result()?;
//! }
//! let config = DriverConfig::builder().out_dir("src/generated").build();
//! emit_all(&suites, &config)?;
//! # Ok::<(), matchgen_driver::Error>(())
//! ```

pub mod config;
pub mod emit;
pub mod error;
pub mod suite;
pub mod verify;


pub use config::DriverConfig;
pub use emit::{CompiledSuite, compile_suite, emit_all, emit_suite, render_suite};
pub use error::{Error, Result};
pub use suite::{Case, Expectation, PatternSpec, Suite};
pub use verify::{Failure, Report, verify_suite};
