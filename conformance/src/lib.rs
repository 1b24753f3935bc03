//! Generated matchers for the conformance suites.
//!
//! The build script renders the builtin suites and every suite file under `suites/` with
//! [`matchgen_driver::render_suite`]. Each suite is compiled here as a module exposing the usual
//! `match_root` entry point together with its generated case tests, and [`MATCHERS`] lists the
//! entry points by suite name so tests can run them next to the interpreter.

use std::sync::Arc;

use matchgen_expr::Expr;
use matchgen_runtime::Substitution;

/// Entry point of one generated matcher.
pub type Matcher = fn(&Arc<Expr>) -> std::vec::IntoIter<(usize, Substitution)>;

include!(concat!(env!("OUT_DIR"), "/suites.rs"));
