//! Symbolic expression trees for matchgen.
//!
//! This crate is the expression interface consumed by compiled matchers: structural equality,
//! operation heads with their algebraic kind, ordered argument access, symbol subtypes, and a
//! re-wrap constructor for associative leftovers.
//!
//! Expressions are immutable and shared through [`Arc`](std::sync::Arc). Operations are built in
//! canonical form by [`Expr::operation`]: arguments of associative heads are flattened and arguments
//! of commutative heads are sorted, so derived equality is equality modulo argument order.
//!
//! ```
//! use matchgen_expr::Expr;
//!
//! let x = Expr::symbol("x");
//! let y = Expr::symbol("y");
//! assert_eq!(Expr::add([x.clone(), y.clone()]), Expr::add([y, x]));
//! ```

pub mod expr;
pub mod head;
pub mod print;


pub use expr::{Expr, Symbol, SymbolKind};
pub use head::{Head, OpKind};
