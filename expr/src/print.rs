//! Textual form of expressions.
//!
//! The output is accepted back by the pattern parser: `x + y`, `2*x`, `Pow(x, y)`, `f(x)`,
//! `AC::g(x, y)`, `Dummy::d`.

use std::fmt;

use itertools::Itertools;

use crate::expr::{Expr, SymbolKind};
use crate::head::Head;

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(value) => write!(f, "{value}"),
            Self::Symbol(symbol) => match symbol.kind() {
                SymbolKind::Plain => f.write_str(symbol.name()),
                kind => write!(f, "{kind}::{}", symbol.name()),
            },
            Self::Operation { head, args } => match head.infix_operator() {
                Some(op) if args.len() >= 2 => {
                    let parts = args.iter().map(|arg| {
                        let nested =
                            arg.head().is_some_and(|h| h.infix_operator().is_some() && (h == head || *h == Head::ADD));
                        if nested { format!("({arg})") } else { arg.to_string() }
                    });
                    f.write_str(&parts.format(op).to_string())
                }
                _ => {
                    let prefix = head.kind().prefix();
                    if !prefix.is_empty() {
                        write!(f, "{prefix}::")?;
                    }
                    write!(f, "{}({})", head.name(), args.iter().format(", "))
                }
            },
        }
    }
}
