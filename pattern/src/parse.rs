//! Pattern DSL.
//!
//! Patterns and subjects are written as Rust expressions and parsed with `syn`:
//!
//! | syntax | meaning |
//! |---|---|
//! | `x`, `3`, `-3` | symbol, integer |
//! | `Dummy::d`, `Constant::pi` | symbol of another subtype |
//! | `x_`, `_` | fixed wildcard, anonymous fixed wildcard |
//! | `x__`, `x___` | sequence wildcard with minimum 1, minimum 0 |
//! | `Seq(x__, 2)` | sequence wildcard with minimum 2 |
//! | `Optional(x_, 0)` | optional wildcard with default |
//! | `Sym(x_, Dummy)` | symbol wildcard |
//! | `a + b`, `a - b`, `a * b`, `-a` | `Add` / `Mul` (associative-commutative) |
//! | `Pow(a, b)`, `f(a, b)` | plain operations |
//! | `Assoc::f(..)`, `Comm::f(..)`, `AC::f(..)` | operations of other kinds |
//!
//! Constraints use the predicate name applied to variable names: `FreeOf(x, y)`.

use std::str::FromStr;
use std::sync::Arc;

use matchgen_expr::{Expr, Head, OpKind, SymbolKind};
use matchgen_runtime::Predicate;
use quote::ToTokens;
use snafu::{OptionExt, ResultExt, ensure};
use syn::punctuated::Punctuated;
use syn::{BinOp, ExprCall, UnOp};

use crate::constraint::Constraint;
use crate::error::*;
use crate::pattern::{PatternExpr, Wildcard};

/// Parse a pattern.
pub fn pattern(text: &str) -> Result<PatternExpr> {
    let parsed: syn::Expr = syn::parse_str(text).context(SyntaxSnafu)?;
    lower(&parsed)
}

/// Parse a subject expression; wildcards are rejected.
pub fn subject(text: &str) -> Result<Arc<Expr>> {
    let lowered = pattern(text)?;
    let offending = lowered.wildcards().first().map(|w| w.to_string());
    lowered.to_expr().context(WildcardInSubjectSnafu { text: offending.unwrap_or_default() })
}

/// Parse a built-in predicate constraint such as `IsInteger(x)`.
pub fn constraint(text: &str) -> Result<Constraint> {
    let parsed: syn::Expr = syn::parse_str(text).context(SyntaxSnafu)?;
    let syn::Expr::Call(call) = &parsed else { return unsupported(&parsed) };
    let predicate = path_ident(&call.func)
        .and_then(|name| Predicate::from_str(&name).ok())
        .context(UnsupportedSyntaxSnafu { text: tokens(&call.func) })?;
    let variables = call
        .args
        .iter()
        .map(|arg| path_ident(arg).context(UnsupportedSyntaxSnafu { text: tokens(arg) }))
        .collect::<Result<Vec<_>>>()?;
    Constraint::builtin(predicate, variables)
}

fn lower(expr: &syn::Expr) -> Result<PatternExpr> {
    match expr {
        syn::Expr::Paren(inner) => lower(&inner.expr),
        syn::Expr::Group(inner) => lower(&inner.expr),
        syn::Expr::Lit(syn::ExprLit { lit: syn::Lit::Int(int), .. }) => {
            Ok(PatternExpr::integer(int.base10_parse().context(SyntaxSnafu)?))
        }
        syn::Expr::Infer(_) => Ok(PatternExpr::Wildcard(Wildcard::fixed(None))),
        syn::Expr::Unary(unary) if matches!(unary.op, UnOp::Neg(_)) => match lower(&unary.expr)? {
            PatternExpr::Atom(atom) if atom.as_integer().is_some() => {
                Ok(PatternExpr::integer(-atom.as_integer().unwrap_or_default()))
            }
            operand => Ok(PatternExpr::mul([PatternExpr::integer(-1), operand])),
        },
        syn::Expr::Binary(binary) => {
            let lhs = lower(&binary.left)?;
            let rhs = lower(&binary.right)?;
            match binary.op {
                BinOp::Add(_) => Ok(PatternExpr::add([lhs, rhs])),
                BinOp::Sub(_) => Ok(PatternExpr::add([lhs, PatternExpr::mul([PatternExpr::integer(-1), rhs])])),
                BinOp::Mul(_) => Ok(PatternExpr::mul([lhs, rhs])),
                _ => unsupported(expr),
            }
        }
        syn::Expr::Path(path) => lower_path(path),
        syn::Expr::Call(call) => lower_call(call),
        _ => unsupported(expr),
    }
}

fn lower_path(path: &syn::ExprPath) -> Result<PatternExpr> {
    let segments: Vec<String> = path.path.segments.iter().map(|s| s.ident.to_string()).collect();
    match segments.as_slice() {
        [name] => Ok(lower_ident(name)),
        [kind, name] => {
            let kind = SymbolKind::from_str(kind).ok().context(UnsupportedSyntaxSnafu { text: tokens(path) })?;
            Ok(PatternExpr::Atom(Expr::symbol_of(name, kind)))
        }
        _ => unsupported(path),
    }
}

/// `x___`, `x__`, `x_` are wildcards (name `x`, possibly empty); anything else is a symbol.
fn lower_ident(ident: &str) -> PatternExpr {
    fn named(prefix: &str) -> Option<&str> {
        (!prefix.is_empty()).then_some(prefix)
    }

    if let Some(prefix) = ident.strip_suffix("___") {
        PatternExpr::Wildcard(Wildcard::sequence(named(prefix), 0))
    } else if let Some(prefix) = ident.strip_suffix("__") {
        PatternExpr::Wildcard(Wildcard::sequence(named(prefix), 1))
    } else if let Some(prefix) = ident.strip_suffix('_') {
        PatternExpr::Wildcard(Wildcard::fixed(named(prefix)))
    } else {
        PatternExpr::symbol(ident)
    }
}

fn lower_call(call: &ExprCall) -> Result<PatternExpr> {
    let syn::Expr::Path(func) = call.func.as_ref() else { return unsupported(&call.func) };
    let segments: Vec<String> = func.path.segments.iter().map(|s| s.ident.to_string()).collect();
    let args = &call.args;

    let (kind, name) = match segments.as_slice() {
        [modifier] if modifier == "Optional" => return lower_optional(call, args),
        [modifier] if modifier == "Sym" => {
            let [wildcard, kind] = two_args(call, args)?;
            let kind = path_ident(kind)
                .and_then(|kind| SymbolKind::from_str(&kind).ok())
                .context(UnsupportedSyntaxSnafu { text: tokens(kind) })?;
            return Ok(PatternExpr::Wildcard(lower_wildcard(wildcard)?.with_symbol_kind(kind)?));
        }
        [modifier] if modifier == "Seq" => {
            let [wildcard, count] = two_args(call, args)?;
            let count = match lower(count)? {
                PatternExpr::Atom(atom) => atom.as_integer(),
                _ => None,
            };
            let count = count.context(UnsupportedSyntaxSnafu { text: tokens(call) })?;
            return Ok(PatternExpr::Wildcard(lower_wildcard(wildcard)?.with_min_count(count)?));
        }
        [name] => (OpKind::Plain, name.as_str()),
        [prefix, name] => {
            let kind = match prefix.as_str() {
                "Assoc" => OpKind::Associative,
                "Comm" => OpKind::Commutative,
                "AC" => OpKind::AssociativeCommutative,
                _ => return unsupported(call),
            };
            (kind, name.as_str())
        }
        _ => return unsupported(call),
    };

    let head = match (kind, name) {
        (OpKind::AssociativeCommutative, "Add") => Head::ADD,
        (OpKind::AssociativeCommutative, "Mul") => Head::MUL,
        (OpKind::Plain, "Pow") => Head::POW,
        (kind, name) => Head::new(name, kind),
    };
    let operands = args.iter().map(lower).collect::<Result<Vec<_>>>()?;
    Ok(PatternExpr::operation(head, operands))
}

fn lower_optional(call: &ExprCall, args: &Punctuated<syn::Expr, syn::token::Comma>) -> Result<PatternExpr> {
    let wildcard = match args.first() {
        Some(first) => lower_wildcard(first)?,
        None => return unsupported(call),
    };
    ensure!(args.len() == 2, MissingDefaultSnafu { name: wildcard.name().map(str::to_owned) });
    let default = lower(&args[1])?;
    let default = default.to_expr().context(WildcardInSubjectSnafu { text: default.to_string() })?;
    Ok(PatternExpr::Wildcard(wildcard.with_default(default)))
}

fn lower_wildcard(expr: &syn::Expr) -> Result<Wildcard> {
    match lower(expr)? {
        PatternExpr::Wildcard(wildcard) => Ok(wildcard),
        _ => unsupported(expr),
    }
}

fn two_args<'a>(call: &ExprCall, args: &'a Punctuated<syn::Expr, syn::token::Comma>) -> Result<[&'a syn::Expr; 2]> {
    match args.iter().collect::<Vec<_>>().as_slice() {
        [first, second] => Ok([*first, *second]),
        _ => unsupported(call),
    }
}

fn path_ident(expr: &syn::Expr) -> Option<String> {
    match expr {
        syn::Expr::Path(path) => path.path.get_ident().map(|ident| ident.to_string()),
        _ => None,
    }
}

fn tokens(node: &impl ToTokens) -> String {
    node.to_token_stream().to_string()
}

fn unsupported<T>(node: &impl ToTokens) -> Result<T> {
    UnsupportedSyntaxSnafu { text: tokens(node) }.fail()
}
