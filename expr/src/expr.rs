//! Expression nodes and canonical construction.

use std::sync::Arc;

use smallvec::SmallVec;

use crate::head::{Head, OpKind};

/// Subtype carried by every symbol. Symbol wildcards only accept symbols of their subtype.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[derive(strum::Display, strum::EnumString, strum::EnumIter)]
pub enum SymbolKind {
    #[default]
    Plain,
    Dummy,
    Constant,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol {
    name: Arc<str>,
    kind: SymbolKind,
}

impl Symbol {
    pub fn new(name: &str, kind: SymbolKind) -> Self {
        Self { name: Arc::from(name), kind }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> SymbolKind {
        self.kind
    }
}

/// Argument list of an operation node.
pub type Args = SmallVec<[Arc<Expr>; 4]>;

/// Immutable symbolic expression.
///
/// The derived order sorts integers before symbols before operations; commutative operations use it
/// to keep their arguments in canonical order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Expr {
    Integer(i64),
    Symbol(Symbol),
    Operation { head: Head, args: Args },
}

impl Expr {
    pub fn integer(value: i64) -> Arc<Self> {
        Arc::new(Self::Integer(value))
    }

    pub fn symbol(name: &str) -> Arc<Self> {
        Self::symbol_of(name, SymbolKind::Plain)
    }

    pub fn symbol_of(name: &str, kind: SymbolKind) -> Arc<Self> {
        Arc::new(Self::Symbol(Symbol::new(name, kind)))
    }

    /// Build an operation node in canonical form.
    ///
    /// Arguments that are themselves operations with the same associative head are spliced in place,
    /// and arguments of commutative heads are sorted.
    pub fn operation(head: Head, args: impl IntoIterator<Item = Arc<Expr>>) -> Arc<Self> {
        let mut flat = Args::new();
        for arg in args {
            match arg.as_ref() {
                Self::Operation { head: inner, args: inner_args } if head.is_associative() && *inner == head => {
                    flat.extend(inner_args.iter().cloned())
                }
                _ => flat.push(arg),
            }
        }
        if head.is_commutative() {
            flat.sort();
        }
        Arc::new(Self::Operation { head, args: flat })
    }

    /// Wrap leftover arguments of an associative operation.
    ///
    /// A single argument is returned unwrapped.
    pub fn rewrap(head: &Head, args: &[Arc<Expr>]) -> Arc<Self> {
        match args {
            [single] => single.clone(),
            _ => Self::operation(head.clone(), args.iter().cloned()),
        }
    }

    pub fn add(args: impl IntoIterator<Item = Arc<Expr>>) -> Arc<Self> {
        Self::operation(Head::ADD, args)
    }

    pub fn mul(args: impl IntoIterator<Item = Arc<Expr>>) -> Arc<Self> {
        Self::operation(Head::MUL, args)
    }

    pub fn pow(base: Arc<Expr>, exponent: Arc<Expr>) -> Arc<Self> {
        Self::operation(Head::POW, [base, exponent])
    }

    /// Plain (ordered, non-commutative) function application.
    pub fn function(name: &str, args: impl IntoIterator<Item = Arc<Expr>>) -> Arc<Self> {
        Self::operation(Head::new(name, OpKind::Plain), args)
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    pub fn head(&self) -> Option<&Head> {
        match self {
            Self::Operation { head, .. } => Some(head),
            _ => None,
        }
    }

    /// Ordered arguments; empty for atoms.
    pub fn args(&self) -> &[Arc<Expr>] {
        match self {
            Self::Operation { args, .. } => args,
            _ => &[],
        }
    }

    pub fn as_symbol(&self) -> Option<&Symbol> {
        match self {
            Self::Symbol(symbol) => Some(symbol),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(*value),
            _ => None,
        }
    }

    pub fn is_atom(&self) -> bool {
        !matches!(self, Self::Operation { .. })
    }

    pub fn is_operation(&self, head: &Head) -> bool {
        self.head() == Some(head)
    }

    pub fn is_symbol_with(&self, name: &str, kind: SymbolKind) -> bool {
        self.as_symbol().is_some_and(|s| s.name() == name && s.kind() == kind)
    }

    pub fn is_symbol_of(&self, kind: SymbolKind) -> bool {
        self.as_symbol().is_some_and(|s| s.kind() == kind)
    }

    /// Whether `other` occurs anywhere in this expression, including the expression itself.
    pub fn contains(&self, other: &Expr) -> bool {
        self == other || self.args().iter().any(|arg| arg.contains(other))
    }

    /// Number of nodes.
    pub fn size(&self) -> usize {
        1 + self.args().iter().map(|arg| arg.size()).sum::<usize>()
    }

    /// Preorder traversal of all subexpressions.
    pub fn preorder(self: &Arc<Self>) -> Vec<Arc<Expr>> {
        let mut out = Vec::with_capacity(self.size());
        let mut stack = vec![self.clone()];
        while let Some(node) = stack.pop() {
            stack.extend(node.args().iter().rev().cloned());
            out.push(node);
        }
        out
    }
}
