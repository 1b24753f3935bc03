//! Operation heads.

use std::borrow::Cow;

/// Algebraic kind of an operation head.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[derive(strum::Display, strum::EnumString, strum::EnumIter)]
pub enum OpKind {
    /// Ordered, non-commutative arguments.
    Plain,
    /// Nested same-head operations may be regrouped; argument order matters.
    Associative,
    /// Argument order is irrelevant.
    Commutative,
    /// Both of the above.
    AssociativeCommutative,
}

impl OpKind {
    pub const fn is_associative(self) -> bool {
        matches!(self, Self::Associative | Self::AssociativeCommutative)
    }

    pub const fn is_commutative(self) -> bool {
        matches!(self, Self::Commutative | Self::AssociativeCommutative)
    }

    /// Path prefix used by the textual form (`AC::f(..)`), empty for plain heads.
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Plain => "",
            Self::Associative => "Assoc",
            Self::Commutative => "Comm",
            Self::AssociativeCommutative => "AC",
        }
    }
}

/// Operation type tag: a name plus its algebraic kind.
///
/// Two heads are equal when both name and kind are equal. `from_static` is `const` so generated
/// matchers can declare their heads as constants.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Head {
    name: Cow<'static, str>,
    kind: OpKind,
}

impl Head {
    pub const ADD: Head = Head::from_static("Add", OpKind::AssociativeCommutative);
    pub const MUL: Head = Head::from_static("Mul", OpKind::AssociativeCommutative);
    pub const POW: Head = Head::from_static("Pow", OpKind::Plain);

    pub const fn from_static(name: &'static str, kind: OpKind) -> Self {
        Self { name: Cow::Borrowed(name), kind }
    }

    pub fn new(name: impl Into<String>, kind: OpKind) -> Self {
        Self { name: Cow::Owned(name.into()), kind }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> OpKind {
        self.kind
    }

    pub fn is_associative(&self) -> bool {
        self.kind.is_associative()
    }

    pub fn is_commutative(&self) -> bool {
        self.kind.is_commutative()
    }

    /// Heads printed infix (`a + b`, `a*b`).
    pub(crate) fn infix_operator(&self) -> Option<&'static str> {
        if *self == Self::ADD {
            Some(" + ")
        } else if *self == Self::MUL {
            Some("*")
        } else {
            None
        }
    }
}
