//! Built-in constraint predicates.
//!
//! Predicates are evaluated over bindings in the order of the constraint's variable list. Unary
//! predicates applied to a sequence binding hold when they hold for every element.

use matchgen_expr::Expr;

use crate::substitution::Binding;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[derive(strum::Display, strum::EnumString, strum::EnumIter, strum::IntoStaticStr)]
pub enum Predicate {
    IsInteger,
    IsSymbol,
    IsPositive,
    IsNegative,
    IsNonZero,
    Equal,
    NotEqual,
    /// No element of the first binding contains any element of the second.
    FreeOf,
}

impl Predicate {
    pub const fn arity(self) -> usize {
        match self {
            Self::IsInteger | Self::IsSymbol | Self::IsPositive | Self::IsNegative | Self::IsNonZero => 1,
            Self::Equal | Self::NotEqual | Self::FreeOf => 2,
        }
    }

    pub fn check(self, args: &[&Binding]) -> bool {
        match (self, args) {
            (Self::IsInteger, [value]) => all(value, |e| e.as_integer().is_some()),
            (Self::IsSymbol, [value]) => all(value, |e| e.as_symbol().is_some()),
            (Self::IsPositive, [value]) => all(value, |e| e.as_integer().is_some_and(|n| n > 0)),
            (Self::IsNegative, [value]) => all(value, |e| e.as_integer().is_some_and(|n| n < 0)),
            (Self::IsNonZero, [value]) => all(value, |e| e.as_integer() != Some(0)),
            (Self::Equal, [lhs, rhs]) => lhs == rhs,
            (Self::NotEqual, [lhs, rhs]) => lhs != rhs,
            (Self::FreeOf, [haystack, needles]) => {
                all(haystack, |e| needles.elements().iter().all(|needle| !e.contains(needle)))
            }
            _ => false,
        }
    }
}

fn all(binding: &Binding, test: impl Fn(&Expr) -> bool) -> bool {
    binding.elements().iter().all(|e| test(e))
}
