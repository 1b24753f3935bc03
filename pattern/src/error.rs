use matchgen_runtime::Predicate;
use snafu::Snafu;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    /// Sequence wildcard declared with a negative minimum count.
    #[snafu(display("malformed pattern: wildcard {} has negative minimum count {min_count}", display_name(name)))]
    NegativeMinCount { name: Option<String>, min_count: i64 },

    /// Fixed wildcards match exactly one expression.
    #[snafu(display(
        "malformed pattern: fixed wildcard {} must have minimum count 1, got {min_count}",
        display_name(name)
    ))]
    FixedWildcardCount { name: Option<String>, min_count: i64 },

    #[snafu(display("malformed pattern: symbol wildcard {} must be fixed-size", display_name(name)))]
    SymbolWildcardNotFixed { name: Option<String> },

    #[snafu(display("malformed pattern: optional wildcard {} declares no default", display_name(name)))]
    MissingDefault { name: Option<String> },

    /// The same variable is used both as a fixed and as a sequence wildcard.
    #[snafu(display("malformed pattern: variable `{name}` is bound to incompatible wildcard kinds"))]
    InconsistentVariable { name: String },

    #[snafu(display("constraint refers to unknown variable `{name}`"))]
    UnknownVariable { name: String },

    /// A constraint over no variable would never become ready.
    #[snafu(display("constraint `{constraint}` refers to no variable"))]
    ConstraintWithoutVariables { constraint: String },

    #[snafu(display("predicate {predicate} takes {expected} variables, got {actual}"))]
    ConstraintArity { predicate: Predicate, expected: usize, actual: usize },

    #[snafu(display("syntax error: {source}"))]
    Syntax { source: syn::Error },

    #[snafu(display("unsupported syntax `{text}`"))]
    UnsupportedSyntax { text: String },

    #[snafu(display("wildcard `{text}` is not allowed in a subject expression"))]
    WildcardInSubject { text: String },
}

impl Error {
    /// Invalid wildcard quantifiers or inconsistent variable usage.
    pub fn is_malformed_pattern(&self) -> bool {
        matches!(
            self,
            Self::NegativeMinCount { .. }
                | Self::FixedWildcardCount { .. }
                | Self::SymbolWildcardNotFixed { .. }
                | Self::MissingDefault { .. }
                | Self::InconsistentVariable { .. }
        )
    }
}

fn display_name(name: &Option<String>) -> String {
    match name {
        Some(name) => format!("`{name}`"),
        None => "(anonymous)".to_owned(),
    }
}
