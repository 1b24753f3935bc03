//! Error types for code generation.

use snafu::Snafu;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    /// A custom constraint names something that is not a Rust path.
    #[snafu(display("Invalid constraint path {path:?}: {source}"))]
    InvalidConstraintPath { path: String, source: syn::Error },

    #[snafu(display("Invalid matcher function name {name:?}: {source}"))]
    InvalidFunctionName { name: String, source: syn::Error },

    /// The entry point would collide with an item the generator emits or imports.
    #[snafu(display("Matcher function name {name:?} is reserved for generated items"))]
    ReservedFunctionName { name: String },

    /// Generated tokens do not form a Rust file.
    #[snafu(display("Generated code does not parse: {source}"))]
    Parse { source: syn::Error },
}
