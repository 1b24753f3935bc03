//! Error types for the driver.

use std::path::PathBuf;

use snafu::Snafu;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("I/O error on {}: {source}", path.display()))]
    Io { path: PathBuf, source: std::io::Error },

    #[snafu(display("Invalid suite file {}: {source}", path.display()))]
    Json { path: PathBuf, source: serde_json::Error },

    /// A pattern or one of its constraints does not compile.
    #[snafu(display("Suite `{suite}`: pattern `{pattern}`: {source}"))]
    Pattern { suite: String, pattern: String, source: matchgen_pattern::Error },

    /// A case subject or expected binding is not a valid expression.
    #[snafu(display("Suite `{suite}`: expression `{text}`: {source}"))]
    Subject { suite: String, text: String, source: matchgen_pattern::Error },

    #[snafu(display("Suite `{suite}`: {source}"))]
    Codegen { suite: String, source: matchgen_codegen::Error },

    /// Suite names become module names.
    #[snafu(display("Suite name `{name}` is not a Rust identifier"))]
    InvalidSuiteName { name: String },

    #[snafu(display("Suite `{suite}`: {failures} of {cases} cases failed:\n{details}"))]
    Verification { suite: String, cases: usize, failures: usize, details: String },
}
