//! Driver configuration.

use std::path::PathBuf;

use bon::bon;
use matchgen_codegen::DEFAULT_FUNCTION;

/// Directory generated modules are written to when none is configured.
pub const DEFAULT_OUT_DIR: &str = "generated";

/// Where and how suites are emitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverConfig {
    pub out_dir: PathBuf,
    /// Name of the entry point in every generated module.
    pub function_name: String,
    /// Append a `#[cfg(test)]` module asserting the suite's cases.
    pub emit_tests: bool,
    /// Format written files with `rustfmt`.
    pub rustfmt: bool,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

#[bon]
impl DriverConfig {
    #[builder]
    pub fn new(
        #[builder(into, default = PathBuf::from(DEFAULT_OUT_DIR))] out_dir: PathBuf,
        #[builder(into, default = DEFAULT_FUNCTION.to_owned())] function_name: String,
        #[builder(default = true)] emit_tests: bool,
        #[builder(default = false)] rustfmt: bool,
    ) -> Self {
        Self { out_dir, function_name, emit_tests, rustfmt }
    }

    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// * `MATCHGEN_OUT_DIR` - Output directory (default: `generated`)
    /// * `MATCHGEN_FUNCTION` - Entry point name (default: `match_root`)
    /// * `MATCHGEN_NO_TESTS` - Skip generated test modules if set
    /// * `MATCHGEN_RUSTFMT` - Run `rustfmt` on written files if set to anything but `0`
    pub fn from_env() -> Self {
        let out_dir = std::env::var_os("MATCHGEN_OUT_DIR").map(PathBuf::from).unwrap_or_else(|| DEFAULT_OUT_DIR.into());
        let function_name = std::env::var("MATCHGEN_FUNCTION").unwrap_or_else(|_| DEFAULT_FUNCTION.to_owned());
        let emit_tests = std::env::var_os("MATCHGEN_NO_TESTS").is_none();
        let rustfmt = std::env::var("MATCHGEN_RUSTFMT").is_ok_and(|value| value != "0");

        Self { out_dir, function_name, emit_tests, rustfmt }
    }
}
