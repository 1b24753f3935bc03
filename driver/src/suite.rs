//! Suite files.
//!
//! ```json
//! {
//!   "name": "powers",
//!   "patterns": [
//!     { "pattern": "Pow(x_, n_)", "constraints": { "n": ["IsInteger(n)"] } },
//!     { "pattern": "f(x_, y_)", "global": ["NotEqual(x, y)"] }
//!   ],
//!   "cases": [
//!     { "subject": "Pow(a, 2)", "expect": { "pattern": 0, "bindings": { "x": "a", "n": "2" } } },
//!     { "subject": "Pow(a, b)", "expect": null }
//!   ]
//! }
//! ```
//!
//! Constraints are written in the predicate syntax of [`matchgen_pattern::parse::constraint`].
//! Custom constraints carry a Rust function and cannot be expressed in suite files.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use matchgen_pattern::{Pattern, parse};
use serde::{Deserialize, Serialize};
use snafu::ResultExt;
use tracing::debug;

use crate::error::*;

/// Named pattern list plus cases checked against its matcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suite {
    /// Module name of the generated matcher.
    pub name: String,
    pub patterns: Vec<PatternSpec>,
    #[serde(default)]
    pub cases: Vec<Case>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternSpec {
    pub pattern: String,
    /// Constraints attached to a variable, by variable name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub constraints: BTreeMap<String, Vec<String>>,
    /// Constraints checked once the whole pattern has matched.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub global: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Case {
    pub subject: String,
    /// First expected result; `None` when nothing may match.
    pub expect: Option<Expectation>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expectation {
    pub pattern: usize,
    /// Expected bindings of some variables: an expression, or `[a, b]` for sequence bindings.
    #[serde(default)]
    pub bindings: BTreeMap<String, String>,
}

impl From<&str> for PatternSpec {
    fn from(pattern: &str) -> Self {
        Self { pattern: pattern.to_owned(), constraints: BTreeMap::new(), global: Vec::new() }
    }
}

impl PatternSpec {
    pub fn compile(&self) -> matchgen_pattern::Result<Pattern> {
        let mut pattern = Pattern::parse(&self.pattern)?;
        for (variable, constraints) in &self.constraints {
            for text in constraints {
                pattern = pattern.with_constraint(variable, parse::constraint(text)?)?;
            }
        }
        for text in &self.global {
            pattern = pattern.with_global(parse::constraint(text)?)?;
        }
        Ok(pattern)
    }
}

impl Case {
    pub fn matching(subject: &str, pattern: usize, bindings: &[(&str, &str)]) -> Self {
        let bindings = bindings.iter().map(|(name, value)| ((*name).to_owned(), (*value).to_owned())).collect();
        Self { subject: subject.to_owned(), expect: Some(Expectation { pattern, bindings }) }
    }

    pub fn failing(subject: &str) -> Self {
        Self { subject: subject.to_owned(), expect: None }
    }
}

impl Suite {
    pub fn new(name: impl Into<String>, patterns: &[&str], cases: Vec<Case>) -> Self {
        Self { name: name.into(), patterns: patterns.iter().map(|&p| p.into()).collect(), cases }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).context(IoSnafu { path })?;
        let suite: Self = serde_json::from_str(&text).context(JsonSnafu { path })?;
        debug!(path = %path.display(), suite = %suite.name, patterns = suite.patterns.len(), "loaded suite");
        Ok(suite)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let text = serde_json::to_string_pretty(self).context(JsonSnafu { path })?;
        fs::write(path, text).context(IoSnafu { path })
    }

    /// Every pattern with its constraints, in suite order.
    pub fn compile_patterns(&self) -> Result<Vec<Pattern>> {
        self.patterns
            .iter()
            .map(|spec| spec.compile().context(PatternSnafu { suite: &self.name, pattern: &spec.pattern }))
            .collect()
    }

    /// Reference scenarios: bare symbols, powers, an optional wildcard over a sum, commutative
    /// sums and optional operands of associative-commutative heads.
    pub fn builtin() -> Vec<Suite> {
        vec![
            Suite::new("case_001", &["x"], vec![Case::matching("x", 0, &[]), Case::failing("y")]),
            Suite::new(
                "case_002",
                &["Pow(x, y)"],
                vec![Case::matching("Pow(x, y)", 0, &[]), Case::failing("Pow(x, z)")],
            ),
            Suite::new(
                "case_003",
                &["Pow(x, y)", "w_"],
                vec![
                    Case::matching("Pow(x, y)", 0, &[]),
                    Case::matching("x", 1, &[("w", "x")]),
                    Case::matching("x + y", 1, &[("w", "x + y")]),
                ],
            ),
            Suite::new(
                "case_004",
                &["x + y", "Pow(x, 2)"],
                vec![Case::matching("y + x", 0, &[]), Case::matching("Pow(x, 2)", 1, &[]), Case::failing("Pow(x, 3)")],
            ),
            Suite::new(
                "case_005",
                &["Pow(x, w_)"],
                vec![
                    Case::failing("y + x"),
                    Case::matching("Pow(x, 2)", 0, &[("w", "2")]),
                    Case::matching("Pow(x, 3)", 0, &[("w", "3")]),
                ],
            ),
            Suite::new(
                "case_006",
                &["Pow(x, x + Optional(w_, 0))", "x + y + Optional(w_, 0)", "Pow(w_, 1 - x*w_)"],
                vec![
                    Case::matching("y + x", 1, &[("w", "0")]),
                    Case::failing("Pow(x, 2)"),
                    Case::matching("Pow(x, y + x)", 0, &[("w", "y")]),
                    Case::matching("Pow(x, 2 + x)", 0, &[("w", "2")]),
                ],
            ),
        ]
    }
}

impl Expectation {
    /// Expected bindings in their printed form, as [`Binding`](matchgen_runtime::Binding)s display.
    pub fn rendered_bindings(&self, suite: &str) -> Result<Vec<(String, String)>> {
        self.bindings
            .iter()
            .map(|(name, text)| {
                let rendered = if text.trim_start().starts_with('[') {
                    text.clone()
                } else {
                    parse::subject(text).context(SubjectSnafu { suite, text })?.to_string()
                };
                Ok((name.clone(), rendered))
            })
            .collect()
    }
}
