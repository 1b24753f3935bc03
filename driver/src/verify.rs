//! Checking suite cases with the interpreter.

use std::fmt;

use itertools::Itertools;
use matchgen_automaton::Automaton;
use matchgen_pattern::parse;
use matchgen_runtime::Substitution;
use snafu::{ResultExt, ensure};
use tracing::{debug, info};

use crate::error::*;
use crate::suite::{Case, Suite};

/// A case whose first result differs from its expectation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub subject: String,
    pub reason: String,
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.subject, self.reason)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub suite: String,
    pub cases: usize,
    pub failures: Vec<Failure>,
}

impl Report {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// `Err(Verification)` listing every failure unless all cases passed.
    pub fn into_result(self) -> Result<Self> {
        ensure!(
            self.is_success(),
            VerificationSnafu {
                suite: &self.suite,
                cases: self.cases,
                failures: self.failures.len(),
                details: self.failures.iter().map(|failure| format!("  {failure}")).join("\n"),
            }
        );
        Ok(self)
    }
}

/// Match every case subject with the suite's automaton and compare the first result.
pub fn verify_suite(suite: &Suite) -> Result<Report> {
    let patterns = suite.compile_patterns()?;
    let automaton = Automaton::from_patterns(&patterns);

    let mut failures = Vec::new();
    for case in &suite.cases {
        let subject = parse::subject(&case.subject).context(SubjectSnafu { suite: &suite.name, text: &case.subject })?;
        let results: Vec<(usize, Substitution)> = automaton.match_expr(&subject).collect();
        debug!(suite = %suite.name, subject = %subject, results = results.len(), "checked case");
        if let Some(reason) = mismatch(suite, case, &results)? {
            failures.push(Failure { subject: case.subject.clone(), reason });
        }
    }

    info!(suite = %suite.name, cases = suite.cases.len(), failures = failures.len(), "verified suite");
    Ok(Report { suite: suite.name.clone(), cases: suite.cases.len(), failures })
}

fn mismatch(suite: &Suite, case: &Case, results: &[(usize, Substitution)]) -> Result<Option<String>> {
    let Some(expected) = &case.expect else {
        return Ok(results.first().map(|(index, subst)| {
            format!("expected no match, got {} results starting with pattern {index} {subst}", results.len())
        }));
    };
    let Some((index, subst)) = results.first() else {
        return Ok(Some(format!("expected a match of pattern {}, got none", expected.pattern)));
    };
    if *index != expected.pattern {
        return Ok(Some(format!("expected pattern {} first, got pattern {index} {subst}", expected.pattern)));
    }
    for (variable, value) in expected.rendered_bindings(&suite.name)? {
        let actual = subst.get(&variable).map(ToString::to_string);
        if actual.as_deref() != Some(value.as_str()) {
            let actual = actual.unwrap_or_else(|| "nothing".to_owned());
            return Ok(Some(format!("expected `{variable}` bound to {value}, got {actual}")));
        }
    }
    Ok(None)
}
