//! Compilation and emission of suites.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use itertools::Itertools;
use matchgen_automaton::Automaton;
use matchgen_codegen::{CodeGenerator, GeneratedCode, construct_expr};
use matchgen_pattern::{Pattern, parse};
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use snafu::{ResultExt, ensure};
use tracing::{debug, info, warn};

use crate::config::DriverConfig;
use crate::error::*;
use crate::suite::Suite;

/// First line of every generated file.
pub const HEADER: &str = "// This file was automatically generated: DO NOT EDIT.";

/// A suite turned into an automaton and matcher source.
#[derive(Debug, Clone)]
pub struct CompiledSuite {
    pub patterns: Vec<Pattern>,
    pub automaton: Automaton,
    pub code: GeneratedCode,
}

/// Parse the suite's patterns, build their automaton and generate the matcher.
pub fn compile_suite(suite: &Suite, config: &DriverConfig) -> Result<CompiledSuite> {
    let patterns = suite.compile_patterns()?;
    let automaton = Automaton::from_patterns(&patterns);
    let code = CodeGenerator::builder()
        .function_name(config.function_name.clone())
        .build()
        .generate(&automaton)
        .context(CodegenSnafu { suite: &suite.name })?;

    info!(
        suite = %suite.name,
        patterns = patterns.len(),
        states = automaton.state_count(),
        matchers = code.matcher_count(),
        "compiled suite"
    );
    Ok(CompiledSuite { patterns, automaton, code })
}

/// Contents of the generated module for `suite`.
pub fn render_suite(suite: &Suite, config: &DriverConfig) -> Result<String> {
    ensure!(syn::parse_str::<syn::Ident>(&suite.name).is_ok(), InvalidSuiteNameSnafu { name: &suite.name });
    let compiled = compile_suite(suite, config)?;

    let mut out = String::new();
    out.push_str(HEADER);
    out.push_str("\n//\n// Decision tree matching patterns:\n");
    for (index, spec) in suite.patterns.iter().enumerate() {
        out.push_str(&format!("//   {index}: {}\n", spec.pattern));
    }
    out.push('\n');
    out.push_str(&compiled.code.to_string());
    out.push('\n');

    if config.emit_tests {
        out.push('\n');
        out.push_str(&case_tests(suite, compiled.code.function())?.to_string());
        out.push('\n');
    }
    Ok(out)
}

/// Write `<out_dir>/<name>.rs` for `suite`.
pub fn emit_suite(suite: &Suite, config: &DriverConfig) -> Result<PathBuf> {
    let contents = render_suite(suite, config)?;
    fs::create_dir_all(&config.out_dir).context(IoSnafu { path: &config.out_dir })?;
    let path = config.out_dir.join(format!("{}.rs", suite.name));
    fs::write(&path, contents).context(IoSnafu { path: &path })?;
    if config.rustfmt {
        format_file(&path);
    }
    debug!(suite = %suite.name, path = %path.display(), "emitted suite");
    Ok(path)
}

/// Emit every suite plus a `mod.rs` declaring them; returns the written paths, `mod.rs` last.
pub fn emit_all(suites: &[Suite], config: &DriverConfig) -> Result<Vec<PathBuf>> {
    let mut paths = suites.iter().map(|suite| emit_suite(suite, config)).collect::<Result<Vec<_>>>()?;

    let modules = suites.iter().map(|suite| format!("pub mod {};\n", suite.name)).join("");
    let path = config.out_dir.join("mod.rs");
    fs::create_dir_all(&config.out_dir).context(IoSnafu { path: &config.out_dir })?;
    fs::write(&path, format!("{HEADER}\n\n{modules}")).context(IoSnafu { path: &path })?;
    info!(suites = suites.len(), out_dir = %config.out_dir.display(), "emitted suites");

    paths.push(path);
    Ok(paths)
}

/// `#[cfg(test)]` module asserting the first result of every case.
fn case_tests(suite: &Suite, function: &str) -> Result<TokenStream> {
    let function = format_ident!("{}", function);
    let mut tests = TokenStream::new();
    for (number, case) in suite.cases.iter().enumerate() {
        let name = format_ident!("case_{}", number);
        let subject = &case.subject;
        let parsed = parse::subject(subject).context(SubjectSnafu { suite: &suite.name, text: subject })?;
        let construction = construct_expr(&parsed);
        let body = match &case.expect {
            None => quote! {
                assert!(results.is_empty(), "{} should not match, got {:?}", #subject, results);
            },
            Some(expected) => {
                let pattern = proc_macro2::Literal::usize_unsuffixed(expected.pattern);
                let bindings = expected.rendered_bindings(&suite.name)?.into_iter().map(|(variable, value)| {
                    quote! {
                        assert_eq!(subst.get(#variable).map(ToString::to_string).as_deref(), Some(#value));
                    }
                });
                quote! {
                    assert!(!results.is_empty(), "{} should match", #subject);
                    assert_eq!(results[0].0, #pattern);
                    let subst = &results[0].1;
                    #(#bindings)*
                }
            }
        };
        tests.extend(quote! {
            #[test]
            fn #name() {
                let subject = #construction;
                let results: Vec<(usize, Substitution)> = #function(&subject).collect();
                #body
            }
        });
    }
    Ok(quote! {
    })
}

fn format_file(path: &Path) {
    match Command::new("rustfmt").args(["--edition", "2024"]).arg(path).status() {
        Ok(status) if status.success() => {}
        Ok(status) => warn!(path = %path.display(), %status, "rustfmt failed, keeping unformatted output"),
        Err(error) => warn!(path = %path.display(), %error, "rustfmt unavailable, keeping unformatted output"),
    }
}
