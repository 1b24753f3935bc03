//! `matchgen` command-line interface.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use matchgen_automaton::Automaton;
use matchgen_driver::error::{PatternSnafu, SubjectSnafu};
use matchgen_driver::{DriverConfig, Result, Suite, emit_all, verify_suite};
use matchgen_pattern::{Pattern, parse};
use snafu::ResultExt;
use tracing::error;
use tracing_subscriber::EnvFilter;

/// Compile pattern suites into Rust matchers.
#[derive(Parser, Debug)]
#[command(name = "matchgen", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate one matcher module per suite plus a `mod.rs`.
    Emit {
        /// Suite files (JSON).
        suites: Vec<PathBuf>,
        /// Also emit the builtin reference suites.
        #[arg(long)]
        builtin: bool,
        /// Output directory [default: $MATCHGEN_OUT_DIR or `generated`].
        #[arg(long)]
        out: Option<PathBuf>,
        /// Entry point name [default: $MATCHGEN_FUNCTION or `match_root`].
        #[arg(long)]
        function: Option<String>,
        /// Do not append test modules.
        #[arg(long)]
        no_tests: bool,
        /// Format the output with rustfmt.
        #[arg(long)]
        rustfmt: bool,
    },
    /// Check suite cases against the interpreter.
    Verify {
        suites: Vec<PathBuf>,
        #[arg(long)]
        builtin: bool,
    },
    /// Print every match of one subject.
    Match {
        /// Pattern in the pattern syntax; repeat for several patterns.
        #[arg(short, long = "pattern", required = true)]
        patterns: Vec<String>,
        #[arg(short, long)]
        subject: String,
    },
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    match run(Cli::parse().command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "matchgen failed");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Emit { suites, builtin, out, function, no_tests, rustfmt } => {
            let mut config = DriverConfig::from_env();
            if let Some(out) = out {
                config.out_dir = out;
            }
            if let Some(function) = function {
                config.function_name = function;
            }
            config.emit_tests &= !no_tests;
            config.rustfmt |= rustfmt;

            for path in emit_all(&load(&suites, builtin)?, &config)? {
                println!("{}", path.display());
            }
        }
        Command::Verify { suites, builtin } => {
            for suite in load(&suites, builtin)? {
                let report = verify_suite(&suite)?.into_result()?;
                println!("{}: {} cases passed", report.suite, report.cases);
            }
        }
        Command::Match { patterns, subject } => {
            let compiled = patterns
                .iter()
                .map(|text| Pattern::parse(text).context(PatternSnafu { suite: "command line", pattern: text }))
                .collect::<Result<Vec<_>>>()?;
            let automaton = Automaton::from_patterns(&compiled);
            let subject = parse::subject(&subject).context(SubjectSnafu { suite: "command line", text: &subject })?;
            for (index, subst) in automaton.match_expr(&subject) {
                println!("{index}: {} {subst}", patterns[index]);
            }
        }
    }
    Ok(())
}

fn load(paths: &[PathBuf], builtin: bool) -> Result<Vec<Suite>> {
    let mut suites = paths.iter().map(Suite::load).collect::<Result<Vec<_>>>()?;
    if builtin {
        suites.extend(Suite::builtin());
    }
    Ok(suites)
}
