//! Renders the builtin suites and every suite under `suites/` into `$OUT_DIR/suites.rs`.
//!
//! Each suite becomes an inline module holding its generated matcher and case tests, followed by
//! a `MATCHERS` table of entry points by suite name.

use std::env;
use std::error::Error;
use std::fmt::Write;
use std::fs;
use std::path::{Path, PathBuf};

use matchgen_driver::{DriverConfig, Suite, render_suite};

const SUITES: &str = "suites";

fn main() -> Result<(), Box<dyn Error>> {
    println!("cargo::rerun-if-changed={SUITES}");
    let out_dir = PathBuf::from(env::var("OUT_DIR")?);

    let config = DriverConfig::builder().build();
    let mut out = String::new();
    let mut table = Vec::new();
    for suite in suites(Path::new(SUITES))? {
        let rendered = render_suite(&suite, &config)?;
        writeln!(out, "pub mod {} {{\n{rendered}\n}}\n", suite.name)?;
        table.push(format!("    (\"{0}\", {0}::{1} as Matcher),", suite.name, config.function_name));
    }
    writeln!(out, "/// Generated entry points by suite name.")?;
    writeln!(out, "pub static MATCHERS: &[(&str, Matcher)] = &[\n{}\n];", table.join("\n"))?;

    fs::write(out_dir.join("suites.rs"), out)?;
    Ok(())
}

fn suites(dir: &Path) -> Result<Vec<Suite>, Box<dyn Error>> {
    let mut paths = fs::read_dir(dir)?.map(|entry| entry.map(|entry| entry.path())).collect::<Result<Vec<_>, _>>()?;
    paths.retain(|path| path.extension().is_some_and(|extension| extension == "json"));
    paths.sort();

    let mut suites = Suite::builtin();
    for path in paths {
        println!("cargo::rerun-if-changed={}", path.display());
        suites.push(Suite::load(&path)?);
    }
    Ok(suites)
}
