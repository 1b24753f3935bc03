use std::fs;

use test_case::test_case;

use crate::emit::HEADER;
use crate::suite::{Case, Suite};
use crate::{DriverConfig, Error, compile_suite, emit_all, render_suite};

fn suite() -> Suite {
    Suite::new(
        "powers",
        &["Pow(x_, 2)", "x_ + y_"],
        vec![Case::matching("Pow(a, 2)", 0, &[("x", "a")]), Case::failing("f(a)")],
    )
}

#[test]
fn test_compile_suite() {
    let compiled = compile_suite(&suite(), &DriverConfig::default()).unwrap();
    assert_eq!(compiled.patterns.len(), 2);
    assert_eq!(compiled.code.pattern_count(), 2);
    assert_eq!(compiled.code.function(), "match_root");
    assert_eq!(compiled.code.matcher_count(), 1, "one matcher for the sum");
}

#[test_case(true; "with tests")]
#[test_case(false; "without tests")]
fn test_render_suite(emit_tests: bool) {
    let config = DriverConfig::builder().function_name("match_powers").emit_tests(emit_tests).build();
    let rendered = render_suite(&suite(), &config).unwrap();

    assert!(rendered.starts_with(HEADER), "{rendered}");
    assert!(rendered.contains("//   0: Pow(x_, 2)"), "{rendered}");
    let file = syn::parse_file(&rendered).expect("rendered suite is valid Rust");
    let has_function = file.items.iter().any(|item| matches!(item, syn::Item::Fn(f) if f.sig.ident == "match_powers"));
    assert!(has_function);
    let has_tests = file.items.iter().any(|item| matches!(item, syn::Item::Mod(m) if m.ident == "tests"));
    assert_eq!(has_tests, emit_tests);
}

#[test]
fn test_rendered_case_tests() {
    let rendered = render_suite(&suite(), &DriverConfig::default()).unwrap();
    assert!(rendered.contains("fn case_0"), "{rendered}");
    assert!(rendered.contains("fn case_1"), "{rendered}");
    assert!(rendered.contains("is_empty"), "{rendered}");
    assert!(!rendered.contains("matchgen_pattern"), "case tests depend on expr and runtime only:\n{rendered}");
}

#[test_case("not a module"; "spaces")]
#[test_case("mod"; "keyword")]
#[test_case("1st"; "leading digit")]
fn test_invalid_suite_name(name: &str) {
    let mut suite = suite();
    suite.name = name.to_owned();
    let result = render_suite(&suite, &DriverConfig::default());
    assert!(matches!(result, Err(Error::InvalidSuiteName { .. })), "{result:?}");
}

#[test]
fn test_emit_all() {
    let dir = tempfile::tempdir().unwrap();
    let out_dir = dir.path().join("generated");
    let config = DriverConfig::builder().out_dir(&out_dir).build();
    let suites = Suite::builtin();

    let paths = emit_all(&suites, &config).unwrap();
    assert_eq!(paths.len(), suites.len() + 1);
    assert_eq!(paths.last(), Some(&out_dir.join("mod.rs")));

    let modules = fs::read_to_string(out_dir.join("mod.rs")).unwrap();
    assert!(modules.starts_with(HEADER));
    for suite in &suites {
        assert!(modules.contains(&format!("pub mod {};", suite.name)), "{modules}");
        let written = fs::read_to_string(out_dir.join(format!("{}.rs", suite.name))).unwrap();
        syn::parse_file(&written).expect("emitted suite is valid Rust");
    }
}
