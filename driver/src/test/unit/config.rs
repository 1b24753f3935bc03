use std::path::PathBuf;

use crate::DriverConfig;
use crate::config::DEFAULT_OUT_DIR;

#[test]
fn test_builder_defaults() {
    let config = DriverConfig::builder().build();
    assert_eq!(config.out_dir, PathBuf::from(DEFAULT_OUT_DIR));
    assert_eq!(config.function_name, "match_root");
    assert!(config.emit_tests);
    assert!(!config.rustfmt);
    assert_eq!(config, DriverConfig::default());
}

#[test]
fn test_builder_overrides() {
    let config = DriverConfig::builder()
        .out_dir("out/matchers")
        .function_name("match_rules")
        .emit_tests(false)
        .rustfmt(true)
        .build();
    assert_eq!(config.out_dir, PathBuf::from("out/matchers"));
    assert_eq!(config.function_name, "match_rules");
    assert!(!config.emit_tests);
    assert!(config.rustfmt);
}
