//! Conformance tests that run YAML fixtures against typefind
//!
//! Run with: cargo test -p typefind-test --test conformance --features typefind-test/fixtures
//!
//! Note: This test file requires the `fixtures` feature to be enabled.

#![cfg(feature = "fixtures")]

use std::fs;
use std::path::{Path, PathBuf};
use typefind_test::fixture::Fixture;

/// The conformance directory at the workspace root
fn fixtures_dir() -> PathBuf {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    Path::new(manifest_dir)
        .parent() // ext
        .and_then(Path::parent) // workspace root
        .expect("Could not find workspace root")
        .join("conformance")
}

/// Load and run all fixtures in a directory
fn run_fixtures_in_dir(dir: &Path) {
    assert!(
        dir.exists(),
        "Fixtures directory does not exist: {}",
        dir.display()
    );

    for entry in fs::read_dir(dir).expect("read dir") {
        let path = entry.expect("dir entry").path();

        if path.extension().is_some_and(|e| e == "yaml" || e == "yml") {
            println!("Running fixture: {}", path.display());

            let yaml = fs::read_to_string(&path).expect("read yaml");

            // Parse potentially multiple fixtures (separated by ---)
            let fixtures = Fixture::from_yaml_multi(&yaml).unwrap_or_else(|e| {
                panic!("Failed to parse {}: {}", path.display(), e);
            });

            for fixture in fixtures {
                println!("  Running: {}", fixture.name);
                fixture.run_and_assert();
            }
        }
    }
}

#[test]
fn test_traversal() {
    run_fixtures_in_dir(&fixtures_dir().join("01_traversal"));
}

#[test]
fn test_predicates() {
    run_fixtures_in_dir(&fixtures_dir().join("02_predicates"));
}

#[test]
fn test_constraints() {
    run_fixtures_in_dir(&fixtures_dir().join("03_constraints"));
}

#[test]
fn test_failures() {
    run_fixtures_in_dir(&fixtures_dir().join("04_failures"));
}
