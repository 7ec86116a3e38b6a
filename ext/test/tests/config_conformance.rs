//! Config conformance tests — validates the schema config loading path.
//!
//! Run with: cargo test -p typefind-test --test config_conformance --features typefind-test/registry,typefind-test/fixtures

#![cfg(all(feature = "fixtures", feature = "registry"))]

use std::fs;
use std::path::{Path, PathBuf};
use typefind_test::config_fixture::ConfigFixture;

/// The conformance directory at the workspace root.
fn fixtures_dir() -> PathBuf {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    Path::new(manifest_dir)
        .parent() // ext
        .and_then(Path::parent) // workspace root
        .expect("Could not find workspace root")
        .join("conformance")
}

/// Load and run all config fixtures in a directory.
fn run_config_fixtures(dir: &Path) {
    assert!(
        dir.exists(),
        "Config fixtures directory does not exist: {}",
        dir.display()
    );

    let registry = typefind_test::register(typefind::RegistryBuilder::new()).build();

    for entry in fs::read_dir(dir).expect("read dir") {
        let path = entry.expect("dir entry").path();

        if !path.extension().is_some_and(|e| e == "yaml" || e == "yml") {
            continue;
        }

        println!("Loading config fixture: {}", path.display());
        let yaml = fs::read_to_string(&path).expect("read yaml");
        let fixtures = ConfigFixture::from_yaml_multi(&yaml).unwrap_or_else(|e| {
            panic!("Failed to parse {}: {}", path.display(), e);
        });

        for fixture in fixtures {
            println!("  Running: {}", fixture.name);
            fixture.run_and_assert(&registry);
        }
    }
}

#[test]
fn test_schemas() {
    run_config_fixtures(&fixtures_dir().join("05_schemas"));
}

#[test]
fn test_schema_errors() {
    run_config_fixtures(&fixtures_dir().join("06_schema_errors"));
}
