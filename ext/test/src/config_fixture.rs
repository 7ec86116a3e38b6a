//! Config conformance fixture runner.
//!
//! Loads YAML fixtures that use the **schema config format** (the same
//! JSON/YAML shape as [`SchemaConfig`]). This tests the config-driven
//! loading path: YAML → `SchemaConfig` → `Registry::load_schema()` → find.
//!
//! Unlike the [`fixture`](crate::fixture) module (which uses a compact
//! notation and builds types by hand), this module exercises the production
//! config loading pipeline, including load-time errors.

use crate::fixture::{CaseResult, TestCase};
use serde::Deserialize;
use typefind::{Registry, Schema, SchemaConfig, SchemaError};

/// A config conformance test fixture.
///
/// The `schema` field is the raw YAML/JSON value that gets deserialized as
/// [`SchemaConfig`].
#[derive(Debug, Deserialize)]
pub struct ConfigFixture {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub schema: serde_json::Value,
    /// The named type the cases run against.
    #[serde(default, rename = "type")]
    pub type_name: Option<String>,
    #[serde(default)]
    pub cases: Vec<TestCase>,
    /// Loading must fail with this error kind (see [`schema_error_kind`]).
    #[serde(default)]
    pub expect_schema_error: Option<String>,
}

/// Stable snake_case name of a [`SchemaError`] variant, as written in fixtures.
#[must_use]
pub fn schema_error_kind(err: &SchemaError) -> &'static str {
    match err {
        SchemaError::DepthExceeded { .. } => "depth_exceeded",
        SchemaError::InvalidPattern { .. } => "invalid_pattern",
        SchemaError::InvalidConfig { .. } => "invalid_config",
        SchemaError::UnknownTypeUrl { .. } => "unknown_type_url",
        SchemaError::TooManyConstraints { .. } => "too_many_constraints",
        SchemaError::PatternTooLong { .. } => "pattern_too_long",
        SchemaError::DuplicateType { .. } => "duplicate_type",
        SchemaError::UnknownType { .. } => "unknown_type",
    }
}

impl ConfigFixture {
    /// Parse a single config fixture from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Parse multiple config fixtures from a YAML file with `---` separators.
    pub fn from_yaml_multi(yaml: &str) -> Result<Vec<Self>, serde_yaml::Error> {
        let mut fixtures = Vec::new();
        for doc in serde_yaml::Deserializer::from_str(yaml) {
            fixtures.push(Self::deserialize(doc)?);
        }
        Ok(fixtures)
    }

    /// Deserialize and load the schema. A config that does not deserialize
    /// is reported as [`SchemaError::InvalidConfig`].
    ///
    /// # Errors
    ///
    /// Any [`SchemaError`] from deserialization or loading.
    pub fn load(&self, registry: &Registry) -> Result<Schema, SchemaError> {
        let config: SchemaConfig =
            serde_json::from_value(self.schema.clone()).map_err(|e| SchemaError::InvalidConfig {
                source: e.to_string(),
            })?;
        registry.load_schema(config)
    }

    /// Load the schema and run all cases against the fixture's type.
    ///
    /// # Errors
    ///
    /// Any [`SchemaError`] from loading, or [`SchemaError::UnknownType`] if
    /// `type` names no type in the schema.
    pub fn run(&self, registry: &Registry) -> Result<Vec<CaseResult>, SchemaError> {
        let schema = self.load(registry)?;
        let name = self.type_name.as_deref().unwrap_or(&self.name);
        let finder = schema.require(name)?;
        Ok(self.cases.iter().map(|case| case.run(&finder)).collect())
    }

    /// Run the fixture and panic on the first mismatch.
    pub fn run_and_assert(&self, registry: &Registry) {
        if let Some(expected) = &self.expect_schema_error {
            match self.load(registry) {
                Ok(_) => panic!(
                    "Fixture '{}': expected schema error '{expected}', but loading succeeded",
                    self.name
                ),
                Err(err) => assert_eq!(
                    schema_error_kind(&err),
                    expected,
                    "Fixture '{}': wrong schema error: {err}",
                    self.name
                ),
            }
            return;
        }

        let results = self
            .run(registry)
            .unwrap_or_else(|e| panic!("Fixture '{}' failed to load: {e}", self.name));
        for result in results {
            assert!(
                result.passed,
                "Fixture '{}' case '{}' failed: expected {}, got {:?}",
                self.name, result.case_name, result.expected, result.actual
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> Registry {
        crate::register(typefind::RegistryBuilder::new()).build()
    }

    #[test]
    fn runs_cases_against_named_type() {
        let yaml = r#"
name: arn
schema:
  types:
    - name: arn
      constraint: { type: match, value_match: { prefix: "arn:" } }
cases:
  - name: one
    document: ["arn:a", b]
    expect: ["arn:a"]
"#;
        let fixture = ConfigFixture::from_yaml(yaml).unwrap();
        let results = fixture.run(&registry()).unwrap();
        assert!(results[0].passed);
    }

    #[test]
    fn unknown_type_is_error() {
        let yaml = "
name: t
type: missing
schema: { types: [] }
";
        let fixture = ConfigFixture::from_yaml(yaml).unwrap();
        let err = fixture.run(&registry()).unwrap_err();
        assert_eq!(schema_error_kind(&err), "unknown_type");
    }

    #[test]
    fn malformed_config_is_invalid_config() {
        let yaml = "
name: t
schema: { types: [{ name: t }] }
expect_schema_error: invalid_config
";
        ConfigFixture::from_yaml(yaml).unwrap().run_and_assert(&registry());
    }
}
