//! typefind-test: Test domain for conformance testing
//!
//! Provides a table-backed predicate that can fail, a YAML document
//! notation for symbols, s-expressions and typed nulls, and the fixture
//! runners used by the conformance suites. This is also the reference
//! extension that shows how to register a domain predicate.
//!
//! # Example
//!
//! ```
//! use typefind_test::prelude::*;
//!
//! let lookup = Lookup::new().accept("arn:a").reject("arn:b");
//!
//! assert!(lookup.is_valid(&Node::string("arn:a")).unwrap());
//! assert!(!lookup.is_valid(&Node::string("arn:b")).unwrap());
//! assert!(lookup.is_valid(&Node::string("arn:c")).is_err());
//! ```

use std::collections::HashMap;
use typefind::prelude::*;

#[cfg(all(feature = "fixtures", feature = "registry"))]
pub mod config_fixture;
#[cfg(feature = "fixtures")]
pub mod document;

/// A predicate backed by an explicit verdict table.
///
/// Text with an entry gets that verdict. Text without an entry is a
/// [`PredicateError`]: the table cannot judge it. Non-text never conforms.
///
/// Stands in for predicates that consult external comparison data, where a
/// missing entry is a failure rather than a "no".
#[derive(Debug, Clone, Default)]
pub struct Lookup {
    table: HashMap<String, bool>,
}

impl Lookup {
    /// Create an empty table. Every text value fails against it.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an accepted value (builder pattern).
    #[must_use]
    pub fn accept(mut self, value: impl Into<String>) -> Self {
        self.table.insert(value.into(), true);
        self
    }

    /// Add a rejected value (builder pattern).
    #[must_use]
    pub fn reject(mut self, value: impl Into<String>) -> Self {
        self.table.insert(value.into(), false);
        self
    }

    /// Returns the verdict for a value, if the table has one.
    #[must_use]
    pub fn get(&self, value: &str) -> Option<bool> {
        self.table.get(value).copied()
    }
}

impl TypePredicate for Lookup {
    fn is_valid(&self, node: &Node) -> Result<bool, PredicateError> {
        let Some(text) = node.as_text() else {
            return Ok(false);
        };
        self.get(text)
            .ok_or_else(|| PredicateError::new(format!("no table entry for \"{text}\"")))
    }

    fn type_name(&self) -> &str {
        "lookup"
    }
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use super::Lookup;
    pub use typefind::prelude::*;
}

// ═══════════════════════════════════════════════════════════════════════════════
// Registry support (feature = "registry")
// ═══════════════════════════════════════════════════════════════════════════════

/// Configuration for [`Lookup`].
///
/// ```yaml
/// accept: ["arn:a"]
/// reject: ["arn:b"]
/// ```
#[cfg(feature = "registry")]
#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LookupConfig {
    /// Values the table accepts.
    #[serde(default)]
    pub accept: Vec<String>,
    /// Values the table rejects.
    #[serde(default)]
    pub reject: Vec<String>,
}

#[cfg(feature = "registry")]
impl From<LookupConfig> for Lookup {
    fn from(config: LookupConfig) -> Self {
        let lookup = config.accept.into_iter().fold(Lookup::new(), Lookup::accept);
        config.reject.into_iter().fold(lookup, Lookup::reject)
    }
}

#[cfg(feature = "registry")]
impl typefind::IntoTypePredicate for Lookup {
    type Config = LookupConfig;

    fn from_config(config: Self::Config) -> Result<Box<dyn TypePredicate>, SchemaError> {
        if let Some(both) = config.accept.iter().find(|v| config.reject.contains(v)) {
            return Err(SchemaError::InvalidConfig {
                source: format!("lookup lists \"{both}\" as both accepted and rejected"),
            });
        }
        Ok(Box::new(Lookup::from(config)))
    }
}

/// Type URL of [`Lookup`].
pub const LOOKUP_TYPE_URL: &str = "typefind.test.v1.Lookup";

/// Register all typefind-test types with the given builder.
///
/// Registers the core predicates and the test-domain predicate:
/// - `typefind.test.v1.Lookup` → [`Lookup`]
#[cfg(feature = "registry")]
#[must_use]
pub fn register(builder: typefind::RegistryBuilder) -> typefind::RegistryBuilder {
    typefind::register_core_predicates(builder).predicate::<Lookup>(LOOKUP_TYPE_URL)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_verdicts() {
        let lookup = Lookup::new().accept("yes").reject("no");

        assert_eq!(lookup.get("yes"), Some(true));
        assert_eq!(lookup.get("no"), Some(false));
        assert_eq!(lookup.get("maybe"), None);
    }

    #[test]
    fn test_lookup_fails_on_unknown_text() {
        let err = Lookup::new().is_valid(&Node::string("x")).unwrap_err();
        assert_eq!(err.message(), "no table entry for \"x\"");
    }

    #[test]
    fn test_lookup_ignores_non_text() {
        let lookup = Lookup::new();
        assert!(!lookup.is_valid(&Node::symbol("x")).unwrap());
        assert!(!lookup.is_valid(&Node::from(1i64)).unwrap());
    }

    #[test]
    fn test_lookup_failure_aborts_find() {
        let doc = Node::list(vec!["yes".into(), "unknown".into()]);
        let lookup = Lookup::new().accept("yes");

        assert!(matches!(
            typefind::find(&doc, &lookup),
            Err(FindError::PredicateFailure { ref predicate, .. }) if predicate == "lookup"
        ));
    }
}

#[cfg(all(test, feature = "registry"))]
mod registry_tests {
    use super::*;

    fn load(config: serde_json::Value) -> Result<Constraint, SchemaError> {
        let registry = register(typefind::RegistryBuilder::new()).build();
        registry.load_constraint(serde_json::from_value(config).unwrap())
    }

    #[test]
    fn register_adds_lookup_to_core() {
        let registry = register(typefind::RegistryBuilder::new()).build();
        assert!(registry.contains(LOOKUP_TYPE_URL));
        assert!(registry.contains("typefind.core.v1.StringMatcher"));
        assert_eq!(registry.len(), 5);
    }

    #[test]
    fn load_lookup_from_config() {
        let c = load(serde_json::json!({
            "type": "single",
            "predicate": { "type_url": LOOKUP_TYPE_URL, "config": { "accept": ["a"], "reject": ["b"] } }
        }))
        .unwrap();
        assert!(c.evaluate(&Node::string("a")).unwrap());
        assert!(!c.evaluate(&Node::string("b")).unwrap());
        assert!(c.evaluate(&Node::string("c")).is_err());
    }

    #[test]
    fn lookup_rejects_contradictory_config() {
        let err = load(serde_json::json!({
            "type": "single",
            "predicate": { "type_url": LOOKUP_TYPE_URL, "config": { "accept": ["a"], "reject": ["a"] } }
        }))
        .unwrap_err();
        assert!(matches!(err, SchemaError::InvalidConfig { .. }));
    }
}
