//! Type registry for config-driven named type construction.
//!
//! The registry enables **generic schema loading**: JSON/YAML config ->
//! compiled [`NamedType`]s without per-predicate compile code.
//!
//! # Architecture (axum `BoxedIntoRoute` pattern)
//!
//! Each predicate type registers itself via [`IntoTypePredicate`]. At
//! registration time, the concrete type `T` is monomorphized into a closure
//! and erased behind `Box<dyn Fn>`. Type erasure happens once, at
//! registration; the closure runs at load time.
//!
//! # Example
//!
//! ```
//! use typefind::{register_core_predicates, Node, RegistryBuilder, SchemaConfig};
//!
//! let registry = register_core_predicates(RegistryBuilder::new()).build();
//!
//! let config: SchemaConfig = serde_json::from_value(serde_json::json!({
//!     "types": [{
//!         "name": "arn",
//!         "constraint": { "type": "match", "value_match": { "prefix": "arn:" } }
//!     }]
//! }))
//! .unwrap();
//!
//! let schema = registry.load_schema(config).unwrap();
//! let finder = schema.finder("arn").unwrap();
//!
//! let doc = Node::list(vec!["arn:aws:s3:::b".into(), "s3://b".into()]);
//! assert_eq!(finder.find(&doc).unwrap(), vec!["arn:aws:s3:::b"]);
//! ```

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::{
    config::{ConstraintConfig, SchemaConfig, TypeConfig, TypedConfig},
    Constraint, Finder, NamedType, SchemaError, TypePredicate, DEFAULT_MAX_DEPTH,
    MAX_CONSTRAINTS_PER_COMPOUND,
};

// ═══════════════════════════════════════════════════════════════════════════════
// Trait
// ═══════════════════════════════════════════════════════════════════════════════

/// Trait for predicate types that can be constructed from configuration.
///
/// Each predicate type knows its own config shape via the associated `Config`
/// type. The registry calls [`from_config`](Self::from_config) at load time.
///
/// # Example
///
/// ```
/// use serde::Deserialize;
/// use typefind::{IntoTypePredicate, Node, PredicateError, SchemaError, TypePredicate};
///
/// #[derive(Debug)]
/// struct Ascii;
///
/// impl TypePredicate for Ascii {
///     fn is_valid(&self, node: &Node) -> Result<bool, PredicateError> {
///         Ok(node.as_text().is_some_and(|s| s.is_ascii()))
///     }
/// }
///
/// #[derive(Deserialize)]
/// struct AsciiConfig {}
///
/// impl IntoTypePredicate for Ascii {
///     type Config = AsciiConfig;
///     fn from_config(_: Self::Config) -> Result<Box<dyn TypePredicate>, SchemaError> {
///         Ok(Box::new(Ascii))
///     }
/// }
/// ```
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot be registered as a predicate type",
    label = "missing `IntoTypePredicate` impl",
    note = "implement `IntoTypePredicate` with a `Config: DeserializeOwned` and a `from_config` constructor"
)]
pub trait IntoTypePredicate: Send + Sync + 'static {
    /// The configuration type deserialized from JSON/YAML.
    type Config: DeserializeOwned + Send + Sync;

    /// Construct a predicate from deserialized configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::InvalidConfig`] if the config is semantically invalid,
    /// or [`SchemaError::InvalidPattern`] if a regex pattern is invalid.
    fn from_config(config: Self::Config) -> Result<Box<dyn TypePredicate>, SchemaError>;
}

// ═══════════════════════════════════════════════════════════════════════════════
// Type-erased factories
// ═══════════════════════════════════════════════════════════════════════════════

/// Type-erased predicate factory closure.
type BoxedPredicateFactory = Box<
    dyn Fn(&serde_json::Value) -> Result<Box<dyn TypePredicate>, SchemaError> + Send + Sync,
>;

// ═══════════════════════════════════════════════════════════════════════════════
// Builder
// ═══════════════════════════════════════════════════════════════════════════════

/// Builder for constructing a [`Registry`].
///
/// Register predicate types with their type URLs, then call
/// [`build()`](Self::build) to produce an immutable `Registry`.
/// No registration is possible after `build()`.
pub struct RegistryBuilder {
    factories: HashMap<String, BoxedPredicateFactory>,
}

impl RegistryBuilder {
    /// Create a new empty registry builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Register a predicate type with a type URL.
    ///
    /// The concrete type `T` is monomorphized here and erased behind a closure.
    /// At load time, the registry deserializes config as `T::Config` and calls
    /// `T::from_config()` to produce the predicate. Registering the same URL
    /// twice keeps the later registration.
    #[must_use]
    pub fn predicate<T: IntoTypePredicate>(mut self, type_url: &str) -> Self {
        self.factories.insert(
            type_url.to_owned(),
            Box::new(|value: &serde_json::Value| {
                let config: T::Config = serde_json::from_value(value.clone()).map_err(|e| {
                    SchemaError::InvalidConfig {
                        source: e.to_string(),
                    }
                })?;
                T::from_config(config)
            }),
        );
        self
    }

    /// Freeze the registry.
    #[must_use]
    pub fn build(self) -> Registry {
        Registry {
            factories: self.factories,
        }
    }
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RegistryBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryBuilder")
            .field("type_urls", &sorted_keys(&self.factories))
            .finish()
    }
}

/// Register the built-in predicates.
///
/// | Type URL | Predicate |
/// |----------|-----------|
/// | `typefind.core.v1.StringMatcher` | [`StringMatcher`](crate::StringMatcher) |
/// | `typefind.core.v1.CodepointLength` | [`CodepointLength`](crate::CodepointLength) |
/// | `typefind.core.v1.ValidValues` | [`ValidValues`](crate::ValidValues) |
/// | `typefind.core.v1.AcceptAll` | [`AcceptAll`](crate::AcceptAll) |
///
/// Domain predicates are then added on top:
///
/// ```ignore
/// let registry = typefind::register_core_predicates(RegistryBuilder::new())
///     .predicate::<AccountId>("acme.types.v1.AccountId")
///     .build();
/// ```
#[must_use]
pub fn register_core_predicates(builder: RegistryBuilder) -> RegistryBuilder {
    use crate::{AcceptAll, CodepointLength, StringMatcher, ValidValues};
    builder
        .predicate::<StringMatcher>("typefind.core.v1.StringMatcher")
        .predicate::<CodepointLength>("typefind.core.v1.CodepointLength")
        .predicate::<ValidValues>("typefind.core.v1.ValidValues")
        .predicate::<AcceptAll>("typefind.core.v1.AcceptAll")
}

// ═══════════════════════════════════════════════════════════════════════════════
// Registry
// ═══════════════════════════════════════════════════════════════════════════════

/// Immutable registry of predicate factories.
///
/// Constructed via [`RegistryBuilder`]. Use [`load_schema()`](Self::load_schema)
/// to compile config into a runtime [`Schema`].
pub struct Registry {
    factories: HashMap<String, BoxedPredicateFactory>,
}

impl Registry {
    /// Load a whole schema from configuration.
    ///
    /// # Errors
    ///
    /// - [`SchemaError::InvalidConfig`] — `max_depth` is 0
    /// - [`SchemaError::DuplicateType`] — two types share a name
    /// - anything [`load_type()`](Self::load_type) returns
    pub fn load_schema(&self, config: SchemaConfig) -> Result<Schema, SchemaError> {
        let max_depth = match config.max_depth {
            Some(0) => {
                return Err(SchemaError::InvalidConfig {
                    source: "max_depth must be at least 1".into(),
                })
            }
            Some(depth) => depth,
            None => DEFAULT_MAX_DEPTH,
        };

        let mut seen = HashSet::new();
        for t in &config.types {
            if !seen.insert(t.name.as_str()) {
                return Err(SchemaError::DuplicateType {
                    name: t.name.clone(),
                });
            }
        }

        let types = config
            .types
            .into_iter()
            .map(|t| self.load_type(t))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(types = types.len(), max_depth, "schema_loaded");
        Ok(Schema { types, max_depth })
    }

    /// Load one named type from configuration.
    ///
    /// Walks the constraint config, constructs predicates via registered
    /// factories, and validates constraint depth.
    ///
    /// # Errors
    ///
    /// - [`SchemaError::UnknownTypeUrl`] — predicate `type_url` not registered
    /// - [`SchemaError::InvalidConfig`] — config deserialization or construction failed
    /// - [`SchemaError::InvalidPattern`] — regex pattern is invalid
    /// - [`SchemaError::PatternTooLong`] — pattern exceeds its length limit
    /// - [`SchemaError::TooManyConstraints`] — compound wider than [`MAX_CONSTRAINTS_PER_COMPOUND`]
    /// - [`SchemaError::DepthExceeded`] — nesting exceeds [`MAX_CONSTRAINT_DEPTH`](crate::MAX_CONSTRAINT_DEPTH)
    pub fn load_type(&self, config: TypeConfig) -> Result<NamedType, SchemaError> {
        let constraint = self.load_constraint(config.constraint)?;
        let named = NamedType::new(config.name, constraint);
        named.validate()?;
        Ok(named)
    }

    /// Load a bare constraint from configuration.
    ///
    /// Does not check depth; [`load_type()`](Self::load_type) does.
    ///
    /// # Errors
    ///
    /// Same as [`load_type()`](Self::load_type), except `DepthExceeded`.
    pub fn load_constraint(&self, config: ConstraintConfig) -> Result<Constraint, SchemaError> {
        match config {
            ConstraintConfig::Single { predicate } => {
                Ok(Constraint::Single(self.resolve(&predicate)?))
            }
            ConstraintConfig::Match { value_match } => {
                Ok(Constraint::single(value_match.to_matcher()?))
            }
            ConstraintConfig::AllOf { constraints } => {
                Ok(Constraint::AllOf(self.load_compound(constraints)?))
            }
            ConstraintConfig::AnyOf { constraints } => {
                Ok(Constraint::AnyOf(self.load_compound(constraints)?))
            }
            ConstraintConfig::Not { constraint } => {
                Ok(Constraint::negate(self.load_constraint(*constraint)?))
            }
        }
    }

    /// Returns the number of registered predicate types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Returns `true` if no predicate types are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Returns `true` if the given type URL is registered.
    #[must_use]
    pub fn contains(&self, type_url: &str) -> bool {
        self.factories.contains_key(type_url)
    }

    /// Returns all registered type URLs (sorted).
    #[must_use]
    pub fn type_urls(&self) -> Vec<&str> {
        let mut urls: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        urls.sort_unstable();
        urls
    }

    fn load_compound(
        &self,
        constraints: Vec<ConstraintConfig>,
    ) -> Result<Vec<Constraint>, SchemaError> {
        if constraints.len() > MAX_CONSTRAINTS_PER_COMPOUND {
            return Err(SchemaError::TooManyConstraints {
                count: constraints.len(),
                max: MAX_CONSTRAINTS_PER_COMPOUND,
            });
        }
        constraints
            .into_iter()
            .map(|c| self.load_constraint(c))
            .collect()
    }

    fn resolve(&self, config: &TypedConfig) -> Result<Box<dyn TypePredicate>, SchemaError> {
        let factory =
            self.factories
                .get(&config.type_url)
                .ok_or_else(|| SchemaError::UnknownTypeUrl {
                    type_url: config.type_url.clone(),
                    available: sorted_keys(&self.factories),
                })?;
        factory(&config.config)
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("type_urls", &self.type_urls())
            .finish()
    }
}

fn sorted_keys(factories: &HashMap<String, BoxedPredicateFactory>) -> Vec<String> {
    let mut keys: Vec<String> = factories.keys().cloned().collect();
    keys.sort_unstable();
    keys
}

// ═══════════════════════════════════════════════════════════════════════════════
// Schema
// ═══════════════════════════════════════════════════════════════════════════════

/// A compiled set of named types plus finder settings.
///
/// Immutable after load; share it across threads behind an `Arc`.
#[derive(Debug)]
pub struct Schema {
    types: Vec<NamedType>,
    max_depth: usize,
}

impl Schema {
    /// Look up a named type.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&NamedType> {
        self.types.iter().find(|t| t.name() == name)
    }

    /// A finder for the named type, using this schema's depth bound.
    #[must_use]
    pub fn finder(&self, name: &str) -> Option<Finder<&NamedType>> {
        self.get(name)
            .map(|t| Finder::new(t).with_max_depth(self.max_depth))
    }

    /// Like [`finder()`](Self::finder), but an unknown name is an error that
    /// lists the defined names.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UnknownType`] if no type has that name.
    pub fn require(&self, name: &str) -> Result<Finder<&NamedType>, SchemaError> {
        self.finder(name).ok_or_else(|| SchemaError::UnknownType {
            name: name.to_owned(),
            available: self.names().map(str::to_owned).collect(),
        })
    }

    /// Type names, in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.types.iter().map(NamedType::name)
    }

    /// Returns the depth bound for finders built from this schema.
    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Returns the number of types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns `true` if the schema defines no types.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
