//! Config types for schema-driven named type construction.
//!
//! These types mirror the runtime types but are serde-deserializable,
//! enabling config-driven construction via [`Registry::load_schema()`](crate::Registry::load_schema).
//!
//! # Relationship to runtime types
//!
//! | Config type | Runtime type | Loader method |
//! |-------------|-------------|---------------|
//! | [`SchemaConfig`] | [`Schema`](crate::Schema) | `Registry::load_schema()` |
//! | [`TypeConfig`] | [`NamedType`](crate::NamedType) | `Registry::load_type()` |
//! | [`ConstraintConfig`] | [`Constraint`](crate::Constraint) | `Registry::load_constraint()` |
//! | [`TypedConfig`] | `Box<dyn TypePredicate>` | via registry factory |

use crate::StringMatchSpec;
use serde::Deserialize;

/// Configuration for a [`Schema`](crate::Schema).
///
/// ```yaml
/// max_depth: 256
/// types:
///   - name: color
///     constraint:
///       type: single
///       predicate:
///         type_url: typefind.core.v1.ValidValues
///         config: { values: [red, green, blue] }
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaConfig {
    /// Maximum document nesting depth for finders built from this schema.
    /// Defaults to [`DEFAULT_MAX_DEPTH`](crate::DEFAULT_MAX_DEPTH).
    #[serde(default)]
    pub max_depth: Option<usize>,

    /// The named types, in declaration order.
    pub types: Vec<TypeConfig>,
}

/// Configuration for a [`NamedType`](crate::NamedType).
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TypeConfig {
    /// The type name. Unique within a schema.
    pub name: String,

    /// What a conforming text value looks like.
    pub constraint: ConstraintConfig,
}

/// Configuration for a [`Constraint`](crate::Constraint).
///
/// Uses `#[serde(tag = "type")]` for discriminated union deserialization:
///
/// ```json
/// { "type": "single", "predicate": { "type_url": "...", "config": { ... } } }
/// { "type": "match", "value_match": { "prefix": "arn:" } }
/// { "type": "all_of", "constraints": [...] }
/// { "type": "any_of", "constraints": [...] }
/// { "type": "not", "constraint": { ... } }
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConstraintConfig {
    /// A registered predicate, resolved by type URL.
    Single {
        /// The predicate reference.
        predicate: TypedConfig,
    },

    /// A built-in string match, no registry lookup.
    Match {
        /// How to match the text.
        value_match: StringMatchSpec,
    },

    /// All constraints must hold (logical AND).
    AllOf {
        /// Child constraints (all must hold).
        constraints: Vec<ConstraintConfig>,
    },

    /// Any constraint must hold (logical OR).
    AnyOf {
        /// Child constraints (any must hold).
        constraints: Vec<ConstraintConfig>,
    },

    /// Inverts the inner constraint (logical NOT).
    Not {
        /// The constraint to negate.
        constraint: Box<ConstraintConfig>,
    },
}

/// Reference to a registered predicate type with its configuration.
///
/// - `type_url` identifies the registered type
/// - `config` carries the type-specific configuration payload
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TypedConfig {
    /// The type URL identifying the registered predicate type.
    /// Must match a `type_url` registered in the [`Registry`](crate::Registry).
    pub type_url: String,

    /// Type-specific configuration payload.
    /// Deserialized as the `Config` associated type of the registered
    /// [`IntoTypePredicate`](crate::IntoTypePredicate).
    #[serde(default = "default_config")]
    pub config: serde_json::Value,
}

fn default_config() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

/// Empty configuration for predicates that take no parameters.
///
/// Accepts any value (`{}`, `null`, etc.) and ignores it.
#[derive(Debug, Clone, Copy)]
pub struct UnitConfig;

impl<'de> Deserialize<'de> for UnitConfig {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde::de::IgnoredAny::deserialize(deserializer)?;
        Ok(UnitConfig)
    }
}
