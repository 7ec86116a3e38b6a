//! Built-in text predicates beyond string matching
//!
//! - [`CodepointLength`] — text length in Unicode scalar values, inclusive range
//! - [`ValidValues`] — text equal to one of an enumerated set
//! - [`AcceptAll`] — every text scalar conforms

use crate::{Node, PredicateError, TypePredicate};
use std::collections::BTreeSet;

/// Text whose length in codepoints falls in an inclusive range.
///
/// Either bound may be left open.
///
/// # Example
///
/// ```
/// use typefind::{CodepointLength, Node, TypePredicate};
///
/// let p = CodepointLength::at_least(4);
/// assert!(p.is_valid(&Node::string("beta")).unwrap());
/// assert!(!p.is_valid(&Node::string("abc")).unwrap());
///
/// // Codepoints, not bytes: "héllo" is 5 codepoints but 6 bytes.
/// let p = CodepointLength::between(5, 5);
/// assert!(p.is_valid(&Node::string("héllo")).unwrap());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodepointLength {
    min: Option<usize>,
    max: Option<usize>,
}

impl CodepointLength {
    /// Length in `min..=max`.
    #[must_use]
    pub fn between(min: usize, max: usize) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    /// Length `>= min`.
    #[must_use]
    pub fn at_least(min: usize) -> Self {
        Self {
            min: Some(min),
            max: None,
        }
    }

    /// Length `<= max`.
    #[must_use]
    pub fn at_most(max: usize) -> Self {
        Self {
            min: None,
            max: Some(max),
        }
    }

    /// Returns the lower bound, if any.
    #[must_use]
    pub fn min(&self) -> Option<usize> {
        self.min
    }

    /// Returns the upper bound, if any.
    #[must_use]
    pub fn max(&self) -> Option<usize> {
        self.max
    }

    fn contains(&self, len: usize) -> bool {
        self.min.is_none_or(|min| len >= min) && self.max.is_none_or(|max| len <= max)
    }
}

impl TypePredicate for CodepointLength {
    fn is_valid(&self, node: &Node) -> Result<bool, PredicateError> {
        Ok(node
            .as_text()
            .is_some_and(|s| self.contains(s.chars().count())))
    }

    fn type_name(&self) -> &str {
        "codepoint_length"
    }
}

/// Text equal to one of an enumerated set of values.
///
/// # Example
///
/// ```
/// use typefind::{Node, TypePredicate, ValidValues};
///
/// let p = ValidValues::new(["red", "green", "blue"]);
/// assert!(p.is_valid(&Node::string("green")).unwrap());
/// assert!(!p.is_valid(&Node::string("Green")).unwrap());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidValues {
    values: BTreeSet<String>,
}

impl ValidValues {
    /// Create from any collection of strings.
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the number of distinct values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if no value is accepted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl TypePredicate for ValidValues {
    fn is_valid(&self, node: &Node) -> Result<bool, PredicateError> {
        Ok(node.as_text().is_some_and(|s| self.values.contains(s)))
    }

    fn type_name(&self) -> &str {
        "valid_values"
    }
}

/// Accepts every text scalar and nothing else.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AcceptAll;

impl TypePredicate for AcceptAll {
    fn is_valid(&self, node: &Node) -> Result<bool, PredicateError> {
        Ok(node.as_text().is_some())
    }

    fn type_name(&self) -> &str {
        "text"
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// IntoTypePredicate impls (feature = "registry")
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(feature = "registry")]
mod into_type_predicate {
    use super::{AcceptAll, CodepointLength, TypePredicate, ValidValues};
    use crate::registry::IntoTypePredicate;
    use crate::SchemaError;
    use serde::Deserialize;

    /// Upper bound on the size of one `valid_values` list.
    const MAX_VALID_VALUES: usize = 65_536;

    // ── CodepointLength ──────────────────────────────────────────────────────

    /// Configuration for [`CodepointLength`]. At least one bound is required.
    ///
    /// ```json
    /// { "min": 4, "max": 64 }
    /// ```
    #[derive(Debug, Clone, Deserialize)]
    #[serde(deny_unknown_fields)]
    pub struct CodepointLengthConfig {
        /// Inclusive lower bound.
        #[serde(default)]
        pub min: Option<usize>,
        /// Inclusive upper bound.
        #[serde(default)]
        pub max: Option<usize>,
    }

    impl IntoTypePredicate for CodepointLength {
        type Config = CodepointLengthConfig;

        fn from_config(config: Self::Config) -> Result<Box<dyn TypePredicate>, SchemaError> {
            match (config.min, config.max) {
                (None, None) => Err(SchemaError::InvalidConfig {
                    source: "codepoint_length needs at least one of `min` or `max`".into(),
                }),
                (Some(min), Some(max)) if min > max => Err(SchemaError::InvalidConfig {
                    source: format!("codepoint_length range is empty: min {min} > max {max}"),
                }),
                (min, max) => Ok(Box::new(CodepointLength { min, max })),
            }
        }
    }

    // ── ValidValues ──────────────────────────────────────────────────────────

    /// Configuration for [`ValidValues`].
    ///
    /// ```json
    /// { "values": ["red", "green", "blue"] }
    /// ```
    #[derive(Debug, Clone, Deserialize)]
    #[serde(deny_unknown_fields)]
    pub struct ValidValuesConfig {
        /// The accepted values.
        pub values: Vec<String>,
    }

    impl IntoTypePredicate for ValidValues {
        type Config = ValidValuesConfig;

        fn from_config(config: Self::Config) -> Result<Box<dyn TypePredicate>, SchemaError> {
            if config.values.len() > MAX_VALID_VALUES {
                return Err(SchemaError::InvalidConfig {
                    source: format!(
                        "valid_values lists {} values, but maximum allowed is {}",
                        config.values.len(),
                        MAX_VALID_VALUES
                    ),
                });
            }
            Ok(Box::new(ValidValues::new(config.values)))
        }
    }

    // ── AcceptAll ────────────────────────────────────────────────────────────

    impl IntoTypePredicate for AcceptAll {
        type Config = crate::config::UnitConfig;

        fn from_config(_config: Self::Config) -> Result<Box<dyn TypePredicate>, SchemaError> {
            Ok(Box::new(AcceptAll))
        }
    }
}
