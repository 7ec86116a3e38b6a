//! String matching predicates for text scalars
//!
//! - [`StringMatcher`] = runtime engine (what evaluates at find time)
//! - [`StringMatchSpec`] = config-level specification (what the user wrote)
//!
//! Both only ever accept text scalars. A symbol spelled `"arn:aws"` is not
//! text and never matches.

use crate::{check_pattern_length, Node, PredicateError, SchemaError, TypePredicate};
use std::fmt;

/// Unified string matcher.
///
/// Combines all string matching strategies with optional ASCII
/// case-insensitivity.
///
/// # Example
///
/// ```
/// use typefind::{Node, StringMatcher, TypePredicate};
///
/// // Case-insensitive prefix match
/// let matcher = StringMatcher::prefix("ARN:", true);
/// assert!(matcher.is_valid(&Node::string("arn:aws:s3:::bucket")).unwrap());
///
/// // Regex match
/// let matcher = StringMatcher::regex(r"^user-\d+$").unwrap();
/// assert!(matcher.is_valid(&Node::string("user-123")).unwrap());
/// assert!(!matcher.is_valid(&Node::string("user-abc")).unwrap());
/// ```
#[derive(Debug, Clone)]
pub enum StringMatcher {
    /// Exact string equality.
    Exact { value: String, ignore_case: bool },
    /// String prefix match.
    Prefix { value: String, ignore_case: bool },
    /// String suffix match.
    Suffix { value: String, ignore_case: bool },
    /// Substring contains match.
    Contains { value: String, ignore_case: bool },
    /// Regular expression match (RE2 semantics, linear time).
    Regex(regex::Regex),
}

impl StringMatcher {
    /// Create an exact match.
    #[must_use]
    pub fn exact(value: impl Into<String>, ignore_case: bool) -> Self {
        Self::Exact {
            value: value.into(),
            ignore_case,
        }
    }

    /// Create a prefix match.
    #[must_use]
    pub fn prefix(value: impl Into<String>, ignore_case: bool) -> Self {
        Self::Prefix {
            value: value.into(),
            ignore_case,
        }
    }

    /// Create a suffix match.
    #[must_use]
    pub fn suffix(value: impl Into<String>, ignore_case: bool) -> Self {
        Self::Suffix {
            value: value.into(),
            ignore_case,
        }
    }

    /// Create a contains match.
    #[must_use]
    pub fn contains(value: impl Into<String>, ignore_case: bool) -> Self {
        Self::Contains {
            value: value.into(),
            ignore_case,
        }
    }

    /// Create a regex match.
    ///
    /// Uses the `regex` crate, which guarantees linear time matching.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the regex pattern is invalid.
    pub fn regex(pattern: &str) -> Result<Self, regex::Error> {
        regex::Regex::new(pattern).map(Self::Regex)
    }

    /// Create a case-insensitive regex match.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the regex pattern is invalid.
    pub fn regex_ignore_case(pattern: &str) -> Result<Self, regex::Error> {
        regex::RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map(Self::Regex)
    }

    /// Match a text value directly.
    #[must_use]
    pub fn matches_text(&self, input: &str) -> bool {
        match self {
            Self::Exact { value, ignore_case } => {
                if *ignore_case {
                    input.eq_ignore_ascii_case(value)
                } else {
                    input == value
                }
            }
            Self::Prefix { value, ignore_case } => {
                if *ignore_case {
                    input
                        .get(..value.len())
                        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(value))
                } else {
                    input.starts_with(value.as_str())
                }
            }
            Self::Suffix { value, ignore_case } => {
                if *ignore_case {
                    input
                        .len()
                        .checked_sub(value.len())
                        .and_then(|start| input.get(start..))
                        .is_some_and(|suffix| suffix.eq_ignore_ascii_case(value))
                } else {
                    input.ends_with(value.as_str())
                }
            }
            Self::Contains { value, ignore_case } => {
                if *ignore_case {
                    contains_ignore_ascii_case(input, value)
                } else {
                    input.contains(value.as_str())
                }
            }
            Self::Regex(re) => re.is_match(input),
        }
    }
}

fn contains_ignore_ascii_case(haystack: &str, needle: &str) -> bool {
    needle.is_empty()
        || haystack
            .as_bytes()
            .windows(needle.len())
            .any(|window| window.eq_ignore_ascii_case(needle.as_bytes()))
}

impl TypePredicate for StringMatcher {
    fn is_valid(&self, node: &Node) -> Result<bool, PredicateError> {
        Ok(node.as_text().is_some_and(|s| self.matches_text(s)))
    }

    fn type_name(&self) -> &str {
        match self {
            Self::Exact { .. } => "exact",
            Self::Prefix { .. } => "prefix",
            Self::Suffix { .. } => "suffix",
            Self::Contains { .. } => "contains",
            Self::Regex(_) => "regex",
        }
    }
}

/// A string match specification from user configuration.
///
/// Represents one of five matching strategies. Compiles to a [`StringMatcher`]
/// via [`to_matcher()`](Self::to_matcher), which also enforces pattern length
/// limits.
///
/// # Example
///
/// ```
/// use typefind::{Node, StringMatchSpec, TypePredicate};
///
/// let spec = StringMatchSpec::Prefix("arn:".into());
/// let matcher = spec.to_matcher().unwrap();
/// assert!(matcher.is_valid(&Node::string("arn:aws:iam::1:role/x")).unwrap());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum StringMatchSpec {
    /// Exact string equality.
    Exact(String),
    /// String starts with prefix.
    Prefix(String),
    /// String ends with suffix.
    Suffix(String),
    /// String contains substring.
    Contains(String),
    /// Regular expression match (Rust `regex` crate syntax, linear time).
    Regex(String),
}

impl StringMatchSpec {
    /// Returns the raw pattern text.
    #[must_use]
    pub fn pattern(&self) -> &str {
        match self {
            Self::Exact(v)
            | Self::Prefix(v)
            | Self::Suffix(v)
            | Self::Contains(v)
            | Self::Regex(v) => v,
        }
    }

    /// Compile this spec into a runtime [`StringMatcher`].
    ///
    /// # Errors
    ///
    /// - [`SchemaError::PatternTooLong`] if the pattern exceeds its length limit
    /// - [`SchemaError::InvalidPattern`] if the regex is invalid
    pub fn to_matcher(&self) -> Result<StringMatcher, SchemaError> {
        let is_regex = matches!(self, Self::Regex(_));
        check_pattern_length(self.pattern(), is_regex)?;
        match self {
            Self::Exact(v) => Ok(StringMatcher::exact(v.as_str(), false)),
            Self::Prefix(v) => Ok(StringMatcher::prefix(v.as_str(), false)),
            Self::Suffix(v) => Ok(StringMatcher::suffix(v.as_str(), false)),
            Self::Contains(v) => Ok(StringMatcher::contains(v.as_str(), false)),
            Self::Regex(v) => {
                StringMatcher::regex(v).map_err(|e| SchemaError::InvalidPattern {
                    pattern: v.clone(),
                    source: e.to_string(),
                })
            }
        }
    }
}

impl fmt::Display for StringMatchSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(v) => write!(f, "Exact(\"{v}\")"),
            Self::Prefix(v) => write!(f, "Prefix(\"{v}\")"),
            Self::Suffix(v) => write!(f, "Suffix(\"{v}\")"),
            Self::Contains(v) => write!(f, "Contains(\"{v}\")"),
            Self::Regex(v) => write!(f, "Regex(\"{v}\")"),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// IntoTypePredicate impl (feature = "registry")
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(feature = "registry")]
mod into_type_predicate {
    use super::{StringMatcher, TypePredicate};
    use crate::registry::IntoTypePredicate;
    use crate::{check_pattern_length, SchemaError};
    use serde::Deserialize;

    /// How to match the pattern in a [`StringMatcherConfig`].
    #[derive(Debug, Clone, Copy, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum StringMatchType {
        /// Exact string equality.
        Exact,
        /// String prefix match.
        Prefix,
        /// String suffix match.
        Suffix,
        /// Substring contains match.
        Contains,
        /// Regular expression match.
        Regex,
    }

    /// Configuration for constructing a [`StringMatcher`] via the registry.
    ///
    /// JSON example:
    /// ```json
    /// { "value": "^arn:", "match_type": "regex", "ignore_case": true }
    /// ```
    #[derive(Debug, Clone, Deserialize)]
    #[serde(deny_unknown_fields)]
    pub struct StringMatcherConfig {
        /// The pattern to match against.
        pub value: String,
        /// How to match the pattern.
        pub match_type: StringMatchType,
        /// Case-insensitive matching (default: false).
        #[serde(default)]
        pub ignore_case: bool,
    }

    impl IntoTypePredicate for StringMatcher {
        type Config = StringMatcherConfig;

        fn from_config(config: Self::Config) -> Result<Box<dyn TypePredicate>, SchemaError> {
            let is_regex = matches!(config.match_type, StringMatchType::Regex);
            check_pattern_length(&config.value, is_regex)?;
            let matcher = match config.match_type {
                StringMatchType::Exact => StringMatcher::exact(config.value, config.ignore_case),
                StringMatchType::Prefix => StringMatcher::prefix(config.value, config.ignore_case),
                StringMatchType::Suffix => StringMatcher::suffix(config.value, config.ignore_case),
                StringMatchType::Contains => {
                    StringMatcher::contains(config.value, config.ignore_case)
                }
                StringMatchType::Regex => {
                    let compiled = if config.ignore_case {
                        StringMatcher::regex_ignore_case(&config.value)
                    } else {
                        StringMatcher::regex(&config.value)
                    };
                    compiled.map_err(|e| SchemaError::InvalidPattern {
                        pattern: config.value.clone(),
                        source: e.to_string(),
                    })?
                }
            };
            Ok(Box::new(matcher))
        }
    }
}
