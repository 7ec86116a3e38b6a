//! typefind - collect the text scalars of a document that conform to a named type
//!
//! A document is a tree of [`Node`]s: nulls, scalars, and ordered containers.
//! A [`TypePredicate`] decides whether a single text scalar conforms to some
//! schema type. The [`Finder`] walks the tree in pre-order and returns every
//! text value the predicate accepts, in document order.
//!
//! # Architecture
//!
//! - [`Node`] — The document model (`Null` / `Scalar` / `Container` sum type)
//! - [`TypePredicate`] — Opaque conformance check (`is_valid(node) -> Result<bool, _>`)
//! - [`StringMatcher`], [`CodepointLength`], [`ValidValues`] — Built-in text predicates
//! - [`Constraint`] / [`NamedType`] — Boolean composition of predicates (AllOf, AnyOf, Not)
//! - [`Finder`] — Explicit-stack, depth-bounded pre-order traversal
//!
//! # Key Invariants
//!
//! 1. **Nulls are leaves**: a null contributes nothing, even a `null.list`.
//!
//! 2. **Containers are never tested**: only their descendants are.
//!
//! 3. **Only text scalars are tested**: the predicate is never called on
//!    symbols, numbers, booleans, or bytes, so they can never be collected.
//!
//! 4. **Failure is total**: if the predicate fails, the whole call fails.
//!    No partial sequence is returned.
//!
//! # Example
//!
//! ```
//! use typefind::prelude::*;
//!
//! let doc = Node::list(vec![
//!     Node::string("alpha"),
//!     Node::null(),
//!     Node::list(vec![Node::string("beta"), Node::string("gamma")]),
//! ]);
//!
//! let long = from_text_fn("long", |s| s.chars().count() >= 4);
//! let found = typefind::find(&doc, &long).unwrap();
//! assert_eq!(found, vec!["alpha", "beta", "gamma"]);
//! ```
//!
//! # Extensions
//!
//! - `json` — build documents from `serde_json::Value`
//! - `registry` — compile named types from JSON/YAML schema config

// ═══════════════════════════════════════════════════════════════════════════════
// Modules
// ═══════════════════════════════════════════════════════════════════════════════

mod constraint;
mod finder;
mod named_type;
mod node;
mod string_match;
mod trace;
mod type_predicate;

#[cfg(feature = "json")]
mod json;

#[cfg(feature = "registry")]
mod config;
#[cfg(feature = "registry")]
mod registry;

// ═══════════════════════════════════════════════════════════════════════════════
// Public API
// ═══════════════════════════════════════════════════════════════════════════════

// Core types
pub use finder::{find, Finder, Matches};
pub use named_type::{Constraint, NamedType};
pub use node::{Child, Container, ContainerKind, Node, NodeType, Scalar};
pub use string_match::{StringMatchSpec, StringMatcher};
pub use type_predicate::{from_fn, from_text_fn, FnPredicate, TextFn, TypePredicate};

// Built-in predicates
pub use constraint::{AcceptAll, CodepointLength, ValidValues};

#[cfg(feature = "json")]
pub use json::MAX_JSON_DEPTH;

// Trace types
pub use trace::{ConstraintTrace, FindStep, FindTrace, StepOutcome};

// Registry (feature-gated)
#[cfg(feature = "registry")]
pub use config::{ConstraintConfig, SchemaConfig, TypeConfig, TypedConfig, UnitConfig};
#[cfg(feature = "registry")]
pub use registry::{
    register_core_predicates, IntoTypePredicate, Registry, RegistryBuilder, Schema,
};

// ═══════════════════════════════════════════════════════════════════════════════
// Prelude
// ═══════════════════════════════════════════════════════════════════════════════

/// Prelude module for convenient imports.
///
/// ```
/// use typefind::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        // Built-in predicates
        AcceptAll,
        CodepointLength,
        // Core types
        Constraint,
        ConstraintTrace,
        // Errors
        FindError,
        // Trace types
        FindStep,
        FindTrace,
        Finder,
        NamedType,
        Node,
        NodeType,
        PredicateError,
        Scalar,
        SchemaError,
        StepOutcome,
        StringMatchSpec,
        StringMatcher,
        // Traits
        TypePredicate,
        ValidValues,
        // Helpers
        from_fn,
        from_text_fn,
    };
}

// ═══════════════════════════════════════════════════════════════════════════════
// Constants
// ═══════════════════════════════════════════════════════════════════════════════

/// Default maximum nesting depth the [`Finder`] will descend to.
///
/// The root sits at depth 0. Traversal uses an explicit stack, so this bound
/// is about refusing adversarial input, not about protecting the call stack.
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Maximum allowed depth for nested constraints in a [`NamedType`].
///
/// Constraint evaluation recurses; enforce at load time via [`NamedType::validate`].
pub const MAX_CONSTRAINT_DEPTH: usize = 32;

/// Maximum number of constraints in a single `AllOf` or `AnyOf`.
///
/// Width-based protection: a flat compound with millions of children bypasses
/// [`MAX_CONSTRAINT_DEPTH`] but still costs per evaluation.
pub const MAX_CONSTRAINTS_PER_COMPOUND: usize = 256;

/// Maximum length for non-regex string match patterns (exact, prefix, suffix, contains).
pub const MAX_PATTERN_LENGTH: usize = 8192;

/// Maximum length for regex patterns.
///
/// Shorter than [`MAX_PATTERN_LENGTH`] because regex compilation cost grows
/// faster than literal matching.
pub const MAX_REGEX_PATTERN_LENGTH: usize = 4096;

// ═══════════════════════════════════════════════════════════════════════════════
// Errors
// ═══════════════════════════════════════════════════════════════════════════════

/// A failure raised by a [`TypePredicate`] while evaluating a node.
///
/// Predicates that cannot fail never construct this. Predicates backed by
/// external data (lookup tables, comparison data loaded at runtime) use it
/// to abort the traversal instead of guessing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredicateError {
    message: String,
}

impl PredicateError {
    /// Create a predicate error with a human-readable message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Returns the error message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for PredicateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for PredicateError {}

/// Errors from a [`Finder`] traversal.
///
/// A failed traversal yields no matches at all: the caller sees one error
/// for the whole call, never a truncated sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FindError {
    /// The predicate failed while evaluating a text scalar.
    PredicateFailure {
        /// [`TypePredicate::type_name`] of the failing predicate.
        predicate: String,
        /// Depth of the node being evaluated.
        depth: usize,
        /// The underlying predicate error.
        source: PredicateError,
    },
    /// The document nests deeper than the finder's configured bound.
    DepthExceeded {
        /// Depth of the first node found beyond the bound.
        depth: usize,
        /// Maximum allowed depth.
        max: usize,
    },
}

impl std::fmt::Display for FindError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PredicateFailure {
                predicate,
                depth,
                source,
            } => {
                write!(
                    f,
                    "predicate \"{predicate}\" failed on a value at depth {depth}: {source}"
                )
            }
            Self::DepthExceeded { depth, max } => {
                write!(
                    f,
                    "document nesting reaches depth {depth}, but maximum allowed is {max}"
                )
            }
        }
    }
}

impl std::error::Error for FindError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::PredicateFailure { source, .. } => Some(source),
            Self::DepthExceeded { .. } => None,
        }
    }
}

/// Errors from named-type construction and schema loading.
///
/// These are caught at load time, not at find time.
/// Fix the configuration and reload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// Constraint nesting exceeds [`MAX_CONSTRAINT_DEPTH`].
    DepthExceeded {
        /// Actual depth of the constraint tree.
        depth: usize,
        /// Maximum allowed depth.
        max: usize,
    },
    /// A regex or string pattern is invalid.
    InvalidPattern {
        /// The pattern that failed to compile.
        pattern: String,
        /// The underlying error message.
        source: String,
    },
    /// Configuration deserialization or construction failed.
    InvalidConfig {
        /// The underlying error message.
        source: String,
    },
    /// A predicate type URL was not found in the registry.
    UnknownTypeUrl {
        /// The unregistered type URL.
        type_url: String,
        /// Type URLs that ARE registered.
        available: Vec<String>,
    },
    /// Too many constraints in a compound `AllOf` or `AnyOf`.
    TooManyConstraints {
        /// Actual count of constraints.
        count: usize,
        /// Maximum allowed.
        max: usize,
    },
    /// A string match pattern exceeds the maximum allowed length.
    PatternTooLong {
        /// Actual length of the pattern.
        len: usize,
        /// Maximum allowed length.
        max: usize,
    },
    /// Two types in one schema share a name.
    DuplicateType {
        /// The repeated name.
        name: String,
    },
    /// A type name was requested that the schema does not define.
    UnknownType {
        /// The requested name.
        name: String,
        /// Names the schema does define.
        available: Vec<String>,
    },
}

impl std::fmt::Display for SchemaError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DepthExceeded { depth, max } => {
                write!(
                    f,
                    "constraint nesting depth is {depth}, but maximum allowed is {max}"
                )
            }
            Self::InvalidPattern { pattern, source } => {
                write!(f, "invalid pattern \"{pattern}\": {source}")
            }
            Self::InvalidConfig { source } => {
                write!(f, "invalid config: {source}")
            }
            Self::UnknownTypeUrl {
                type_url,
                available,
            } => {
                write!(f, "unknown predicate type URL \"{type_url}\"")?;
                if available.is_empty() {
                    write!(f, " (no predicates are registered)")
                } else {
                    write!(f, " (registered: {})", available.join(", "))
                }
            }
            Self::TooManyConstraints { count, max } => {
                write!(
                    f,
                    "compound constraint has {count} children, but maximum allowed is {max}"
                )
            }
            Self::PatternTooLong { len, max } => {
                write!(f, "pattern length is {len}, but maximum allowed is {max}")
            }
            Self::DuplicateType { name } => {
                write!(f, "type \"{name}\" is defined more than once")
            }
            Self::UnknownType { name, available } => {
                write!(f, "unknown type \"{name}\"")?;
                if available.is_empty() {
                    write!(f, " (schema defines no types)")
                } else {
                    write!(f, " (defined: {})", available.join(", "))
                }
            }
        }
    }
}

impl std::error::Error for SchemaError {}

/// Reject patterns longer than [`MAX_PATTERN_LENGTH`] (or
/// [`MAX_REGEX_PATTERN_LENGTH`] for regexes).
pub(crate) fn check_pattern_length(pattern: &str, is_regex: bool) -> Result<(), SchemaError> {
    let max = if is_regex {
        MAX_REGEX_PATTERN_LENGTH
    } else {
        MAX_PATTERN_LENGTH
    };
    if pattern.len() > max {
        return Err(SchemaError::PatternTooLong {
            len: pattern.len(),
            max,
        });
    }
    Ok(())
}
