//! Named types — Boolean composition of predicates
//!
//! A [`Constraint`] combines [`TypePredicate`]s with `AllOf` / `AnyOf` / `Not`.
//! A [`NamedType`] gives a constraint a name and is itself a `TypePredicate`,
//! so a compiled type plugs straight into a [`Finder`](crate::Finder).

use crate::{ConstraintTrace, Node, PredicateError, SchemaError, TypePredicate, MAX_CONSTRAINT_DEPTH};
use std::fmt::{self, Debug};

/// A composable conformance check.
///
/// Evaluation short-circuits: `AllOf` stops at the first `false`, `AnyOf` at
/// the first `true`. An error from any evaluated child stops evaluation and
/// propagates.
///
/// # Example
///
/// ```
/// use typefind::{CodepointLength, Constraint, Node, StringMatcher};
///
/// // Starts with "arn:" AND is at most 64 codepoints long
/// let c = Constraint::AllOf(vec![
///     Constraint::single(StringMatcher::prefix("arn:", false)),
///     Constraint::single(CodepointLength::at_most(64)),
/// ]);
/// assert!(c.evaluate(&Node::string("arn:aws:s3:::bucket")).unwrap());
/// assert!(!c.evaluate(&Node::string("urn:isbn:0451450523")).unwrap());
/// ```
pub enum Constraint {
    /// A single predicate.
    Single(Box<dyn TypePredicate>),

    /// All constraints must hold (logical AND).
    /// Short-circuits on the first `false`. An empty `AllOf` holds.
    AllOf(Vec<Constraint>),

    /// Any constraint must hold (logical OR).
    /// Short-circuits on the first `true`. An empty `AnyOf` does not hold.
    AnyOf(Vec<Constraint>),

    /// Inverts the inner constraint (logical NOT).
    Not(Box<Constraint>),
}

impl Constraint {
    /// Wrap a predicate as a `Single` constraint.
    pub fn single(predicate: impl TypePredicate + 'static) -> Self {
        Self::Single(Box::new(predicate))
    }

    /// Invert a constraint.
    #[must_use]
    pub fn negate(inner: Constraint) -> Self {
        Self::Not(Box::new(inner))
    }

    /// Evaluate this constraint against `node`.
    ///
    /// # Errors
    ///
    /// Returns the first [`PredicateError`] raised by an evaluated predicate.
    pub fn evaluate(&self, node: &Node) -> Result<bool, PredicateError> {
        match self {
            Self::Single(p) => p.is_valid(node),
            Self::AllOf(cs) => {
                for c in cs {
                    if !c.evaluate(node)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            Self::AnyOf(cs) => {
                for c in cs {
                    if c.evaluate(node)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            Self::Not(c) => c.evaluate(node).map(|matched| !matched),
        }
    }

    /// Evaluate with full trace for debugging.
    ///
    /// Unlike [`evaluate()`](Self::evaluate), this does NOT short-circuit
    /// `AllOf`/`AnyOf`: every child is evaluated. A child that fails is
    /// recorded with its error and counts as not matched.
    #[must_use]
    pub fn evaluate_with_trace(&self, node: &Node) -> ConstraintTrace {
        match self {
            Self::Single(p) => {
                let (matched, error) = match p.is_valid(node) {
                    Ok(matched) => (matched, None),
                    Err(e) => (false, Some(e)),
                };
                ConstraintTrace::Single {
                    matched,
                    predicate: p.type_name().to_owned(),
                    error,
                }
            }
            Self::AllOf(cs) => {
                let children: Vec<ConstraintTrace> =
                    cs.iter().map(|c| c.evaluate_with_trace(node)).collect();
                let matched = children.iter().all(ConstraintTrace::matched);
                ConstraintTrace::AllOf { matched, children }
            }
            Self::AnyOf(cs) => {
                let children: Vec<ConstraintTrace> =
                    cs.iter().map(|c| c.evaluate_with_trace(node)).collect();
                let matched = children.iter().any(ConstraintTrace::matched);
                ConstraintTrace::AnyOf { matched, children }
            }
            Self::Not(c) => {
                let inner = c.evaluate_with_trace(node);
                ConstraintTrace::Not {
                    matched: inner.error().is_none() && !inner.matched(),
                    inner: Box::new(inner),
                }
            }
        }
    }

    /// Calculate the depth of this constraint tree.
    ///
    /// Used for depth limit validation at load time.
    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::AllOf(cs) | Self::AnyOf(cs) => {
                1 + cs.iter().map(Constraint::depth).max().unwrap_or(0)
            }
            Self::Not(c) => 1 + c.depth(),
        }
    }
}

impl Debug for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single(p) => f.debug_tuple("Single").field(p).finish(),
            Self::AllOf(cs) => f.debug_tuple("AllOf").field(&cs.len()).finish(),
            Self::AnyOf(cs) => f.debug_tuple("AnyOf").field(&cs.len()).finish(),
            Self::Not(_) => f.debug_tuple("Not").finish(),
        }
    }
}

/// A constraint with a name.
///
/// Implements [`TypePredicate`]; `type_name()` returns the name.
///
/// # Example
///
/// ```
/// use typefind::{Constraint, NamedType, Node, StringMatcher, TypePredicate};
///
/// let arn = NamedType::new("arn", Constraint::single(StringMatcher::prefix("arn:", false)));
/// arn.validate().unwrap();
///
/// assert_eq!(arn.type_name(), "arn");
/// assert!(arn.is_valid(&Node::string("arn:aws:sqs:us-east-1:1:q")).unwrap());
/// ```
#[derive(Debug)]
pub struct NamedType {
    name: String,
    constraint: Constraint,
}

impl NamedType {
    /// Create a named type.
    pub fn new(name: impl Into<String>, constraint: Constraint) -> Self {
        Self {
            name: name.into(),
            constraint,
        }
    }

    /// Returns the type name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the constraint.
    #[must_use]
    pub fn constraint(&self) -> &Constraint {
        &self.constraint
    }

    /// Validate this type against safety constraints.
    ///
    /// Checks that constraint nesting does not exceed [`MAX_CONSTRAINT_DEPTH`].
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::DepthExceeded`] if nesting is too deep.
    pub fn validate(&self) -> Result<(), SchemaError> {
        let depth = self.constraint.depth();
        if depth > MAX_CONSTRAINT_DEPTH {
            return Err(SchemaError::DepthExceeded {
                depth,
                max: MAX_CONSTRAINT_DEPTH,
            });
        }
        Ok(())
    }
}

impl TypePredicate for NamedType {
    fn is_valid(&self, node: &Node) -> Result<bool, PredicateError> {
        self.constraint.evaluate(node)
    }

    fn type_name(&self) -> &str {
        &self.name
    }
}
