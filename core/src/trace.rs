//! Trace types for debugging finder and constraint behavior.
//!
//! Trace types mirror the runtime types ([`Constraint`](crate::Constraint),
//! [`Finder`](crate::Finder)) but capture evaluation results instead of
//! inputs.
//!
//! # Two Levels of Trace
//!
//! - [`ConstraintTrace`] — Per-value: which sub-constraints held?
//! - [`FindTrace`] — Per-document: which nodes were visited, what happened at each?
//!
//! # Example
//!
//! ```
//! use typefind::{Finder, Node, StepOutcome, StringMatcher};
//!
//! let doc = Node::list(vec![Node::string("arn:a"), Node::null(), Node::string("x")]);
//! let finder = Finder::new(StringMatcher::prefix("arn:", false));
//!
//! let trace = finder.find_with_trace(&doc);
//! assert_eq!(trace.result, Ok(vec!["arn:a".to_string()]));
//! assert_eq!(trace.steps.len(), 4);
//! assert_eq!(trace.steps[0].outcome, StepOutcome::Descended { children: 3 });
//! assert_eq!(trace.steps[2].outcome, StepOutcome::SkippedNull);
//! ```

use crate::{FindError, NodeType, PredicateError};
use std::fmt;

/// Trace of a constraint evaluation.
///
/// Mirrors [`Constraint`](crate::Constraint) structure but captures results.
///
/// In `AllOf`/`AnyOf`, ALL children are evaluated (no short-circuit) for
/// maximum debugging value.
pub enum ConstraintTrace {
    /// A single predicate evaluation.
    Single {
        /// Whether this predicate held.
        matched: bool,
        /// [`TypePredicate::type_name`](crate::TypePredicate::type_name) of the predicate.
        predicate: String,
        /// The error the predicate raised, if any.
        error: Option<PredicateError>,
    },
    /// AND: all children must hold.
    AllOf {
        /// Whether all children held.
        matched: bool,
        /// Trace of each child (all evaluated, no short-circuit).
        children: Vec<ConstraintTrace>,
    },
    /// OR: any child must hold.
    AnyOf {
        /// Whether any child held.
        matched: bool,
        /// Trace of each child (all evaluated, no short-circuit).
        children: Vec<ConstraintTrace>,
    },
    /// NOT: inverts inner result.
    Not {
        /// Whether the NOT held (inner did not hold and did not fail).
        matched: bool,
        /// Trace of the inner constraint.
        inner: Box<ConstraintTrace>,
    },
}

impl ConstraintTrace {
    /// Get the overall result of this constraint.
    #[must_use]
    pub fn matched(&self) -> bool {
        match self {
            Self::Single { matched, .. }
            | Self::AllOf { matched, .. }
            | Self::AnyOf { matched, .. }
            | Self::Not { matched, .. } => *matched,
        }
    }

    /// The first predicate error anywhere in this trace, in evaluation order.
    #[must_use]
    pub fn error(&self) -> Option<&PredicateError> {
        match self {
            Self::Single { error, .. } => error.as_ref(),
            Self::AllOf { children, .. } | Self::AnyOf { children, .. } => {
                children.iter().find_map(ConstraintTrace::error)
            }
            Self::Not { inner, .. } => inner.error(),
        }
    }
}

impl fmt::Debug for ConstraintTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single {
                matched,
                predicate,
                error,
            } => f
                .debug_struct("Single")
                .field("matched", matched)
                .field("predicate", predicate)
                .field("error", error)
                .finish(),
            Self::AllOf { matched, children } => f
                .debug_struct("AllOf")
                .field("matched", matched)
                .field("children", children)
                .finish(),
            Self::AnyOf { matched, children } => f
                .debug_struct("AnyOf")
                .field("matched", matched)
                .field("children", children)
                .finish(),
            Self::Not { matched, inner } => f
                .debug_struct("Not")
                .field("matched", matched)
                .field("inner", inner)
                .finish(),
        }
    }
}

/// What happened at one visited node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// A null; nothing collected, no descent.
    SkippedNull,
    /// A container; its children were queued in stored order.
    Descended {
        /// Number of children queued.
        children: usize,
    },
    /// A text scalar the predicate accepted.
    Matched,
    /// A text scalar the predicate rejected.
    Rejected,
    /// A scalar of a non-text kind; the predicate was not called.
    NotText,
    /// The predicate failed on this text scalar. Traversal stopped here.
    Failed,
    /// This node sits beyond the depth bound. Traversal stopped here.
    TooDeep,
}

/// One visited node in a [`FindTrace`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FindStep {
    /// Position in pre-order visiting sequence, starting at 0.
    pub ordinal: usize,
    /// Nesting depth; the root is 0.
    pub depth: usize,
    /// Declared type of the node.
    pub node_type: NodeType,
    /// What the finder did with the node.
    pub outcome: StepOutcome,
}

/// Trace of a full [`Finder`](crate::Finder) traversal.
///
/// # INV: `result` == `find()` result
///
/// The traversal is the same one [`Finder::find`](crate::Finder::find) runs,
/// so `result` is exactly what `find` would have returned.
#[derive(Debug, Clone, PartialEq)]
pub struct FindTrace {
    /// Name of the predicate used.
    pub predicate: String,
    /// The find result.
    pub result: Result<Vec<String>, FindError>,
    /// Every visited node, in pre-order.
    pub steps: Vec<FindStep>,
}

impl FindTrace {
    /// Number of steps with the given outcome.
    #[must_use]
    pub fn count(&self, outcome: StepOutcome) -> usize {
        self.steps.iter().filter(|s| s.outcome == outcome).count()
    }

    /// Deepest visited depth, or `None` if nothing was visited.
    #[must_use]
    pub fn max_depth(&self) -> Option<usize> {
        self.steps.iter().map(|s| s.depth).max()
    }
}
