//! Finder — Collect conforming text scalars in document order
//!
//! The `Finder` is the entry point. It walks a [`Node`] tree in pre-order
//! with an explicit work stack, tests every text scalar against its
//! [`TypePredicate`], and collects the text of those that conform.

use crate::{
    FindError, FindStep, FindTrace, Node, Scalar, StepOutcome, TypePredicate, DEFAULT_MAX_DEPTH,
};
use tracing::{debug, warn};

/// Collect every text scalar under `node` that `predicate` accepts.
///
/// Uses [`DEFAULT_MAX_DEPTH`]. See [`Finder`] for the full rules.
///
/// # Errors
///
/// - [`FindError::PredicateFailure`] if the predicate fails on any visited value
/// - [`FindError::DepthExceeded`] if the document nests deeper than the bound
///
/// # Example
///
/// ```
/// use typefind::{find, AcceptAll, Node};
///
/// assert_eq!(find(&Node::list(vec![]), &AcceptAll).unwrap(), Vec::<String>::new());
/// assert_eq!(find(&Node::string("x"), &AcceptAll).unwrap(), vec!["x"]);
/// ```
pub fn find<P>(node: &Node, predicate: &P) -> Result<Vec<String>, FindError>
where
    P: TypePredicate + ?Sized,
{
    Finder::new(predicate).find(node)
}

/// Depth-bounded pre-order traversal that collects conforming text.
///
/// Per node, in order of precedence:
///
/// 1. **Null** → contributes nothing and is not descended into, whatever
///    its declared type.
/// 2. **Container** → children are visited in stored order and their
///    results concatenated. The container itself is never tested.
/// 3. **Text scalar** the predicate accepts → contributes its text.
/// 4. **Anything else** → contributes nothing. The predicate is only ever
///    called on text scalars.
///
/// # INV: Container flattening
///
/// `find(Container([a, b])) == find(a) ++ find(b)`.
///
/// # INV: Failure is total
///
/// If the predicate fails, or a node sits deeper than
/// [`max_depth`](Self::max_depth), the whole call fails. No partial result
/// reaches the caller.
///
/// # Example
///
/// ```
/// use typefind::{CodepointLength, Finder, Node};
///
/// let doc = Node::list(vec![
///     Node::string("alpha"),
///     Node::null(),
///     Node::list(vec![Node::string("beta"), Node::string("gamma")]),
/// ]);
///
/// let finder = Finder::new(CodepointLength::at_least(4));
/// assert_eq!(finder.find(&doc).unwrap(), vec!["alpha", "beta", "gamma"]);
/// ```
#[derive(Debug, Clone)]
pub struct Finder<P> {
    predicate: P,
    max_depth: usize,
}

impl<P: TypePredicate> Finder<P> {
    /// Create a finder with [`DEFAULT_MAX_DEPTH`].
    pub fn new(predicate: P) -> Self {
        Self {
            predicate,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Set the maximum nesting depth. The root sits at depth 0.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Returns the maximum nesting depth.
    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Returns the predicate.
    #[must_use]
    pub fn predicate(&self) -> &P {
        &self.predicate
    }

    /// Collect every conforming text value under `node`, in pre-order.
    ///
    /// # Errors
    ///
    /// - [`FindError::PredicateFailure`] if the predicate fails on any visited value
    /// - [`FindError::DepthExceeded`] if the document nests deeper than the bound
    pub fn find(&self, node: &Node) -> Result<Vec<String>, FindError> {
        let mut matches = self.matches(node);
        let mut found = Vec::new();
        while let Some(item) = matches.next() {
            match item {
                Ok(text) => found.push(text.to_owned()),
                Err(err) => {
                    warn!(
                        predicate = self.predicate.type_name(),
                        visited = matches.visited(),
                        error = %err,
                        "find_failure"
                    );
                    return Err(err);
                }
            }
        }
        debug!(
            predicate = self.predicate.type_name(),
            visited = matches.visited(),
            matched = found.len(),
            "find_success"
        );
        Ok(found)
    }

    /// Count conforming text values without collecting them.
    ///
    /// # Errors
    ///
    /// Same as [`find()`](Self::find).
    pub fn count(&self, node: &Node) -> Result<usize, FindError> {
        self.matches(node)
            .try_fold(0, |count, item| item.map(|_| count + 1))
    }

    /// Lazily yield conforming text values, borrowed from the tree.
    ///
    /// The iterator yields at most one `Err`, after which it is exhausted.
    /// Values yielded before the error are the caller's to discard; use
    /// [`find()`](Self::find) for all-or-nothing semantics.
    ///
    /// ```
    /// use typefind::{Finder, Node, StringMatcher};
    ///
    /// let doc = Node::list(vec!["a1".into(), "b".into(), "a2".into()]);
    /// let finder = Finder::new(StringMatcher::prefix("a", false));
    /// let first: Option<&str> = finder.matches(&doc).next().and_then(Result::ok);
    /// assert_eq!(first, Some("a1"));
    /// ```
    pub fn matches<'n>(&self, node: &'n Node) -> Matches<'_, 'n, P> {
        Matches {
            finder: self,
            stack: vec![(node, 0)],
            visited: 0,
        }
    }

    /// Run the traversal recording every visited node.
    ///
    /// `result` is exactly what [`find()`](Self::find) returns for the same
    /// input; `steps` stops at the failing node if the traversal fails.
    #[must_use]
    pub fn find_with_trace(&self, node: &Node) -> FindTrace {
        let mut stack = vec![(node, 0)];
        let mut found = Vec::new();
        let mut steps = Vec::new();
        let mut result = Ok(());

        while let Some((current, depth)) = stack.pop() {
            let visit = self.visit(current, depth, &mut stack);
            let outcome = match visit {
                Visit::Matched(text) => {
                    found.push(text.to_owned());
                    StepOutcome::Matched
                }
                Visit::Skipped(outcome) => outcome,
                Visit::Failed(err, outcome) => {
                    result = Err(err);
                    outcome
                }
            };
            steps.push(FindStep {
                ordinal: steps.len(),
                depth,
                node_type: current.node_type(),
                outcome,
            });
            if result.is_err() {
                break;
            }
        }

        FindTrace {
            predicate: self.predicate.type_name().to_owned(),
            result: result.map(|()| found),
            steps,
        }
    }

    /// Visit one node: push its children, or test it.
    fn visit<'n>(
        &self,
        node: &'n Node,
        depth: usize,
        stack: &mut Vec<(&'n Node, usize)>,
    ) -> Visit<'n> {
        if depth > self.max_depth {
            return Visit::Failed(
                FindError::DepthExceeded {
                    depth,
                    max: self.max_depth,
                },
                StepOutcome::TooDeep,
            );
        }
        match node {
            Node::Null(_) => Visit::Skipped(StepOutcome::SkippedNull),
            Node::Container(container) => {
                // Reversed so the first child is popped first.
                stack.extend(container.children().rev().map(|child| (child, depth + 1)));
                Visit::Skipped(StepOutcome::Descended {
                    children: container.len(),
                })
            }
            Node::Scalar(Scalar::String(text)) => match self.predicate.is_valid(node) {
                Ok(true) => Visit::Matched(text),
                Ok(false) => Visit::Skipped(StepOutcome::Rejected),
                Err(source) => Visit::Failed(
                    FindError::PredicateFailure {
                        predicate: self.predicate.type_name().to_owned(),
                        depth,
                        source,
                    },
                    StepOutcome::Failed,
                ),
            },
            Node::Scalar(_) => Visit::Skipped(StepOutcome::NotText),
        }
    }
}

enum Visit<'n> {
    Matched(&'n str),
    Skipped(StepOutcome),
    Failed(FindError, StepOutcome),
}

/// Lazy iterator over conforming text values. See [`Finder::matches`].
#[derive(Debug)]
pub struct Matches<'f, 'n, P> {
    finder: &'f Finder<P>,
    stack: Vec<(&'n Node, usize)>,
    visited: usize,
}

impl<P> Matches<'_, '_, P> {
    /// Number of nodes visited so far.
    #[must_use]
    pub fn visited(&self) -> usize {
        self.visited
    }
}

impl<'n, P: TypePredicate> Iterator for Matches<'_, 'n, P> {
    type Item = Result<&'n str, FindError>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((node, depth)) = self.stack.pop() {
            self.visited += 1;
            match self.finder.visit(node, depth, &mut self.stack) {
                Visit::Matched(text) => return Some(Ok(text)),
                Visit::Skipped(_) => {}
                Visit::Failed(err, _) => {
                    self.stack.clear();
                    return Some(Err(err));
                }
            }
        }
        None
    }
}
