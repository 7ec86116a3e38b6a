//! `TypePredicate` — The conformance check the finder consumes
//!
//! A predicate answers one question: does this scalar conform to some named
//! type? How the type was compiled is none of the finder's business. The
//! finder only ever calls a predicate on text scalars, but implementations
//! see the whole [`Node`] so they can inspect its declared type if they need to.

use crate::{Node, PredicateError};
use std::fmt::{self, Debug};
use std::sync::Arc;

/// Decides whether a node conforms to a type.
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync` so one compiled type can serve
/// concurrent traversals.
///
/// # Failure
///
/// Return `Err` when the check itself cannot be carried out. The finder
/// aborts the whole traversal on the first error; it never treats an error
/// as a non-match.
///
/// # Example
///
/// ```
/// use typefind::{Node, PredicateError, TypePredicate};
///
/// #[derive(Debug)]
/// struct Uppercase;
///
/// impl TypePredicate for Uppercase {
///     fn is_valid(&self, node: &Node) -> Result<bool, PredicateError> {
///         Ok(node.as_text().is_some_and(|s| !s.is_empty() && s.chars().all(char::is_uppercase)))
///     }
///
///     fn type_name(&self) -> &str {
///         "uppercase"
///     }
/// }
///
/// assert!(Uppercase.is_valid(&Node::string("ABC")).unwrap());
/// assert!(!Uppercase.is_valid(&Node::string("Abc")).unwrap());
/// ```
#[diagnostic::on_unimplemented(
    message = "`{Self}` does not implement `TypePredicate`",
    label = "this type cannot decide type conformance",
    note = "use a built-in predicate (StringMatcher, CodepointLength, NamedType, ...), wrap a closure with `from_fn`/`from_text_fn`, or implement `is_valid(&self, &Node) -> Result<bool, PredicateError>`"
)]
pub trait TypePredicate: Send + Sync + Debug {
    /// Check whether `node` conforms.
    ///
    /// # Errors
    ///
    /// Returns [`PredicateError`] if the check cannot be evaluated.
    fn is_valid(&self, node: &Node) -> Result<bool, PredicateError>;

    /// Returns the name of the type this predicate checks.
    ///
    /// Used in error messages and traces.
    fn type_name(&self) -> &str {
        "anonymous"
    }
}

// Blanket implementation for boxed predicates
#[diagnostic::do_not_recommend]
impl TypePredicate for Box<dyn TypePredicate> {
    fn is_valid(&self, node: &Node) -> Result<bool, PredicateError> {
        (**self).is_valid(node)
    }

    fn type_name(&self) -> &str {
        (**self).type_name()
    }
}

#[diagnostic::do_not_recommend]
impl<T: TypePredicate + ?Sized> TypePredicate for &T {
    fn is_valid(&self, node: &Node) -> Result<bool, PredicateError> {
        (**self).is_valid(node)
    }

    fn type_name(&self) -> &str {
        (**self).type_name()
    }
}

#[diagnostic::do_not_recommend]
impl<T: TypePredicate + ?Sized> TypePredicate for Arc<T> {
    fn is_valid(&self, node: &Node) -> Result<bool, PredicateError> {
        (**self).is_valid(node)
    }

    fn type_name(&self) -> &str {
        (**self).type_name()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Closure adapters
// ═══════════════════════════════════════════════════════════════════════════════

/// A predicate backed by a fallible closure over the whole node.
///
/// Built with [`from_fn`].
pub struct FnPredicate<F> {
    name: String,
    f: F,
}

/// Wrap a fallible closure as a named [`TypePredicate`].
///
/// ```
/// use typefind::{from_fn, Node, PredicateError, TypePredicate};
///
/// let p = from_fn("non_empty", |node: &Node| match node.as_text() {
///     Some(s) => Ok(!s.is_empty()),
///     None => Err(PredicateError::new("expected text")),
/// });
/// assert!(p.is_valid(&Node::string("x")).unwrap());
/// assert!(p.is_valid(&Node::from(1i64)).is_err());
/// ```
pub fn from_fn<F>(name: impl Into<String>, f: F) -> FnPredicate<F>
where
    F: Fn(&Node) -> Result<bool, PredicateError> + Send + Sync,
{
    FnPredicate {
        name: name.into(),
        f,
    }
}

impl<F> TypePredicate for FnPredicate<F>
where
    F: Fn(&Node) -> Result<bool, PredicateError> + Send + Sync,
{
    fn is_valid(&self, node: &Node) -> Result<bool, PredicateError> {
        (self.f)(node)
    }

    fn type_name(&self) -> &str {
        &self.name
    }
}

impl<F> Debug for FnPredicate<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FnPredicate").field(&self.name).finish()
    }
}

/// A predicate backed by an infallible closure over text.
///
/// Non-text nodes are rejected without calling the closure. Built with
/// [`from_text_fn`].
pub struct TextFn<F> {
    name: String,
    f: F,
}

/// Wrap an infallible `&str` closure as a named [`TypePredicate`].
///
/// ```
/// use typefind::{from_text_fn, Node, TypePredicate};
///
/// let p = from_text_fn("short", |s| s.len() < 3);
/// assert!(p.is_valid(&Node::string("ab")).unwrap());
/// assert!(!p.is_valid(&Node::from(1i64)).unwrap());
/// ```
pub fn from_text_fn<F>(name: impl Into<String>, f: F) -> TextFn<F>
where
    F: Fn(&str) -> bool + Send + Sync,
{
    TextFn {
        name: name.into(),
        f,
    }
}

impl<F> TypePredicate for TextFn<F>
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn is_valid(&self, node: &Node) -> Result<bool, PredicateError> {
        Ok(node.as_text().is_some_and(|s| (self.f)(s)))
    }

    fn type_name(&self) -> &str {
        &self.name
    }
}

impl<F> Debug for TextFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TextFn").field(&self.name).finish()
    }
}
