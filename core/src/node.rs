//! `Node` — The document model the finder walks
//!
//! A document is an immutable tree. Every node is exactly one of:
//!
//! - `Null` — a null value, carrying the type it was declared with
//! - `Scalar` — a single primitive value
//! - `Container` — an ordered sequence of child nodes
//!
//! The closed sum type replaces runtime type checks: code that walks the tree
//! matches on the variant and the compiler checks exhaustiveness.

use std::fmt;

/// The declared type of a node.
///
/// Every node has one, including nulls: a `null.list` is a null whose declared
/// type is [`NodeType::List`]. The finder treats it as a leaf all the same.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    /// The untyped null.
    Null,
    /// Boolean.
    Bool,
    /// Signed integer.
    Int,
    /// Floating point.
    Float,
    /// Unicode text.
    String,
    /// Symbolic identifier. Not text for matching purposes.
    Symbol,
    /// Raw bytes.
    Bytes,
    /// Ordered list.
    List,
    /// S-expression.
    Sexp,
    /// Struct with named fields.
    Struct,
}

impl NodeType {
    /// Returns the lowercase name of this type.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::String => "string",
            Self::Symbol => "symbol",
            Self::Bytes => "bytes",
            Self::List => "list",
            Self::Sexp => "sexp",
            Self::Struct => "struct",
        }
    }

    /// Returns `true` for the container types (list, sexp, struct).
    #[must_use]
    pub fn is_container(self) -> bool {
        matches!(self, Self::List | Self::Sexp | Self::Struct)
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A primitive value.
///
/// Only [`Scalar::String`] is *text*. Symbols look like text but are a
/// distinct kind and are never collected by the finder.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Floating point value.
    Float(f64),
    /// Text value.
    String(String),
    /// Symbol value.
    Symbol(String),
    /// Raw bytes.
    Bytes(Vec<u8>),
}

impl Scalar {
    /// Returns the declared type of this scalar.
    #[must_use]
    pub fn node_type(&self) -> NodeType {
        match self {
            Self::Bool(_) => NodeType::Bool,
            Self::Int(_) => NodeType::Int,
            Self::Float(_) => NodeType::Float,
            Self::String(_) => NodeType::String,
            Self::Symbol(_) => NodeType::Symbol,
            Self::Bytes(_) => NodeType::Bytes,
        }
    }

    /// Try to get the value as text. Symbols return `None`.
    #[inline]
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

/// The flavour of a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerKind {
    /// Ordered list.
    List,
    /// S-expression.
    Sexp,
    /// Struct. Children carry field names.
    Struct,
}

impl ContainerKind {
    /// Returns the declared type of a container of this kind.
    #[must_use]
    pub fn node_type(self) -> NodeType {
        match self {
            Self::List => NodeType::List,
            Self::Sexp => NodeType::Sexp,
            Self::Struct => NodeType::Struct,
        }
    }
}

/// One entry of a container: an optional field name and the child node.
#[derive(Debug, Clone, PartialEq)]
pub struct Child {
    /// Field name. `Some` for struct fields, `None` for list and sexp elements.
    pub name: Option<String>,
    /// The child node.
    pub node: Node,
}

impl Child {
    /// An unnamed child (list or sexp element).
    #[must_use]
    pub fn element(node: Node) -> Self {
        Self { name: None, node }
    }

    /// A named child (struct field).
    pub fn field(name: impl Into<String>, node: Node) -> Self {
        Self {
            name: Some(name.into()),
            node,
        }
    }
}

/// An ordered sequence of child nodes.
///
/// Children keep the order they were inserted in. Struct fields may repeat a
/// name; nothing here deduplicates.
///
/// Dropping a container frees its subtree with a heap worklist, so a tree of
/// any depth can be dropped. `Clone`, `PartialEq` and `Debug` still recurse
/// once per level.
#[derive(Debug, Clone, PartialEq)]
pub struct Container {
    kind: ContainerKind,
    children: Vec<Child>,
}

impl Container {
    /// Create a container of the given kind.
    #[must_use]
    pub fn new(kind: ContainerKind, children: Vec<Child>) -> Self {
        Self { kind, children }
    }

    /// Returns the container kind.
    #[must_use]
    pub fn kind(&self) -> ContainerKind {
        self.kind
    }

    /// Returns the number of children.
    #[must_use]
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Returns `true` if there are no children.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Iterate the child nodes in stored order.
    pub fn children(&self) -> impl DoubleEndedIterator<Item = &Node> + ExactSizeIterator {
        self.children.iter().map(|c| &c.node)
    }

    /// Iterate `(field name, child)` pairs in stored order.
    pub fn fields(&self) -> impl Iterator<Item = (Option<&str>, &Node)> {
        self.children.iter().map(|c| (c.name.as_deref(), &c.node))
    }

    /// Returns the raw child entries.
    #[must_use]
    pub fn entries(&self) -> &[Child] {
        &self.children
    }
}

impl Drop for Container {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut child) = pending.pop() {
            // Hoist grandchildren so `child` drops with no children of its own.
            if let Node::Container(inner) = &mut child.node {
                pending.append(&mut inner.children);
            }
        }
    }
}

/// One node of a document tree.
///
/// # Example
///
/// ```
/// use typefind::{Node, NodeType};
///
/// let doc = Node::structure([
///     ("name", Node::string("widget")),
///     ("tags", Node::list(vec!["a".into(), "b".into()])),
///     ("owner", Node::typed_null(NodeType::Struct)),
/// ]);
///
/// assert!(doc.is_container());
/// assert_eq!(doc.depth(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// A null of the given declared type. Always a leaf.
    Null(NodeType),
    /// A primitive value.
    Scalar(Scalar),
    /// An ordered sequence of children.
    Container(Container),
}

impl Node {
    /// The untyped null.
    #[must_use]
    pub fn null() -> Self {
        Self::Null(NodeType::Null)
    }

    /// A null declared with the given type (e.g. `null.list`).
    #[must_use]
    pub fn typed_null(node_type: NodeType) -> Self {
        Self::Null(node_type)
    }

    /// A text scalar.
    pub fn string(value: impl Into<String>) -> Self {
        Self::Scalar(Scalar::String(value.into()))
    }

    /// A symbol scalar.
    pub fn symbol(value: impl Into<String>) -> Self {
        Self::Scalar(Scalar::Symbol(value.into()))
    }

    /// A list of unnamed children.
    #[must_use]
    pub fn list(children: Vec<Node>) -> Self {
        Self::sequence(ContainerKind::List, children)
    }

    /// An s-expression of unnamed children.
    #[must_use]
    pub fn sexp(children: Vec<Node>) -> Self {
        Self::sequence(ContainerKind::Sexp, children)
    }

    /// A struct from `(field name, child)` pairs, in the given order.
    pub fn structure<K, I>(fields: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Node)>,
    {
        let children = fields
            .into_iter()
            .map(|(name, node)| Child::field(name, node))
            .collect();
        Self::Container(Container::new(ContainerKind::Struct, children))
    }

    fn sequence(kind: ContainerKind, children: Vec<Node>) -> Self {
        let children = children.into_iter().map(Child::element).collect();
        Self::Container(Container::new(kind, children))
    }

    /// Returns `true` if this is the `Null` variant.
    #[inline]
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null(_))
    }

    /// Returns `true` if this is the `Scalar` variant.
    #[inline]
    #[must_use]
    pub fn is_scalar(&self) -> bool {
        matches!(self, Self::Scalar(_))
    }

    /// Returns `true` if this is the `Container` variant.
    #[inline]
    #[must_use]
    pub fn is_container(&self) -> bool {
        matches!(self, Self::Container(_))
    }

    /// Try to get the value as text.
    ///
    /// Only non-null string scalars are text. Symbols, typed nulls
    /// (`null.string`) and containers return `None`.
    ///
    /// ```
    /// use typefind::Node;
    ///
    /// assert_eq!(Node::string("hello").as_text(), Some("hello"));
    /// assert_eq!(Node::symbol("hello").as_text(), None);
    /// assert_eq!(Node::from(42i64).as_text(), None);
    /// ```
    #[inline]
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Scalar(s) => s.as_text(),
            _ => None,
        }
    }

    /// Try to get the scalar value.
    #[inline]
    #[must_use]
    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Self::Scalar(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get the container.
    #[inline]
    #[must_use]
    pub fn as_container(&self) -> Option<&Container> {
        match self {
            Self::Container(c) => Some(c),
            _ => None,
        }
    }

    /// Returns the declared type of this node.
    #[must_use]
    pub fn node_type(&self) -> NodeType {
        match self {
            Self::Null(t) => *t,
            Self::Scalar(s) => s.node_type(),
            Self::Container(c) => c.kind().node_type(),
        }
    }

    /// Returns the name of this node's declared type.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.node_type().name()
    }

    /// Maximum nesting depth below this node. A leaf has depth 0.
    ///
    /// Walks the whole tree with an explicit stack.
    #[must_use]
    pub fn depth(&self) -> usize {
        let mut max = 0;
        let mut stack = vec![(self, 0usize)];
        while let Some((node, depth)) = stack.pop() {
            max = max.max(depth);
            if let Self::Container(c) = node {
                stack.extend(c.children().map(|child| (child, depth + 1)));
            }
        }
        max
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::null()
    }
}

impl From<Scalar> for Node {
    fn from(s: Scalar) -> Self {
        Self::Scalar(s)
    }
}

impl From<Container> for Node {
    fn from(c: Container) -> Self {
        Self::Container(c)
    }
}

impl From<String> for Node {
    fn from(s: String) -> Self {
        Self::Scalar(Scalar::String(s))
    }
}

impl From<&str> for Node {
    fn from(s: &str) -> Self {
        Self::Scalar(Scalar::String(s.to_string()))
    }
}

impl From<i64> for Node {
    fn from(i: i64) -> Self {
        Self::Scalar(Scalar::Int(i))
    }
}

impl From<f64> for Node {
    fn from(f: f64) -> Self {
        Self::Scalar(Scalar::Float(f))
    }
}

impl From<bool> for Node {
    fn from(b: bool) -> Self {
        Self::Scalar(Scalar::Bool(b))
    }
}

impl From<Vec<u8>> for Node {
    fn from(b: Vec<u8>) -> Self {
        Self::Scalar(Scalar::Bytes(b))
    }
}

impl<T> From<Option<T>> for Node
where
    T: Into<Node>,
{
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => v.into(),
            None => Self::null(),
        }
    }
}
