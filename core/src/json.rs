//! JSON bridge (feature = "json")
//!
//! JSON has no symbols, s-expressions, bytes, or typed nulls, so the mapping
//! into [`Node`] is total and lossless in one direction:
//!
//! | JSON | Node |
//! |------|------|
//! | `null` | `Null(NodeType::Null)` |
//! | `true` / `false` | `Scalar::Bool` |
//! | number fitting `i64` | `Scalar::Int` |
//! | any other number | `Scalar::Float` |
//! | string | `Scalar::String` |
//! | array | `List` container |
//! | object | `Struct` container, fields in source order |
//!
//! `serde_json` refuses input nested deeper than [`MAX_JSON_DEPTH`], so
//! [`Node::from_json_str`] reports such a document as a parse error before
//! any finder sees it. A finder bound of `MAX_JSON_DEPTH` or more never trips
//! on parsed JSON; deeper trees only come from the [`Node`] constructors.

use crate::{Child, Container, ContainerKind, Node, Scalar};
use serde_json::Value;

/// Deepest array/object nesting `serde_json` parses. One more level fails
/// with "recursion limit exceeded".
pub const MAX_JSON_DEPTH: usize = 127;

impl From<Value> for Node {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Node::null(),
            Value::Bool(b) => Node::from(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Node::from(i),
                // u64 beyond i64::MAX, or a float
                None => Node::Scalar(Scalar::Float(n.as_f64().unwrap_or(f64::NAN))),
            },
            Value::String(s) => Node::from(s),
            Value::Array(items) => Node::list(items.into_iter().map(Node::from).collect()),
            Value::Object(fields) => Node::Container(Container::new(
                ContainerKind::Struct,
                fields
                    .into_iter()
                    .map(|(name, value)| Child::field(name, Node::from(value)))
                    .collect(),
            )),
        }
    }
}

impl Node {
    /// Parse a JSON document into a node tree.
    ///
    /// ```
    /// use typefind::{find, AcceptAll, Node};
    ///
    /// let doc = Node::from_json_str(r#"{"a": "x", "b": [1, "y", null]}"#).unwrap();
    /// assert_eq!(find(&doc, &AcceptAll).unwrap(), vec!["x", "y"]);
    /// ```
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if `input` is not valid JSON, or if it
    /// nests arrays and objects more than [`MAX_JSON_DEPTH`] levels deep.
    pub fn from_json_str(input: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Value>(input).map(Node::from)
    }
}
