//! YAML notation for test documents.
//!
//! Plain YAML maps onto the document model the same way JSON does: null,
//! booleans, numbers, strings, sequences (lists) and mappings (structs,
//! field order kept). Kinds YAML has no syntax for use tags:
//!
//! | YAML | Node |
//! |------|------|
//! | `!symbol name` | symbol scalar |
//! | `!sexp [a, b]` | s-expression container |
//! | `!null list` | null declared as `list` (any type name) |
//! | `!bytes [1, 2]` | bytes scalar |
//!
//! ```
//! use typefind_test::document::node_from_yaml;
//!
//! let value: serde_yaml::Value = serde_yaml::from_str("[a, !symbol b, !null string]").unwrap();
//! let doc = node_from_yaml(&value).unwrap();
//! assert_eq!(typefind::find(&doc, &typefind::AcceptAll).unwrap(), vec!["a"]);
//! ```

use serde_yaml::Value;
use std::fmt;
use typefind::{Node, NodeType, Scalar};

/// Errors converting YAML into a [`Node`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentError {
    /// A tag other than `!symbol`, `!sexp`, `!null`, `!bytes`.
    UnknownTag(String),
    /// A known tag applied to the wrong kind of value.
    InvalidTagged {
        /// The tag.
        tag: String,
        /// What the tag expects.
        expected: &'static str,
    },
    /// `!null` with a type name that does not exist.
    UnknownNullType(String),
    /// A mapping key that is not a string.
    NonStringKey,
}

impl fmt::Display for DocumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownTag(tag) => write!(f, "unknown document tag \"{tag}\""),
            Self::InvalidTagged { tag, expected } => {
                write!(f, "tag \"{tag}\" expects {expected}")
            }
            Self::UnknownNullType(name) => write!(f, "unknown null type \"{name}\""),
            Self::NonStringKey => write!(f, "struct field names must be strings"),
        }
    }
}

impl std::error::Error for DocumentError {}

/// Convert a YAML value into a document tree.
///
/// # Errors
///
/// Returns [`DocumentError`] on unknown tags, misapplied tags, or
/// non-string mapping keys.
pub fn node_from_yaml(value: &Value) -> Result<Node, DocumentError> {
    match value {
        Value::Null => Ok(Node::null()),
        Value::Bool(b) => Ok(Node::from(*b)),
        Value::Number(n) => Ok(match n.as_i64() {
            Some(i) => Node::from(i),
            None => Node::Scalar(Scalar::Float(n.as_f64().unwrap_or(f64::NAN))),
        }),
        Value::String(s) => Ok(Node::string(s.as_str())),
        Value::Sequence(items) => Ok(Node::list(sequence(items)?)),
        Value::Mapping(mapping) => {
            let fields = mapping
                .iter()
                .map(|(key, value)| {
                    let name = key.as_str().ok_or(DocumentError::NonStringKey)?;
                    Ok((name.to_owned(), node_from_yaml(value)?))
                })
                .collect::<Result<Vec<_>, DocumentError>>()?;
            Ok(Node::structure(fields))
        }
        Value::Tagged(tagged) => {
            let tag = tagged.tag.to_string();
            let invalid = |expected| DocumentError::InvalidTagged {
                tag: tag.clone(),
                expected,
            };
            match tag.trim_start_matches('!') {
                "symbol" => tagged
                    .value
                    .as_str()
                    .map(Node::symbol)
                    .ok_or_else(|| invalid("a string")),
                "sexp" => match &tagged.value {
                    Value::Sequence(items) => Ok(Node::sexp(sequence(items)?)),
                    _ => Err(invalid("a sequence")),
                },
                "null" => {
                    let name = tagged.value.as_str().ok_or_else(|| invalid("a type name"))?;
                    null_type(name)
                        .map(Node::typed_null)
                        .ok_or_else(|| DocumentError::UnknownNullType(name.to_owned()))
                }
                "bytes" => match &tagged.value {
                    Value::Sequence(items) => items
                        .iter()
                        .map(|b| b.as_u64().and_then(|b| u8::try_from(b).ok()))
                        .collect::<Option<Vec<u8>>>()
                        .map(Node::from)
                        .ok_or_else(|| invalid("a sequence of bytes")),
                    _ => Err(invalid("a sequence of bytes")),
                },
                _ => Err(DocumentError::UnknownTag(tag.clone())),
            }
        }
    }
}

fn sequence(items: &[Value]) -> Result<Vec<Node>, DocumentError> {
    items.iter().map(node_from_yaml).collect()
}

fn null_type(name: &str) -> Option<NodeType> {
    Some(match name {
        "null" => NodeType::Null,
        "bool" => NodeType::Bool,
        "int" => NodeType::Int,
        "float" => NodeType::Float,
        "string" => NodeType::String,
        "symbol" => NodeType::Symbol,
        "bytes" => NodeType::Bytes,
        "list" => NodeType::List,
        "sexp" => NodeType::Sexp,
        "struct" => NodeType::Struct,
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(yaml: &str) -> Result<Node, DocumentError> {
        node_from_yaml(&serde_yaml::from_str(yaml).unwrap())
    }

    #[test]
    fn plain_yaml() {
        let node = parse("{name: widget, count: 3, ratio: 0.5, ok: true, tags: [a, ~]}").unwrap();
        assert_eq!(
            node,
            Node::structure([
                ("name", Node::string("widget")),
                ("count", Node::from(3i64)),
                ("ratio", Node::from(0.5)),
                ("ok", Node::from(true)),
                ("tags", Node::list(vec![Node::string("a"), Node::null()])),
            ])
        );
    }

    #[test]
    fn tagged_kinds() {
        let node = parse("[!symbol s, !sexp [x], !null list, !bytes [1, 255]]").unwrap();
        assert_eq!(
            node,
            Node::list(vec![
                Node::symbol("s"),
                Node::sexp(vec![Node::string("x")]),
                Node::typed_null(NodeType::List),
                Node::from(vec![1u8, 255]),
            ])
        );
    }

    #[test]
    fn tag_errors() {
        assert!(matches!(parse("!blob x"), Err(DocumentError::UnknownTag(_))));
        assert!(matches!(parse("!sexp x"), Err(DocumentError::InvalidTagged { .. })));
        assert!(matches!(parse("!bytes [256]"), Err(DocumentError::InvalidTagged { .. })));
        assert_eq!(
            parse("!null widget"),
            Err(DocumentError::UnknownNullType("widget".into()))
        );
    }

    #[test]
    fn non_string_key() {
        assert_eq!(parse("{1: a}"), Err(DocumentError::NonStringKey));
    }
}
