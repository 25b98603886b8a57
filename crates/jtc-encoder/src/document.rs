//! The working document: an owned copy of the input whose leaves are
//! replaced by marker-wrapped expressions as passes run.

use jtc_core::{JtcError, Result, Role, Value};
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Object(Vec<(Key, Node)>),
    Array(Vec<Node>),
    /// A scalar from the input that no pass has touched.
    Literal(Value),
    /// Marker-wrapped expression text.
    Expr(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Key {
    Literal(String),
    Expr(String),
}

/// A leaf handed to a visitor, tagged with where it sits.
pub enum Slot<'a> {
    Key(&'a mut Key),
    Value(Role, &'a mut Node),
}

impl From<&Value> for Node {
    fn from(value: &Value) -> Self {
        match value {
            Value::Array(items) => Node::Array(items.iter().map(Node::from).collect()),
            Value::Object(entries) => Node::Object(
                entries
                    .iter()
                    .map(|(k, v)| (Key::Literal(k.clone()), Node::from(v)))
                    .collect(),
            ),
            scalar => Node::Literal(scalar.clone()),
        }
    }
}

impl Node {
    /// An array none of whose elements is an object or array.
    pub fn is_flat_array(&self) -> bool {
        match self {
            Node::Array(items) => items
                .iter()
                .all(|item| !matches!(item, Node::Array(_) | Node::Object(_))),
            _ => false,
        }
    }

    /// Visit every leaf and object key, depth first, keys before their values.
    pub fn visit_leaves_mut<E, F>(&mut self, role: Role, f: &mut F) -> std::result::Result<(), E>
    where
        F: FnMut(Slot<'_>) -> std::result::Result<(), E>,
    {
        match self {
            Node::Object(entries) => {
                for (key, value) in entries.iter_mut() {
                    f(Slot::Key(key))?;
                    value.visit_leaves_mut(Role::ObjectValue, f)?;
                }
                Ok(())
            }
            Node::Array(items) => {
                for item in items.iter_mut() {
                    item.visit_leaves_mut(Role::ArrayItem, f)?;
                }
                Ok(())
            }
            leaf => f(Slot::Value(role, leaf)),
        }
    }

    /// Visit the text of every expression leaf; the flag is set for keys.
    pub fn for_each_expr_mut<F>(&mut self, mut f: F)
    where
        F: FnMut(&mut String, bool),
    {
        let _ = self.visit_leaves_mut::<(), _>(Role::Root, &mut |slot| {
            match slot {
                Slot::Key(Key::Expr(text)) => f(text, true),
                Slot::Value(_, Node::Expr(text)) => f(text, false),
                _ => {}
            }
            Ok(())
        });
    }

    /// Serialize as JSON-shaped text. Expression leaves come out as quoted
    /// strings still carrying their markers. An empty `indent` is compact.
    pub fn render(&self, indent: &str) -> Result<String> {
        if indent.is_empty() {
            return Ok(serde_json::to_string(self)?);
        }
        let mut out = Vec::new();
        let mut serializer =
            serde_json::Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(indent.as_bytes()));
        self.serialize(&mut serializer)?;
        String::from_utf8(out).map_err(|e| JtcError::Other(e.into()))
    }
}

/// Expressions serialize as JSON strings. Marker cleanup relies on `"` and
/// `\` being the only characters of an expression that gain an escape.
impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Node::Object(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
            Node::Array(items) => serializer.collect_seq(items),
            Node::Literal(value) => value.serialize(serializer),
            Node::Expr(text) => serializer.serialize_str(text),
        }
    }
}

impl Serialize for Key {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Key::Literal(s) | Key::Expr(s) => serializer.serialize_str(s),
        }
    }
}
