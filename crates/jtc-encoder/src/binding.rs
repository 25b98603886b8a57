//! Literals and the variable bindings every pass produces.

use crate::quote::min_quote;
use jtc_core::{TargetLanguage, Value};

/// A scalar that can be hoisted into a variable.
///
/// Numbers are keyed by their source text, so `1` and `1.0` stay distinct
/// (they differ in Python).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Literal {
    Number(String),
    String(String),
    Null,
    Undefined,
}

impl Literal {
    /// `None` for containers and booleans.
    pub fn from_scalar(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => Some(Self::Number(n.to_string())),
            Value::String(s) => Some(Self::String(s.clone())),
            Value::Null => Some(Self::Null),
            Value::Undefined => Some(Self::Undefined),
            _ => None,
        }
    }

    /// Source text of the literal, unquoted for strings.
    pub fn text<'a>(&'a self, language: TargetLanguage) -> &'a str {
        match self {
            Self::Number(n) => n,
            Self::String(s) => s,
            Self::Null => language.null_literal(),
            Self::Undefined => language.undefined_literal(),
        }
    }
}

/// What a binding's name stands for.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundValue {
    Literal(Literal),
    /// Raw source text: a concatenation or an array literal.
    Expression(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub name: String,
    pub value: BoundValue,
    /// Pass that created the binding; declarations are emitted in pass order.
    pub pass: usize,
}

impl Binding {
    pub fn literal(name: impl Into<String>, literal: Literal) -> Self {
        Self { name: name.into(), value: BoundValue::Literal(literal), pass: 1 }
    }

    pub fn expression(name: impl Into<String>, expr: impl Into<String>, pass: usize) -> Self {
        Self { name: name.into(), value: BoundValue::Expression(expr.into()), pass }
    }

    /// Right-hand side of the declaration.
    pub fn declaration_value(&self, language: TargetLanguage) -> String {
        match &self.value {
            BoundValue::Literal(Literal::String(s)) => min_quote(s, language),
            BoundValue::Literal(other) => other.text(language).to_string(),
            BoundValue::Expression(expr) => expr.clone(),
        }
    }
}

/// Bytes a declaration of a `value_len`-byte value under a `name_len`-byte
/// name costs, separator included (`,A=123`).
pub fn declaration_cost(name_len: usize, value_len: usize) -> usize {
    1 + name_len + 1 + value_len
}
