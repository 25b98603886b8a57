//! First-pass tree rewriter: replaces literals and words of strings with
//! references to the variables bound by [`crate::savings::assign`].

use crate::binding::Literal;
use crate::concat;
use crate::document::{Key, Node, Slot};
use crate::frequency::words;
use crate::marker::Markers;
use crate::quote::{min_key_quote, min_quote};
use crate::savings::{LiteralTable, WordRef};
use jtc_core::{JtcError, Result, Role, TargetLanguage, Value};

/// JavaScript object literals treat this key as a prototype setter unless
/// it is computed.
const PROTO_KEY: &str = "__proto__";

pub struct Rewriter<'a> {
    table: &'a LiteralTable,
    markers: &'a Markers,
    language: TargetLanguage,
}

enum Operand {
    Text(String),
    Ref(String),
}

impl<'a> Rewriter<'a> {
    pub fn new(table: &'a LiteralTable, markers: &'a Markers, language: TargetLanguage) -> Self {
        Self { table, markers, language }
    }

    /// Rewrite every leaf and key of `doc` in place. Returns how many of
    /// them now reference a variable.
    pub fn rewrite(&self, doc: &mut Node) -> Result<usize> {
        let mut substituted = 0;
        doc.visit_leaves_mut(Role::Root, &mut |slot| {
            let hit = match slot {
                Slot::Key(key) => self.rewrite_key(key),
                Slot::Value(role, node) => self.rewrite_value(role, node)?,
            };
            if hit {
                substituted += 1;
            }
            Ok::<(), JtcError>(())
        })?;
        Ok(substituted)
    }

    fn rewrite_key(&self, key: &mut Key) -> bool {
        let Key::Literal(s) = key else { return false };
        let (expr, hit) = self.string_expr(s);
        let expr = if self.language.computed_keys() && (hit || s == PROTO_KEY) {
            format!("[{expr}]")
        } else if hit {
            expr
        } else {
            min_key_quote(s, self.language)
        };
        *key = Key::Expr(self.markers.wrap(&expr));
        hit
    }

    fn rewrite_value(&self, role: Role, node: &mut Node) -> Result<bool> {
        let Node::Literal(value) = node else { return Ok(false) };
        let (expr, hit) = match value {
            Value::String(s) => self.string_expr(s),
            Value::Bool(_) => {
                return Err(JtcError::UnsupportedLeaf { role, value: value.to_string() });
            }
            scalar => {
                let Some(literal) = Literal::from_scalar(scalar) else { return Ok(false) };
                match self.table.get(&literal) {
                    Some(name) => (name.to_string(), true),
                    // Numbers read the same in every target.
                    None if matches!(literal, Literal::Number(_)) => return Ok(false),
                    None => (literal.text(self.language).to_string(), false),
                }
            }
        };
        *node = Node::Expr(self.markers.wrap(&expr));
        Ok(hit)
    }

    /// Source expression for a string, plus whether any word was replaced.
    fn string_expr(&self, s: &str) -> (String, bool) {
        let mut operands: Vec<Operand> = Vec::new();
        let mut hit = false;
        for word in words(s) {
            match self.table.lookup_word(word) {
                Some(WordRef::Exact(name)) => operands.push(Operand::Ref(name.to_string())),
                Some(WordRef::AddSpace(name)) => {
                    self.push_text(&mut operands, " ");
                    operands.push(Operand::Ref(name.to_string()));
                }
                Some(WordRef::DropSpace(name)) => operands.push(Operand::Ref(format!(
                    "{name}{}",
                    self.language.strip_first_suffix()
                ))),
                None => {
                    self.push_text(&mut operands, word);
                    continue;
                }
            }
            hit = true;
        }
        if !hit {
            return (min_quote(s, self.language), false);
        }
        let parts: Vec<String> = operands
            .into_iter()
            .map(|op| match op {
                Operand::Text(text) => min_quote(&text, self.language),
                Operand::Ref(name) => name,
            })
            .collect();
        (concat::join(&parts), true)
    }

    fn push_text(&self, operands: &mut Vec<Operand>, text: &str) {
        if text.is_empty() {
            return;
        }
        match operands.last_mut() {
            Some(Operand::Text(run)) => run.push_str(text),
            _ => operands.push(Operand::Text(text.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn markers() -> Markers {
        Markers::with_uid(77).unwrap()
    }

    fn table(entries: &[(&str, &str)]) -> LiteralTable {
        let mut table = LiteralTable::default();
        for (lit, name) in entries {
            let literal = match *lit {
                "null" => Literal::Null,
                "undefined" => Literal::Undefined,
                s if s.parse::<f64>().is_ok() => Literal::Number(s.to_string()),
                s => Literal::String(s.to_string()),
            };
            table.insert(literal, name.to_string());
        }
        table
    }

    fn expr(rewriter: &Rewriter<'_>, s: &str) -> String {
        rewriter.string_expr(s).0
    }

    #[test]
    fn test_string_words() {
        let m = markers();
        let t = table(&[("+proj=longlat", "A"), (" +datum=WGS84", "B")]);
        let r = Rewriter::new(&t, &m, TargetLanguage::Js);
        assert_eq!(expr(&r, "+proj=longlat +datum=WGS84"), "A+B");
        assert_eq!(expr(&r, "+proj=longlat +x"), "A+\" +x\"");
        assert_eq!(expr(&r, "x +proj=longlat"), "\"x \"+A");
        assert_eq!(expr(&r, "+datum=WGS84 y"), "B.slice(1)+\" y\"");
        assert_eq!(expr(&r, "nothing here"), "\"nothing here\"");
    }

    #[test]
    fn test_python_drop_space() {
        let m = markers();
        let t = table(&[(" tail", "A")]);
        let r = Rewriter::new(&t, &m, TargetLanguage::Py);
        assert_eq!(expr(&r, "tail"), "A[1:]");
        assert_eq!(expr(&r, "x tail"), "\"x\"+A");
    }

    #[test]
    fn test_runs_merge() {
        let m = markers();
        let t = table(&[("k", "A")]);
        let r = Rewriter::new(&t, &m, TargetLanguage::Js);
        assert_eq!(expr(&r, "a b  c k"), "\"a b  c \"+A");
    }

    #[test]
    fn test_rewrite_tree() {
        let m = markers();
        let t = table(&[("12345", "A"), ("null", "B"), ("name", "C")]);
        let r = Rewriter::new(&t, &m, TargetLanguage::Js);
        let value = Value::object([
            ("name", Value::Array(vec![12345.into(), 7.into(), Value::Null, Value::Undefined])),
            ("other", "name".into()),
        ]);
        let mut doc = Node::from(&value);
        let hits = r.rewrite(&mut doc).unwrap();
        assert_eq!(hits, 4);
        assert_eq!(m.cleanup(&doc.render("").unwrap()), r#"{[C]:[A,7,B,undefined],"other":C}"#);
    }

    #[test]
    fn test_python_keys_not_bracketed() {
        let m = markers();
        let t = table(&[("name", "A")]);
        let r = Rewriter::new(&t, &m, TargetLanguage::Py);
        let mut doc = Node::from(&Value::object([("name", Value::Undefined), ("__proto__", Value::Null)]));
        r.rewrite(&mut doc).unwrap();
        assert_eq!(m.cleanup(&doc.render("").unwrap()), r#"{A:None,"__proto__":None}"#);
    }

    #[test]
    fn test_proto_key_computed() {
        let m = markers();
        let t = LiteralTable::default();
        let r = Rewriter::new(&t, &m, TargetLanguage::Js);
        let mut doc = Node::from(&Value::object([("__proto__", Value::from(1))]));
        r.rewrite(&mut doc).unwrap();
        assert_eq!(m.cleanup(&doc.render("").unwrap()), r#"{["__proto__"]:1}"#);
    }

    #[test]
    fn test_plain_key_never_template_literal() {
        let m = markers();
        let t = LiteralTable::default();
        let r = Rewriter::new(&t, &m, TargetLanguage::Js);
        let mut doc = Node::from(&Value::object([("it's \"x\"", Value::from("it's \"x\""))]));
        r.rewrite(&mut doc).unwrap();
        assert_eq!(m.cleanup(&doc.render("").unwrap()), r#"{'it\'s "x"':`it's "x"`}"#);
    }

    #[test]
    fn test_quotes_survive_cleanup() {
        let m = markers();
        let t = table(&[("k", "A")]);
        let r = Rewriter::new(&t, &m, TargetLanguage::Js);
        let mut doc = Node::from(&Value::Array(vec!["say \"hi\\\" k".into()]));
        r.rewrite(&mut doc).unwrap();
        assert_eq!(m.cleanup(&doc.render("").unwrap()), r#"['say "hi\\" '+A]"#);
    }

    #[test]
    fn test_boolean_leaf_rejected() {
        let m = markers();
        let t = LiteralTable::default();
        let r = Rewriter::new(&t, &m, TargetLanguage::Js);
        let mut doc = Node::from(&Value::Array(vec![Value::Bool(false)]));
        let err = r.rewrite(&mut doc).unwrap_err();
        assert!(matches!(err, JtcError::UnsupportedLeaf { role: Role::ArrayItem, .. }));
    }
}
