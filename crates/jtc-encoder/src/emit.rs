//! Code assembly: declaration blocks followed by the output assignment.

use crate::binding::Binding;
use crate::document::Node;
use crate::marker::Markers;
use jtc_core::{EncodeConfig, Result, TargetLanguage};
use std::collections::BTreeMap;
use std::fmt::Write;

/// Bytes a declaration block costs on top of its declarations, comment
/// line excluded. Each declaration already pays for one separator.
///
/// JavaScript: `var ` and `;` plus the line break, minus the separator the
/// first declaration does not need. Python puts one declaration per line,
/// so the separators are the line breaks.
pub fn block_overhead(language: TargetLanguage) -> usize {
    match language {
        TargetLanguage::Js => "var ".len() + ";".len() + "\n".len() - 1,
        TargetLanguage::Py => 0,
    }
}

pub struct Assembler<'a> {
    markers: &'a Markers,
    config: &'a EncodeConfig,
}

impl<'a> Assembler<'a> {
    pub fn new(markers: &'a Markers, config: &'a EncodeConfig) -> Self {
        Self { markers, config }
    }

    /// Render the final program.
    pub fn assemble(&self, bindings: &[Binding], doc: &Node) -> Result<String> {
        let language = self.config.target;
        let mut passes: BTreeMap<usize, Vec<&Binding>> = BTreeMap::new();
        for binding in bindings {
            passes.entry(binding.pass).or_default().push(binding);
        }

        let mut out = String::new();
        for (i, (pass, group)) in passes.iter().enumerate() {
            if i > 0 {
                out.push_str("\n\n");
            }
            let _ = writeln!(out, "{} pass {pass}", language.comment_prefix());
            out.push_str(&declarations(group, language));
        }
        if !out.is_empty() {
            out.push('\n');
        }

        let indent = self.config.indent.as_ref().map(|i| i.unit()).unwrap_or_default();
        let body = self.markers.cleanup(&doc.render(&indent)?);
        let _ = write!(out, "{} = {body}", self.config.output_prefix());
        if language == TargetLanguage::Js {
            out.push(';');
        }
        Ok(out)
    }
}

fn declarations(group: &[&Binding], language: TargetLanguage) -> String {
    let decls: Vec<String> = group
        .iter()
        .map(|b| format!("{}={}", b.name, b.declaration_value(language)))
        .collect();
    match language {
        TargetLanguage::Js => format!("var {};", decls.join(",")),
        TargetLanguage::Py => decls.join("\n"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::Literal;
    use jtc_core::{Indent, Value};

    fn markers() -> Markers {
        Markers::with_uid(5).unwrap()
    }

    fn bindings() -> Vec<Binding> {
        vec![
            Binding::literal("A", Literal::String("x y".into())),
            Binding::literal("B", Literal::Null),
            Binding::expression("C", "A+B", 2),
        ]
    }

    #[test]
    fn test_js_layout() {
        let m = markers();
        let config = EncodeConfig::new(TargetLanguage::Js);
        let doc = Node::Array(vec![Node::Expr(m.wrap("C")), Node::Literal(1.into())]);
        let code = Assembler::new(&m, &config).assemble(&bindings(), &doc).unwrap();
        assert_eq!(
            code,
            "// pass 1\nvar A=\"x y\",B=null;\n\n// pass 2\nvar C=A+B;\nmodule.exports = [C,1];"
        );
    }

    #[test]
    fn test_python_layout() {
        let m = markers();
        let config = EncodeConfig::new(TargetLanguage::Py).with_output_prefix("result");
        let doc = Node::Object(vec![]);
        let code = Assembler::new(&m, &config).assemble(&bindings(), &doc).unwrap();
        assert_eq!(code, "# pass 1\nA=\"x y\"\nB=None\n\n# pass 2\nC=A+B\nresult = {}");
    }

    #[test]
    fn test_no_bindings() {
        let m = markers();
        let config = EncodeConfig::new(TargetLanguage::Js).with_indent(Indent::Spaces(2));
        let doc = Node::from(&Value::object([("a", Value::from(1))]));
        let code = Assembler::new(&m, &config).assemble(&[], &doc).unwrap();
        assert_eq!(code, "module.exports = {\n  \"a\": 1\n};");
    }

    #[test]
    fn test_block_overhead() {
        assert_eq!(block_overhead(TargetLanguage::Js), 5);
        assert_eq!(block_overhead(TargetLanguage::Py), 0);
    }
}
