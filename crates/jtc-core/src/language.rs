//! Syntax tables for the supported output languages.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Language the generated code is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetLanguage {
    #[default]
    Js,
    Py,
}

const JS_RESERVED: &[&str] = &[
    "arguments", "await", "break", "case", "catch", "class", "const", "continue",
    "debugger", "default", "delete", "do", "else", "enum", "eval", "export",
    "extends", "false", "finally", "for", "function", "if", "implements", "import",
    "in", "Infinity", "instanceof", "interface", "let", "NaN", "new", "null",
    "package", "private", "protected", "public", "return", "static", "super",
    "switch", "this", "throw", "true", "try", "typeof", "undefined", "var",
    "void", "while", "with", "yield",
];

const PY_RESERVED: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break",
    "class", "continue", "def", "del", "elif", "else", "except", "finally",
    "for", "from", "global", "if", "import", "in", "is", "lambda", "nonlocal",
    "not", "or", "pass", "raise", "return", "try", "while", "with", "yield",
];

const JS_IDENT_START: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz_$";
const JS_IDENT_CONTINUE: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz_$0123456789";
const PY_IDENT_START: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz_";
const PY_IDENT_CONTINUE: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz_0123456789";

impl TargetLanguage {
    pub fn default_output_prefix(&self) -> &'static str {
        match self {
            Self::Js => "module.exports",
            Self::Py => "data",
        }
    }

    pub fn reserved_words(&self) -> &'static [&'static str] {
        match self {
            Self::Js => JS_RESERVED,
            Self::Py => PY_RESERVED,
        }
    }

    pub fn is_reserved(&self, name: &str) -> bool {
        self.reserved_words().contains(&name)
    }

    /// Characters allowed as the first character of an identifier, in
    /// allocation order.
    pub fn ident_start(&self) -> &'static [u8] {
        match self {
            Self::Js => JS_IDENT_START,
            Self::Py => PY_IDENT_START,
        }
    }

    /// Characters allowed after the first one, in allocation order.
    pub fn ident_continue(&self) -> &'static [u8] {
        match self {
            Self::Js => JS_IDENT_CONTINUE,
            Self::Py => PY_IDENT_CONTINUE,
        }
    }

    /// Accepted string delimiters, most preferred first.
    pub fn quotes(&self) -> &'static [char] {
        match self {
            Self::Js => &['"', '\'', '`'],
            Self::Py => &['"', '\''],
        }
    }

    /// Delimiters allowed for a plain (non-computed) object key. A template
    /// literal is not a JavaScript property name.
    pub fn key_quotes(&self) -> &'static [char] {
        &['"', '\'']
    }

    pub fn null_literal(&self) -> &'static str {
        match self {
            Self::Js => "null",
            Self::Py => "None",
        }
    }

    /// Python has no `undefined`; it aliases the null literal.
    pub fn undefined_literal(&self) -> &'static str {
        match self {
            Self::Js => "undefined",
            Self::Py => "None",
        }
    }

    pub fn has_undefined(&self) -> bool {
        matches!(self, Self::Js)
    }

    /// Whether object keys must be wrapped as `[expr]` to be evaluated.
    pub fn computed_keys(&self) -> bool {
        matches!(self, Self::Js)
    }

    /// Suffix that drops the first character of a string expression.
    pub fn strip_first_suffix(&self) -> &'static str {
        match self {
            Self::Js => ".slice(1)",
            Self::Py => "[1:]",
        }
    }

    pub fn comment_prefix(&self) -> &'static str {
        match self {
            Self::Js => "//",
            Self::Py => "#",
        }
    }
}

impl fmt::Display for TargetLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Js => "js",
            Self::Py => "py",
        })
    }
}

impl FromStr for TargetLanguage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "js" | "javascript" => Ok(Self::Js),
            "py" | "python" => Ok(Self::Py),
            other => Err(format!("unknown target language: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_language() {
        assert_eq!("JS".parse::<TargetLanguage>().unwrap(), TargetLanguage::Js);
        assert_eq!("python".parse::<TargetLanguage>().unwrap(), TargetLanguage::Py);
        assert!("ruby".parse::<TargetLanguage>().is_err());
    }

    #[test]
    fn test_reserved() {
        assert!(TargetLanguage::Js.is_reserved("do"));
        assert!(!TargetLanguage::Js.is_reserved("is"));
        assert!(TargetLanguage::Py.is_reserved("is"));
        assert!(TargetLanguage::Py.is_reserved("None"));
    }

    #[test]
    fn test_key_quotes_exclude_template() {
        assert!(TargetLanguage::Js.quotes().contains(&'`'));
        assert!(!TargetLanguage::Js.key_quotes().contains(&'`'));
    }

    #[test]
    fn test_python_has_no_dollar_identifiers() {
        assert!(!TargetLanguage::Py.ident_start().contains(&b'$'));
        assert!(TargetLanguage::Js.ident_start().contains(&b'$'));
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&TargetLanguage::Py).unwrap();
        assert_eq!(json, "\"py\"");
    }
}
