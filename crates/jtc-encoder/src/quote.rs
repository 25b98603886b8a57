//! Minimal string quoting.

use jtc_core::TargetLanguage;
use std::fmt::Write;

/// Quote `s` as a string literal of `language`, choosing the delimiter that
/// needs the fewest escapes. Ties go to the earlier delimiter in
/// [`TargetLanguage::quotes`].
pub fn min_quote(s: &str, language: TargetLanguage) -> String {
    min_quote_from(s, language.quotes(), language)
}

/// Like [`min_quote`], for a plain object key.
pub fn min_key_quote(s: &str, language: TargetLanguage) -> String {
    min_quote_from(s, language.key_quotes(), language)
}

fn min_quote_from(s: &str, quotes: &[char], language: TargetLanguage) -> String {
    let quote = quotes
        .iter()
        .copied()
        .min_by_key(|&q| escape_cost(s, q))
        .unwrap_or('"');
    quote_with(s, quote, language)
}

fn escape_cost(s: &str, quote: char) -> usize {
    let mut cost = s.chars().filter(|&c| c == quote).count();
    if quote == '`' {
        cost += s.matches("${").count();
    }
    cost
}

/// Quote `s` with a specific delimiter.
pub fn quote_with(s: &str, quote: char, language: TargetLanguage) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push(quote);
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            '$' if quote == '`' && chars.peek() == Some(&'{') => out.push_str("\\$"),
            c if c.is_control() && (c as u32) < 0x100 => match language {
                TargetLanguage::Js => {
                    let _ = write!(out, "\\u{:04x}", c as u32);
                }
                TargetLanguage::Py => {
                    let _ = write!(out, "\\x{:02x}", c as u32);
                }
            },
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const JS: TargetLanguage = TargetLanguage::Js;
    const PY: TargetLanguage = TargetLanguage::Py;

    #[test]
    fn test_plain() {
        assert_eq!(min_quote("hello", JS), "\"hello\"");
        assert_eq!(min_quote("", PY), "\"\"");
    }

    #[test]
    fn test_prefers_fewest_escapes() {
        assert_eq!(min_quote("say \"hi\"", JS), "'say \"hi\"'");
        assert_eq!(min_quote("it's \"x\"", JS), "`it's \"x\"`");
        assert_eq!(min_quote("it's \"x\"", PY), "'it\\'s \"x\"'");
    }

    #[test]
    fn test_key_quote_never_template() {
        assert_eq!(min_key_quote("it's \"x\"", JS), "'it\\'s \"x\"'");
        assert_eq!(min_key_quote("it's", JS), "\"it's\"");
        assert_eq!(min_key_quote("say \"hi\"", JS), "'say \"hi\"'");
    }

    #[test]
    fn test_escapes() {
        assert_eq!(min_quote("a\\b", JS), "\"a\\\\b\"");
        assert_eq!(min_quote("line\nnext", PY), "\"line\\nnext\"");
        assert_eq!(min_quote("\u{1}", JS), "\"\\u0001\"");
        assert_eq!(min_quote("\u{1}", PY), "\"\\x01\"");
    }

    #[test]
    fn test_template_interpolation_escaped() {
        assert_eq!(quote_with("${x}", '`', JS), "`\\${x}`");
        assert_eq!(quote_with("$x", '`', JS), "`$x`");
    }
}
