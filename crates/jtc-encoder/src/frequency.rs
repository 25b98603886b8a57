//! Literal frequency scan.

use crate::binding::Literal;
use jtc_core::{JtcError, Result, Role, Value};
use std::collections::HashMap;

/// Occurrence statistics for one distinct literal.
#[derive(Debug, Clone, PartialEq)]
pub struct LiteralToken {
    pub literal: Literal,
    pub count: usize,
    /// Occurrences that open their containing string (strings only).
    pub first: usize,
    /// Occurrences that close their containing string (strings only).
    pub last: usize,
}

/// Split on spaces, keeping each separator attached to the word after it:
/// `"a  b"` becomes `["a", " ", " b"]`.
pub fn words(s: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = 0;
    for (i, _) in s.match_indices(' ') {
        out.push(&s[start..i]);
        start = i;
    }
    out.push(&s[start..]);
    out
}

/// The word without its attached separator.
pub fn word_core(word: &str) -> &str {
    word.strip_prefix(' ').unwrap_or(word)
}

#[derive(Default)]
struct Counter {
    numbers: Vec<LiteralToken>,
    number_index: HashMap<String, usize>,
    strings: Vec<LiteralToken>,
    string_index: HashMap<String, usize>,
    nulls: usize,
    undefineds: usize,
}

impl Counter {
    fn scan(&mut self, value: &Value, role: Role) -> Result<()> {
        match value {
            Value::Object(entries) => {
                for (key, v) in entries {
                    self.add_string(key);
                    self.scan(v, Role::ObjectValue)?;
                }
            }
            Value::Array(items) => {
                for item in items {
                    self.scan(item, Role::ArrayItem)?;
                }
            }
            Value::Number(n) => {
                let text = n.to_string();
                let idx = match self.number_index.get(&text) {
                    Some(&idx) => idx,
                    None => {
                        self.numbers.push(LiteralToken {
                            literal: Literal::Number(text.clone()),
                            count: 0,
                            first: 0,
                            last: 0,
                        });
                        self.number_index.insert(text, self.numbers.len() - 1);
                        self.numbers.len() - 1
                    }
                };
                self.numbers[idx].count += 1;
            }
            Value::String(s) => self.add_string(s),
            Value::Null => self.nulls += 1,
            Value::Undefined => self.undefineds += 1,
            Value::Bool(_) => {
                return Err(JtcError::UnsupportedLeaf { role, value: value.to_string() });
            }
        }
        Ok(())
    }

    fn add_string(&mut self, s: &str) {
        let parts = words(s);
        let n = parts.len();
        for (i, word) in parts.into_iter().enumerate() {
            let core = word_core(word);
            if core.is_empty() {
                continue;
            }
            let idx = match self.string_index.get(core) {
                Some(&idx) => idx,
                None => {
                    self.strings.push(LiteralToken {
                        literal: Literal::String(core.to_string()),
                        count: 0,
                        first: 0,
                        last: 0,
                    });
                    self.string_index.insert(core.to_string(), self.strings.len() - 1);
                    self.strings.len() - 1
                }
            };
            let token = &mut self.strings[idx];
            token.count += 1;
            if i == 0 {
                token.first += 1;
            }
            if i == n - 1 {
                token.last += 1;
            }
        }
    }

    fn into_tokens(self) -> Vec<LiteralToken> {
        let mut tokens = self.numbers;
        tokens.extend(self.strings);
        if self.nulls > 0 {
            tokens.push(LiteralToken { literal: Literal::Null, count: self.nulls, first: 0, last: 0 });
        }
        if self.undefineds > 0 {
            tokens.push(LiteralToken {
                literal: Literal::Undefined,
                count: self.undefineds,
                first: 0,
                last: 0,
            });
        }
        tokens
    }
}

/// Count every distinct literal in `value`.
///
/// Tokens come out as numbers, strings, null, undefined (each group in order
/// of first appearance), then stable-sorted by count, most frequent first.
pub fn count_literals(value: &Value) -> Result<Vec<LiteralToken>> {
    let mut counter = Counter::default();
    counter.scan(value, Role::Root)?;
    let mut tokens = counter.into_tokens();
    tokens.sort_by(|a, b| b.count.cmp(&a.count));
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Value {
        Value::from(serde_json::from_str::<serde_json::Value>(json).unwrap())
    }

    fn find<'a>(tokens: &'a [LiteralToken], literal: &Literal) -> &'a LiteralToken {
        tokens.iter().find(|t| &t.literal == literal).unwrap()
    }

    #[test]
    fn test_words() {
        assert_eq!(words("a b"), vec!["a", " b"]);
        assert_eq!(words("a  b"), vec!["a", " ", " b"]);
        assert_eq!(words(" a"), vec!["", " a"]);
        assert_eq!(words(""), vec![""]);
        assert_eq!(words("+proj=longlat +datum=WGS84"), vec!["+proj=longlat", " +datum=WGS84"]);
    }

    #[test]
    fn test_counts_numbers_and_absence_markers() {
        let mut value = parse(r#"{"a":1,"b":1,"c":[1,2,null]}"#);
        if let Value::Object(entries) = &mut value {
            entries.push(("d".into(), Value::Undefined));
        }
        let tokens = count_literals(&value).unwrap();
        assert_eq!(find(&tokens, &Literal::Number("1".into())).count, 3);
        assert_eq!(find(&tokens, &Literal::Number("2".into())).count, 1);
        assert_eq!(find(&tokens, &Literal::Null).count, 1);
        assert_eq!(find(&tokens, &Literal::Undefined).count, 1);
        assert_eq!(tokens[0].literal, Literal::Number("1".into()));
    }

    #[test]
    fn test_first_and_last_positions() {
        let tokens = count_literals(&parse(r#"["x +b", "+b y", "w +b z", "+b"]"#)).unwrap();
        let b = find(&tokens, &Literal::String("+b".into()));
        assert_eq!(b.count, 4);
        assert_eq!(b.first, 2);
        assert_eq!(b.last, 2);
        let x = find(&tokens, &Literal::String("x".into()));
        assert_eq!((x.count, x.first, x.last), (1, 1, 0));
    }

    #[test]
    fn test_keys_are_counted() {
        let tokens = count_literals(&parse(r#"[{"name":"name"},{"name":1}]"#)).unwrap();
        assert_eq!(find(&tokens, &Literal::String("name".into())).count, 3);
    }

    #[test]
    fn test_ordering_is_stable() {
        let tokens = count_literals(&parse(r#"["b","a",3,"a","b",3]"#)).unwrap();
        let order: Vec<&Literal> = tokens.iter().map(|t| &t.literal).collect();
        assert_eq!(
            order,
            vec![
                &Literal::Number("3".into()),
                &Literal::String("b".into()),
                &Literal::String("a".into()),
            ]
        );
    }

    #[test]
    fn test_boolean_rejected() {
        let err = count_literals(&parse(r#"{"ok":true}"#)).unwrap_err();
        match err {
            JtcError::UnsupportedLeaf { role, value } => {
                assert_eq!(role, Role::ObjectValue);
                assert_eq!(value, "true");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
