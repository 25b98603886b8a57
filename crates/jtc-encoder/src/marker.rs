//! Sentinel markers for splicing code into string leaves.
//!
//! An expression stored in a string leaf is bracketed as
//! `<delprev-N>expr<delnext-N>`. When the document is serialized the leaf
//! gains surrounding quotes; cleanup then deletes the character before every
//! `delprev` tag and the character after every `delnext` tag, which removes
//! exactly those quotes. Quotes and backslashes inside the expression get a
//! `delnext` tag in front of them, so the escape backslash the serializer
//! adds is deleted as well.
//!
//! `N` is a random numeral that does not occur anywhere in the input, so the
//! tags cannot collide with user text. It never reaches the output.

use jtc_core::Result;
use rand::Rng;
use regex::Regex;

const UID_RANGE: u64 = 100_000;
const ATTEMPTS_PER_RANGE: usize = 1000;

#[derive(Debug, Clone)]
pub struct Markers {
    uid: u64,
    del_prev: String,
    del_next: String,
    prev_re: Regex,
    next_re: Regex,
}

impl Markers {
    /// Pick markers whose numeral is absent from `haystack`.
    pub fn generate(haystack: &str) -> Result<Self> {
        let mut rng = rand::thread_rng();
        let mut range = UID_RANGE;
        loop {
            for _ in 0..ATTEMPTS_PER_RANGE {
                let uid = rng.gen_range(0..range);
                if !haystack.contains(&uid.to_string()) {
                    return Self::with_uid(uid);
                }
            }
            range = range.saturating_mul(10);
        }
    }

    pub fn with_uid(uid: u64) -> Result<Self> {
        let del_prev = format!("<delprev-{uid}>");
        let del_next = format!("<delnext-{uid}>");
        let prev_re = Regex::new(&format!("(?s).{}", regex::escape(&del_prev))).map_err(anyhow::Error::from)?;
        let next_re = Regex::new(&format!("(?s){}.", regex::escape(&del_next))).map_err(anyhow::Error::from)?;
        Ok(Self { uid, del_prev, del_next, prev_re, next_re })
    }

    pub fn uid(&self) -> u64 {
        self.uid
    }

    /// Bracket `expr` so that it survives serialization as a string leaf.
    pub fn wrap(&self, expr: &str) -> String {
        let mut out = String::with_capacity(expr.len() + self.del_prev.len() + 2 * self.del_next.len());
        out.push_str(&self.del_prev);
        out.push_str(&self.guard(expr));
        out.push_str(&self.del_next);
        out
    }

    /// Put a `delnext` tag before every quote or backslash that lacks one.
    fn guard(&self, expr: &str) -> String {
        let mut out = String::with_capacity(expr.len());
        for c in expr.chars() {
            if matches!(c, '"' | '\\') && !out.ends_with(&self.del_next) {
                out.push_str(&self.del_next);
            }
            out.push(c);
        }
        out
    }

    /// Remove every tag, recovering the raw expression.
    pub fn strip(&self, text: &str) -> String {
        text.replace(&self.del_prev, "").replace(&self.del_next, "")
    }

    pub fn is_wrapped(&self, text: &str) -> bool {
        text.starts_with(&self.del_prev) && text.ends_with(&self.del_next)
    }

    /// Apply the tags to serialized text and drop them.
    pub fn cleanup(&self, text: &str) -> String {
        let text = self.prev_re.replace_all(text, "");
        let text = self.next_re.replace_all(&text, "");
        self.strip(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn markers() -> Markers {
        Markers::with_uid(4242).unwrap()
    }

    /// What a JSON serializer does to a string leaf.
    fn as_json_string(s: &str) -> String {
        serde_json::to_string(s).unwrap()
    }

    #[test]
    fn test_generate_avoids_input() {
        let m = Markers::generate("abc 123").unwrap();
        assert!(!"abc 123".contains(&m.uid().to_string()));
    }

    #[test]
    fn test_cleanup_removes_quotes() {
        let m = markers();
        let leaf = as_json_string(&m.wrap("A+B"));
        assert_eq!(m.cleanup(&format!("[{leaf},1]")), "[A+B,1]");
    }

    #[test]
    fn test_cleanup_restores_embedded_quotes() {
        let m = markers();
        let leaf = as_json_string(&m.wrap(r#"'a"b'+"c\\d""#));
        assert_eq!(m.cleanup(&leaf), r#"'a"b'+"c\\d""#);
    }

    #[test]
    fn test_strip_recovers_expression() {
        let m = markers();
        let expr = r#"A+"x\"y""#;
        let wrapped = m.wrap(expr);
        assert!(m.is_wrapped(&wrapped));
        assert_eq!(m.strip(&wrapped), expr);
    }

    #[test]
    fn test_rewrap_is_stable() {
        let m = markers();
        let once = m.wrap("\"q\"");
        let twice = m.wrap(&m.strip(&once));
        assert_eq!(once, twice);
    }

    #[test]
    fn test_cleanup_multibyte_neighbours() {
        let m = markers();
        let text = format!("é{}A{}ü", "<delprev-4242>", "<delnext-4242>");
        assert_eq!(m.cleanup(&text), "A");
    }
}
