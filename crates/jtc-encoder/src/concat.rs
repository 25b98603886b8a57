//! Splitting and joining of `+` concatenation expressions.

/// Split `expr` into its top-level operands. `+` inside quoted literals or
/// brackets does not split.
pub fn split(expr: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut depth = 0usize;

    for (i, c) in expr.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' | '`' => quote = Some(c),
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            '+' if depth == 0 => {
                parts.push(&expr[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&expr[start..]);
    parts
}

/// Whether `part` is a single quoted literal run rather than a reference.
pub fn is_quoted(part: &str) -> bool {
    let mut chars = part.chars();
    match (chars.next(), chars.next_back()) {
        (Some(first), Some(last)) => matches!(first, '"' | '\'' | '`') && first == last,
        _ => false,
    }
}

pub fn join<S: AsRef<str>>(parts: &[S]) -> String {
    let mut out = String::new();
    for (i, part) in parts.iter().enumerate() {
        if i > 0 {
            out.push('+');
        }
        out.push_str(part.as_ref());
    }
    out
}
