//! Cost model for literal extraction and the greedy name assignment of the
//! first pass.

use crate::binding::{declaration_cost, Binding, Literal};
use crate::frequency::LiteralToken;
use crate::ident::{Identifiers, MAX_IDENT_LEN};
use jtc_core::TargetLanguage;
use std::collections::{HashMap, VecDeque};
use tracing::{debug, trace};

/// A literal together with its estimated savings for every identifier length.
#[derive(Debug, Clone)]
pub struct Candidate {
    /// The value the variable will hold. Strings that never open their
    /// containing string carry a leading space.
    pub literal: Literal,
    pub count: usize,
    savings: [f64; MAX_IDENT_LEN],
}

impl Candidate {
    pub fn new(token: &LiteralToken, language: TargetLanguage) -> Self {
        let mut savings = [0.0; MAX_IDENT_LEN];
        let count = token.count as f64;

        let literal = match &token.literal {
            Literal::String(s) => {
                let padded = token.first == 0;
                let value = if padded { format!(" {s}") } else { s.clone() };
                let value_len = value.len() as f64;
                let opens = token.first as f64 / count;
                let closes = token.last as f64 / count;
                for (i, slot) in savings.iter_mut().enumerate() {
                    let len = (i + 1) as f64;
                    // name=".."
                    let decl = 1.0 + len + 1.0 + 1.0 + value_len + 1.0;
                    // `"+A+"` in the middle of a string, `A+"` at its start
                    let replacement = 2.0 * (1.0 - opens) + len + 2.0 * (1.0 - closes);
                    *slot = count * value_len - (decl + replacement * count);
                }
                Literal::String(value)
            }
            other => {
                let value_len = other.text(language).len();
                for (i, slot) in savings.iter_mut().enumerate() {
                    let len = i + 1;
                    let current = token.count * value_len;
                    let cost = declaration_cost(len, value_len) + token.count * len;
                    *slot = current as f64 - cost as f64;
                }
                other.clone()
            }
        };

        Self { literal, count: token.count, savings }
    }

    /// Estimated savings under an identifier of `len` bytes.
    pub fn savings(&self, len: usize) -> f64 {
        match len {
            1..=MAX_IDENT_LEN => self.savings[len - 1],
            _ => f64::NEG_INFINITY,
        }
    }
}

/// How a word of a string leaf maps onto a first-pass variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordRef<'a> {
    /// The variable holds the word as written.
    Exact(&'a str),
    /// The word carries a separator the variable lacks.
    AddSpace(&'a str),
    /// The variable carries a separator the word lacks.
    DropSpace(&'a str),
}

/// Literal to variable-name lookup produced by the first pass.
#[derive(Debug, Clone, Default)]
pub struct LiteralTable {
    names: HashMap<Literal, String>,
}

impl LiteralTable {
    pub fn insert(&mut self, literal: Literal, name: String) {
        self.names.insert(literal, name);
    }

    pub fn get(&self, literal: &Literal) -> Option<&str> {
        self.names.get(literal).map(String::as_str)
    }

    fn get_string(&self, s: &str) -> Option<&str> {
        self.get(&Literal::String(s.to_string()))
    }

    /// Resolve one word produced by [`crate::frequency::words`].
    pub fn lookup_word(&self, word: &str) -> Option<WordRef<'_>> {
        if crate::frequency::word_core(word).is_empty() {
            return None;
        }
        if let Some(name) = self.get_string(word) {
            return Some(WordRef::Exact(name));
        }
        match word.strip_prefix(' ') {
            Some(core) => self.get_string(core).map(WordRef::AddSpace),
            None => self.get_string(&format!(" {word}")).map(WordRef::DropSpace),
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Greedily hand out identifiers, shortest first, each to the candidate
/// with the highest savings at that identifier's length. Stops at the first
/// non-positive best savings or when identifiers run past the length cap
/// of `ids`.
pub fn assign(
    candidates: Vec<Candidate>,
    ids: &mut Identifiers,
    debug_level: u8,
) -> (Vec<Binding>, LiteralTable) {
    let mut pending: VecDeque<Candidate> = candidates.into();
    let mut bindings = Vec::new();
    let mut table = LiteralTable::default();
    let mut tier = 0;
    let max_len = ids.max_len();

    for name in ids.by_ref() {
        let len = name.len();
        if len > max_len {
            if debug_level > 0 {
                debug!(remaining = pending.len(), "identifier space exhausted");
            }
            break;
        }
        if len != tier {
            // Stable: ties keep frequency order.
            pending
                .make_contiguous()
                .sort_by(|a, b| b.savings(len).total_cmp(&a.savings(len)));
            tier = len;
        }
        let Some(best) = pending.front() else { break };
        let gain = best.savings(len);
        if gain <= 0.0 {
            break;
        }
        let Some(best) = pending.pop_front() else { break };
        if debug_level > 1 {
            trace!(name = %name, count = best.count, savings = gain, literal = ?best.literal, "bound literal");
        }
        table.insert(best.literal.clone(), name.clone());
        bindings.push(Binding::literal(name, best.literal));
    }

    (bindings, table)
}
