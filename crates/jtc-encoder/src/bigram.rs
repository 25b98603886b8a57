//! Bigram compaction: binds frequent adjacent variable pairs of
//! concatenation expressions (`A+B`) to a new variable.

use crate::binding::{declaration_cost, Binding};
use crate::concat;
use crate::document::Node;
use crate::emit::block_overhead;
use crate::ident::Identifiers;
use crate::marker::Markers;
use jtc_core::TargetLanguage;
use std::collections::{HashMap, HashSet};
use tracing::{debug, trace};

/// Result of one compaction pass.
#[derive(Debug, Clone, PartialEq)]
pub enum PassOutcome {
    /// The pass rewrote the document; these are its new bindings.
    Applied(Vec<Binding>),
    /// No candidate pays for its declaration.
    NoSavings,
    /// Every identifier up to the maximum length is taken.
    Exhausted,
}

impl PassOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, PassOutcome::Applied(_))
    }
}

type Pair = (String, String);

/// Operands of one expression leaf.
struct Operands {
    parts: Vec<String>,
    /// The expression was a computed key, `[..]`.
    bracketed: bool,
}

pub struct BigramCompactor<'a> {
    markers: &'a Markers,
    language: TargetLanguage,
    debug_level: u8,
}

impl<'a> BigramCompactor<'a> {
    pub fn new(markers: &'a Markers, language: TargetLanguage, debug_level: u8) -> Self {
        Self { markers, language, debug_level }
    }

    fn operands(&self, text: &str, is_key: bool) -> Operands {
        let raw = self.markers.strip(text);
        let (inner, bracketed) = match raw.strip_prefix('[').and_then(|r| r.strip_suffix(']')) {
            Some(inner) if is_key && self.language.computed_keys() => (inner, true),
            _ => (raw.as_str(), false),
        };
        Operands {
            parts: concat::split(inner).into_iter().map(str::to_string).collect(),
            bracketed,
        }
    }

    fn collect(&self, doc: &mut Node) -> Vec<Operands> {
        let mut all = Vec::new();
        doc.for_each_expr_mut(|text, is_key| all.push(self.operands(text, is_key)));
        all
    }

    /// Run one pass numbered `pass`, drawing names from the first tier of
    /// `ids` with unused names. New names are added to `used`.
    pub fn run(
        &self,
        doc: &mut Node,
        ids: &Identifiers,
        used: &mut HashSet<String>,
        pass: usize,
    ) -> PassOutcome {
        let all = self.collect(doc);
        let (pairs, counts) = count_pairs(&all);

        let Some((len, tier)) = ids.unused_tier(used) else {
            if self.debug_level > 0 {
                debug!(pass, "no identifiers left for bigrams");
            }
            return PassOutcome::Exhausted;
        };

        let savings = |pair: &Pair, count: usize| -> i64 {
            let text_len = pair.0.len() + 1 + pair.1.len();
            let current = count * text_len;
            let cost = declaration_cost(len, text_len) + count * len;
            current as i64 - cost as i64
        };

        let mut ranked: Vec<(&Pair, i64)> = pairs
            .iter()
            .zip(&counts)
            .map(|(pair, &count)| (pair, savings(pair, count)))
            .filter(|&(_, s)| s > 0)
            .collect();
        if ranked.is_empty() {
            return PassOutcome::NoSavings;
        }
        ranked.sort_by_key(|&(_, s)| s);

        let mut order: Vec<Pair> = Vec::new();
        let mut assigned: HashMap<Pair, String> = HashMap::new();
        for name in tier {
            let Some((pair, _)) = ranked.pop() else { break };
            order.push(pair.clone());
            assigned.insert(pair.clone(), name);
        }

        // Overlapping candidates steal occurrences from each other; keep
        // only pairs that still pay once replacement is done for real.
        let hits = loop {
            let hits = simulate(&all, &assigned);
            let before = assigned.len();
            assigned.retain(|pair, _| savings(pair, hits.get(pair).copied().unwrap_or(0)) > 0);
            if assigned.len() == before {
                break hits;
            }
        };
        let total: i64 = assigned.keys().map(|pair| savings(pair, hits[pair])).sum();
        if assigned.is_empty() || total <= block_overhead(self.language) as i64 {
            if self.debug_level > 0 {
                debug!(pass, total, "bigram pass not worth a block");
            }
            return PassOutcome::NoSavings;
        }

        doc.for_each_expr_mut(|text, is_key| {
            let ops = self.operands(text, is_key);
            let (parts, replaced) = replace_pairs(&ops.parts, &assigned);
            if replaced.is_empty() {
                return;
            }
            let joined = concat::join(&parts);
            let expr = if ops.bracketed { format!("[{joined}]") } else { joined };
            *text = self.markers.wrap(&expr);
        });

        let bindings: Vec<Binding> = order
            .into_iter()
            .filter_map(|pair| {
                let name = assigned.get(&pair)?.clone();
                if self.debug_level > 1 {
                    trace!(pass, name = %name, left = %pair.0, right = %pair.1, count = hits[&pair], "bound pair");
                }
                Some(Binding::expression(name, format!("{}+{}", pair.0, pair.1), pass))
            })
            .collect();
        used.extend(bindings.iter().map(|b| b.name.clone()));
        if self.debug_level > 0 {
            debug!(pass, bindings = bindings.len(), savings = total, "bigram pass applied");
        }
        PassOutcome::Applied(bindings)
    }
}

fn is_variable(part: &str) -> bool {
    !part.is_empty() && !concat::is_quoted(part)
}

/// Count non-overlapping variable pairs, in order of first appearance.
fn count_pairs(all: &[Operands]) -> (Vec<Pair>, Vec<usize>) {
    let mut pairs: Vec<Pair> = Vec::new();
    let mut counts: Vec<usize> = Vec::new();
    let mut index: HashMap<Pair, usize> = HashMap::new();

    for ops in all {
        let parts = &ops.parts;
        let mut last_counted: Option<usize> = None;
        for i in 1..parts.len() {
            let (a, b) = (&parts[i - 1], &parts[i]);
            if !is_variable(a) || !is_variable(b) {
                continue;
            }
            // `A+A+A` holds one `A+A`, not two.
            if a == b && i >= 2 && last_counted == Some(i - 1) && parts[i - 2] == *a {
                continue;
            }
            last_counted = Some(i);
            let pair = (a.clone(), b.clone());
            match index.get(&pair) {
                Some(&idx) => counts[idx] += 1,
                None => {
                    index.insert(pair.clone(), pairs.len());
                    pairs.push(pair);
                    counts.push(1);
                }
            }
        }
    }
    (pairs, counts)
}

/// Replace assigned pairs left to right, never reusing an operand.
/// Returns the new operands and the pairs that were replaced.
fn replace_pairs(parts: &[String], assigned: &HashMap<Pair, String>) -> (Vec<String>, Vec<Pair>) {
    let mut out = Vec::with_capacity(parts.len());
    let mut replaced = Vec::new();
    let mut i = 0;
    while i < parts.len() {
        if i + 1 < parts.len() {
            let pair = (parts[i].clone(), parts[i + 1].clone());
            if let Some(name) = assigned.get(&pair) {
                out.push(name.clone());
                replaced.push(pair);
                i += 2;
                continue;
            }
        }
        out.push(parts[i].clone());
        i += 1;
    }
    (out, replaced)
}

fn simulate(all: &[Operands], assigned: &HashMap<Pair, String>) -> HashMap<Pair, usize> {
    let mut hits: HashMap<Pair, usize> = HashMap::new();
    for ops in all {
        for pair in replace_pairs(&ops.parts, assigned).1 {
            *hits.entry(pair).or_default() += 1;
        }
    }
    hits
}
