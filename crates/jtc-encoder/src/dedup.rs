//! Array deduplication: flat arrays that occur several times with identical
//! rendered text are bound to one variable.
//!
//! Only sound when the consumer never mutates the result, since every
//! occurrence then aliases the same array object.

use crate::bigram::PassOutcome;
use crate::binding::{declaration_cost, Binding};
use crate::document::Node;
use crate::emit::block_overhead;
use crate::ident::Identifiers;
use crate::marker::Markers;
use jtc_core::{Result, TargetLanguage};
use std::collections::{HashMap, HashSet};
use tracing::{debug, trace};

pub struct ArrayDeduplicator<'a> {
    markers: &'a Markers,
    language: TargetLanguage,
    debug_level: u8,
}

impl<'a> ArrayDeduplicator<'a> {
    pub fn new(markers: &'a Markers, language: TargetLanguage, debug_level: u8) -> Self {
        Self { markers, language, debug_level }
    }

    /// Source text of a flat array.
    fn text_of(&self, node: &Node) -> Result<String> {
        Ok(self.markers.cleanup(&node.render("")?))
    }

    fn collect(&self, node: &Node, texts: &mut Vec<String>) -> Result<()> {
        match node {
            Node::Array(items) if node.is_flat_array() && !items.is_empty() => {
                texts.push(self.text_of(node)?);
            }
            Node::Array(items) => {
                for item in items {
                    self.collect(item, texts)?;
                }
            }
            Node::Object(entries) => {
                for (_, value) in entries {
                    self.collect(value, texts)?;
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn replace(&self, node: &mut Node, assigned: &HashMap<String, String>) -> Result<()> {
        if node.is_flat_array() {
            if matches!(node, Node::Array(items) if !items.is_empty()) {
                if let Some(name) = assigned.get(&self.text_of(node)?) {
                    *node = Node::Expr(self.markers.wrap(name));
                }
            }
            return Ok(());
        }
        match node {
            Node::Array(items) => {
                for item in items.iter_mut() {
                    self.replace(item, assigned)?;
                }
            }
            Node::Object(entries) => {
                for (_, value) in entries.iter_mut() {
                    self.replace(value, assigned)?;
                }
            }
            _ => {}
        }
        Ok(())
    }

    pub fn run(
        &self,
        doc: &mut Node,
        ids: &Identifiers,
        used: &mut HashSet<String>,
        pass: usize,
    ) -> Result<PassOutcome> {
        let mut texts = Vec::new();
        self.collect(doc, &mut texts)?;

        let mut order: Vec<String> = Vec::new();
        let mut counts: HashMap<String, usize> = HashMap::new();
        for text in texts {
            let count = counts.entry(text.clone()).or_default();
            if *count == 0 {
                order.push(text);
            }
            *count += 1;
        }

        let Some((len, tier)) = ids.unused_tier(used) else {
            return Ok(PassOutcome::Exhausted);
        };
        let savings = |text: &str, count: usize| -> i64 {
            let current = count * text.len();
            let cost = declaration_cost(len, text.len()) + count * len;
            current as i64 - cost as i64
        };

        let mut ranked: Vec<(&String, i64)> = order
            .iter()
            .map(|text| (text, savings(text, counts[text])))
            .filter(|&(_, s)| s > 0)
            .collect();
        ranked.sort_by_key(|&(_, s)| s);

        let mut bindings = Vec::new();
        let mut assigned: HashMap<String, String> = HashMap::new();
        let mut total = 0;
        for name in tier {
            let Some((text, gain)) = ranked.pop() else { break };
            if self.debug_level > 1 {
                trace!(pass, name = %name, count = counts[text], array = %text, "bound array");
            }
            total += gain;
            assigned.insert(text.clone(), name.clone());
            bindings.push(Binding::expression(name, text.clone(), pass));
        }
        if bindings.is_empty() || total <= block_overhead(self.language) as i64 {
            return Ok(PassOutcome::NoSavings);
        }

        self.replace(doc, &assigned)?;
        used.extend(bindings.iter().map(|b| b.name.clone()));
        if self.debug_level > 0 {
            debug!(pass, bindings = bindings.len(), savings = total, "array pass applied");
        }
        Ok(PassOutcome::Applied(bindings))
    }
}
