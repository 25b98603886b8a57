//! Encoding pipeline: literal pass, compaction passes, assembly.

use crate::bigram::{BigramCompactor, PassOutcome};
use crate::binding::Binding;
use crate::dedup::ArrayDeduplicator;
use crate::document::Node;
use crate::emit::Assembler;
use crate::frequency::count_literals;
use crate::ident::Identifiers;
use crate::marker::Markers;
use crate::rewrite::Rewriter;
use crate::savings::{assign, Candidate};
use jtc_core::{EncodeConfig, Result, TargetLanguage, Value};
use serde::Serialize;
use std::collections::HashSet;
use tracing::{debug, info};

/// Encoding statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EncodeStats {
    /// Passes that emitted a declaration block.
    pub passes: usize,
    /// Number of bindings of each emitted pass, in order.
    pub bindings_per_pass: Vec<usize>,
    /// Length of the input as compact JSON.
    pub json_len: usize,
    pub code_len: usize,
    pub reduction_pct: f64,
}

impl EncodeStats {
    pub fn ratio(&self) -> f64 {
        if self.json_len == 0 { return 1.0; }
        self.code_len as f64 / self.json_len as f64
    }

    pub fn total_bindings(&self) -> usize {
        self.bindings_per_pass.iter().sum()
    }
}

/// Generated source code plus statistics.
#[derive(Debug, Clone)]
pub struct Encoded {
    pub code: String,
    pub stats: EncodeStats,
}

/// Remaining compaction passes; `None` is unbounded.
struct Budget(Option<usize>);

impl Budget {
    fn take(&mut self) -> bool {
        match &mut self.0 {
            None => true,
            Some(0) => false,
            Some(n) => {
                *n -= 1;
                true
            }
        }
    }
}

/// The JSON-to-code encoder.
#[derive(Debug, Clone, Default)]
pub struct Encoder {
    config: EncodeConfig,
}

impl Encoder {
    pub fn new(config: EncodeConfig) -> Self {
        Self { config }
    }

    pub fn js() -> Self { Self::new(EncodeConfig::new(TargetLanguage::Js)) }
    pub fn python() -> Self { Self::new(EncodeConfig::new(TargetLanguage::Py)) }

    pub fn config(&self) -> &EncodeConfig {
        &self.config
    }

    /// Encode `value` as a program that rebuilds it.
    pub fn encode(&self, value: &Value) -> Result<Encoded> {
        self.config.validate()?;
        let ids = Identifiers::new(self.config.target, [self.config.output_root()]);
        self.encode_with(value, ids)
    }

    /// Encode drawing variable names from `ids`.
    pub(crate) fn encode_with(&self, value: &Value, mut ids: Identifiers) -> Result<Encoded> {
        let config = &self.config;
        let language = config.target;
        let debug_level = config.debug_level;

        let json = value.to_string();
        let markers = Markers::generate(&json)?;
        if debug_level > 0 {
            debug!(uid = markers.uid(), json_len = json.len(), %language, "encoding");
        }

        // Pass 1: literal extraction.
        let tokens = count_literals(value)?;
        let candidates: Vec<Candidate> = tokens.iter().map(|t| Candidate::new(t, language)).collect();
        let (mut bindings, table) = assign(candidates, &mut ids, debug_level);
        if debug_level > 0 {
            debug!(tokens = tokens.len(), bound = bindings.len(), "literal pass");
        }

        let mut doc = Node::from(value);
        let substituted = Rewriter::new(&table, &markers, language).rewrite(&mut doc)?;
        if debug_level > 1 {
            debug!(substituted, "rewrote leaves");
        }

        let mut used: HashSet<String> = bindings.iter().map(|b| b.name.clone()).collect();
        let mut budget = Budget(config.max_passes.map(|max| max.saturating_sub(1)));
        let bigrams = BigramCompactor::new(&markers, language, debug_level);
        let arrays = ArrayDeduplicator::new(&markers, language, debug_level);
        let mut pass = 1;

        loop {
            let mut progressed = false;
            while budget.take() {
                match bigrams.run(&mut doc, &ids, &mut used, pass + 1) {
                    PassOutcome::Applied(new) => {
                        pass += 1;
                        bindings.extend(new);
                        progressed = true;
                    }
                    PassOutcome::NoSavings | PassOutcome::Exhausted => break,
                }
            }
            if config.assume_read_only && budget.take() {
                if let PassOutcome::Applied(new) = arrays.run(&mut doc, &ids, &mut used, pass + 1)? {
                    pass += 1;
                    bindings.extend(new);
                    progressed = true;
                }
            }
            if !progressed {
                break;
            }
        }

        let code = Assembler::new(&markers, config).assemble(&bindings, &doc)?;
        let stats = stats(&bindings, json.len(), code.len());
        if debug_level > 0 {
            info!(
                passes = stats.passes,
                bindings = stats.total_bindings(),
                json_len = stats.json_len,
                code_len = stats.code_len,
                "encoded"
            );
        }
        Ok(Encoded { code, stats })
    }
}

fn stats(bindings: &[Binding], json_len: usize, code_len: usize) -> EncodeStats {
    let mut bindings_per_pass: Vec<usize> = Vec::new();
    let mut last_pass = None;
    for binding in bindings {
        if last_pass == Some(binding.pass) {
            if let Some(n) = bindings_per_pass.last_mut() {
                *n += 1;
            }
        } else {
            bindings_per_pass.push(1);
            last_pass = Some(binding.pass);
        }
    }
    let reduction_pct = if json_len > 0 {
        (json_len as f64 - code_len as f64) / json_len as f64 * 100.0
    } else {
        0.0
    };
    EncodeStats {
        passes: bindings_per_pass.len(),
        bindings_per_pass,
        json_len,
        code_len,
        reduction_pct,
    }
}

/// Encode with an explicit configuration.
pub fn encode(value: &Value, config: &EncodeConfig) -> Result<Encoded> {
    Encoder::new(config.clone()).encode(value)
}
