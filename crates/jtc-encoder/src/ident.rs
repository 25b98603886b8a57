//! Identifier allocation.
//!
//! Names are produced shortest first; within a length they follow the
//! language's alphabet order (`A`, `B`, .. `z`, `_`, then `AA`, `AB`, ..).
//! The cost model only distinguishes lengths, so the sequence is split into
//! tiers of equal length.

use jtc_core::TargetLanguage;
use std::collections::HashSet;

/// Identifiers longer than this are never worth allocating.
pub const MAX_IDENT_LEN: usize = 5;

/// Infinite, restartable identifier sequence for one target language.
#[derive(Debug, Clone)]
pub struct Identifiers {
    language: TargetLanguage,
    excluded: HashSet<String>,
    max_len: usize,
    len: usize,
    index: u64,
}

impl Identifiers {
    /// `excluded` holds names that must never be produced in addition to
    /// the language's reserved words.
    pub fn new<I, S>(language: TargetLanguage, excluded: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            language,
            excluded: excluded.into_iter().map(Into::into).collect(),
            max_len: MAX_IDENT_LEN,
            len: 1,
            index: 0,
        }
    }

    /// Lower the longest length handed out, at most [`MAX_IDENT_LEN`].
    pub fn with_max_len(mut self, max_len: usize) -> Self {
        self.max_len = max_len.clamp(1, MAX_IDENT_LEN);
        self
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// A fresh sequence starting from the shortest name again.
    pub fn restart(&self) -> Self {
        Self {
            language: self.language,
            excluded: self.excluded.clone(),
            max_len: self.max_len,
            len: 1,
            index: 0,
        }
    }

    /// The first tier that still has names not in `used`, restricted to
    /// those names. `None` once every tier up to the length cap is taken.
    pub fn unused_tier<'u>(
        &self,
        used: &'u HashSet<String>,
    ) -> Option<(usize, impl Iterator<Item = String> + 'u)> {
        let mut names = self.restart().filter(move |n| !used.contains(n)).peekable();
        let len = names.peek()?.len();
        if len > self.max_len {
            return None;
        }
        Some((len, names.take_while(move |n| n.len() == len)))
    }

    fn tier_size(&self, len: usize) -> u64 {
        let start = self.language.ident_start().len() as u64;
        let cont = self.language.ident_continue().len() as u64;
        (1..len).fold(start, |acc, _| acc.saturating_mul(cont))
    }

    fn name_at(&self, len: usize, index: u64) -> String {
        let start = self.language.ident_start();
        let cont = self.language.ident_continue();
        let base = cont.len() as u64;

        let mut tail = Vec::with_capacity(len - 1);
        let mut rest = index;
        for _ in 1..len {
            tail.push(cont[(rest % base) as usize]);
            rest /= base;
        }
        let mut name = String::with_capacity(len);
        name.push(start[rest as usize] as char);
        name.extend(tail.iter().rev().map(|&b| b as char));
        name
    }
}

impl Iterator for Identifiers {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        loop {
            if self.index >= self.tier_size(self.len) {
                self.len += 1;
                self.index = 0;
            }
            let name = self.name_at(self.len, self.index);
            self.index += 1;
            if self.language.is_reserved(&name) || self.excluded.contains(&name) {
                continue;
            }
            return Some(name);
        }
    }
}
