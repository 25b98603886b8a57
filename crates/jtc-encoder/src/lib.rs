//! JSON-to-code encoder: turns a JSON-like value into a compact JavaScript
//! or Python program that rebuilds it.
//!
//! Passes:
//! 1. Literal extraction: frequent numbers, strings, words of strings and
//!    null/undefined are bound to short variables
//! 2. Bigram compaction: frequent `A+B` concatenations get their own variable
//! 3. Array dedup: repeated flat arrays are shared (read-only consumers only)
//!
//! Passes 2 and 3 repeat until neither pays off or the pass budget runs out.

pub mod bigram;
pub mod binding;
pub mod concat;
pub mod dedup;
pub mod document;
pub mod emit;
pub mod frequency;
pub mod ident;
pub mod marker;
pub mod pipeline;
pub mod quote;
pub mod rewrite;
pub mod savings;

pub use binding::{Binding, BoundValue, Literal};
pub use jtc_core::{EncodeConfig, Indent, JtcError, Result, Role, TargetLanguage, Value};
pub use pipeline::{encode, EncodeStats, Encoded, Encoder};
