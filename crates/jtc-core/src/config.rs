use crate::error::{JtcError, Result};
use crate::language::TargetLanguage;
use serde::{Deserialize, Serialize};

/// Longest indentation unit honoured, as with JSON serializers.
const MAX_INDENT: usize = 10;

/// Indentation of the serialized document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Indent {
    Spaces(usize),
    Text(String),
}

impl Indent {
    /// The whitespace emitted per nesting level. Empty means compact output.
    pub fn unit(&self) -> String {
        match self {
            Self::Spaces(n) => " ".repeat((*n).min(MAX_INDENT)),
            Self::Text(s) => s.chars().take(MAX_INDENT).collect(),
        }
    }
}

impl std::str::FromStr for Indent {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s.parse::<usize>() {
            Ok(n) => Self::Spaces(n),
            Err(_) => Self::Text(s.replace("\\t", "\t")),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodeConfig {
    pub target: TargetLanguage,
    /// Left-hand side of the final assignment. `None` picks the language default.
    pub output_prefix: Option<String>,
    /// Upper bound on passes, the literal pass included. `None` runs to convergence.
    pub max_passes: Option<usize>,
    /// The decoded value is never mutated, so identical arrays may be shared.
    pub assume_read_only: bool,
    pub indent: Option<Indent>,
    /// 0 is silent; higher levels emit more `tracing` events.
    pub debug_level: u8,
}

impl Default for EncodeConfig {
    fn default() -> Self {
        Self {
            target: TargetLanguage::Js,
            output_prefix: None,
            max_passes: None,
            assume_read_only: true,
            indent: None,
            debug_level: 0,
        }
    }
}

impl EncodeConfig {
    pub fn new(target: TargetLanguage) -> Self {
        Self { target, ..Self::default() }
    }

    pub fn with_output_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.output_prefix = Some(prefix.into());
        self
    }

    pub fn with_max_passes(mut self, max: usize) -> Self {
        self.max_passes = Some(max);
        self
    }

    pub fn with_read_only(mut self, read_only: bool) -> Self {
        self.assume_read_only = read_only;
        self
    }

    pub fn with_indent(mut self, indent: Indent) -> Self {
        self.indent = Some(indent);
        self
    }

    pub fn with_debug_level(mut self, level: u8) -> Self {
        self.debug_level = level;
        self
    }

    pub fn output_prefix(&self) -> &str {
        self.output_prefix
            .as_deref()
            .unwrap_or_else(|| self.target.default_output_prefix())
    }

    /// First identifier of the output prefix (`module` in `module.exports`).
    /// Declared variables must not shadow it.
    pub fn output_root(&self) -> &str {
        let prefix = self.output_prefix();
        prefix
            .split(|c: char| !(c.is_alphanumeric() || c == '_' || c == '$'))
            .next()
            .unwrap_or(prefix)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_passes == Some(0) {
            return Err(JtcError::InvalidConfig("max_passes must be at least 1".into()));
        }
        if self.output_prefix().trim().is_empty() {
            return Err(JtcError::InvalidConfig("output prefix must not be empty".into()));
        }
        Ok(())
    }
}
