//! `json-to-code`: encode a JSON document as a compact JavaScript or Python
//! program that rebuilds it.

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use jtc_core::{EncodeConfig, Indent, TargetLanguage, Value};
use jtc_encoder::Encoder;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "json-to-code")]
#[command(version, about = "Encode JSON as compact JavaScript or Python source", long_about = None)]
struct Cli {
    /// Input JSON file (stdin when omitted)
    input: Option<PathBuf>,

    /// Write the code here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Target language: js or py
    #[arg(short, long, env = "JTC_LANG")]
    lang: Option<TargetLanguage>,

    /// Left-hand side of the final assignment
    #[arg(long)]
    prefix: Option<String>,

    /// Upper bound on passes, the literal pass included
    #[arg(long)]
    max_passes: Option<usize>,

    /// The result may be mutated; disables array sharing
    #[arg(long)]
    mutable: bool,

    /// Indentation: a number of spaces or literal text (`\t` for a tab)
    #[arg(long)]
    indent: Option<Indent>,

    /// JSON file holding an encoder configuration; flags override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Raise diagnostic detail (-v passes, -vv decisions)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn encode_config(&self) -> Result<EncodeConfig> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => EncodeConfig::default(),
        };
        if let Some(lang) = self.lang {
            config.target = lang;
        }
        if let Some(prefix) = &self.prefix {
            config.output_prefix = Some(prefix.clone());
        }
        if let Some(max) = self.max_passes {
            config.max_passes = Some(max);
        }
        if self.mutable {
            config.assume_read_only = false;
        }
        if let Some(indent) = &self.indent {
            config.indent = Some(indent.clone());
        }
        config.debug_level = config.debug_level.max(self.verbose);
        Ok(config)
    }
}

fn load_config(path: &Path) -> Result<EncodeConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
}

fn read_input(path: Option<&Path>) -> Result<Value> {
    let text = match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf).context("reading stdin")?;
            buf
        }
    };
    let json: serde_json::Value = serde_json::from_str(&text).context("parsing input JSON")?;
    Ok(Value::from(json))
}

fn default_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "json_to_code=info",
        1 => "json_to_code=info,jtc_encoder=debug",
        _ => "json_to_code=info,jtc_encoder=trace",
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter(cli.verbose))),
        )
        .init();

    let config = cli.encode_config()?;
    let value = read_input(cli.input.as_deref())?;
    let encoded = Encoder::new(config).encode(&value)?;

    match &cli.output {
        Some(path) => std::fs::write(path, format!("{}\n", encoded.code))
            .with_context(|| format!("writing {}", path.display()))?,
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{}", encoded.code).context("writing stdout")?;
        }
    }

    let stats = &encoded.stats;
    info!(
        "{} -> {} bytes ({:.1}% smaller, {} bindings in {} passes)",
        stats.json_len,
        stats.code_len,
        stats.reduction_pct,
        stats.total_bindings(),
        stats.passes
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["json-to-code"]).unwrap();
        let config = cli.encode_config().unwrap();
        assert_eq!(config.target, TargetLanguage::Js);
        assert!(config.assume_read_only);
        assert_eq!(config.max_passes, None);
        assert_eq!(config.debug_level, 0);
    }

    #[test]
    fn test_flags_override() {
        let cli = Cli::try_parse_from([
            "json-to-code",
            "in.json",
            "--lang",
            "python",
            "--prefix",
            "result",
            "--max-passes",
            "3",
            "--mutable",
            "--indent",
            "2",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.input.as_deref(), Some(Path::new("in.json")));
        let config = cli.encode_config().unwrap();
        assert_eq!(config.target, TargetLanguage::Py);
        assert_eq!(config.output_prefix(), "result");
        assert_eq!(config.max_passes, Some(3));
        assert!(!config.assume_read_only);
        assert_eq!(config.indent, Some(Indent::Spaces(2)));
        assert_eq!(config.debug_level, 2);
    }

    #[test]
    fn test_config_file_then_flags() {
        let path = std::env::temp_dir().join(format!("jtc-cli-config-{}.json", std::process::id()));
        std::fs::write(&path, r#"{"target":"py","max_passes":4,"indent":"\t"}"#).unwrap();
        let cli = Cli::try_parse_from(["json-to-code", "--config", path.to_str().unwrap(), "--max-passes", "2"])
            .unwrap();
        let config = cli.encode_config().unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(config.target, TargetLanguage::Py);
        assert_eq!(config.max_passes, Some(2));
        assert_eq!(config.indent, Some(Indent::Text("\t".into())));
    }

    #[test]
    fn test_bad_language_rejected() {
        assert!(Cli::try_parse_from(["json-to-code", "--lang", "ruby"]).is_err());
    }

    #[test]
    fn test_default_filter() {
        assert_eq!(default_filter(0), "json_to_code=info");
        assert!(default_filter(3).ends_with("jtc_encoder=trace"));
    }
}
