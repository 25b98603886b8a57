use crate::value::Role;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum JtcError {
    #[error("Unsupported {role} leaf: {value}")]
    UnsupportedLeaf { role: Role, value: String },
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, JtcError>;
