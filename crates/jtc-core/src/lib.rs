pub mod config;
pub mod error;
pub mod language;
pub mod value;

pub use config::{EncodeConfig, Indent};
pub use error::{JtcError, Result};
pub use language::TargetLanguage;
pub use value::{Role, Value};
