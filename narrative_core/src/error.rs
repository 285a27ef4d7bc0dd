//! Error types.
//!
//! The compiler itself never fails on well-typed input; errors only come
//! from parsing and validating configuration.

use thiserror::Error;

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum NarrativeError {
    #[error("failed to parse compiler config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("invalid value for `{field}`: {reason}")]
    InvalidConfig { field: &'static str, reason: String },
}

pub type Result<T> = std::result::Result<T, NarrativeError>;
