//! # Effects Error Types
//!
//! Missing page elements are not errors: a system whose elements are absent
//! simply does not activate. What remains is configuration and host binding.

use thiserror::Error;

/// Errors that can occur while configuring or hosting the effects engine.
#[derive(Error, Debug)]
pub enum EffectsError {
    /// A configuration value is outside its legal range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The configuration file is not valid TOML for [`crate::EffectsConfig`].
    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// A host API call failed during startup.
    #[error("host error: {0}")]
    Host(String),
}

/// Result type for effects operations.
pub type EffectsResult<T> = Result<T, EffectsError>;
