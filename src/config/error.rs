//! Error types for processor configuration.
//!
//! Every variant raised while reading parameters names the parameter that
//! failed, so a startup failure points straight at the offending flag or
//! environment variable.
use thiserror::Error;

use crate::models::{AddressError, KeyError};

use super::Parameter;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(Parameter),

    #[error("Invalid signing key for {parameter}: {source}")]
    InvalidSigningKey {
        parameter: Parameter,
        source: KeyError,
    },

    #[error("Invalid address for {parameter}: {source}")]
    InvalidAddress {
        parameter: Parameter,
        source: AddressError,
    },

    #[error("Invalid value for {parameter}: {reason}")]
    InvalidValue { parameter: Parameter, reason: String },

    #[error("Failed to read config file {path}: {source}")]
    FileRead {
        path: String,
        source: std::io::Error,
    },

    #[error("Invalid config file: {0}")]
    FileFormat(String),
}

impl ConfigError {
    /// The parameter this error refers to, if any.
    pub fn parameter(&self) -> Option<Parameter> {
        match self {
            ConfigError::MissingParameter(parameter)
            | ConfigError::InvalidSigningKey { parameter, .. }
            | ConfigError::InvalidAddress { parameter, .. }
            | ConfigError::InvalidValue { parameter, .. } => Some(*parameter),
            ConfigError::FileRead { .. } | ConfigError::FileFormat(_) => None,
        }
    }
}
