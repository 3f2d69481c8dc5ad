//! Processor configuration.
//!
//! Parameters are read by stable name from one or more [`ParameterSource`]s
//! (environment, JSON file) and assembled into an immutable
//! [`ProcessorConfig`].
mod error;
pub use error::*;

mod parameters;
pub use parameters::*;

mod processor_config;
pub use processor_config::*;
