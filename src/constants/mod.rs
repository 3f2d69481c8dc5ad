//! This module contains all the constant values used in the system
mod processor;
pub use processor::*;

mod resources;
pub use resources::*;

/// Environment variable naming an optional JSON parameter file.
pub const CONFIG_FILE_ENV_VAR: &str = "PROCESSOR_CONFIG_FILE";
