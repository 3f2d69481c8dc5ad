//! Bridge Relayer Processor Configuration Library
//!
//! Turns named parameters (environment variables, an optional JSON file) into
//! one immutable [`config::ProcessorConfig`] and provides deferred factories
//! for the processor's MySQL database and Redis-backed message queue.
//!
//! # Module Structure
//!
//! - `config`: Parameter sources and the processor config
//! - `constants`: Defaults for optional parameters and connections
//! - `logging`: Logging setup
//! - `models`: Keys, addresses, secrets and error types
//! - `services`: Database and queue factories

pub mod config;
pub mod constants;
pub mod logging;
pub mod models;
pub mod services;
