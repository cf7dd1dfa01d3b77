//! Configuration model for promptlab.
//!
//! This module defines the Config struct that represents `promptlab.yaml`.
//! It supports forward-compatible YAML parsing (unknown fields are ignored),
//! sensible defaults for optional fields, and validation of config values.
//! The pricing table and the built-in templates live here as data.

mod model;
mod operations;
pub mod prompts;
pub mod types;


// Re-export public API
pub use model::Config;
pub use types::{DEFAULT_EXPECTED_SOLUTIONS, DEFAULT_MODEL_ID, RetrySettings};
