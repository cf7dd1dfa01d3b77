//! Configuration types and defaults for promptlab.
//!
//! This module defines nested config sections, constants, and default value
//! functions used by the Config struct.

use crate::cost::ModelPricing;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Model used when the config does not name one.
pub const DEFAULT_MODEL_ID: &str = "claude-3-5-sonnet-20241022";

/// Number of solutions each run asks the model for.
pub const DEFAULT_EXPECTED_SOLUTIONS: u32 = 5;

/// Retry and backoff settings for the generation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    /// Retries after the first attempt for transient failures.
    pub max_retries: u32,

    /// Delay before the first retry, in milliseconds.
    pub initial_backoff_ms: u64,

    /// Factor applied to the delay after each retry.
    pub multiplier: f64,

    /// Upper bound for any single delay, in milliseconds.
    pub max_backoff_ms: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_retries: 2,
            initial_backoff_ms: 1_000,
            multiplier: 2.0,
            max_backoff_ms: 10_000,
        }
    }
}

/// Default pricing table (USD per token).
pub fn default_pricing() -> BTreeMap<String, ModelPricing> {
    let mut pricing = BTreeMap::new();
    pricing.insert(
        DEFAULT_MODEL_ID.to_string(),
        ModelPricing {
            per_input_token: 0.000003,
            per_output_token: 0.000015,
        },
    );
    pricing.insert(
        "claude-3-5-haiku-20241022".to_string(),
        ModelPricing {
            per_input_token: 0.0000008,
            per_output_token: 0.000004,
        },
    );
    pricing
}

// Default value functions for serde
pub(crate) fn default_model_id() -> String {
    DEFAULT_MODEL_ID.to_string()
}
pub(crate) fn default_temperature() -> f32 {
    0.8
}
pub(crate) fn default_max_tokens() -> u32 {
    4000
}
pub(crate) fn default_timeout_seconds() -> u64 {
    120
}
pub(crate) fn default_expected_solutions() -> u32 {
    DEFAULT_EXPECTED_SOLUTIONS
}
pub(crate) fn default_api_base_url() -> String {
    "https://api.anthropic.com".to_string()
}
pub(crate) fn default_api_key_env() -> String {
    "ANTHROPIC_API_KEY".to_string()
}
pub(crate) fn default_system_prompt() -> String {
    super::prompts::DEFAULT_SYSTEM_PROMPT.to_string()
}
pub(crate) fn default_user_prompt() -> String {
    super::prompts::DEFAULT_USER_PROMPT.to_string()
}
