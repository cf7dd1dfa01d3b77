//! Config struct definition and default implementation.

use super::types::*;
use crate::cost::ModelPricing;
use crate::prompt::ToolSolutionRatio;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Configuration for promptlab.
///
/// This struct represents the contents of `promptlab.yaml` at the data root.
/// Unknown fields in the YAML are ignored for forward compatibility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // =========================================================================
    // Generation settings
    // =========================================================================
    /// Model identifier sent to the generation API and used for pricing.
    #[serde(default = "default_model_id")]
    pub model_id: String,

    /// Sampling temperature in [0, 1].
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum output tokens per run.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Per-attempt timeout for the generation call.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Retry policy for transient generation failures.
    #[serde(default)]
    pub retry: RetrySettings,

    // =========================================================================
    // Prompt settings
    // =========================================================================
    /// How many of the solutions should reference tools.
    #[serde(default)]
    pub tool_solution_ratio: ToolSolutionRatio,

    /// Number of solutions the model is asked for.
    #[serde(default = "default_expected_solutions")]
    pub expected_solutions: u32,

    /// Built-in system prompt template.
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,

    /// Built-in user prompt template.
    #[serde(default = "default_user_prompt")]
    pub user_prompt: String,

    // =========================================================================
    // Cost settings
    // =========================================================================
    /// Per-model token prices in USD.
    #[serde(default = "default_pricing")]
    pub pricing: BTreeMap<String, ModelPricing>,

    // =========================================================================
    // API settings
    // =========================================================================
    /// Base URL of the generation API.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model_id: default_model_id(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_seconds: default_timeout_seconds(),
            retry: RetrySettings::default(),
            tool_solution_ratio: ToolSolutionRatio::default(),
            expected_solutions: default_expected_solutions(),
            system_prompt: default_system_prompt(),
            user_prompt: default_user_prompt(),
            pricing: default_pricing(),
            api_base_url: default_api_base_url(),
            api_key_env: default_api_key_env(),
        }
    }
}
