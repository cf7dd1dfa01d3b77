//! Config loading, validation, and conversion into pipeline settings.

use super::model::Config;
use crate::cost::PricingTable;
use crate::error::{LabError, Result};
use crate::generation::RetryPolicy;
use crate::prompt::PromptConfig;
use std::path::Path;
use std::time::Duration;

impl Config {
    /// Load config from a YAML file.
    ///
    /// Unknown fields in the YAML are silently ignored for forward compatibility.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            LabError::ConfigError(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Load config from a YAML file, falling back to defaults when the file
    /// does not exist. A file that exists but fails to parse is still an error.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Parse config from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        // An empty document deserializes to unit, not a map.
        let config: Config = if yaml.trim().is_empty() {
            Config::default()
        } else {
            serde_yaml::from_str(yaml)
                .map_err(|e| LabError::ConfigError(format!("failed to parse config YAML: {}", e)))?
        };

        config.validate()?;
        Ok(config)
    }

    /// Serialize config to YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self)
            .map_err(|e| LabError::ConfigError(format!("failed to serialize config to YAML: {}", e)))
    }

    /// Validate config values and return error on invalid values.
    ///
    /// Validation rules:
    /// - `temperature` must be within [0, 1]
    /// - `max_tokens`, `timeout_seconds` and `expected_solutions` must be positive
    /// - `tool_solution_ratio` must satisfy `min <= max <= expected_solutions`
    /// - `retry.multiplier` must be at least 1
    /// - every pricing entry must be finite and non-negative
    /// - `model_id` must have a pricing entry
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.temperature) {
            return Err(invalid(format!(
                "temperature must be between 0 and 1 (found {})",
                self.temperature
            )));
        }

        if self.max_tokens == 0 {
            return Err(invalid("max_tokens must be greater than 0"));
        }

        if self.timeout_seconds == 0 {
            return Err(invalid("timeout_seconds must be greater than 0"));
        }

        if self.expected_solutions == 0 {
            return Err(invalid("expected_solutions must be greater than 0"));
        }

        let ratio = self.tool_solution_ratio;
        if ratio.min > ratio.max || ratio.max > self.expected_solutions {
            return Err(invalid(format!(
                "tool_solution_ratio ({}, {}) must satisfy min <= max <= expected_solutions ({})",
                ratio.min, ratio.max, self.expected_solutions
            )));
        }

        if !(self.retry.multiplier.is_finite() && self.retry.multiplier >= 1.0) {
            return Err(invalid("retry.multiplier must be at least 1"));
        }

        for (model, price) in &self.pricing {
            if !price.is_valid() {
                return Err(invalid(format!(
                    "pricing for '{}' must be finite and non-negative",
                    model
                )));
            }
        }

        if !self.pricing.contains_key(&self.model_id) {
            return Err(invalid(format!(
                "model_id '{}' has no entry in pricing",
                self.model_id
            )));
        }

        if self.api_key_env.trim().is_empty() {
            return Err(invalid("api_key_env must not be empty"));
        }

        Ok(())
    }

    /// Prompt settings for a run using the given templates.
    pub fn prompt_config(&self, system_template: &str, user_template: &str) -> PromptConfig {
        PromptConfig {
            system_prompt_template: system_template.to_string(),
            user_prompt_template: user_template.to_string(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            model_id: self.model_id.clone(),
            tool_solution_ratio: self.tool_solution_ratio,
            expected_solutions: self.expected_solutions,
        }
    }

    /// Retry policy for the generation adapter.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.retry.max_retries,
            initial_backoff: Duration::from_millis(self.retry.initial_backoff_ms),
            multiplier: self.retry.multiplier,
            max_backoff: Duration::from_millis(self.retry.max_backoff_ms),
        }
    }

    /// Per-attempt timeout for the generation call.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Pricing table built from the `pricing` section.
    pub fn pricing_table(&self) -> PricingTable {
        PricingTable::new(self.pricing.clone())
    }
}

fn invalid(reason: impl Into<String>) -> LabError {
    LabError::ConfigError(format!("config validation failed: {}", reason.into()))
}
