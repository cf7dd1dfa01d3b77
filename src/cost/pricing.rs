//! Token pricing and per-run cost estimation.

use crate::error::{LabError, Result};
use crate::generation::UsageRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Decimal places kept for stored currency amounts.
pub const CURRENCY_PRECISION: i32 = 6;

/// Decimal places shown to the operator.
pub const DISPLAY_PRECISION: usize = 4;

/// USD price per token for one model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelPricing {
    pub per_input_token: f64,
    pub per_output_token: f64,
}

impl ModelPricing {
    /// Both prices are finite and non-negative.
    pub fn is_valid(&self) -> bool {
        [self.per_input_token, self.per_output_token]
            .iter()
            .all(|p| p.is_finite() && *p >= 0.0)
    }
}

/// Estimated cost of one generation call, in USD.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CostEstimate {
    pub input_cost: f64,
    pub output_cost: f64,
    pub total_cost: f64,
}

/// Mapping from model id to token prices.
#[derive(Debug, Clone, Default)]
pub struct PricingTable {
    models: BTreeMap<String, ModelPricing>,
}

impl PricingTable {
    pub fn new(models: BTreeMap<String, ModelPricing>) -> Self {
        Self { models }
    }

    pub fn get(&self, model_id: &str) -> Option<&ModelPricing> {
        self.models.get(model_id)
    }

    /// Fails with `UnknownPricingModel` if `model_id` has no prices.
    ///
    /// The pipeline calls this before the model is invoked so an unpriced
    /// run never reaches the network.
    pub fn require(&self, model_id: &str) -> Result<&ModelPricing> {
        self.get(model_id)
            .ok_or_else(|| LabError::UnknownPricingModel(model_id.to_string()))
    }

    /// Convert token usage into a cost estimate.
    ///
    /// `total_cost = input_tokens * per_input_token + output_tokens * per_output_token`,
    /// with each amount rounded to [`CURRENCY_PRECISION`] places.
    pub fn estimate(&self, usage: &UsageRecord, model_id: &str) -> Result<CostEstimate> {
        let pricing = self.require(model_id)?;

        let input_cost = round_currency(usage.input_tokens as f64 * pricing.per_input_token);
        let output_cost = round_currency(usage.output_tokens as f64 * pricing.per_output_token);

        Ok(CostEstimate {
            input_cost,
            output_cost,
            total_cost: round_currency(input_cost + output_cost),
        })
    }

    pub fn models(&self) -> impl Iterator<Item = (&String, &ModelPricing)> {
        self.models.iter()
    }
}

/// Round an amount to [`CURRENCY_PRECISION`] decimal places.
pub fn round_currency(amount: f64) -> f64 {
    let factor = 10f64.powi(CURRENCY_PRECISION);
    (amount * factor).round() / factor
}

/// Format an amount for display, e.g. `$0.0105`.
pub fn display_cost(amount: f64) -> String {
    format!("${:.*}", DISPLAY_PRECISION, amount)
}
