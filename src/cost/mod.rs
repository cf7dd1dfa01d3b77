//! Cost tracking: per-run estimates from a pricing table, and the
//! session-wide ledger they accumulate into.

mod ledger;
mod pricing;

pub use ledger::{LedgerSnapshot, SessionCostLedger};
pub use pricing::{
    CURRENCY_PRECISION, CostEstimate, DISPLAY_PRECISION, ModelPricing, PricingTable,
    display_cost, round_currency,
};
