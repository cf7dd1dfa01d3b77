//! Generation client adapter.
//!
//! - **Capability**: the opaque `generate(prompt, model, temperature,
//!   max_tokens) -> (text, usage)` boundary, as a trait
//! - **Retry**: exponential backoff policy injected into the adapter
//! - **Adapter**: timeout, retry and cancellation around one capability
//! - **Anthropic**: the production HTTP capability

mod adapter;
pub mod anthropic;
mod capability;
mod retry;

pub use adapter::{GenerationAdapter, GenerationOutcome};
pub use anthropic::AnthropicCapability;
pub use capability::{
    CapabilityError, CapabilityRequest, CapabilityResponse, FailureKind, GenerationCapability,
    UsageRecord,
};
pub use retry::RetryPolicy;
