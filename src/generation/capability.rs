//! The boundary to the external model-call capability.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Token usage reported by a completed generation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UsageRecord {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

impl UsageRecord {
    pub fn total_tokens(&self) -> u64 {
        self.input_tokens + self.output_tokens
    }
}

/// What is sent across the capability boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct CapabilityRequest {
    pub prompt: String,
    /// Rendered system prompt, if any.
    pub system: Option<String>,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// What a capability must return for a completed call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilityResponse {
    pub text: String,
    pub input_tokens: u64,
    pub output_tokens: u64,
}

impl CapabilityResponse {
    pub fn usage(&self) -> UsageRecord {
        UsageRecord {
            input_tokens: self.input_tokens,
            output_tokens: self.output_tokens,
        }
    }
}

/// How a failed call should be treated by the retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Rate limits, overload, dropped connections. Worth retrying.
    Transient,
    /// Bad credentials, rejected request. Retrying cannot help.
    Permanent,
    /// The capability answered with something other than the agreed shape.
    ContractViolation,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Transient => write!(f, "transient"),
            FailureKind::Permanent => write!(f, "permanent"),
            FailureKind::ContractViolation => write!(f, "contract violation"),
        }
    }
}

/// A failed capability call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} failure: {message}")]
pub struct CapabilityError {
    pub kind: FailureKind,
    pub message: String,
}

impl CapabilityError {
    pub fn transient(message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Transient,
            message: message.into(),
        }
    }

    pub fn permanent(message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Permanent,
            message: message.into(),
        }
    }

    pub fn contract(message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::ContractViolation,
            message: message.into(),
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.kind == FailureKind::Transient
    }
}

/// An opaque model-call capability.
///
/// Implementations perform exactly one network call per invocation; retry,
/// timeout and cancellation are the adapter's job.
#[async_trait]
pub trait GenerationCapability: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    async fn generate(
        &self,
        request: &CapabilityRequest,
    ) -> std::result::Result<CapabilityResponse, CapabilityError>;
}
