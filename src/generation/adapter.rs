//! Generation client adapter: policy around the opaque capability call.
//!
//! The adapter owns no mutable state. It converts an assembled
//! [`GenerationRequest`] into a [`CapabilityRequest`], then applies:
//!
//! - a per-attempt timeout (`GenerationTimeout`, not retried here; the caller
//!   decides whether to try again)
//! - exponential-backoff retries for transient failures
//!   (`GenerationFailed` with attempt count and last cause once exhausted)
//! - immediate failure for permanent errors and contract violations
//! - caller cancellation (`GenerationCancelled`), including during backoff
//!
//! Usage is only ever returned alongside the text of a completed call.

use super::capability::{CapabilityRequest, GenerationCapability, UsageRecord};
use super::retry::RetryPolicy;
use crate::error::{LabError, Result};
use crate::prompt::GenerationRequest;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Result of a completed generation call.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationOutcome {
    pub raw_output: String,
    pub usage: UsageRecord,
    /// Calls made, including the successful one.
    pub attempts: u32,
    /// Wall time across all attempts and backoff delays.
    pub latency_ms: u64,
}

/// Wraps a [`GenerationCapability`] with timeout, retry and cancellation.
#[derive(Clone)]
pub struct GenerationAdapter {
    capability: Arc<dyn GenerationCapability>,
    policy: RetryPolicy,
    timeout: Duration,
}

impl GenerationAdapter {
    pub fn new(
        capability: Arc<dyn GenerationCapability>,
        policy: RetryPolicy,
        timeout: Duration,
    ) -> Self {
        Self {
            capability,
            policy,
            timeout,
        }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Invoke the model for `request`.
    pub async fn invoke(&self, request: &GenerationRequest) -> Result<GenerationOutcome> {
        self.invoke_cancellable(request, &CancellationToken::new())
            .await
    }

    /// Invoke the model for `request`, aborting as soon as `cancel` fires.
    pub async fn invoke_cancellable(
        &self,
        request: &GenerationRequest,
        cancel: &CancellationToken,
    ) -> Result<GenerationOutcome> {
        let call = to_capability_request(request);
        let started = Instant::now();
        let max_attempts = self.policy.max_attempts();

        let mut attempt = 0;
        loop {
            attempt += 1;
            debug!(
                capability = self.capability.name(),
                model = %call.model,
                attempt,
                "invoking generation capability"
            );

            let result = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(LabError::GenerationCancelled),
                r = tokio::time::timeout(self.timeout, self.capability.generate(&call)) => r,
            };

            let response = match result {
                Err(_elapsed) => {
                    warn!(attempt, timeout = ?self.timeout, "generation call timed out");
                    return Err(LabError::GenerationTimeout {
                        timeout: self.timeout,
                        attempt,
                    });
                }
                Ok(Ok(response)) => response,
                Ok(Err(err)) if err.is_retryable() && attempt < max_attempts => {
                    let delay = self.policy.backoff_for(attempt);
                    warn!(
                        attempt,
                        max_attempts,
                        delay = ?delay,
                        error = %err,
                        "transient generation failure, retrying"
                    );
                    tokio::select! {
                        biased;
                        _ = cancel.cancelled() => return Err(LabError::GenerationCancelled),
                        _ = tokio::time::sleep(delay) => {}
                    }
                    continue;
                }
                Ok(Err(err)) => {
                    return Err(LabError::GenerationFailed {
                        attempts: attempt,
                        last_cause: err.to_string(),
                    });
                }
            };

            let latency_ms = started.elapsed().as_millis() as u64;
            info!(
                attempts = attempt,
                latency_ms,
                input_tokens = response.input_tokens,
                output_tokens = response.output_tokens,
                "generation completed"
            );

            return Ok(GenerationOutcome {
                usage: response.usage(),
                raw_output: response.text,
                attempts: attempt,
                latency_ms,
            });
        }
    }
}

fn to_capability_request(request: &GenerationRequest) -> CapabilityRequest {
    CapabilityRequest {
        prompt: request.user_prompt.clone(),
        system: (!request.system_prompt.trim().is_empty()).then(|| request.system_prompt.clone()),
        model: request.model_id.clone(),
        temperature: request.temperature,
        max_tokens: request.max_tokens,
    }
}
