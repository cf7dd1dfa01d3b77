//! Retry policy for transient generation failures.

use std::time::Duration;

/// Exponential backoff settings injected into the generation adapter.
///
/// `max_retries` counts retries after the first attempt, so a policy with
/// `max_retries = 2` makes at most three calls.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub initial_backoff: Duration,
    pub multiplier: f64,
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            initial_backoff: Duration::from_secs(1),
            multiplier: 2.0,
            max_backoff: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries.
    pub fn no_retries() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Total number of calls this policy allows.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Delay before retry number `retry` (1-based), capped at `max_backoff`.
    pub fn backoff_for(&self, retry: u32) -> Duration {
        let exponent = retry.saturating_sub(1).min(31) as i32;
        let secs = self.initial_backoff.as_secs_f64() * self.multiplier.max(1.0).powi(exponent);
        let capped = secs.min(self.max_backoff.as_secs_f64());
        Duration::from_secs_f64(capped.max(0.0))
    }

    /// All delays this policy can produce, in order.
    pub fn schedule(&self) -> Vec<Duration> {
        (1..=self.max_retries).map(|r| self.backoff_for(r)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_retries, 2);
        assert_eq!(policy.max_attempts(), 3);
    }

    #[test]
    fn test_exponential_schedule() {
        let policy = RetryPolicy {
            max_retries: 4,
            initial_backoff: Duration::from_millis(100),
            multiplier: 2.0,
            max_backoff: Duration::from_secs(10),
        };
        assert_eq!(
            policy.schedule(),
            vec![
                Duration::from_millis(100),
                Duration::from_millis(200),
                Duration::from_millis(400),
                Duration::from_millis(800),
            ]
        );
    }

    #[test]
    fn test_backoff_is_capped() {
        let policy = RetryPolicy {
            max_retries: 10,
            initial_backoff: Duration::from_secs(1),
            multiplier: 3.0,
            max_backoff: Duration::from_secs(5),
        };
        assert_eq!(policy.backoff_for(1), Duration::from_secs(1));
        assert_eq!(policy.backoff_for(2), Duration::from_secs(3));
        assert_eq!(policy.backoff_for(3), Duration::from_secs(5));
        assert_eq!(policy.backoff_for(10), Duration::from_secs(5));
    }

    #[test]
    fn test_no_retries() {
        let policy = RetryPolicy::no_retries();
        assert_eq!(policy.max_attempts(), 1);
        assert!(policy.schedule().is_empty());
    }
}
