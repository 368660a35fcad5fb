//! Linear-backoff retry loop for recognition requests.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use snapstory_core::CLIENT_ATTEMPT_TIMEOUT_MS;
use tracing::{debug, warn};

use crate::error::ClientError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Delay before attempt `k` is `retry_delay_base_ms * k`.
    pub retry_delay_base_ms: u64,
    /// Per-attempt timeout.
    pub timeout_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            retry_delay_base_ms: 1_000,
            timeout_ms: CLIENT_ATTEMPT_TIMEOUT_MS,
        }
    }
}

impl RetryPolicy {
    /// Delay before attempt `attempt` (0-indexed); zero for the first.
    pub fn delay_before(&self, attempt: u32) -> Duration {
        Duration::from_millis(self.retry_delay_base_ms.saturating_mul(attempt as u64))
    }

    pub fn total_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Waits between attempts. Injected so tests can observe delays without timers.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Run `op(attempt)` until it succeeds, fails with a non-retryable error, or
/// the policy's attempts are used up. The last error is returned.
pub async fn run_with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    sleeper: &dyn Sleeper,
    mut op: F,
) -> Result<T, ClientError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, ClientError>>,
{
    let mut attempt = 0;
    loop {
        let delay = policy.delay_before(attempt);
        if !delay.is_zero() {
            debug!(attempt, delay_ms = delay.as_millis() as u64, "Waiting before retry");
            sleeper.sleep(delay).await;
        }

        match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_retryable() && attempt < policy.max_retries => {
                warn!(
                    attempt = attempt + 1,
                    total = policy.total_attempts(),
                    error = %e,
                    "Recognition attempt failed, will retry"
                );
                attempt += 1;
            }
            Err(e) => {
                if e.is_retryable() {
                    warn!(attempts = attempt + 1, error = %e, "Retry budget exhausted");
                }
                return Err(e);
            }
        }
    }
}
