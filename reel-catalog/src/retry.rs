//! Timeout and retry wrapper for catalog requests
//!
//! Each attempt runs under its own timeout window; an elapsed timeout
//! counts as a failed attempt. Transient failures are retried after a fixed
//! delay until the attempt budget is spent, then the last observed error is
//! returned. A success short-circuits immediately.

use crate::error::CatalogError;
use reel_common::NetworkProfile;
use std::future::Future;
use std::time::Duration;

/// Retry tuning for one logical call
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Per-attempt timeout (re-armed fresh for every attempt)
    pub timeout: Duration,
    /// Fixed delay between attempts
    pub delay: Duration,
    /// Retries after the first attempt; total attempts = `attempts + 1`
    pub attempts: u32,
}

impl RetryPolicy {
    pub fn from_profile(profile: &NetworkProfile) -> Self {
        Self {
            timeout: Duration::from_millis(profile.timeout_ms),
            delay: Duration::from_millis(profile.retry_delay_ms),
            attempts: profile.retry_attempts,
        }
    }
}

/// Run `operation` with per-attempt timeout and bounded retry.
///
/// Retryable failures (timeout, network error, non-2xx status) wait
/// `policy.delay` and try again while attempts remain. Non-retryable
/// failures and successes return immediately.
pub async fn retry_request<T, F, Fut>(
    operation_name: &str,
    policy: &RetryPolicy,
    mut operation: F,
) -> Result<T, CatalogError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, CatalogError>>,
{
    let total_attempts = policy.attempts.saturating_add(1);
    let mut last_error = None;

    for attempt in 1..=total_attempts {
        match tokio::time::timeout(policy.timeout, operation()).await {
            Ok(Ok(value)) => {
                if attempt > 1 {
                    tracing::debug!(
                        operation = operation_name,
                        attempt,
                        "Request succeeded after retry"
                    );
                }
                return Ok(value);
            }
            Ok(Err(err)) if !err.is_retryable() => return Err(err),
            Ok(Err(err)) => last_error = Some(err),
            Err(_elapsed) => {
                last_error = Some(CatalogError::Timeout(policy.timeout.as_millis() as u64))
            }
        }

        if attempt < total_attempts {
            tracing::warn!(
                operation = operation_name,
                attempt,
                remaining = total_attempts - attempt,
                error = %last_error.as_ref().map(|e| e.to_string()).unwrap_or_default(),
                "Request failed, retrying after delay"
            );
            tokio::time::sleep(policy.delay).await;
        }
    }

    let err = last_error
        .unwrap_or_else(|| CatalogError::Network("no attempts were made".to_string()));
    tracing::error!(
        operation = operation_name,
        attempts = total_attempts,
        error = %err,
        "Request failed: retries exhausted"
    );
    Err(err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn fast_policy(attempts: u32) -> RetryPolicy {
        RetryPolicy {
            timeout: Duration::from_millis(50),
            delay: Duration::from_millis(5),
            attempts,
        }
    }

    #[tokio::test]
    async fn first_attempt_success_short_circuits() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&calls);

        let result = retry_request("test", &fast_policy(3), move || {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok::<u32, CatalogError>(42)
            }
        })
        .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn exhaustion_attempts_exactly_retries_plus_one() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&calls);

        let result: Result<u32, _> = retry_request("test", &fast_policy(3), move || {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err(CatalogError::Status(503, "unavailable".to_string()))
            }
        })
        .await;

        assert_eq!(calls.load(Ordering::SeqCst), 4);
        assert!(matches!(result, Err(CatalogError::Status(503, _))));
    }

    #[tokio::test]
    async fn success_on_attempt_k_stops_there() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&calls);

        let result = retry_request("test", &fast_policy(3), move || {
            let counter = Arc::clone(&counter);
            async move {
                let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
                if n < 3 {
                    Err(CatalogError::Network("connection reset".to_string()))
                } else {
                    Ok(n)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn timeout_counts_as_a_failed_attempt() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&calls);
        let policy = RetryPolicy {
            timeout: Duration::from_millis(10),
            delay: Duration::from_millis(5),
            attempts: 1,
        };

        let result: Result<u32, _> = retry_request("test", &policy, move || {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(200)).await;
                Ok(1)
            }
        })
        .await;

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(matches!(result, Err(CatalogError::Timeout(10))));
    }

    #[tokio::test]
    async fn parse_failure_is_not_retried() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&calls);

        let result: Result<u32, _> = retry_request("test", &fast_policy(3), move || {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err(CatalogError::Parse("unexpected payload".to_string()))
            }
        })
        .await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(matches!(result, Err(CatalogError::Parse(_))));
    }
}
