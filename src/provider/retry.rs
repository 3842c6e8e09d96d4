// src/provider/retry.rs — Retry with exponential backoff for model clients
//
// Wraps any ModelClient with automatic retry on transient failures.
// Retries: rate limits (429), server errors (5xx), timeouts, connection resets.
// Does NOT retry: auth errors, invalid requests, other provider rejections.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use super::{CompletionRequest, ModelClient};
use crate::infra::config::RetrySection;
use crate::infra::errors::StudioError;

const JITTER_FRACTION: f64 = 0.2;

/// Configuration for retry behavior.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub initial_delay: Duration,
    pub backoff_factor: f64,
    pub max_delay: Duration,
    pub jitter_fraction: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::from(&RetrySection::default())
    }
}

impl From<&RetrySection> for RetryConfig {
    fn from(section: &RetrySection) -> Self {
        Self {
            max_retries: section.max_retries,
            initial_delay: Duration::from_millis(section.initial_delay_ms),
            backoff_factor: section.backoff_factor,
            max_delay: Duration::from_millis(section.max_delay_ms),
            jitter_fraction: JITTER_FRACTION,
        }
    }
}

/// A client wrapper that adds retry with exponential backoff to `complete()`.
pub struct RetryClient {
    inner: Arc<dyn ModelClient>,
    config: RetryConfig,
}

impl RetryClient {
    pub fn new(inner: Arc<dyn ModelClient>) -> Self {
        Self {
            inner,
            config: RetryConfig::default(),
        }
    }

    pub fn with_config(inner: Arc<dyn ModelClient>, config: RetryConfig) -> Self {
        Self { inner, config }
    }

    /// Calculate the delay for a given retry attempt (0-indexed).
    fn delay_for_attempt(&self, attempt: u32, rate_limit_delay: Option<Duration>) -> Duration {
        // Server-provided wait wins, plus a small buffer.
        if let Some(rl_delay) = rate_limit_delay {
            return (rl_delay + Duration::from_millis(100)).min(self.config.max_delay);
        }

        let base_ms = self.config.initial_delay.as_millis() as f64
            * self.config.backoff_factor.powi(attempt as i32);
        let capped_ms = base_ms.min(self.config.max_delay.as_millis() as f64);

        let jitter = deterministic_jitter(attempt, self.config.jitter_fraction);
        Duration::from_millis((capped_ms * jitter) as u64)
    }
}

/// Extract rate-limit retry delay from the error, if available.
fn rate_limit_delay(error: &StudioError) -> Option<Duration> {
    match error {
        StudioError::RateLimited { retry_after_ms, .. } if *retry_after_ms > 0 => {
            Some(Duration::from_millis(*retry_after_ms))
        }
        _ => None,
    }
}

/// Multiplier in [1 - fraction, 1 + fraction], reproducible per attempt.
fn deterministic_jitter(attempt: u32, fraction: f64) -> f64 {
    let hash = (attempt.wrapping_mul(2654435761)) as f64 / u32::MAX as f64;
    1.0 + fraction * (2.0 * hash - 1.0)
}

#[async_trait]
impl ModelClient for RetryClient {
    fn id(&self) -> &str {
        self.inner.id()
    }

    async fn complete(&self, request: CompletionRequest) -> Result<String, StudioError> {
        let mut attempt = 0;
        loop {
            match self.inner.complete(request.clone()).await {
                Ok(text) => return Ok(text),
                Err(e) => {
                    if !e.is_retriable() || attempt >= self.config.max_retries {
                        return Err(e);
                    }

                    let delay = self.delay_for_attempt(attempt, rate_limit_delay(&e));
                    tracing::warn!(
                        client = self.inner.id(),
                        attempt = attempt + 1,
                        max_retries = self.config.max_retries,
                        delay_ms = delay.as_millis() as u64,
                        "Retrying after error: {}",
                        e
                    );

                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Fails with the given error `failures` times, then succeeds.
    struct FlakyClient {
        failures: u32,
        calls: AtomicU32,
        make_error: fn() -> StudioError,
    }

    #[async_trait]
    impl ModelClient for FlakyClient {
        fn id(&self) -> &str {
            "flaky"
        }
        async fn complete(&self, _req: CompletionRequest) -> Result<String, StudioError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if n < self.failures {
                Err((self.make_error)())
            } else {
                Ok("recovered".into())
            }
        }
    }

    fn fast_config(max_retries: u32) -> RetryConfig {
        RetryConfig {
            max_retries,
            initial_delay: Duration::from_millis(1),
            backoff_factor: 2.0,
            max_delay: Duration::from_millis(5),
            jitter_fraction: 0.2,
        }
    }

    fn transport() -> StudioError {
        StudioError::Transport {
            provider: "flaky".into(),
            message: "connection reset".into(),
        }
    }

    fn rate_limited() -> StudioError {
        StudioError::RateLimited {
            provider: "flaky".into(),
            retry_after_ms: 1,
        }
    }

    fn auth() -> StudioError {
        StudioError::Auth {
            provider: "flaky".into(),
            message: "bad key".into(),
        }
    }

    fn request() -> CompletionRequest {
        CompletionRequest::new("m", "hello", 0.5)
    }

    #[tokio::test]
    async fn test_recovers_from_transport_errors() {
        let inner = Arc::new(FlakyClient {
            failures: 2,
            calls: AtomicU32::new(0),
            make_error: transport,
        });
        let client = RetryClient::with_config(inner.clone(), fast_config(3));
        assert_eq!(client.complete(request()).await.unwrap(), "recovered");
        assert_eq!(inner.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_recovers_from_rate_limit() {
        let inner = Arc::new(FlakyClient {
            failures: 1,
            calls: AtomicU32::new(0),
            make_error: rate_limited,
        });
        let client = RetryClient::with_config(inner.clone(), fast_config(3));
        assert!(client.complete(request()).await.is_ok());
        assert_eq!(inner.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_retries() {
        let inner = Arc::new(FlakyClient {
            failures: 10,
            calls: AtomicU32::new(0),
            make_error: transport,
        });
        let client = RetryClient::with_config(inner.clone(), fast_config(2));
        let err = client.complete(request()).await.unwrap_err();
        assert!(matches!(err, StudioError::Transport { .. }));
        assert_eq!(inner.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_auth_error_not_retried() {
        let inner = Arc::new(FlakyClient {
            failures: 10,
            calls: AtomicU32::new(0),
            make_error: auth,
        });
        let client = RetryClient::with_config(inner.clone(), fast_config(5));
        let err = client.complete(request()).await.unwrap_err();
        assert!(matches!(err, StudioError::Auth { .. }));
        assert_eq!(inner.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_zero_retries_is_single_call() {
        let inner = Arc::new(FlakyClient {
            failures: 1,
            calls: AtomicU32::new(0),
            make_error: transport,
        });
        let client = RetryClient::with_config(inner.clone(), fast_config(0));
        assert!(client.complete(request()).await.is_err());
        assert_eq!(inner.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_rate_limit_delay_extraction() {
        let err = StudioError::RateLimited {
            provider: "test".into(),
            retry_after_ms: 3000,
        };
        assert_eq!(rate_limit_delay(&err), Some(Duration::from_millis(3000)));

        let zero = StudioError::RateLimited {
            provider: "test".into(),
            retry_after_ms: 0,
        };
        assert!(rate_limit_delay(&zero).is_none());
        assert!(rate_limit_delay(&transport()).is_none());
    }

    #[test]
    fn test_delay_for_attempt_exponential() {
        let client = RetryClient::new(Arc::new(FlakyClient {
            failures: 0,
            calls: AtomicU32::new(0),
            make_error: transport,
        }));
        let d0 = client.delay_for_attempt(0, None);
        let d1 = client.delay_for_attempt(1, None);
        let d2 = client.delay_for_attempt(2, None);

        // d0 ≈ 2000ms, d1 ≈ 4000ms, d2 ≈ 8000ms within jitter bounds
        assert!(d0.as_millis() >= 1500 && d0.as_millis() <= 2500);
        assert!(d1.as_millis() >= 3000 && d1.as_millis() <= 5000);
        assert!(d2.as_millis() >= 6000 && d2.as_millis() <= 10000);
    }

    #[test]
    fn test_delay_capped_at_max() {
        let client = RetryClient::new(Arc::new(FlakyClient {
            failures: 0,
            calls: AtomicU32::new(0),
            make_error: transport,
        }));
        let d = client.delay_for_attempt(10, None);
        assert!(d.as_millis() <= 36_000);
        let hinted = client.delay_for_attempt(0, Some(Duration::from_secs(120)));
        assert_eq!(hinted, Duration::from_millis(30_000));
    }

    #[test]
    fn test_delay_uses_rate_limit_hint() {
        let client = RetryClient::new(Arc::new(FlakyClient {
            failures: 0,
            calls: AtomicU32::new(0),
            make_error: transport,
        }));
        let d = client.delay_for_attempt(0, Some(Duration::from_millis(10_000)));
        assert_eq!(d.as_millis(), 10_100);
    }

    #[test]
    fn test_deterministic_jitter_range() {
        for attempt in 0..20 {
            let j = deterministic_jitter(attempt, 0.2);
            assert!((0.8..=1.2).contains(&j), "jitter {j} out of range for attempt {attempt}");
        }
        assert_eq!(deterministic_jitter(5, 0.2), deterministic_jitter(5, 0.2));
    }

    #[test]
    fn test_config_from_section() {
        let cfg = RetryConfig::from(&RetrySection {
            max_retries: 1,
            initial_delay_ms: 10,
            backoff_factor: 3.0,
            max_delay_ms: 100,
        });
        assert_eq!(cfg.max_retries, 1);
        assert_eq!(cfg.initial_delay, Duration::from_millis(10));
        assert_eq!(cfg.backoff_factor, 3.0);
        assert_eq!(cfg.max_delay, Duration::from_millis(100));
    }
}
