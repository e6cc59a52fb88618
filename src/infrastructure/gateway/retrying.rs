//! Retry and timeout decorator for catalog gateways.

use crate::domain::entities::{Domain, Lesson, Technology, Tutorial};
use crate::domain::gateway::{CatalogGateway, FetchError, ListFilter};
use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;
use tokio_retry::RetryIf;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::warn;

/// How [`RetryingGateway`] retries a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts per call, including the first one.
    pub attempts: usize,
    /// Delay before the first retry; doubles on each further retry.
    pub base_delay: Duration,
    pub max_delay: Duration,
    /// Limit for a single attempt. `None` disables the timeout.
    pub timeout: Option<Duration>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            base_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(5),
            timeout: Some(Duration::from_secs(5)),
        }
    }
}

impl RetryPolicy {
    fn strategy(&self) -> impl Iterator<Item = Duration> + use<> {
        // from_millis(2) grows as 2, 4, 8..., so factor base/2 yields base, 2*base, 4*base...
        let factor = (self.base_delay.as_millis() as u64 / 2).max(1);
        ExponentialBackoff::from_millis(2)
            .factor(factor)
            .max_delay(self.max_delay)
            .map(jitter)
            .take(self.attempts.saturating_sub(1))
    }
}

/// Wraps a gateway with retries and per-attempt timeouts.
///
/// Only transient failures ([`FetchError::Unavailable`], [`FetchError::Timeout`])
/// are retried. `NotFound` and `Invalid` are returned after the first attempt.
pub struct RetryingGateway<G> {
    inner: G,
    policy: RetryPolicy,
}

impl<G: CatalogGateway> RetryingGateway<G> {
    pub fn new(inner: G, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    async fn call<T, F, Fut>(&self, operation: &'static str, mut attempt: F) -> Result<T, FetchError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, FetchError>>,
    {
        let timeout = self.policy.timeout;

        RetryIf::spawn(
            self.policy.strategy(),
            || with_timeout(timeout, attempt()),
            |e: &FetchError| {
                let transient = e.is_transient();
                if transient {
                    warn!(operation, error = %e, "catalog call failed, retrying");
                }
                transient
            },
        )
        .await
    }
}

async fn with_timeout<T>(
    timeout: Option<Duration>,
    call: impl Future<Output = Result<T, FetchError>>,
) -> Result<T, FetchError> {
    match timeout {
        Some(limit) => tokio::time::timeout(limit, call)
            .await
            .unwrap_or(Err(FetchError::Timeout)),
        None => call.await,
    }
}

#[async_trait]
impl<G: CatalogGateway> CatalogGateway for RetryingGateway<G> {
    async fn list_domains(&self, filter: &ListFilter) -> Result<Vec<Domain>, FetchError> {
        self.call("list_domains", move || self.inner.list_domains(filter))
            .await
    }

    async fn list_technologies(
        &self,
        domain_id: &str,
        filter: &ListFilter,
    ) -> Result<Vec<Technology>, FetchError> {
        self.call("list_technologies", move || {
            self.inner.list_technologies(domain_id, filter)
        })
        .await
    }

    async fn list_tutorials(
        &self,
        technology_id: &str,
        filter: &ListFilter,
    ) -> Result<Vec<Tutorial>, FetchError> {
        self.call("list_tutorials", move || {
            self.inner.list_tutorials(technology_id, filter)
        })
        .await
    }

    async fn list_lessons(
        &self,
        tutorial_id: &str,
        filter: &ListFilter,
    ) -> Result<Vec<Lesson>, FetchError> {
        self.call("list_lessons", move || {
            self.inner.list_lessons(tutorial_id, filter)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::gateway::MockCatalogGateway;
    use crate::infrastructure::gateway::{CatalogFixture, InMemoryGateway};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn fast_policy(attempts: usize) -> RetryPolicy {
        RetryPolicy {
            attempts,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(2),
            timeout: None,
        }
    }

    #[tokio::test]
    async fn test_retries_transient_failure() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();

        let mut mock = MockCatalogGateway::new();
        mock.expect_list_technologies()
            .times(2)
            .returning(move |_, _| {
                if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err(FetchError::Unavailable("503".into()))
                } else {
                    Ok(vec![Technology::new("t1", "HTML", "d1")])
                }
            });

        let gateway = RetryingGateway::new(mock, fast_policy(3));
        let result = gateway
            .list_technologies("d1", &ListFilter::default())
            .await
            .unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_does_not_retry_not_found() {
        let mut mock = MockCatalogGateway::new();
        mock.expect_list_tutorials()
            .times(1)
            .returning(|id, _| Err(FetchError::NotFound(id.to_string())));

        let gateway = RetryingGateway::new(mock, fast_policy(5));
        let result = gateway.list_tutorials("t9", &ListFilter::default()).await;

        assert_eq!(result, Err(FetchError::NotFound("t9".into())));
    }

    #[tokio::test]
    async fn test_gives_up_after_attempts() {
        let mut mock = MockCatalogGateway::new();
        mock.expect_list_domains()
            .times(3)
            .returning(|_| Err(FetchError::Unavailable("down".into())));

        let gateway = RetryingGateway::new(mock, fast_policy(3));
        let result = gateway.list_domains(&ListFilter::default()).await;

        assert!(matches!(result, Err(FetchError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_single_attempt_policy() {
        let mut mock = MockCatalogGateway::new();
        mock.expect_list_lessons()
            .times(1)
            .returning(|_, _| Err(FetchError::Timeout));

        let gateway = RetryingGateway::new(mock, fast_policy(1));

        assert_eq!(
            gateway.list_lessons("u1", &ListFilter::default()).await,
            Err(FetchError::Timeout)
        );
    }

    #[tokio::test]
    async fn test_slow_source_times_out() {
        let fixture = CatalogFixture {
            domains: vec![Domain::new("d1", "Web Development")],
            ..CatalogFixture::default()
        };
        let slow = InMemoryGateway::new(fixture).with_latency(Duration::from_millis(500));
        let policy = RetryPolicy {
            timeout: Some(Duration::from_millis(10)),
            ..fast_policy(1)
        };

        let gateway = RetryingGateway::new(slow, policy);

        assert_eq!(
            gateway.list_domains(&ListFilter::default()).await,
            Err(FetchError::Timeout)
        );
    }

    #[test]
    fn test_strategy_length_and_growth() {
        let policy = RetryPolicy {
            attempts: 4,
            base_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(10),
            timeout: None,
        };

        let delays: Vec<Duration> = policy.strategy().collect();

        assert_eq!(delays.len(), 3);
        assert!(delays.iter().all(|d| *d <= Duration::from_millis(400)));
    }
}
