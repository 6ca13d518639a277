//! Bounded retry for generation calls.

use anidirector_core::GenerationSettings;
use anidirector_error::{GenerationError, GenerationResult};
use std::future::Future;
use tokio_retry2::strategy::FixedInterval;
use tokio_retry2::{Retry, RetryError};

/// Run a generation call, retrying transient failures.
///
/// Transient failures (rate limit, outage, timeout) are retried up to
/// `max_transient_retries` times after `transient_retry_delay`. Permanent
/// failures return immediately.
pub async fn with_transient_retry<T, F, Fut>(
    settings: &GenerationSettings,
    operation_name: &str,
    mut operation: F,
) -> GenerationResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = GenerationResult<T>>,
{
    let strategy = FixedInterval::from_millis(*settings.transient_retry_delay_ms())
        .take(*settings.max_transient_retries());

    Retry::spawn(strategy, || {
        let attempt = operation();
        async move {
            match attempt.await {
                Ok(value) => Ok(value),
                Err(e) if e.is_transient() => {
                    tracing::warn!(operation = operation_name, error = %e, "Transient error, will retry");
                    Err(RetryError::Transient {
                        err: e,
                        retry_after: None,
                    })
                }
                Err(e) => {
                    tracing::warn!(operation = operation_name, error = %e, "Permanent error, failing immediately");
                    Err(RetryError::<GenerationError>::Permanent(e))
                }
            }
        }
    })
    .await
}
