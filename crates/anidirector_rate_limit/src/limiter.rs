//! Rate limiter built on governor and a Tokio semaphore.
//!
//! - Governor (GCRA) enforces requests per minute and per day
//! - A semaphore bounds requests in flight

use crate::Tier;
use anidirector_error::{GenerationError, GenerationErrorKind, GenerationResult};
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter as GovernorRateLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

type DirectRateLimiter = GovernorRateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Gate for outbound requests of one provider tier.
///
/// Cloning shares the underlying quotas.
#[derive(Clone)]
pub struct RateLimiter<T: Tier> {
    inner: T,
    rpm_limiter: Option<Arc<DirectRateLimiter>>,
    rpd_limiter: Option<Arc<DirectRateLimiter>>,
    concurrent_semaphore: Arc<Semaphore>,
}

impl<T: Tier> RateLimiter<T> {
    /// Build a limiter enforcing `tier`.
    pub fn new(tier: T) -> Self {
        let rpm_limiter = tier.rpm().and_then(NonZeroU32::new).map(|n| {
            Arc::new(GovernorRateLimiter::direct(Quota::per_minute(n)))
        });

        // A day's worth of requests may be spent in one burst
        let rpd_limiter = tier.rpd().and_then(NonZeroU32::new).map(|n| {
            let per_day = Quota::with_period(std::time::Duration::from_secs(86_400) / n.get())
                .map(|quota| quota.allow_burst(n));
            Arc::new(GovernorRateLimiter::direct(
                per_day.unwrap_or_else(|| Quota::per_hour(n)),
            ))
        });

        let max_concurrent = tier.max_concurrent().unwrap_or(u32::MAX).max(1);
        let concurrent_semaphore = Arc::new(Semaphore::new(
            (max_concurrent as usize).min(Semaphore::MAX_PERMITS),
        ));

        Self {
            inner: tier,
            rpm_limiter,
            rpd_limiter,
            concurrent_semaphore,
        }
    }

    /// The tier being enforced.
    pub fn inner(&self) -> &T {
        &self.inner
    }

    /// Wait until a request may be sent.
    ///
    /// The concurrency slot is taken last so a request never holds a slot
    /// while waiting on a quota. The slot is released when the guard drops.
    ///
    /// # Errors
    ///
    /// Returns error if the limiter has been shut down.
    pub async fn acquire(&self) -> GenerationResult<RateLimiterGuard> {
        if let Some(limiter) = &self.rpm_limiter {
            limiter.until_ready().await;
        }
        if let Some(limiter) = &self.rpd_limiter {
            limiter.until_ready().await;
        }

        let permit = self
            .concurrent_semaphore
            .clone()
            .acquire_owned()
            .await
            .map_err(|e| {
                GenerationError::new(GenerationErrorKind::Unavailable(format!(
                    "rate limiter closed: {e}"
                )))
            })?;

        tracing::trace!(tier = self.inner.name(), "Rate limit slot acquired");
        Ok(RateLimiterGuard { _permit: permit })
    }

    /// Take a slot only if one is free right now.
    pub fn try_acquire(&self) -> Option<RateLimiterGuard> {
        if let Some(limiter) = &self.rpm_limiter {
            limiter.check().ok()?;
        }
        if let Some(limiter) = &self.rpd_limiter {
            limiter.check().ok()?;
        }
        let permit = self.concurrent_semaphore.clone().try_acquire_owned().ok()?;
        Some(RateLimiterGuard { _permit: permit })
    }
}

/// Holds a concurrency slot until dropped.
#[derive(Debug)]
pub struct RateLimiterGuard {
    _permit: OwnedSemaphorePermit,
}
