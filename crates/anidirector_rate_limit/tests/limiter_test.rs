//! Tests for the tier rate limiter.

use anidirector_rate_limit::{RateLimiter, TierConfig};

fn tier(rpm: Option<u32>, max_concurrent: Option<u32>) -> TierConfig {
    TierConfig {
        name: "Test".to_string(),
        rpm,
        rpd: None,
        max_concurrent,
    }
}

#[tokio::test]
async fn test_concurrency_slot_released_on_drop() {
    let limiter = RateLimiter::new(tier(None, Some(1)));

    let guard = limiter.acquire().await.unwrap();
    assert!(limiter.try_acquire().is_none());

    drop(guard);
    assert!(limiter.try_acquire().is_some());
}

#[tokio::test]
async fn test_rpm_quota_exhausts() {
    let limiter = RateLimiter::new(tier(Some(2), None));

    let first = limiter.try_acquire();
    let second = limiter.try_acquire();
    assert!(first.is_some());
    assert!(second.is_some());
    assert!(limiter.try_acquire().is_none());
}

#[tokio::test]
async fn test_unlimited_tier_never_blocks() {
    let limiter = RateLimiter::new(tier(None, None));
    let guards: Vec<_> = (0..50).filter_map(|_| limiter.try_acquire()).collect();
    assert_eq!(guards.len(), 50);
}
