//! Configuration loading and provider rate limiting.
//!
//! [`AniDirectorConfig`] layers bundled defaults, the user's config file, a
//! local override and `ANIDIRECTOR_*` environment variables. Provider tiers
//! from that configuration drive a [`RateLimiter`] that every outbound
//! generation request passes through.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod limiter;
mod tier;

pub use config::{AniDirectorConfig, ProviderConfig, StorageSettings, TierConfig};
pub use limiter::{RateLimiter, RateLimiterGuard};
pub use tier::Tier;
