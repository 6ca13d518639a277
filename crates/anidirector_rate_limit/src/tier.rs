//! Tier trait for representing provider rate limit constraints.

/// Rate limit constraints of one provider usage tier.
///
/// `None` means the tier does not limit that dimension.
pub trait Tier: Send + Sync {
    /// Requests per minute.
    fn rpm(&self) -> Option<u32>;

    /// Requests per day.
    fn rpd(&self) -> Option<u32>;

    /// Requests allowed in flight at once.
    fn max_concurrent(&self) -> Option<u32>;

    /// Display name of the tier.
    fn name(&self) -> &str;
}
