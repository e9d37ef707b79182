//! Port for cached-listing invalidation.

/// Seam for telling the presentation cache that a path's data changed.
///
/// Invalidation is advisory and infallible: a mutation that committed must
/// report success even if the cache signal is lost, so implementations
/// absorb their own failures.
pub trait ListingCache: Send + Sync {
    /// Mark the listing rooted at `path` as stale.
    fn invalidate(&self, path: &str);
}
