//! In-process listing cache invalidation.
//!
//! The rendering tier caches listing responses per path. This adapter tracks
//! a revision counter per path; bumping the counter is how a write marks the
//! cached copy stale.

use std::collections::HashMap;
use std::sync::Mutex;

use tracing::debug;

use crate::domain::ports::ListingCache;

/// Revision-counting cache shared across workers.
#[derive(Debug, Default)]
pub struct InMemoryListingCache {
    revisions: Mutex<HashMap<String, u64>>,
}

impl InMemoryListingCache {
    /// Current revision for a path. Paths never invalidated report zero.
    pub fn revision(&self, path: &str) -> u64 {
        let revisions = self
            .revisions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        revisions.get(path).copied().unwrap_or(0)
    }
}

impl ListingCache for InMemoryListingCache {
    fn invalidate(&self, path: &str) {
        let mut revisions = self
            .revisions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let revision = revisions.entry(path.to_owned()).or_insert(0);
        *revision += 1;
        debug!(path, revision = *revision, "listing cache invalidated");
    }
}
