//! Repository trait for failed-attempt counters.
//!
//! Counters are ephemeral expiring integers keyed by the attempted email.
//! An absent entry is equivalent to a count of zero, and expired entries
//! read as absent, so the store may discard them autonomously.

use async_trait::async_trait;
use chrono::Duration;

use crate::Error;

/// Repository for per-identity failed login attempt counters.
///
/// # Concurrency
///
/// [`increment`](AttemptCounterRepository::increment) must be atomic at the
/// store: a single-round-trip increment primitive, never caller-side
/// read-modify-write. Concurrent failures for the same key must each be
/// counted; a lost update would delay lockout.
///
/// # Expiry
///
/// The expiry window is set once, when the counter is created (or recreated
/// after expiring). Incrementing a live counter does not refresh its window.
#[async_trait]
pub trait AttemptCounterRepository: Send + Sync + 'static {
    /// Atomically increment the counter for `key`, creating it at 1 with the
    /// given expiry window if absent or expired.
    ///
    /// Returns the post-increment count.
    async fn increment(&self, key: &str, window: Duration) -> Result<u32, Error>;

    /// Get the current count for `key`. Expired entries read as absent.
    async fn get(&self, key: &str) -> Result<Option<u32>, Error>;

    /// Delete the counter for `key`. Idempotent: clearing an absent counter
    /// succeeds.
    async fn clear(&self, key: &str) -> Result<(), Error>;
}
