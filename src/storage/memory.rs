//! In-memory repository implementations over concurrent maps.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use dashmap::{DashMap, mapref::entry::Entry};

use crate::{
    Error, User, UserId,
    error::AuthError,
    repositories::{AttemptCounterRepository, PasswordRepository, UserRepository},
    user::NewUser,
};

/// In-memory user store keyed by id, with a unique email index.
#[derive(Default)]
pub struct MemoryUserRepository {
    users: DashMap<UserId, User>,
    emails: DashMap<String, UserId>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn create(&self, new_user: NewUser) -> Result<User, Error> {
        // The entry guard holds the email slot for the duration of the
        // insert, so two concurrent creates for the same email cannot both
        // succeed.
        match self.emails.entry(new_user.email.clone()) {
            Entry::Occupied(_) => Err(AuthError::UserAlreadyExists.into()),
            Entry::Vacant(slot) => {
                let now = Utc::now();
                let user = User {
                    id: new_user.id.clone(),
                    email: new_user.email,
                    name: new_user.name,
                    created_at: now,
                    updated_at: now,
                };
                slot.insert(user.id.clone());
                self.users.insert(user.id.clone(), user.clone());
                Ok(user)
            }
        }
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, Error> {
        Ok(self.users.get(id).map(|user| user.value().clone()))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, Error> {
        let Some(id) = self.emails.get(email).map(|id| id.value().clone()) else {
            return Ok(None);
        };
        Ok(self.users.get(&id).map(|user| user.value().clone()))
    }
}

/// In-memory password hash store.
#[derive(Default)]
pub struct MemoryPasswordRepository {
    hashes: DashMap<UserId, String>,
}

impl MemoryPasswordRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PasswordRepository for MemoryPasswordRepository {
    async fn set_password_hash(&self, user_id: &UserId, hash: &str) -> Result<(), Error> {
        self.hashes.insert(user_id.clone(), hash.to_string());
        Ok(())
    }

    async fn get_password_hash(&self, user_id: &UserId) -> Result<Option<String>, Error> {
        Ok(self.hashes.get(user_id).map(|hash| hash.value().clone()))
    }

    async fn remove_password_hash(&self, user_id: &UserId) -> Result<(), Error> {
        self.hashes.remove(user_id);
        Ok(())
    }
}

#[derive(Debug, Clone)]
struct CounterEntry {
    count: u32,
    expires_at: DateTime<Utc>,
}

/// In-memory expiring counter store.
///
/// Increments are atomic: the map's entry API holds the shard lock while the
/// counter is read, expiry-checked, and bumped, so concurrent failures for
/// the same key are each counted. The expiry window is fixed when the entry
/// is created and is not refreshed by later increments.
#[derive(Default)]
pub struct MemoryAttemptCounterRepository {
    counters: DashMap<String, CounterEntry>,
}

impl MemoryAttemptCounterRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start the background task purging expired counters.
    ///
    /// Expired entries already read as absent; the sweeper only bounds
    /// memory growth for keys that are never touched again.
    pub fn start_cleanup_task(
        self: &Arc<Self>,
        mut shutdown: tokio::sync::watch::Receiver<bool>,
    ) -> tokio::task::JoinHandle<()> {
        let store = Arc::clone(self);

        const CLEANUP_INTERVAL: std::time::Duration = std::time::Duration::from_secs(60);

        tokio::spawn(async move {
            let mut interval_timer = tokio::time::interval(CLEANUP_INTERVAL);

            loop {
                tokio::select! {
                    _ = interval_timer.tick() => {
                        let now = Utc::now();
                        let before = store.counters.len();
                        store.counters.retain(|_, entry| entry.expires_at > now);
                        let removed = before.saturating_sub(store.counters.len());
                        if removed > 0 {
                            tracing::info!(count = removed, "purged expired attempt counters");
                        }
                    }
                    _ = shutdown.changed() => {
                        tracing::info!("shutting down attempt counter cleanup task");
                        break;
                    }
                }
            }
        })
    }
}

#[async_trait]
impl AttemptCounterRepository for MemoryAttemptCounterRepository {
    async fn increment(&self, key: &str, window: Duration) -> Result<u32, Error> {
        let now = Utc::now();
        let mut entry = self.counters.entry(key.to_string()).or_insert(CounterEntry {
            count: 0,
            expires_at: now + window,
        });
        if entry.expires_at <= now {
            // Lapsed window: restart the count with a fresh expiry
            *entry = CounterEntry {
                count: 0,
                expires_at: now + window,
            };
        }
        entry.count += 1;
        Ok(entry.count)
    }

    async fn get(&self, key: &str) -> Result<Option<u32>, Error> {
        Ok(self
            .counters
            .get(key)
            .filter(|entry| entry.expires_at > Utc::now())
            .map(|entry| entry.count))
    }

    async fn clear(&self, key: &str) -> Result<(), Error> {
        self.counters.remove(key);
        Ok(())
    }
}
