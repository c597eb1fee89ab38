use crate::{Error, UserId};
use async_trait::async_trait;

/// Repository for password-related data access
///
/// Only hashed credentials cross this boundary; plaintext never reaches a
/// repository.
#[async_trait]
pub trait PasswordRepository: Send + Sync + 'static {
    /// Store a password hash for a user, replacing any existing hash
    async fn set_password_hash(&self, user_id: &UserId, hash: &str) -> Result<(), Error>;

    /// Retrieve a user's password hash
    async fn get_password_hash(&self, user_id: &UserId) -> Result<Option<String>, Error>;

    /// Remove a user's password hash
    async fn remove_password_hash(&self, user_id: &UserId) -> Result<(), Error>;
}
