use crate::{Error, User, UserId, user::NewUser};
use async_trait::async_trait;

/// Repository for user data access
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Create a new user.
    ///
    /// The email is unique across all users. Returns
    /// [`AuthError::UserAlreadyExists`](crate::error::AuthError::UserAlreadyExists)
    /// if a user with the same email already exists; implementations must
    /// enforce this atomically rather than by a separate lookup.
    async fn create(&self, user: NewUser) -> Result<User, Error>;

    /// Find a user by ID
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, Error>;

    /// Find a user by email. Lookup is case-sensitive.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, Error>;
}
