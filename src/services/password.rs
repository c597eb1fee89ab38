use crate::{
    Error, User, UserId,
    repositories::{PasswordRepository, UserRepository},
    user::NewUser,
    validation::{validate_email, validate_password},
};
use std::sync::Arc;

/// Service for signup and credential management
pub struct PasswordService<U: UserRepository, P: PasswordRepository> {
    user_repository: Arc<U>,
    password_repository: Arc<P>,
}

impl<U: UserRepository, P: PasswordRepository> PasswordService<U, P> {
    /// Create a new PasswordService with the given repositories
    pub fn new(user_repository: Arc<U>, password_repository: Arc<P>) -> Self {
        Self {
            user_repository,
            password_repository,
        }
    }

    /// Register a new user with a password
    ///
    /// Validates the email and password format, hashes the password, and
    /// creates the user. A duplicate email surfaces as
    /// [`AuthError::UserAlreadyExists`](crate::error::AuthError::UserAlreadyExists)
    /// so the boundary layer can report "already in use", distinct from other
    /// failures. Uniqueness is enforced by the repository, not by a
    /// check-then-create in this service.
    pub async fn register_user(
        &self,
        email: &str,
        password: &str,
        name: Option<String>,
    ) -> Result<User, Error> {
        // Validate before any store mutation
        validate_email(email)?;
        validate_password(password)?;

        let password_hash = hash_password(password)?;

        let mut builder = NewUser::builder().email(email.to_string());
        if let Some(name) = name {
            builder = builder.name(name);
        }
        let new_user = builder.build()?;

        let user = self.user_repository.create(new_user).await?;

        self.password_repository
            .set_password_hash(&user.id, &password_hash)
            .await?;

        Ok(user)
    }

    /// Set a user's password without requiring the old one
    ///
    /// Used by explicit credential-change flows. The guard's automatic reset
    /// path does not go through here: generated reset passwords skip the
    /// strength policy.
    pub async fn set_password(&self, user_id: &UserId, password: &str) -> Result<(), Error> {
        validate_password(password)?;

        let password_hash = hash_password(password)?;
        self.password_repository
            .set_password_hash(user_id, &password_hash)
            .await
    }

    /// Remove a user's password
    pub async fn remove_password(&self, user_id: &UserId) -> Result<(), Error> {
        self.password_repository.remove_password_hash(user_id).await
    }
}

/// Hash a password using argon2
pub(crate) fn hash_password(password: &str) -> Result<String, Error> {
    use password_auth::generate_hash;
    Ok(generate_hash(password))
}

/// Verify a password against a hash
///
/// This is the single deliberately slow step in the login path; its cost
/// bounds brute-force throughput.
pub(crate) fn verify_password(password: &str, hash: &str) -> Result<bool, Error> {
    use password_auth::verify_password;
    Ok(verify_password(password, hash).is_ok())
}
