//! Login attempt guard with threshold-triggered credential reset.
//!
//! The guard decides, for each `(email, password)` login request, whether to
//! authenticate, deny with a remaining-attempt count, or rotate the account's
//! credential. Failed attempts are counted per identity in an expiring
//! counter; reaching the threshold within the window replaces the password
//! with a freshly generated one and clears the counter.
//!
//! The guard is stateless: all durable state lives in the injected
//! repositories, so instances can be created per request or shared across
//! tasks and replicated across processes.
//!
//! # Concurrency
//!
//! Lost updates under concurrent failures are prevented solely by the atomic
//! [`increment`](crate::repositories::AttemptCounterRepository::increment).
//! The threshold check and the reset that follows are not additionally
//! synchronized: two racers may both observe a count at or past the
//! threshold and both reset. That is tolerated — the password repository
//! update races harmlessly (last writer wins) and counter deletion is
//! idempotent, so the account ends up re-secreted and unlocked either way.
//!
//! # Example
//!
//! ```rust,ignore
//! use lockgate::{GuardConfig, LoginAttemptGuard, LoginOutcome};
//!
//! let guard = LoginAttemptGuard::new(users, passwords, attempts, GuardConfig::default());
//!
//! match guard.attempt_login("a@b.com", "hunter02").await? {
//!     LoginOutcome::Success { user } => { /* issue a session */ }
//!     LoginOutcome::PasswordReset { new_password } => { /* deliver out of band */ }
//!     // Denied and UnknownIdentifier get the same generic message
//!     _ => { /* "invalid email or password" */ }
//! }
//! ```

use std::sync::Arc;

use chrono::Duration;

use crate::{
    Error, User,
    repositories::{AttemptCounterRepository, PasswordRepository, UserRepository},
    secret::generate_reset_password,
    services::password::{hash_password, verify_password},
};

/// Configuration for attempt counting and automatic credential reset.
#[derive(Debug, Clone)]
pub struct GuardConfig {
    /// Consecutive failures within the window that trigger a reset.
    pub max_failed_attempts: u32,

    /// Expiry window of the failed-attempt counter. Set once when the
    /// counter is created; not refreshed by later failures.
    pub attempt_window: Duration,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            max_failed_attempts: 3,
            attempt_window: Duration::seconds(3600),
        }
    }
}

/// Outcome of a single login attempt.
///
/// `UnknownIdentifier` exists so callers can log the distinction, but it MUST
/// be surfaced to untrusted callers with the same generic message as
/// `Denied` — production-facing responses never reveal whether an account
/// exists.
#[derive(Clone)]
pub enum LoginOutcome {
    /// The password verified; the failed-attempt counter has been cleared.
    Success { user: User },

    /// The password did not verify. The attempt was counted.
    Denied { attempts_remaining: u32 },

    /// The failure threshold was reached: the account's password has been
    /// replaced with `new_password` and the counter cleared.
    ///
    /// The plaintext is returned exactly once, for out-of-band delivery to
    /// the account owner. It is never stored, logged, or embedded in a
    /// rendered response by this crate.
    PasswordReset { new_password: String },

    /// No account matches the identifier. Not counted.
    UnknownIdentifier,
}

impl LoginOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, LoginOutcome::Success { .. })
    }
}

// Hand-written so the replacement plaintext can never leak through debug
// logging of an outcome.
impl std::fmt::Debug for LoginOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoginOutcome::Success { user } => {
                f.debug_struct("Success").field("user", user).finish()
            }
            LoginOutcome::Denied { attempts_remaining } => f
                .debug_struct("Denied")
                .field("attempts_remaining", attempts_remaining)
                .finish(),
            LoginOutcome::PasswordReset { .. } => f
                .debug_struct("PasswordReset")
                .field("new_password", &"<redacted>")
                .finish(),
            LoginOutcome::UnknownIdentifier => f.write_str("UnknownIdentifier"),
        }
    }
}

/// The login attempt guard.
///
/// Composes the identity stores (user + password repositories) with the
/// attempt counter store. See the [module documentation](self) for the
/// decision flow.
pub struct LoginAttemptGuard<U, P, A>
where
    U: UserRepository,
    P: PasswordRepository,
    A: AttemptCounterRepository,
{
    user_repository: Arc<U>,
    password_repository: Arc<P>,
    attempt_repository: Arc<A>,
    config: GuardConfig,
}

impl<U, P, A> LoginAttemptGuard<U, P, A>
where
    U: UserRepository,
    P: PasswordRepository,
    A: AttemptCounterRepository,
{
    /// Create a new guard over the given repositories.
    pub fn new(
        user_repository: Arc<U>,
        password_repository: Arc<P>,
        attempt_repository: Arc<A>,
        config: GuardConfig,
    ) -> Self {
        Self {
            user_repository,
            password_repository,
            attempt_repository,
            config,
        }
    }

    /// Get the current configuration.
    pub fn config(&self) -> &GuardConfig {
        &self.config
    }

    /// Decide the outcome of one login attempt.
    ///
    /// Store errors at any step abort the attempt with [`Error::Storage`]
    /// and leave no partial mutation behind; in particular an unreachable
    /// counter store denies the attempt rather than skipping the count.
    pub async fn attempt_login(&self, email: &str, password: &str) -> Result<LoginOutcome, Error> {
        let user = match self.user_repository.find_by_email(email).await? {
            Some(user) => user,
            None => {
                tracing::debug!(email, "login attempt for unknown identifier");
                return Ok(LoginOutcome::UnknownIdentifier);
            }
        };

        let Some(hash) = self.password_repository.get_password_hash(&user.id).await? else {
            // No password credential on record. Counting these failures
            // would let an attacker mint a password for the account via the
            // reset path, so they are treated like an unknown identifier.
            tracing::debug!(user_id = %user.id, "login attempt for user without password credential");
            return Ok(LoginOutcome::UnknownIdentifier);
        };

        if verify_password(password, &hash)? {
            // Idempotent if no counter exists. A failed clear is a storage
            // error, not a swallowed warning.
            self.attempt_repository.clear(email).await?;
            return Ok(LoginOutcome::Success { user });
        }

        let count = self
            .attempt_repository
            .increment(email, self.config.attempt_window)
            .await?;

        if count < self.config.max_failed_attempts {
            return Ok(LoginOutcome::Denied {
                attempts_remaining: self.config.max_failed_attempts - count,
            });
        }

        // Threshold reached: rotate the credential and start over.
        let new_password = generate_reset_password()?;
        let new_hash = hash_password(&new_password)?;
        self.password_repository
            .set_password_hash(&user.id, &new_hash)
            .await?;
        self.attempt_repository.clear(email).await?;

        tracing::info!(
            user_id = %user.id,
            failed_attempts = count,
            "password reset after repeated failed login attempts"
        );

        Ok(LoginOutcome::PasswordReset { new_password })
    }
}
