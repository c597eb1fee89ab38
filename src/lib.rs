//! # lockgate
//!
//! Account lockout and automatic credential reset guard for password
//! authentication.
//!
//! lockgate implements the decision at the heart of a login endpoint: given
//! an `(email, password)` pair, authenticate, deny with a remaining-attempt
//! count, or — after three consecutive failures inside a one-hour window —
//! replace the account's password with a freshly generated one and hand the
//! plaintext back exactly once for out-of-band delivery.
//!
//! The crate owns no storage. Identities live behind
//! [`UserRepository`](repositories::UserRepository) and
//! [`PasswordRepository`](repositories::PasswordRepository); the expiring
//! failed-attempt counters live behind
//! [`AttemptCounterRepository`](repositories::AttemptCounterRepository).
//! The guard itself is a stateless orchestration layer over those traits and
//! is safe to replicate horizontally. An in-memory backend over concurrent
//! maps ships in [`storage::memory`] for tests and single-process use.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use lockgate::{
//!     GuardConfig, LoginAttemptGuard, LoginOutcome, PasswordService,
//!     storage::memory::{
//!         MemoryAttemptCounterRepository, MemoryPasswordRepository, MemoryUserRepository,
//!     },
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), lockgate::Error> {
//!     let users = Arc::new(MemoryUserRepository::new());
//!     let passwords = Arc::new(MemoryPasswordRepository::new());
//!     let attempts = Arc::new(MemoryAttemptCounterRepository::new());
//!
//!     let signup = PasswordService::new(users.clone(), passwords.clone());
//!     signup.register_user("a@b.com", "hunter02pass", None).await?;
//!
//!     let guard = LoginAttemptGuard::new(users, passwords, attempts, GuardConfig::default());
//!     match guard.attempt_login("a@b.com", "hunter02pass").await? {
//!         LoginOutcome::Success { user } => println!("welcome back, {}", user.email),
//!         _ => println!("invalid email or password"),
//!     }
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod id;
pub mod repositories;
pub mod secret;
pub mod services;
pub mod storage;
pub mod user;
pub mod validation;

pub use error::Error;
pub use services::guard::{GuardConfig, LoginAttemptGuard, LoginOutcome};
pub use services::password::PasswordService;
pub use user::{NewUser, User, UserId};
