//! Service layer for business logic
//!
//! This module contains the concrete service implementations: signup and
//! credential management in [`password`], and the login attempt guard in
//! [`guard`].

pub mod guard;
pub mod password;

pub use guard::{GuardConfig, LoginAttemptGuard, LoginOutcome};
pub use password::PasswordService;
