//! User identity records
//!
//! Users are keyed by a unique, case-sensitive email address and identified
//! internally by an opaque [`UserId`]. The password verification hash is
//! deliberately not part of [`User`]: it lives behind
//! [`PasswordRepository`](crate::repositories::PasswordRepository) and is
//! never serialized or logged alongside user data.

use crate::{
    error::ValidationError,
    id::{generate_prefixed_id, validate_prefixed_id},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A unique, stable identifier for a specific user
///
/// This value should be treated as opaque, and should not be used as a UUID
/// even if it may look like one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: &str) -> Self {
        UserId(id.to_string())
    }

    pub fn new_random() -> Self {
        UserId(generate_prefixed_id("usr"))
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Validate that this ID has the correct format for a user ID
    pub fn is_valid(&self) -> bool {
        validate_prefixed_id(&self.0, "usr")
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new_random()
    }
}

impl From<String> for UserId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A registered identity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// The unique identifier for the user.
    pub id: UserId,

    /// The email of the user. Unique across all users, case-sensitive as stored.
    pub email: String,

    /// The display name of the user, if provided at signup.
    pub name: Option<String>,

    /// The created at timestamp.
    pub created_at: DateTime<Utc>,

    /// The updated at timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Data required to create a new user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    pub id: UserId,
    pub email: String,
    pub name: Option<String>,
}

impl NewUser {
    pub fn builder() -> NewUserBuilder {
        NewUserBuilder::default()
    }

    pub fn new(email: String) -> Self {
        Self {
            id: UserId::new_random(),
            email,
            name: None,
        }
    }
}

#[derive(Default)]
pub struct NewUserBuilder {
    id: Option<UserId>,
    email: Option<String>,
    name: Option<String>,
}

impl NewUserBuilder {
    pub fn id(mut self, id: UserId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn email(mut self, email: String) -> Self {
        self.email = Some(email);
        self
    }

    pub fn name(mut self, name: String) -> Self {
        self.name = Some(name);
        self
    }

    pub fn build(self) -> Result<NewUser, ValidationError> {
        Ok(NewUser {
            id: self.id.unwrap_or_default(),
            email: self
                .email
                .ok_or(ValidationError::MissingField("Email is required".to_string()))?,
            name: self.name,
        })
    }
}
