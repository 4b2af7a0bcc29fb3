//! User domain model and workflow value types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered user as seen by the workflow layer.
///
/// The password credential is carried as an opaque hash; it is verifiable
/// through the store, never inspected directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub created_at: DateTime<Utc>,
}

/// A custom claim persisted for a user and embedded into issued tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredClaim {
    pub claim_type: String,
    pub claim_value: String,
}

/// Fields required to create a new user record.
#[derive(Debug, Clone)]
pub struct CreateUserDto {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

/// Outcome of a user-creation attempt.
///
/// Validation rejections (password policy, malformed fields) are data, not
/// errors; only store/infrastructure failures surface as `Err`.
#[derive(Debug, Clone)]
pub enum CreateUserOutcome {
    Created(User),
    Rejected(Vec<String>),
}

/// Ephemeral result of a registration or login attempt. Never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResult {
    pub message: String,
    pub is_authenticated: bool,
    pub username: String,
    pub email: String,
    pub roles: Vec<String>,
    pub token: Option<String>,
    pub expires_on: Option<DateTime<Utc>>,
}

impl AuthResult {
    /// An unauthenticated result carrying only a message.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            is_authenticated: false,
            username: String::new(),
            email: String::new(),
            roles: Vec::new(),
            token: None,
            expires_on: None,
        }
    }
}
