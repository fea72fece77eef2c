use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Role carried by staff accounts in their access tokens.
pub const ADMIN_ROLE: &str = "admin";

/// Role carried by every account.
pub const USER_ROLE: &str = "user";

const MAX_USERNAME_LEN: usize = 150;

/// User entity - the identity that authors posts and comments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub is_staff: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with generated ID and timestamps.
    pub fn new(username: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            username,
            password_hash,
            is_staff: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Mark the user as an administrator.
    pub fn into_staff(mut self) -> Self {
        self.is_staff = true;
        self
    }

    /// Roles granted to this user's tokens.
    pub fn roles(&self) -> Vec<String> {
        let mut roles = vec![USER_ROLE.to_string()];
        if self.is_staff {
            roles.push(ADMIN_ROLE.to_string());
        }
        roles
    }

    pub fn as_author(&self) -> Author {
        Author {
            id: self.id,
            username: self.username.clone(),
        }
    }

    /// Usernames are 1-150 characters of letters, digits and `@.+-_`.
    pub fn validate_username(username: &str) -> Result<(), DomainError> {
        if username.is_empty() {
            return Err(DomainError::validation("username", "This field may not be blank."));
        }
        if username.chars().count() > MAX_USERNAME_LEN {
            return Err(DomainError::validation(
                "username",
                format!("Ensure this field has no more than {MAX_USERNAME_LEN} characters."),
            ));
        }
        if !username
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
        {
            return Err(DomainError::validation(
                "username",
                "Enter a valid username. It may contain only letters, numbers, and @/./+/-/_ characters.",
            ));
        }
        Ok(())
    }
}

/// The public face of a user as attached to posts and comments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: Uuid,
    pub username: String,
}
