//! User-related entity definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered member of the recipe community.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier.
    pub id: Uuid,
    /// Unique handle chosen at registration.
    pub username: String,
    /// When this record was created.
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Creates a new user.
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: username.into(),
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_creation() {
        let user = User::new("maria");

        assert_eq!(user.username, "maria");
        assert!(!user.id.is_nil());
    }
}
