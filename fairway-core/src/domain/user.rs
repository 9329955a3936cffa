//! User profile domain model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::scoring::is_valid_handicap;

/// Tour role, controls what a member may administer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Captain,
    Player,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Captain => "captain",
            Role::Player => "player",
        }
    }
}

/// A tour member's profile row
///
/// Owned by the session manager once fetched. A missing row for an
/// authenticated identity is a valid state (signup not yet provisioned),
/// distinct from "no session".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    /// Handicap index, 0-54
    pub handicap: f64,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new profile with required fields
    pub fn new(
        id: Uuid,
        email: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        handicap: f64,
        role: Role,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            email: email.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            handicap,
            role,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Validate profile data
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.email.trim().is_empty() {
            return Err("email cannot be empty");
        }
        if self.first_name.trim().is_empty() && self.last_name.trim().is_empty() {
            return Err("name cannot be empty");
        }
        if !is_valid_handicap(self.handicap) {
            return Err("handicap must be between 0 and 54");
        }
        Ok(())
    }
}

/// Partial profile update, applied field by field
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handicap: Option<f64>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none() && self.last_name.is_none() && self.handicap.is_none()
    }

    /// Merge the patch into an existing profile
    pub fn apply(&self, user: &mut User) {
        if let Some(first_name) = &self.first_name {
            user.first_name = first_name.clone();
        }
        if let Some(last_name) = &self.last_name {
            user.last_name = last_name.clone();
        }
        if let Some(handicap) = self.handicap {
            user.handicap = handicap;
        }
        user.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_user() -> User {
        User::new(
            Uuid::new_v4(),
            "sam@example.com",
            "Sam",
            "Torrance",
            12.4,
            Role::Player,
        )
    }

    #[test]
    fn test_user_validation() {
        let mut user = test_user();
        assert!(user.validate().is_ok());

        user.email = "".to_string();
        assert!(user.validate().is_err());

        let mut user = test_user();
        user.handicap = 55.0;
        assert!(user.validate().is_err());
    }

    #[test]
    fn test_profile_update_apply() {
        let mut user = test_user();
        let patch = ProfileUpdate {
            first_name: None,
            last_name: Some("Snead".to_string()),
            handicap: Some(9.8),
        };
        patch.apply(&mut user);

        assert_eq!(user.first_name, "Sam");
        assert_eq!(user.last_name, "Snead");
        assert_eq!(user.handicap, 9.8);
    }

    #[test]
    fn test_role_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Captain).unwrap(), "\"captain\"");
        let role: Role = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(role, Role::Admin);
    }
}
