use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::UserId;
use crate::error::ValidationError;
use crate::validation::{require_email, require_non_empty};

/// Account roles; each sees a different slice of the workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Submits devices and follows their orders
    Client,
    /// Staff running QC, technician, inventory and clearance stages
    Enterprise,
    /// Oversees users, technicians and the review trail
    Admin,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Client, Role::Enterprise, Role::Admin];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Client => "client",
            Role::Enterprise => "enterprise",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(
        id: impl Into<UserId>,
        email: impl Into<String>,
        name: impl Into<String>,
        role: Role,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            name: name.into(),
            role,
            avatar: None,
            created_at,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_empty("user.id", self.id.as_str())?;
        require_non_empty("user.name", &self.name)?;
        require_email("user.email", &self.email)
    }

    /// Shallow merge of a profile edit
    pub fn apply_patch(&mut self, patch: &UserPatch) {
        if let Some(email) = &patch.email {
            self.email = email.clone();
        }
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(avatar) = &patch.avatar {
            self.avatar = Some(avatar.clone());
        }
        if let Some(role) = patch.role {
            self.role = role;
        }
    }
}

/// Partial profile update; `None` leaves the field as is
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
    pub email: Option<String>,
    pub name: Option<String>,
    pub avatar: Option<String>,
    pub role: Option<Role>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> User {
        User::new("u-1", "kim@refurb.example", "Kim", Role::Client, Utc::now())
    }

    #[test]
    fn test_patch_only_touches_given_fields() {
        let mut user = sample();
        user.apply_patch(&UserPatch {
            name: Some("Kim Lee".to_string()),
            ..Default::default()
        });
        assert_eq!(user.name, "Kim Lee");
        assert_eq!(user.email, "kim@refurb.example");
        assert_eq!(user.role, Role::Client);
    }

    #[test]
    fn test_validate_rejects_bad_email() {
        let mut user = sample();
        assert!(user.validate().is_ok());
        user.email = "not-an-email".to_string();
        assert_eq!(user.validate().unwrap_err().field, "user.email");
    }

    #[test]
    fn test_role_wire_format() {
        assert_eq!(serde_json::to_string(&Role::Enterprise).unwrap(), "\"enterprise\"");
        let role: Role = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(role, Role::Admin);
    }
}
