use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Avatar assigned to accounts that have not uploaded one.
pub const PLACEHOLDER_AVATAR_URL: &str = "https://placehold.co/100x100.png";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    User,
    Admin,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "USER"),
            Role::Admin => write!(f, "ADMIN"),
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "USER" => Ok(Role::User),
            "ADMIN" => Ok(Role::Admin),
            _ => Err(format!("Invalid role '{}'. Valid options: USER, ADMIN", s)),
        }
    }
}

/// An account in the users collection.
///
/// The password is stored and compared as plaintext. This reproduces the
/// behavior of the app this layer backs; it is not a recommendation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub avatar_url: String,
    pub password: String,
    pub created_at: Option<DateTime<Utc>>,
    /// Engagement counter, incremented when someone comments on one of the
    /// user's community links.
    pub points: Option<u32>,
}

impl User {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        role: Role,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            email: email.into(),
            role,
            avatar_url: PLACEHOLDER_AVATAR_URL.to_string(),
            password: password.into(),
            created_at: None,
            points: Some(0),
        }
    }

    pub fn with_avatar_url(mut self, avatar_url: impl Into<String>) -> Self {
        self.avatar_url = avatar_url.into();
        self
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}
