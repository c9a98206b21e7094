use serde::{Deserialize, Serialize};

/// Platform role, in increasing order of privilege.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Publisher,
    Moderator,
    Admin,
}

impl Role {
    /// Publishers and above may create listings directly.
    pub fn can_publish(&self) -> bool {
        matches!(self, Role::Publisher | Role::Moderator | Role::Admin)
    }

    pub fn can_moderate(&self) -> bool {
        matches!(self, Role::Moderator | Role::Admin)
    }
}

/// Account projection as the API reports it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub role: Role,
}

/// Networking card shown in the "people" rail of the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
    pub id: i64,
    pub name: String,
    pub university: String,
    pub location: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(rename = "lookingFor")]
    pub looking_for: String,
}
