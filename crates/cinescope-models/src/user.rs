use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Public profile of a registered user. This is what gets persisted as the
/// active session record; it never carries credentials.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub join_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// Full record in the registered-user directory, credentials included.
/// Only the session store reads or writes these.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: String,
    pub name: String,
    pub email: String,
    pub join_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub password_hash: String,
    pub salt: String,
}

impl UserRecord {
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            join_date: self.join_date,
            avatar: self.avatar.clone(),
        }
    }
}
