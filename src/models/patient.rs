use serde::{Deserialize, Serialize};

use super::enums::UserRole;
use super::user::User;

/// Patient record. `medical_history` is an insertion-ordered list of
/// free-text entries; duplicates are allowed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    /// Date of birth as stored, YYYY-MM-DD. Empty for self-registered
    /// patients until they fill in their profile.
    pub dob: String,
    pub blood_group: String,
    pub address: String,
    pub medical_history: Vec<String>,
}

impl Patient {
    /// Common projection for session/login use.
    pub fn user(&self) -> User {
        User {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role,
            avatar_url: self.avatar_url.clone(),
        }
    }
}
