use serde::{Deserialize, Serialize};

use super::enums::UserRole;
use super::user::User;

/// Doctor record. `available_slots` are display labels ("09:00") with no
/// calendar semantics; a booking pairs one with a concrete date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Doctor {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    pub specialization: String,
    pub experience_years: u32,
    /// Consultation fee charged at booking time. Non-negative.
    pub fee: f64,
    pub available_slots: Vec<String>,
    pub bio: String,
    pub rating: f64,
    pub patients_count: u32,
}

impl Doctor {
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

/// Input for admin doctor creation. Id, role, rating, patient count, and
/// avatar are synthesized by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDoctor {
    pub name: String,
    pub email: String,
    pub specialization: String,
    pub experience_years: u32,
    pub fee: f64,
    pub available_slots: Vec<String>,
    pub bio: String,
}
