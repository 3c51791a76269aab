use serde::{Deserialize, Serialize};

use super::enums::UserRole;

/// Common projection shared by every account kind. This is what email
/// lookup returns and what the session context holds; role-specific
/// records are fetched by id when a portal needs them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}
