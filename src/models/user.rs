use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: String,
    #[serde(default)]
    pub deleted_at: Option<String>,
}

impl User {
    /// Canonical "active" definition used everywhere stats are derived:
    /// a user is active unless it carries a soft-delete timestamp.
    /// A missing or null `deleted_at` both count as active.
    pub fn is_active(&self) -> bool {
        self.deleted_at.is_none()
    }
}
