use serde::{Deserialize, Serialize};

/// One entry of the dashboard's recent-activity feed. The server already
/// scopes the feed to the recent window, so the stat is just the item count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityItem {
    pub id: i64,
    pub actor: String,
    pub action: String,
    pub created_at: i64,
}
