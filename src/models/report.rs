use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub id: i64,
    pub intern_id: i64,
    pub title: String,
    pub status: String,
    #[serde(default)]
    pub submitted_at: Option<String>,
}
