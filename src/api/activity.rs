use async_trait::async_trait;

use crate::api::ApiClient;
use crate::error::SourceError;
use crate::models::{ActivityItem, SourceKind, SourcePayload};
use crate::services::aggregation::DataSource;

/// Recent-activity feed for the dashboard.
#[derive(Debug, Clone)]
pub struct ActivityClient {
    api: ApiClient,
}

impl ActivityClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl DataSource for ActivityClient {
    fn kind(&self) -> SourceKind {
        SourceKind::Activity
    }

    async fn fetch(&self) -> Result<SourcePayload, SourceError> {
        let items: Vec<ActivityItem> = self.api.get_json("/api/v1/activity/recent").await?;
        Ok(SourcePayload::Activity(items))
    }
}
