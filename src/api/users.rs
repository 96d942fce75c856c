use async_trait::async_trait;

use crate::api::ApiClient;
use crate::error::SourceError;
use crate::models::{SourceKind, SourcePayload, User};
use crate::services::aggregation::DataSource;

/// Directory of users. Contributes the total and active intern counts.
#[derive(Debug, Clone)]
pub struct UsersClient {
    api: ApiClient,
}

impl UsersClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl DataSource for UsersClient {
    fn kind(&self) -> SourceKind {
        SourceKind::Users
    }

    async fn fetch(&self) -> Result<SourcePayload, SourceError> {
        let users: Vec<User> = self.api.get_json("/api/v1/users").await?;
        Ok(SourcePayload::Users(users))
    }
}
