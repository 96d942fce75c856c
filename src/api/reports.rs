use async_trait::async_trait;

use crate::api::{ApiClient, Paged};
use crate::error::SourceError;
use crate::models::{Report, SourceKind, SourcePayload};
use crate::services::aggregation::DataSource;

/// Weekly reports list. The endpoint is paged; one page is enough because the
/// stat only needs the server-side total.
#[derive(Debug, Clone)]
pub struct ReportsClient {
    api: ApiClient,
}

impl ReportsClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl DataSource for ReportsClient {
    fn kind(&self) -> SourceKind {
        SourceKind::Reports
    }

    async fn fetch(&self) -> Result<SourcePayload, SourceError> {
        let page: Paged<Report> = self.api.get_json("/api/v1/reports?page=1&per_page=50").await?;
        let total = page
            .meta
            .as_ref()
            .map(|meta| meta.total)
            .unwrap_or(page.data.len() as u64);
        Ok(SourcePayload::Reports {
            items: page.data,
            total,
        })
    }
}
