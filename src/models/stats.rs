use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{ActivityItem, Report, User};

/// The upstream domains contributing fields to the dashboard summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Users,
    Reports,
    Activity,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Users => "users",
            SourceKind::Reports => "reports",
            SourceKind::Activity => "activity",
        }
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed collection returned by one source fetch. Reports carry the server's
/// pagination total so the count survives fetching a single page.
#[derive(Debug, Clone)]
pub enum SourcePayload {
    Users(Vec<User>),
    Reports { items: Vec<Report>, total: u64 },
    Activity(Vec<ActivityItem>),
}

impl SourcePayload {
    pub fn kind(&self) -> SourceKind {
        match self {
            SourcePayload::Users(_) => SourceKind::Users,
            SourcePayload::Reports { .. } => SourceKind::Reports,
            SourcePayload::Activity(_) => SourceKind::Activity,
        }
    }
}

/// The derived dashboard stats. Each field is `None` when the source backing
/// it did not succeed in the producing cycle. Built once per cycle and
/// replaced wholesale, never patched in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatSummary {
    pub total_interns: Option<u64>,
    pub active_interns: Option<u64>,
    pub total_reports: Option<u64>,
    pub recent_activity: Option<u64>,
}

impl StatSummary {
    pub fn is_empty(&self) -> bool {
        self.total_interns.is_none()
            && self.active_interns.is_none()
            && self.total_reports.is_none()
            && self.recent_activity.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregationStatus {
    /// Every source settled Ok.
    Success,
    /// At least one source Ok and at least one failed.
    PartialFailure,
    /// Every source failed; the summary is empty by contract.
    TotalFailure,
}

#[derive(Debug, Clone, Serialize)]
pub struct SourceFailure {
    pub source: SourceKind,
    pub message: String,
}

/// What the presentation layer sees: the latest summary plus enough flags to
/// render loading skeletons, the error affordance, and a staleness indicator.
#[derive(Debug, Clone, Serialize)]
pub struct StatsSnapshot {
    pub summary: StatSummary,
    pub status: Option<AggregationStatus>,
    pub last_updated_at: Option<DateTime<Utc>>,
    pub is_in_flight: bool,
    pub failures: Vec<SourceFailure>,
}
