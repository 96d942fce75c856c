use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::future::join_all;

use crate::error::SourceError;
use crate::models::{AggregationStatus, SourceFailure, SourceKind, SourcePayload, StatSummary};

/// Port implemented by every upstream domain client. A source must fail with
/// an error, never resolve to a sentinel value, so the engine can tell a
/// broken source from an empty one.
#[async_trait]
pub trait DataSource: Send + Sync {
    fn kind(&self) -> SourceKind;
    async fn fetch(&self) -> Result<SourcePayload, SourceError>;
}

/// How one source settled in a cycle. Failures stay visible here instead of
/// being coerced to empty collections.
#[derive(Debug)]
pub struct FetchOutcome {
    pub kind: SourceKind,
    pub result: Result<SourcePayload, SourceError>,
}

#[derive(Debug)]
pub struct AggregationResult {
    pub outcomes: Vec<FetchOutcome>,
    pub summary: StatSummary,
    pub status: AggregationStatus,
}

impl AggregationResult {
    pub fn failures(&self) -> Vec<SourceFailure> {
        self.outcomes
            .iter()
            .filter_map(|outcome| {
                outcome.result.as_ref().err().map(|err| SourceFailure {
                    source: outcome.kind,
                    message: err.to_string(),
                })
            })
            .collect()
    }
}

pub struct AggregationEngine {
    sources: Vec<Arc<dyn DataSource>>,
    source_timeout: Duration,
}

impl AggregationEngine {
    pub fn new(sources: Vec<Arc<dyn DataSource>>, source_timeout: Duration) -> Self {
        Self {
            sources,
            source_timeout,
        }
    }

    /// One full fan-out/reduce cycle. All sources are fetched concurrently
    /// and the engine waits for every one to settle; a failing source never
    /// blanks out data from the healthy ones. A source that exceeds the
    /// per-source timeout settles as `Err(Timeout)` so a hung upstream
    /// cannot stall the cycle indefinitely.
    pub async fn run(&self) -> AggregationResult {
        let fetches = self.sources.iter().map(|source| {
            let source = Arc::clone(source);
            let limit = self.source_timeout;
            async move {
                let result = match tokio::time::timeout(limit, source.fetch()).await {
                    Ok(result) => result,
                    Err(_) => Err(SourceError::Timeout(limit)),
                };
                FetchOutcome {
                    kind: source.kind(),
                    result,
                }
            }
        });

        let outcomes = join_all(fetches).await;
        let summary = reduce(&outcomes);
        let status = classify(&outcomes);

        AggregationResult {
            outcomes,
            summary,
            status,
        }
    }
}

/// Pure reduction over the Ok payloads, iterated in source order. The result
/// depends only on payload contents, never on completion timing.
fn reduce(outcomes: &[FetchOutcome]) -> StatSummary {
    let mut summary = StatSummary::default();
    for outcome in outcomes {
        let Ok(payload) = &outcome.result else {
            continue;
        };
        match payload {
            SourcePayload::Users(users) => {
                summary.total_interns = Some(users.len() as u64);
                summary.active_interns =
                    Some(users.iter().filter(|user| user.is_active()).count() as u64);
            }
            SourcePayload::Reports { items, total } => {
                summary.total_reports = Some((*total).max(items.len() as u64));
            }
            SourcePayload::Activity(items) => {
                summary.recent_activity = Some(items.len() as u64);
            }
        }
    }
    summary
}

fn classify(outcomes: &[FetchOutcome]) -> AggregationStatus {
    let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
    if failed == 0 {
        AggregationStatus::Success
    } else if failed == outcomes.len() {
        AggregationStatus::TotalFailure
    } else {
        AggregationStatus::PartialFailure
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;

    use super::{AggregationEngine, DataSource};
    use crate::error::SourceError;
    use crate::models::{ActivityItem, AggregationStatus, Report, SourceKind, SourcePayload, User};

    struct StubSource {
        kind: SourceKind,
        delay: Duration,
        fail: bool,
    }

    impl StubSource {
        fn ok(kind: SourceKind) -> Arc<Self> {
            Arc::new(Self {
                kind,
                delay: Duration::ZERO,
                fail: false,
            })
        }

        fn failing(kind: SourceKind) -> Arc<Self> {
            Arc::new(Self {
                kind,
                delay: Duration::ZERO,
                fail: true,
            })
        }

        fn slow(kind: SourceKind, delay: Duration) -> Arc<Self> {
            Arc::new(Self {
                kind,
                delay,
                fail: false,
            })
        }
    }

    fn sample_payload(kind: SourceKind) -> SourcePayload {
        match kind {
            SourceKind::Users => SourcePayload::Users(vec![
                User {
                    id: 1,
                    name: "Asha".to_string(),
                    email: "asha@x.io".to_string(),
                    role: "intern".to_string(),
                    deleted_at: None,
                },
                User {
                    id: 2,
                    name: "Ben".to_string(),
                    email: "ben@x.io".to_string(),
                    role: "intern".to_string(),
                    deleted_at: Some("2024-01-01T00:00:00Z".to_string()),
                },
                User {
                    id: 3,
                    name: "Cleo".to_string(),
                    email: "cleo@x.io".to_string(),
                    role: "manager".to_string(),
                    deleted_at: None,
                },
            ]),
            SourceKind::Reports => SourcePayload::Reports {
                items: vec![Report {
                    id: 10,
                    intern_id: 1,
                    title: "Week 1".to_string(),
                    status: "submitted".to_string(),
                    submitted_at: None,
                }],
                total: 7,
            },
            SourceKind::Activity => SourcePayload::Activity(vec![
                ActivityItem {
                    id: 100,
                    actor: "asha".to_string(),
                    action: "submitted report".to_string(),
                    created_at: 1_700_000_000,
                },
                ActivityItem {
                    id: 101,
                    actor: "ben".to_string(),
                    action: "logged in".to_string(),
                    created_at: 1_700_000_100,
                },
            ]),
        }
    }

    #[async_trait]
    impl DataSource for StubSource {
        fn kind(&self) -> SourceKind {
            self.kind
        }

        async fn fetch(&self) -> Result<SourcePayload, SourceError> {
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            if self.fail {
                return Err(SourceError::Status {
                    status: 500,
                    body: "boom".to_string(),
                });
            }
            Ok(sample_payload(self.kind))
        }
    }

    fn engine(sources: Vec<Arc<StubSource>>) -> AggregationEngine {
        let sources = sources
            .into_iter()
            .map(|s| s as Arc<dyn DataSource>)
            .collect();
        AggregationEngine::new(sources, Duration::from_secs(10))
    }

    #[tokio::test(start_paused = true)]
    async fn summary_is_deterministic_regardless_of_completion_order() {
        let fast_users = engine(vec![
            StubSource::ok(SourceKind::Users),
            StubSource::slow(SourceKind::Reports, Duration::from_millis(300)),
            StubSource::slow(SourceKind::Activity, Duration::from_millis(600)),
        ]);
        let slow_users = engine(vec![
            StubSource::slow(SourceKind::Users, Duration::from_millis(600)),
            StubSource::slow(SourceKind::Reports, Duration::from_millis(300)),
            StubSource::ok(SourceKind::Activity),
        ]);

        let first = fast_users.run().await;
        let second = slow_users.run().await;

        assert_eq!(first.summary, second.summary);
        assert_eq!(first.summary.total_interns, Some(3));
        assert_eq!(first.summary.active_interns, Some(2));
        assert_eq!(first.summary.total_reports, Some(7));
        assert_eq!(first.summary.recent_activity, Some(2));
        assert_eq!(first.status, AggregationStatus::Success);
    }

    #[tokio::test]
    async fn failing_source_does_not_blank_out_healthy_ones() {
        let engine = engine(vec![
            StubSource::failing(SourceKind::Users),
            StubSource::ok(SourceKind::Reports),
            StubSource::ok(SourceKind::Activity),
        ]);

        let result = engine.run().await;

        assert_eq!(result.status, AggregationStatus::PartialFailure);
        assert_eq!(result.summary.total_interns, None);
        assert_eq!(result.summary.active_interns, None);
        assert_eq!(result.summary.total_reports, Some(7));
        assert_eq!(result.summary.recent_activity, Some(2));

        let failures = result.failures();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].source, SourceKind::Users);
    }

    #[tokio::test]
    async fn all_sources_failing_is_total_failure_with_empty_summary() {
        let engine = engine(vec![
            StubSource::failing(SourceKind::Users),
            StubSource::failing(SourceKind::Reports),
            StubSource::failing(SourceKind::Activity),
        ]);

        let result = engine.run().await;

        assert_eq!(result.status, AggregationStatus::TotalFailure);
        assert!(result.summary.is_empty());
        assert_eq!(result.failures().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn hung_source_settles_as_timeout() {
        let sources: Vec<Arc<dyn DataSource>> = vec![
            StubSource::slow(SourceKind::Users, Duration::from_secs(3600)),
            StubSource::ok(SourceKind::Activity),
        ];
        let engine = AggregationEngine::new(sources, Duration::from_millis(200));

        let result = engine.run().await;

        assert_eq!(result.status, AggregationStatus::PartialFailure);
        assert!(matches!(
            result.outcomes[0].result,
            Err(SourceError::Timeout(_))
        ));
        assert_eq!(result.summary.recent_activity, Some(2));
    }
}
