use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;

use internboard::api::activity::ActivityClient;
use internboard::api::reports::ReportsClient;
use internboard::api::users::UsersClient;
use internboard::api::ApiClient;
use internboard::models::{AggregationStatus, StatsSnapshot};
use internboard::services::aggregation::{AggregationEngine, DataSource};
use internboard::services::refresh::StatRefresher;
use internboard::utils;
use internboard::utils::format::{format_count, format_relative};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    utils::config::load_dotenv();
    env_logger::init();

    let settings_path = std::env::var("INTERNBOARD_SETTINGS")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("settings.json"));
    let settings = utils::config::load_settings(&settings_path);
    anyhow::ensure!(
        !settings.api.base_url.trim().is_empty(),
        "no API base url configured (settings.json or INTERNBOARD_API_URL)"
    );

    log::info!(
        "starting stats refresh against {} (period {}s)",
        settings.api.base_url,
        settings.refresh.period_secs
    );

    let token = Some(settings.api.token.clone()).filter(|t| !t.trim().is_empty());
    let api = ApiClient::new(&settings.api.base_url, token);
    let sources: Vec<Arc<dyn DataSource>> = vec![
        Arc::new(UsersClient::new(api.clone())),
        Arc::new(ReportsClient::new(api.clone())),
        Arc::new(ActivityClient::new(api)),
    ];

    let engine = AggregationEngine::new(
        sources,
        Duration::from_secs(settings.refresh.source_timeout_secs),
    );
    let refresher = StatRefresher::new(engine, Duration::from_secs(settings.refresh.period_secs));
    refresher.set_observer(Arc::new(render_snapshot));
    refresher.start();

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for shutdown signal")?;
    refresher.stop();
    log::info!("stats refresh stopped");

    Ok(())
}

fn render_snapshot(snapshot: StatsSnapshot) {
    let Some(status) = snapshot.status else {
        // First cycle still in flight, nothing fetched yet.
        if snapshot.is_in_flight {
            log::info!("loading dashboard stats...");
        }
        return;
    };
    if snapshot.is_in_flight {
        return;
    }

    match status {
        AggregationStatus::TotalFailure => {
            let reasons = snapshot
                .failures
                .iter()
                .map(|f| format!("{}: {}", f.source, f.message))
                .collect::<Vec<_>>()
                .join("; ");
            log::error!("dashboard stats unavailable ({})", reasons);
        }
        AggregationStatus::PartialFailure | AggregationStatus::Success => {
            if status == AggregationStatus::PartialFailure {
                for failure in &snapshot.failures {
                    log::warn!("source {} failed: {}", failure.source, failure.message);
                }
            }
            let updated = snapshot
                .last_updated_at
                .map(|at| format_relative(at, chrono::Utc::now()))
                .unwrap_or_else(|| "never".to_string());
            log::info!(
                "interns: {} ({} active), reports: {}, recent activity: {} [updated {}]",
                format_count(snapshot.summary.total_interns),
                format_count(snapshot.summary.active_interns),
                format_count(snapshot.summary.total_reports),
                format_count(snapshot.summary.recent_activity),
                updated
            );
        }
    }
}
