#![allow(clippy::missing_docs_in_private_items, clippy::result_large_err)]

pub mod graph_builder;
pub mod pipeline;
pub mod utils;

pub use pipeline::{
    IngestionConfig, IngestionPipeline, RefreshOutcome, RefreshReport, RepoDescriptor,
    RepoOutcome, RepositoryDirectory, SkipReason,
};
pub use utils::github_client::GithubDirectory;

use std::sync::Arc;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{error, info};

/// Refreshes the graph every `period` for as long as the process runs.
pub async fn run_refresh_loop(pipeline: Arc<IngestionPipeline>, period: Duration) {
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately; startup refreshes are configured separately.
    ticker.tick().await;

    loop {
        ticker.tick().await;
        match pipeline.refresh().await {
            Ok(RefreshOutcome::Completed(report)) => {
                info!(
                    updated = report.updated.len(),
                    skipped = report.skipped.len(),
                    rebuilt = report.rebuilt,
                    "scheduled refresh completed"
                );
            }
            Ok(RefreshOutcome::AlreadyRunning) => {
                info!("scheduled refresh skipped; another refresh is running");
            }
            Err(err) => {
                error!(error = %err, "scheduled refresh failed");
            }
        }
    }
}
