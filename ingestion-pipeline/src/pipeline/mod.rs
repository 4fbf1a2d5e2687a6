mod config;
mod directory;
mod state;

pub use config::IngestionConfig;
pub use directory::{RepoDescriptor, RepositoryDirectory};
pub use state::{RefreshOutcome, RefreshReport, RepoOutcome, SkipReason};

use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Instant,
};

use chrono::Utc;
use common::{
    error::AppError,
    storage::{
        atomic::write_json_atomic,
        graph_store::GraphStore,
        metadata_store::{MetadataStore, RepoIndex, RepoRecord},
        types::raw_exercise::RawExerciseMetadata,
    },
    utils::{config::AppConfig, graph_templates::GraphTemplates},
};
use futures::future::join_all;
use serde_json::Value;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::{
    graph_builder::build_snapshot,
    utils::metadata_block::{classify_blob, BlobExtraction},
};

/// Synchronizes the local graph with the organization's exercise repositories.
///
/// At most one refresh runs at a time; the guard is owned here rather than by callers.
#[allow(clippy::module_name_repetitions)]
pub struct IngestionPipeline {
    directory: Arc<dyn RepositoryDirectory>,
    metadata: MetadataStore,
    graph_store: Arc<GraphStore>,
    templates: Arc<GraphTemplates>,
    config: IngestionConfig,
    refresh_guard: Arc<Mutex<()>>,
    refreshing: Arc<AtomicBool>,
}

/// Held for the whole of one refresh; clears the running flag when dropped.
struct RefreshGuard {
    _lock: OwnedMutexGuard<()>,
    refreshing: Arc<AtomicBool>,
}

impl Drop for RefreshGuard {
    fn drop(&mut self) {
        self.refreshing.store(false, Ordering::Release);
    }
}

impl IngestionPipeline {
    pub fn new(
        directory: Arc<dyn RepositoryDirectory>,
        graph_store: Arc<GraphStore>,
        templates: Arc<GraphTemplates>,
        config: &AppConfig,
    ) -> Self {
        Self::with_config(directory, graph_store, templates, IngestionConfig::from(config))
    }

    pub fn with_config(
        directory: Arc<dyn RepositoryDirectory>,
        graph_store: Arc<GraphStore>,
        templates: Arc<GraphTemplates>,
        config: IngestionConfig,
    ) -> Self {
        Self {
            directory,
            metadata: MetadataStore::new(config.metadata_path.clone()),
            graph_store,
            templates,
            config,
            refresh_guard: Arc::new(Mutex::new(())),
            refreshing: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Reads the running flag without touching the guard.
    pub fn is_refreshing(&self) -> bool {
        self.refreshing.load(Ordering::Acquire)
    }

    fn try_begin(&self) -> Option<RefreshGuard> {
        let lock = Arc::clone(&self.refresh_guard).try_lock_owned().ok()?;
        self.refreshing.store(true, Ordering::Release);
        Some(RefreshGuard {
            _lock: lock,
            refreshing: Arc::clone(&self.refreshing),
        })
    }

    /// Starts a refresh in the background. Returns `false` when one is already running.
    pub fn spawn_refresh(self: &Arc<Self>) -> bool {
        let Some(guard) = self.try_begin() else {
            info!("refresh requested while another is running");
            return false;
        };

        let pipeline = Arc::clone(self);
        tokio::spawn(async move {
            let _guard = guard;
            if let Err(err) = pipeline.run_refresh().await {
                error!(error = %err, "background refresh failed");
            }
        });

        true
    }

    /// Runs a refresh to completion on the current task.
    #[tracing::instrument(skip_all, fields(organization = %self.config.organization))]
    pub async fn refresh(&self) -> Result<RefreshOutcome, AppError> {
        let Some(_guard) = self.try_begin() else {
            info!("refresh requested while another is running");
            return Ok(RefreshOutcome::AlreadyRunning);
        };

        self.run_refresh().await.map(RefreshOutcome::Completed)
    }

    #[tracing::instrument(skip_all, fields(organization = %self.config.organization))]
    async fn run_refresh(&self) -> Result<RefreshReport, AppError> {
        let started = Instant::now();
        let mut index = self.metadata.load().await?;
        let repos = self
            .directory
            .list_repositories(&self.config.organization)
            .await?;
        debug!(count = repos.len(), "listed repositories");

        let mut report = RefreshReport::default();
        let mut superseded = Vec::new();

        for repo in &repos {
            let known_revision = index.get(&repo.name).map(|record| record.revision.as_str());
            match self.process_repository(repo, known_revision).await {
                RepoOutcome::Unchanged => {
                    debug!(repo = %repo.name, "revision unchanged");
                    report.unchanged = report.unchanged.saturating_add(1);
                }
                RepoOutcome::Updated(record) => {
                    info!(repo = %repo.name, revision = %record.revision, "ingested exercise metadata");
                    let new_path = record.path.clone();
                    if let Some(previous) = index.insert(repo.name.clone(), record) {
                        if previous.path != new_path {
                            superseded.push(previous.path);
                        }
                    }
                    report.updated.push(repo.name.clone());
                }
                RepoOutcome::Skipped(reason) => {
                    match reason {
                        SkipReason::NotUuid | SkipReason::NoBlob => {
                            info!(repo = %repo.name, reason = %reason, "skipping repository");
                        }
                        _ => warn!(repo = %repo.name, reason = %reason, "skipping repository"),
                    }
                    report.skipped.push((repo.name.clone(), reason));
                }
            }
        }

        if report.updated.is_empty() {
            info!(
                unchanged = report.unchanged,
                skipped = report.skipped.len(),
                elapsed_ms = started.elapsed().as_millis(),
                "refresh finished without changes"
            );
            return Ok(report);
        }

        self.metadata.save(&index).await?;

        let records = self.load_records(&index).await;
        let snapshot = build_snapshot(&records, &self.templates);
        report.node_count = snapshot.linked_data.graph.len();
        self.graph_store.replace(snapshot).await?;
        report.rebuilt = true;

        remove_superseded(&superseded).await;

        info!(
            updated = report.updated.len(),
            unchanged = report.unchanged,
            skipped = report.skipped.len(),
            nodes = report.node_count,
            elapsed_ms = started.elapsed().as_millis(),
            "refresh rebuilt the exercise graph"
        );
        Ok(report)
    }

    /// Decides the outcome for one repository. Failures are confined to that repository.
    async fn process_repository(
        &self,
        repo: &RepoDescriptor,
        known_revision: Option<&str>,
    ) -> RepoOutcome {
        if !is_exercise_name(&repo.name) {
            return RepoOutcome::Skipped(SkipReason::NotUuid);
        }

        let revision = match self
            .directory
            .latest_revision(&repo.owner_login, &repo.name, &repo.default_branch)
            .await
        {
            Ok(revision) => revision,
            Err(err) => return RepoOutcome::Skipped(SkipReason::Transport(err.to_string())),
        };

        if known_revision == Some(revision.as_str()) {
            return RepoOutcome::Unchanged;
        }

        let blob = match self
            .directory
            .fetch_descriptive_blob(&repo.owner_login, &repo.name)
            .await
        {
            Ok(blob) => blob,
            Err(AppError::MalformedSource(detail)) => {
                debug!(repo = %repo.name, %detail, "descriptive blob is unreadable");
                return RepoOutcome::Skipped(SkipReason::NoValidBlock);
            }
            Err(err) => return RepoOutcome::Skipped(SkipReason::Transport(err.to_string())),
        };

        let block = match classify_blob(blob.as_deref()) {
            BlobExtraction::NoBlob => return RepoOutcome::Skipped(SkipReason::NoBlob),
            BlobExtraction::NoValidBlock => return RepoOutcome::Skipped(SkipReason::NoValidBlock),
            BlobExtraction::Extracted(block) => block,
        };

        match self.persist_record(&repo.name, &revision, &block).await {
            Ok(path) => RepoOutcome::Updated(RepoRecord {
                revision,
                fetched_at: Utc::now().timestamp(),
                path,
            }),
            Err(err) => RepoOutcome::Skipped(SkipReason::Storage(err.to_string())),
        }
    }

    fn record_path(&self, repo: &str, revision: &str) -> PathBuf {
        self.config
            .storage_dir
            .join(format!("{repo}__{revision}.json"))
    }

    async fn persist_record(
        &self,
        repo: &str,
        revision: &str,
        block: &Value,
    ) -> Result<PathBuf, AppError> {
        let path = self.record_path(repo, revision);
        write_json_atomic(&path, block).await?;
        Ok(path)
    }

    /// Every record the index references, in repository-name order.
    async fn load_records(&self, index: &RepoIndex) -> Vec<RawExerciseMetadata> {
        let reads = index
            .iter()
            .map(|(name, record)| async move { (name, read_record(name, &record.path).await) });

        join_all(reads)
            .await
            .into_iter()
            .filter_map(|(name, result)| match result {
                Ok(record) => Some(record),
                Err(err) => {
                    warn!(repo = %name, error = %err, "raw exercise record unreadable; leaving it out of the graph");
                    None
                }
            })
            .collect()
    }
}

/// Exercise repositories are named by a hyphenated UUID.
fn is_exercise_name(name: &str) -> bool {
    name.len() == 36 && Uuid::try_parse(name).is_ok()
}

async fn read_record(name: &str, path: &Path) -> Result<RawExerciseMetadata, AppError> {
    let bytes = tokio::fs::read(path).await?;
    let record: RawExerciseMetadata = serde_json::from_slice(&bytes)?;
    Ok(record.with_fallback_id(name))
}

async fn remove_superseded(paths: &[PathBuf]) {
    for path in paths {
        match tokio::fs::remove_file(path).await {
            Ok(()) => debug!(path = %path.display(), "removed superseded record"),
            Err(err) if err.kind() == ErrorKind::NotFound => {}
            Err(err) => {
                warn!(path = %path.display(), error = %err, "failed to remove superseded record");
            }
        }
    }
}
