use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header::CONTENT_TYPE, Method, Request, StatusCode},
    Router,
};
use common::{
    error::AppError,
    storage::{graph_store::GraphStore, types::raw_exercise::RawExerciseMetadata},
    utils::graph_templates::GraphTemplates,
};
use ingestion_pipeline::{
    graph_builder::build_snapshot, IngestionConfig, IngestionPipeline, RepoDescriptor,
    RepositoryDirectory,
};
use serde_json::{json, Value};
use tempfile::{tempdir, TempDir};
use tokio::sync::Semaphore;
use tower::ServiceExt;

use crate::{api_state::ApiState, exercise_routes};

/// Directory whose listing waits for a permit and then reports no repositories.
pub struct GatedDirectory {
    gate: Option<Arc<Semaphore>>,
}

impl GatedDirectory {
    pub fn new(gate: Arc<Semaphore>) -> Self {
        Self { gate: Some(gate) }
    }

    pub fn open() -> Self {
        Self { gate: None }
    }
}

#[async_trait]
impl RepositoryDirectory for GatedDirectory {
    async fn list_repositories(&self, _organization: &str) -> Result<Vec<RepoDescriptor>, AppError> {
        if let Some(gate) = &self.gate {
            let permit = gate
                .acquire()
                .await
                .map_err(|e| AppError::InternalError(e.to_string()))?;
            permit.forget();
        }
        Ok(Vec::new())
    }

    async fn latest_revision(
        &self,
        _owner: &str,
        repo: &str,
        _branch: &str,
    ) -> Result<String, AppError> {
        Err(AppError::NotFound(repo.to_string()))
    }

    async fn fetch_descriptive_blob(
        &self,
        _owner: &str,
        _repo: &str,
    ) -> Result<Option<String>, AppError> {
        Ok(None)
    }
}

pub struct TestApp {
    pub router: Router,
    pub graph_store: Arc<GraphStore>,
    pub pipeline: Arc<IngestionPipeline>,
    _dir: TempDir,
}

pub fn exercise(value: Value) -> RawExerciseMetadata {
    serde_json::from_value(value).expect("raw exercise record")
}

pub async fn test_app(records: Vec<RawExerciseMetadata>) -> TestApp {
    test_app_with_directory(records, Arc::new(GatedDirectory::open())).await
}

pub async fn test_app_with_directory(
    records: Vec<RawExerciseMetadata>,
    directory: Arc<dyn RepositoryDirectory>,
) -> TestApp {
    let dir = tempdir().expect("tempdir");
    let templates = Arc::new(GraphTemplates::new(
        "https://example.com/",
        json!({"schema": "https://schema.org/"}),
        json!({"@type": "schema:Organization", "schema:name": "STEMgraph API"}),
    ));

    let graph_store = Arc::new(
        GraphStore::open(
            dir.path().join("graph.jsonld"),
            dir.path().join("graph.json"),
            &templates,
        )
        .await
        .expect("graph store"),
    );
    graph_store
        .replace(build_snapshot(&records, &templates))
        .await
        .expect("seed graph");

    let pipeline = Arc::new(IngestionPipeline::with_config(
        directory,
        Arc::clone(&graph_store),
        Arc::clone(&templates),
        IngestionConfig {
            organization: "STEMgraph".into(),
            storage_dir: dir.path().join("repos"),
            metadata_path: dir.path().join("repos").join("metadata.json"),
        },
    ));

    let router = exercise_routes().with_state(ApiState::new(
        Arc::clone(&graph_store),
        templates,
        Arc::clone(&pipeline),
    ));

    TestApp {
        router,
        graph_store,
        pipeline,
        _dir: dir,
    }
}

async fn send(router: &Router, method: Method, uri: &str) -> (StatusCode, Option<String>, Value) {
    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("router response");

    let status = response.status();
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

    (status, content_type, body)
}

pub async fn get_json(router: &Router, uri: &str) -> (StatusCode, Option<String>, Value) {
    send(router, Method::GET, uri).await
}

pub async fn post_json(router: &Router, uri: &str) -> (StatusCode, Value) {
    let (status, _, body) = send(router, Method::POST, uri).await;
    (status, body)
}
