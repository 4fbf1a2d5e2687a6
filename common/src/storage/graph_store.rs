use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::Arc,
};

use serde::de::DeserializeOwned;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::{
    error::AppError,
    storage::{
        atomic::write_json_atomic,
        types::{linked_data::LinkedDataGraph, node_link::NodeLinkGraph},
    },
    utils::graph_templates::GraphTemplates,
};

/// Both derived graphs of one build generation.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphSnapshot {
    pub linked_data: LinkedDataGraph,
    pub node_link: NodeLinkGraph,
}

impl GraphSnapshot {
    pub fn empty(templates: &GraphTemplates) -> Self {
        Self {
            linked_data: LinkedDataGraph {
                context: templates.context.clone(),
                metadata: templates.fresh_metadata(),
                graph: Vec::new(),
            },
            node_link: NodeLinkGraph::default(),
        }
    }
}

/// Owner of the persisted linked-data and node-link graphs.
///
/// Queries take an `Arc` of the current snapshot and never block a rebuild; a rebuild
/// writes both files atomically before swapping the in-memory generation.
pub struct GraphStore {
    linked_data_path: PathBuf,
    node_link_path: PathBuf,
    current: RwLock<Arc<GraphSnapshot>>,
}

impl GraphStore {
    /// Loads both graph files. Missing files yield empty graphs until the first refresh.
    pub async fn open(
        linked_data_path: impl Into<PathBuf>,
        node_link_path: impl Into<PathBuf>,
        templates: &GraphTemplates,
    ) -> Result<Self, AppError> {
        let linked_data_path = linked_data_path.into();
        let node_link_path = node_link_path.into();
        let snapshot = read_snapshot(&linked_data_path, &node_link_path, templates).await?;

        info!(
            nodes = snapshot.linked_data.graph.len(),
            links = snapshot.node_link.links.len(),
            "graph store opened"
        );

        Ok(Self {
            linked_data_path,
            node_link_path,
            current: RwLock::new(Arc::new(snapshot)),
        })
    }

    pub async fn snapshot(&self) -> Arc<GraphSnapshot> {
        Arc::clone(&*self.current.read().await)
    }

    /// Writes both graphs as whole-file replacements, then publishes them to readers.
    pub async fn replace(&self, snapshot: GraphSnapshot) -> Result<(), AppError> {
        write_json_atomic(&self.linked_data_path, &snapshot.linked_data).await?;
        write_json_atomic(&self.node_link_path, &snapshot.node_link).await?;

        *self.current.write().await = Arc::new(snapshot);
        Ok(())
    }
}

async fn read_snapshot(
    linked_data_path: &Path,
    node_link_path: &Path,
    templates: &GraphTemplates,
) -> Result<GraphSnapshot, AppError> {
    let empty = GraphSnapshot::empty(templates);
    let linked_data = read_optional_json(linked_data_path)
        .await?
        .unwrap_or(empty.linked_data);
    let node_link = read_optional_json(node_link_path)
        .await?
        .unwrap_or(empty.node_link);

    Ok(GraphSnapshot {
        linked_data,
        node_link,
    })
}

async fn read_optional_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, AppError> {
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
        Err(err) if err.kind() == ErrorKind::NotFound => {
            warn!(path = %path.display(), "graph file not found; serving an empty graph");
            Ok(None)
        }
        Err(err) => Err(err.into()),
    }
}
