use std::sync::Arc;

use common::{storage::graph_store::GraphStore, utils::graph_templates::GraphTemplates};
use ingestion_pipeline::IngestionPipeline;

#[derive(Clone)]
pub struct ApiState {
    pub graph_store: Arc<GraphStore>,
    pub templates: Arc<GraphTemplates>,
    pub pipeline: Arc<IngestionPipeline>,
}

impl ApiState {
    pub fn new(
        graph_store: Arc<GraphStore>,
        templates: Arc<GraphTemplates>,
        pipeline: Arc<IngestionPipeline>,
    ) -> Self {
        Self {
            graph_store,
            templates,
            pipeline,
        }
    }
}
