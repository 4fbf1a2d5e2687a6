use std::path::Path;

use serde_json::Value;

use crate::{
    error::AppError,
    storage::types::graph_metadata::{timestamp_now, GraphMetadata},
    utils::config::AppConfig,
};

/// Static documents read once at startup and stamped onto every graph and response.
#[derive(Debug, Clone)]
pub struct GraphTemplates {
    pub graph_id: String,
    pub context: Value,
    pub generated_by: Value,
}

impl GraphTemplates {
    pub fn new(graph_id: impl Into<String>, context: Value, generated_by: Value) -> Self {
        Self {
            graph_id: graph_id.into(),
            context,
            generated_by,
        }
    }

    pub async fn load(config: &AppConfig) -> Result<Self, AppError> {
        let context_document = read_template(&config.context_template_path()).await?;
        let context = context_document.get("@context").cloned().ok_or_else(|| {
            AppError::ConfigurationMissing(format!(
                "template {} has no @context member",
                config.context_template_path().display()
            ))
        })?;
        let generated_by = read_template(&config.organization_template_path()).await?;

        Ok(Self::new(config.graph_id.clone(), context, generated_by))
    }

    /// Envelope metadata with a timestamp taken now. Never cache the result.
    pub fn fresh_metadata(&self) -> GraphMetadata {
        GraphMetadata {
            id: self.graph_id.clone(),
            generated_by: self.generated_by.clone(),
            generated_at: timestamp_now(),
        }
    }
}

async fn read_template(path: &Path) -> Result<Value, AppError> {
    let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
        AppError::ConfigurationMissing(format!("template {} is unreadable: {e}", path.display()))
    })?;

    serde_json::from_str(&raw).map_err(|e| {
        AppError::ConfigurationMissing(format!("template {} is not valid JSON: {e}", path.display()))
    })
}
