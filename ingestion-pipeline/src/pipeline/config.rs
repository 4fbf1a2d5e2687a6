use std::path::PathBuf;

use common::utils::config::AppConfig;

#[derive(Debug, Clone)]
pub struct IngestionConfig {
    pub organization: String,
    /// Directory holding one raw record per repository revision.
    pub storage_dir: PathBuf,
    pub metadata_path: PathBuf,
}

impl From<&AppConfig> for IngestionConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            organization: config.github_org.clone(),
            storage_dir: PathBuf::from(&config.storage_dir),
            metadata_path: config.metadata_path(),
        }
    }
}
