use std::path::PathBuf;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::error::AppError;

#[derive(Clone, Deserialize, Debug)]
pub struct AppConfig {
    pub github_org: String,
    pub github_pat_file: String,
    #[serde(default = "default_github_api_url")]
    pub github_api_url: String,
    #[serde(default = "default_storage_dir")]
    pub storage_dir: String,
    #[serde(default = "default_database_dir")]
    pub database_dir: String,
    #[serde(default = "default_template_dir")]
    pub template_dir: String,
    #[serde(default = "default_graph_id")]
    pub graph_id: String,
    #[serde(default = "default_http_port")]
    pub http_port: u16,
    #[serde(default = "default_remote_timeout_secs")]
    pub remote_timeout_secs: u64,
    #[serde(default)]
    pub refresh_on_startup: bool,
    #[serde(default)]
    pub refresh_interval_secs: Option<u64>,
}

fn default_github_api_url() -> String {
    "https://api.github.com".to_string()
}

fn default_storage_dir() -> String {
    "/data/repos".to_string()
}

fn default_database_dir() -> String {
    "/data".to_string()
}

fn default_template_dir() -> String {
    "./templates".to_string()
}

fn default_graph_id() -> String {
    "https://example.com/".to_string()
}

fn default_http_port() -> u16 {
    8000
}

fn default_remote_timeout_secs() -> u64 {
    30
}

impl AppConfig {
    /// Index of repository revisions written by the ingestion pipeline.
    pub fn metadata_path(&self) -> PathBuf {
        PathBuf::from(&self.storage_dir).join("metadata.json")
    }

    pub fn linked_data_path(&self) -> PathBuf {
        PathBuf::from(&self.database_dir).join("graph.jsonld")
    }

    pub fn node_link_path(&self) -> PathBuf {
        PathBuf::from(&self.database_dir).join("graph.json")
    }

    pub fn context_template_path(&self) -> PathBuf {
        PathBuf::from(&self.template_dir).join("graphContext.json")
    }

    pub fn organization_template_path(&self) -> PathBuf {
        PathBuf::from(&self.template_dir).join("organization.json")
    }

    /// Reads the remote access token. A missing or empty token file is fatal at startup.
    pub async fn load_access_token(&self) -> Result<String, AppError> {
        let raw = tokio::fs::read_to_string(&self.github_pat_file)
            .await
            .map_err(|e| {
                AppError::ConfigurationMissing(format!(
                    "access token file {} is unreadable: {e}",
                    self.github_pat_file
                ))
            })?;

        let token = raw.trim();
        if token.is_empty() {
            return Err(AppError::ConfigurationMissing(format!(
                "access token file {} is empty",
                self.github_pat_file
            )));
        }

        Ok(token.to_string())
    }
}

pub fn get_config() -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::with_name("config").required(false))
        .add_source(Environment::default())
        .build()?;

    config.try_deserialize()
}
