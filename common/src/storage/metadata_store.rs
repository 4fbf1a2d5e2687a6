use std::{
    collections::BTreeMap,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{error::AppError, storage::atomic::write_json_atomic};

/// What was last ingested for one repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoRecord {
    #[serde(alias = "sha")]
    pub revision: String,
    /// Unix seconds.
    #[serde(alias = "downloaded_at")]
    pub fetched_at: i64,
    pub path: PathBuf,
}

/// Repository name to its last ingested revision, ordered by name.
pub type RepoIndex = BTreeMap<String, RepoRecord>;

/// Persisted index that decides which repositories need re-fetching.
#[derive(Debug, Clone)]
pub struct MetadataStore {
    path: PathBuf,
}

impl MetadataStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns an empty index when nothing has been stored yet.
    pub async fn load(&self) -> Result<RepoIndex, AppError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no metadata index yet");
                Ok(RepoIndex::new())
            }
            Err(err) => Err(err.into()),
        }
    }

    /// The whole index is the unit of durability.
    pub async fn save(&self, index: &RepoIndex) -> Result<(), AppError> {
        write_json_atomic(&self.path, index).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn missing_store_loads_empty() {
        let dir = tempdir().expect("tempdir");
        let store = MetadataStore::new(dir.path().join("metadata.json"));

        assert!(store.load().await.expect("load").is_empty());
    }

    #[tokio::test]
    async fn save_then_load_returns_same_index() {
        let dir = tempdir().expect("tempdir");
        let store = MetadataStore::new(dir.path().join("metadata.json"));

        let mut index = RepoIndex::new();
        index.insert(
            "3f2c9a4e-0000-4000-8000-000000000001".into(),
            RepoRecord {
                revision: "abc123".into(),
                fetched_at: 1_700_000_000,
                path: dir.path().join("3f2c9a4e__abc123.json"),
            },
        );

        store.save(&index).await.expect("save");
        assert_eq!(store.load().await.expect("load"), index);
    }

    #[tokio::test]
    async fn reads_legacy_field_names() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("metadata.json");
        std::fs::write(
            &path,
            r#"{"repo": {"sha": "abc", "downloaded_at": 17, "path": "/data/repos/repo__abc.json"}}"#,
        )
        .expect("write legacy index");

        let index = MetadataStore::new(&path).load().await.expect("load");
        let record = index.get("repo").expect("record present");
        assert_eq!(record.revision, "abc");
        assert_eq!(record.fetched_at, 17);
    }

    #[tokio::test]
    async fn corrupt_store_is_an_error() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("metadata.json");
        std::fs::write(&path, "{not json").expect("write");

        let err = MetadataStore::new(&path).load().await.expect_err("corrupt");
        assert!(matches!(err, AppError::Serialization(_)));
    }
}
