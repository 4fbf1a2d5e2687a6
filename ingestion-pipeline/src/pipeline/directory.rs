use async_trait::async_trait;
use common::error::AppError;

/// A repository as listed by the remote host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoDescriptor {
    pub name: String,
    pub owner_login: String,
    pub default_branch: String,
}

/// Read access to the repositories of one organization.
#[async_trait]
pub trait RepositoryDirectory: Send + Sync {
    /// Every repository of the organization, across all pages.
    async fn list_repositories(&self, organization: &str) -> Result<Vec<RepoDescriptor>, AppError>;

    async fn latest_revision(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
    ) -> Result<String, AppError>;

    /// The README text, or `None` when the repository has none.
    async fn fetch_descriptive_blob(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<Option<String>, AppError>;
}
