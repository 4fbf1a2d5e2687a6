use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use common::error::AppError;
use reqwest::{
    header::{HeaderMap, ACCEPT, AUTHORIZATION, LINK},
    RequestBuilder, StatusCode,
};
use serde::Deserialize;
use tokio_retry::{
    strategy::{jitter, ExponentialBackoff},
    Retry,
};
use tracing::{debug, warn};

use crate::pipeline::{RepoDescriptor, RepositoryDirectory};

const GITHUB_ACCEPT: &str = "application/vnd.github.v3+json";
const USER_AGENT: &str = concat!("exercise-graph/", env!("CARGO_PKG_VERSION"));
const LIST_ATTEMPTS: usize = 3;
const LIST_BACKOFF_MAX: Duration = Duration::from_secs(5);

#[derive(Deserialize)]
struct GithubOwner {
    login: String,
}

#[derive(Deserialize)]
struct GithubRepo {
    name: String,
    owner: GithubOwner,
    default_branch: String,
}

#[derive(Deserialize)]
struct GithubCommit {
    sha: String,
}

#[derive(Deserialize)]
struct GithubReadme {
    content: String,
}

impl From<GithubRepo> for RepoDescriptor {
    fn from(repo: GithubRepo) -> Self {
        Self {
            name: repo.name,
            owner_login: repo.owner.login,
            default_branch: repo.default_branch,
        }
    }
}

/// REST client for an organization's repositories on GitHub.
pub struct GithubDirectory {
    client: reqwest::Client,
    api_url: String,
    token: String,
}

impl GithubDirectory {
    /// Every request made through this client is bounded by `timeout`.
    pub fn new(api_url: &str, token: String, timeout: Duration) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    fn get(&self, url: &str) -> RequestBuilder {
        self.client
            .get(url)
            .header(AUTHORIZATION, format!("token {}", self.token))
            .header(ACCEPT, GITHUB_ACCEPT)
    }

    async fn list_page(&self, url: &str) -> Result<(Vec<GithubRepo>, Option<String>), AppError> {
        let response = self
            .get(url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|err| upstream(url, &err))?;
        let next = next_page_url(response.headers());
        let page = response
            .json::<Vec<GithubRepo>>()
            .await
            .map_err(|err| upstream(url, &err))?;
        Ok((page, next))
    }
}

/// Delays between listing attempts: 200 ms, 400 ms, 800 ms, each capped at five seconds.
fn listing_backoff() -> impl Iterator<Item = Duration> {
    ExponentialBackoff::from_millis(2)
        .factor(100)
        .max_delay(LIST_BACKOFF_MAX)
        .take(LIST_ATTEMPTS)
}

fn upstream(url: &str, err: &reqwest::Error) -> AppError {
    AppError::UpstreamUnavailable(format!("{url}: {err}"))
}

#[async_trait]
impl RepositoryDirectory for GithubDirectory {
    async fn list_repositories(&self, organization: &str) -> Result<Vec<RepoDescriptor>, AppError> {
        let mut repos = Vec::new();
        let mut next = Some(format!(
            "{}/orgs/{organization}/repos?per_page=100",
            self.api_url
        ));

        while let Some(url) = next {
            let strategy = listing_backoff().map(jitter);
            let (page, next_url) = Retry::spawn(strategy, || self.list_page(&url))
                .await
                .inspect_err(|err| {
                    warn!(%url, error = %err, "repository listing failed after retries");
                })?;

            debug!(%url, count = page.len(), "fetched repository page");
            repos.extend(page.into_iter().map(RepoDescriptor::from));
            next = next_url;
        }

        Ok(repos)
    }

    async fn latest_revision(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
    ) -> Result<String, AppError> {
        let url = format!("{}/repos/{owner}/{repo}/commits/{branch}", self.api_url);
        let commit = self
            .get(&url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|err| upstream(&url, &err))?
            .json::<GithubCommit>()
            .await
            .map_err(|err| upstream(&url, &err))?;

        Ok(commit.sha)
    }

    async fn fetch_descriptive_blob(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<Option<String>, AppError> {
        let url = format!("{}/repos/{owner}/{repo}/readme", self.api_url);
        let response = self
            .get(&url)
            .send()
            .await
            .map_err(|err| upstream(&url, &err))?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let readme = response
            .error_for_status()
            .map_err(|err| upstream(&url, &err))?
            .json::<GithubReadme>()
            .await
            .map_err(|err| upstream(&url, &err))?;

        decode_content(&readme.content)
            .map(Some)
            .map_err(|err| AppError::MalformedSource(format!("{owner}/{repo} README: {err:#}")))
    }
}

/// Decodes the base64 `content` member, which GitHub wraps with newlines.
fn decode_content(content: &str) -> anyhow::Result<String> {
    let compact: String = content.split_whitespace().collect();
    let bytes = STANDARD
        .decode(compact)
        .context("README content is not valid base64")?;
    String::from_utf8(bytes).context("README content is not valid UTF-8")
}

/// Target of the `rel="next"` entry of a `Link` header, if any.
fn next_page_url(headers: &HeaderMap) -> Option<String> {
    let link = headers.get(LINK)?.to_str().ok()?;
    link.split(',').find_map(|entry| {
        let mut parts = entry.split(';');
        let target = parts.next()?.trim();
        parts
            .any(|param| param.trim() == r#"rel="next""#)
            .then(|| {
                target
                    .trim_start_matches('<')
                    .trim_end_matches('>')
                    .to_string()
            })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[test]
    fn follows_next_relation() {
        let mut headers = HeaderMap::new();
        headers.insert(
            LINK,
            HeaderValue::from_static(
                r#"<https://api.github.com/organizations/1/repos?per_page=100&page=2>; rel="next", <https://api.github.com/organizations/1/repos?per_page=100&page=5>; rel="last""#,
            ),
        );

        assert_eq!(
            next_page_url(&headers).as_deref(),
            Some("https://api.github.com/organizations/1/repos?per_page=100&page=2")
        );
    }

    #[test]
    fn last_page_has_no_next() {
        let mut headers = HeaderMap::new();
        assert_eq!(next_page_url(&headers), None);

        headers.insert(
            LINK,
            HeaderValue::from_static(
                r#"<https://api.github.com/organizations/1/repos?page=1>; rel="prev", <https://api.github.com/organizations/1/repos?page=1>; rel="first""#,
            ),
        );
        assert_eq!(next_page_url(&headers), None);
    }

    #[test]
    fn decodes_wrapped_base64() {
        let encoded = STANDARD.encode("# Title\n<!--- {} --->\n");
        let (head, tail) = encoded.split_at(8);
        let wrapped = format!("{head}\n{tail}\n");

        assert_eq!(
            decode_content(&wrapped).expect("decodes"),
            "# Title\n<!--- {} --->\n"
        );
    }

    #[test]
    fn rejects_invalid_base64() {
        assert!(decode_content("@@not base64@@").is_err());
    }

    #[test]
    fn trims_trailing_slash_from_api_url() {
        let directory = GithubDirectory::new(
            "https://github.example.com/api/v3/",
            "token".into(),
            Duration::from_secs(5),
        )
        .expect("client builds");
        assert_eq!(directory.api_url, "https://github.example.com/api/v3");
    }

    #[test]
    fn listing_backoff_stays_bounded() {
        let delays: Vec<Duration> = listing_backoff().collect();

        assert_eq!(delays.len(), LIST_ATTEMPTS);
        assert!(delays.iter().all(|delay| *delay <= LIST_BACKOFF_MAX));
        let total: Duration = delays.iter().sum();
        assert!(total <= Duration::from_secs(2), "total backoff {total:?}");
    }

    #[tokio::test]
    async fn unreachable_host_is_upstream_unavailable() {
        let directory = GithubDirectory::new(
            "http://127.0.0.1:9",
            "token".into(),
            Duration::from_secs(1),
        )
        .expect("client builds");

        let err = directory
            .latest_revision("STEMgraph", "repo", "main")
            .await
            .expect_err("nothing listens on the discard port");
        assert!(matches!(err, AppError::UpstreamUnavailable(_)), "{err:?}");

        let err = directory
            .fetch_descriptive_blob("STEMgraph", "repo")
            .await
            .expect_err("nothing listens on the discard port");
        assert!(matches!(err, AppError::UpstreamUnavailable(_)), "{err:?}");
    }

    #[test]
    fn converts_repository_payload() {
        let repo: GithubRepo = serde_json::from_str(
            r#"{"name": "3f2c9a4e-1b7d-4c1e-9a53-0d2f6b8e7a10", "owner": {"login": "STEMgraph"}, "default_branch": "main", "private": false}"#,
        )
        .expect("parse");

        let descriptor = RepoDescriptor::from(repo);
        assert_eq!(descriptor.owner_login, "STEMgraph");
        assert_eq!(descriptor.default_branch, "main");
    }
}
