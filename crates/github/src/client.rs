//! [`GithubClient`]: the REST implementation of [`SourceControlHost`].

use async_trait::async_trait;
use pipeline::{
    Branch, BranchName, CommitInfo, CommitSha, FileEntry, HostError, NewCommit, NewPullRequest,
    PullRequest, RepoPath, RepositoryHandle, RepositoryInfo, SourceControlHost, TreeEntry,
    TreeSha,
};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Method, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::models::{
    BlobResponse, BranchResponse, CommitResponse, ContentsResponse, CreateCommitRequest,
    CreatePullRequest, CreateRefRequest, CreateTreeRequest, ErrorBody, PullRequestResponse,
    RepositoryResponse, TreeElement, TreeResponse, UpdateRefRequest,
};
use crate::GithubError;

/// Public GitHub REST endpoint.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

const API_VERSION: &str = "2022-11-28";
const USER_AGENT: &str = concat!("repo-improver/", env!("CARGO_PKG_VERSION"));

/// GitHub REST v3 client authenticated with a bearer token.
///
/// Holds no per-repository state; every call names its repository.
#[derive(Clone)]
pub struct GithubClient {
    http: reqwest::Client,
    base_url: Url,
    token: String,
}

impl std::fmt::Debug for GithubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GithubClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl GithubClient {
    /// Creates a client against [`DEFAULT_API_URL`].
    pub fn new(token: impl Into<String>) -> Result<Self, GithubError> {
        Self::with_base_url(token, DEFAULT_API_URL)
    }

    /// Creates a client against a different API root (GitHub Enterprise).
    pub fn with_base_url(token: impl Into<String>, base_url: &str) -> Result<Self, GithubError> {
        let base_url =
            Url::parse(base_url).map_err(|e| GithubError::InvalidBaseUrl(e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(GithubError::InvalidBaseUrl(base_url.to_string()));
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert("x-github-api-version", HeaderValue::from_static(API_VERSION));
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            base_url,
            token: token.into(),
        })
    }

    /// Builds `{base}/repos/{owner}/{repo}/{segments...}`.
    ///
    /// Each segment is percent-encoded; segments containing `/` are split so
    /// repository paths and branch names keep their hierarchy.
    pub(crate) fn endpoint(&self, repo: &RepositoryHandle, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty()
                .extend(["repos", repo.owner(), repo.name()])
                .extend(
                    segments
                        .iter()
                        .flat_map(|s| s.split('/'))
                        .filter(|s| !s.is_empty()),
                );
        }
        url
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        debug!(%method, %url, "GitHub request");
        self.http.request(method, url).bearer_auth(&self.token)
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, GithubError> {
        let response = check_status(builder.send().await?).await?;
        Ok(response.json::<T>().await?)
    }

    async fn send_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        body: &B,
    ) -> Result<T, GithubError> {
        self.send(self.request(method, url).json(body)).await
    }

    async fn contents(
        &self,
        repo: &RepositoryHandle,
        path: &RepoPath,
        git_ref: &str,
    ) -> Result<ContentsResponse, GithubError> {
        let mut url = self.endpoint(repo, &["contents", path.as_str()]);
        url.query_pairs_mut().append_pair("ref", git_ref);
        self.send(self.request(Method::GET, url)).await
    }
}

/// Turns a non-success response into [`GithubError::Api`].
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, GithubError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(api_error(status, &body))
}

/// Extracts GitHub's `message` field, falling back to the raw body or the
/// status reason.
pub(crate) fn api_error(status: StatusCode, body: &str) -> GithubError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.message)
        .ok()
        .or_else(|| (!body.trim().is_empty()).then(|| body.trim().to_string()))
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown error").to_string());
    GithubError::Api {
        status: status.as_u16(),
        message,
    }
}

#[async_trait]
impl SourceControlHost for GithubClient {
    async fn get_repository(&self, repo: &RepositoryHandle) -> Result<RepositoryInfo, HostError> {
        let url = self.endpoint(repo, &[]);
        let response: RepositoryResponse = self.send(self.request(Method::GET, url)).await?;
        Ok(response.into_info(repo)?)
    }

    async fn get_branch(
        &self,
        repo: &RepositoryHandle,
        branch: &BranchName,
    ) -> Result<Branch, HostError> {
        let url = self.endpoint(repo, &["branches", branch.as_str()]);
        let response: BranchResponse = self.send(self.request(Method::GET, url)).await?;
        Ok(Branch::try_from(response)?)
    }

    async fn create_branch_ref(
        &self,
        repo: &RepositoryHandle,
        branch: &BranchName,
        sha: &CommitSha,
    ) -> Result<(), HostError> {
        let body = CreateRefRequest {
            git_ref: branch.to_ref(),
            sha: sha.as_str(),
        };
        let url = self.endpoint(repo, &["git", "refs"]);
        let _: serde_json::Value = self.send_json(Method::POST, url, &body).await?;
        Ok(())
    }

    async fn list_directory(
        &self,
        repo: &RepositoryHandle,
        path: &RepoPath,
        git_ref: &str,
    ) -> Result<Vec<FileEntry>, HostError> {
        let items = match self.contents(repo, path, git_ref).await? {
            ContentsResponse::Listing(items) => items,
            ContentsResponse::Single(item) => vec![item],
        };
        let entries = items
            .into_iter()
            .map(FileEntry::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    async fn get_file(
        &self,
        repo: &RepositoryHandle,
        path: &RepoPath,
        git_ref: &str,
    ) -> Result<FileEntry, HostError> {
        let item = match self.contents(repo, path, git_ref).await? {
            ContentsResponse::Single(item) => item,
            ContentsResponse::Listing(_) => {
                return Err(
                    GithubError::UnexpectedResponse(format!("'{path}' is a directory")).into(),
                )
            }
        };
        if !item.needs_blob() {
            return Ok(FileEntry::try_from(item)?);
        }

        let sha = item.sha.clone().ok_or(GithubError::MissingField("sha"))?;
        debug!(%path, %sha, size = item.size, "file over contents limit, reading blob");
        let url = self.endpoint(repo, &["git", "blobs", sha.as_str()]);
        let blob: BlobResponse = self.send(self.request(Method::GET, url)).await?;
        let mut entry = FileEntry::try_from(item)?;
        entry.content = Some(blob.into_base64()?);
        Ok(entry)
    }

    async fn get_tree(
        &self,
        repo: &RepositoryHandle,
        sha: &CommitSha,
    ) -> Result<TreeSha, HostError> {
        let url = self.endpoint(repo, &["git", "trees", sha.as_str()]);
        let response: TreeResponse = self.send(self.request(Method::GET, url)).await?;
        Ok(TreeSha::try_from(response)?)
    }

    async fn create_tree(
        &self,
        repo: &RepositoryHandle,
        base_tree: &TreeSha,
        entries: &[TreeEntry],
    ) -> Result<TreeSha, HostError> {
        let body = CreateTreeRequest {
            base_tree: base_tree.as_str(),
            tree: entries.iter().map(TreeElement::from).collect(),
        };
        let url = self.endpoint(repo, &["git", "trees"]);
        let response: TreeResponse = self.send_json(Method::POST, url, &body).await?;
        Ok(TreeSha::try_from(response)?)
    }

    async fn get_commit(
        &self,
        repo: &RepositoryHandle,
        sha: &CommitSha,
    ) -> Result<CommitInfo, HostError> {
        let url = self.endpoint(repo, &["git", "commits", sha.as_str()]);
        let response: CommitResponse = self.send(self.request(Method::GET, url)).await?;
        Ok(CommitInfo::try_from(response)?)
    }

    async fn create_commit(
        &self,
        repo: &RepositoryHandle,
        commit: &NewCommit,
    ) -> Result<CommitSha, HostError> {
        let body = CreateCommitRequest {
            message: &commit.message,
            tree: commit.tree.as_str(),
            parents: commit.parents.iter().map(CommitSha::as_str).collect(),
        };
        let url = self.endpoint(repo, &["git", "commits"]);
        let response: CommitResponse = self.send_json(Method::POST, url, &body).await?;
        Ok(CommitInfo::try_from(response)?.sha)
    }

    async fn update_branch_ref(
        &self,
        repo: &RepositoryHandle,
        branch: &BranchName,
        sha: &CommitSha,
    ) -> Result<(), HostError> {
        let body = UpdateRefRequest {
            sha: sha.as_str(),
            force: false,
        };
        let url = self.endpoint(repo, &["git", "refs", "heads", branch.as_str()]);
        let _: serde_json::Value = self.send_json(Method::PATCH, url, &body).await?;
        Ok(())
    }

    async fn create_pull_request(
        &self,
        repo: &RepositoryHandle,
        pull_request: &NewPullRequest,
    ) -> Result<PullRequest, HostError> {
        let body = CreatePullRequest {
            title: &pull_request.title,
            body: &pull_request.body,
            head: pull_request.head.as_str(),
            base: pull_request.base.as_str(),
        };
        let url = self.endpoint(repo, &["pulls"]);
        let response: PullRequestResponse = self.send_json(Method::POST, url, &body).await?;
        Ok(response.into_pull_request(&pull_request.head, &pull_request.base))
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
