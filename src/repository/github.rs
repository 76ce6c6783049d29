// file: src/repository/github.rs
// description: GitHub REST API fetcher returning a path to content mapping
// reference: https://docs.github.com/en/rest/git/trees

use crate::error::{PipelineError, Result};
use crate::repository::filter::PathFilter;
use crate::repository::source_link::{RepositoryId, with_segments};
use crate::repository::{FetchFuture, FileMap, RepositoryFetcher};
use lazy_static::lazy_static;
use reqwest::{Client, RequestBuilder, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

const GITHUB_API_BASE: &str = "https://api.github.com";
const GITHUB_RAW_BASE: &str = "https://raw.githubusercontent.com";

lazy_static! {
    static ref GITHUB_RAW: Url = Url::parse(GITHUB_RAW_BASE).expect("GITHUB_RAW_BASE url is valid");
}
const USER_AGENT: &str = concat!("repo_tutor/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Deserialize)]
struct RepoInfo {
    default_branch: String,
}

#[derive(Debug, Deserialize)]
struct TreeResponse {
    tree: Vec<TreeEntry>,
    #[serde(default)]
    truncated: bool,
}

#[derive(Debug, Deserialize)]
struct TreeEntry {
    path: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    size: Option<u64>,
}

pub struct GithubFetcher {
    client: Client,
    branch: Option<String>,
    filter: PathFilter,
}

impl GithubFetcher {
    pub fn new(filter: PathFilter, branch: Option<String>) -> Self {
        Self {
            client: Client::new(),
            branch: branch.filter(|b| !b.trim().is_empty()),
            filter,
        }
    }

    fn get(&self, url: &str, credential: Option<&str>) -> RequestBuilder {
        let request = self
            .client
            .get(url)
            .header("User-Agent", USER_AGENT)
            .header("Accept", "application/vnd.github+json");

        match credential {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        credential: Option<&str>,
    ) -> Result<T> {
        let response = self.get(url, credential).send().await.map_err(|e| {
            PipelineError::Transport(format!("GitHub request to {} failed: {}", url, e))
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(PipelineError::Transport(format!(
                "GitHub request to {} failed with status {}: {}",
                url, status, error_text
            )));
        }

        response.json().await.map_err(|e| {
            PipelineError::Transport(format!("Failed to parse GitHub response: {}", e))
        })
    }

    async fn resolve_branch(
        &self,
        owner: &str,
        repo: &str,
        credential: Option<&str>,
    ) -> Result<String> {
        if let Some(branch) = &self.branch {
            return Ok(branch.clone());
        }

        let url = format!("{}/repos/{}/{}", GITHUB_API_BASE, owner, repo);
        let info: RepoInfo = self.get_json(&url, credential).await?;
        debug!("Default branch for {}/{}: {}", owner, repo, info.default_branch);
        Ok(info.default_branch)
    }

    async fn download(&self, url: &str, credential: Option<&str>) -> Result<Option<String>> {
        let response = self.get(url, credential).send().await.map_err(|e| {
            PipelineError::Transport(format!("Download of {} failed: {}", url, e))
        })?;

        if !response.status().is_success() {
            return Err(PipelineError::Transport(format!(
                "Download of {} failed with status {}",
                url,
                response.status()
            )));
        }

        let bytes = response.bytes().await.map_err(|e| {
            PipelineError::Transport(format!("Failed to read {}: {}", url, e))
        })?;

        Ok(String::from_utf8(bytes.to_vec()).ok())
    }

    pub async fn fetch_repository(
        &self,
        owner: &str,
        repo: &str,
        credential: Option<&str>,
    ) -> Result<FileMap> {
        let branch = self.resolve_branch(owner, repo, credential).await?;
        info!("Fetching GitHub tree for {}/{}@{}", owner, repo, branch);

        let url = format!(
            "{}/repos/{}/{}/git/trees/{}?recursive=1",
            GITHUB_API_BASE, owner, repo, branch
        );
        let tree: TreeResponse = self.get_json(&url, credential).await?;

        if tree.truncated {
            warn!("GitHub tree listing for {}/{} was truncated", owner, repo);
        }

        let mut files = FileMap::new();
        for entry in select_blobs(&tree.tree, &self.filter) {
            let url = raw_url(owner, repo, &branch, &entry.path);
            match self.download(url.as_str(), credential).await? {
                Some(content) => {
                    debug!("Fetched {} ({} bytes)", entry.path, content.len());
                    files.insert(entry.path.clone(), content);
                }
                None => debug!("Skipping non-UTF-8 file: {}", entry.path),
            }
        }

        info!("Retrieved {} files", files.len());
        Ok(files)
    }
}

/// Download URL for one blob, with every path segment percent-encoded.
fn raw_url(owner: &str, repo: &str, branch: &str, path: &str) -> Url {
    with_segments(
        &GITHUB_RAW,
        [owner, repo]
            .into_iter()
            .chain(branch.split('/'))
            .chain(path.split('/')),
    )
}

fn select_blobs<'t>(tree: &'t [TreeEntry], filter: &PathFilter) -> Vec<&'t TreeEntry> {
    tree.iter()
        .filter(|entry| entry.kind == "blob")
        .filter(|entry| {
            let accepted = filter.accepts(&entry.path, entry.size.unwrap_or(0));
            if !accepted {
                debug!("Skipping file: {}", entry.path);
            }
            accepted
        })
        .collect()
}

impl RepositoryFetcher for GithubFetcher {
    fn fetch<'a>(&'a self, repository: &'a str, credential: Option<&'a str>) -> FetchFuture<'a> {
        Box::pin(async move {
            match RepositoryId::parse(repository)? {
                RepositoryId::GitHub { owner, repo } => {
                    self.fetch_repository(&owner, &repo, credential).await
                }
                RepositoryId::Local(path) => Err(PipelineError::Config(format!(
                    "{} is a local directory, not a GitHub repository",
                    path.display()
                ))),
            }
        })
    }
}
