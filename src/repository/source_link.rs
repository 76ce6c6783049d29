// file: src/repository/source_link.rs
// description: repository identifier parsing and source-view link generation
// reference: https://docs.github.com/en/repositories

use crate::error::{PipelineError, Result};
use lazy_static::lazy_static;
use regex::Regex;
use reqwest::Url;
use std::path::{Path, PathBuf};

lazy_static! {
    static ref GITHUB_URL: Regex = Regex::new(
        r"^(?:https?://)?(?:www\.)?github\.com/([A-Za-z0-9_.-]+)/([A-Za-z0-9_.-]+?)(?:\.git)?(?:[/?#].*)?$"
    ).expect("GITHUB_URL regex is valid");

    static ref OWNER_REPO: Regex = Regex::new(
        r"^([A-Za-z0-9_.-]+)/([A-Za-z0-9_.-]+)$"
    ).expect("OWNER_REPO regex is valid");

    static ref GITHUB_WEB: Url = Url::parse("https://github.com").expect("GITHUB_WEB url is valid");
}

/// GitHub resolves `HEAD` to the repository's default branch.
pub const DEFAULT_BRANCH: &str = "HEAD";

/// Appends `segments` to the path of `base`, percent-encoding each one so
/// that `#`, `?` and spaces in file names stay part of the path.
pub fn with_segments<'s>(base: &Url, segments: impl IntoIterator<Item = &'s str>) -> Url {
    let mut url = base.clone();
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepositoryId {
    GitHub { owner: String, repo: String },
    Local(PathBuf),
}

impl RepositoryId {
    /// Existing directories are local; otherwise the identifier must be a
    /// GitHub URL or `owner/repo`.
    pub fn parse(identifier: &str) -> Result<Self> {
        let identifier = identifier.trim();

        if Path::new(identifier).is_dir() {
            let path = std::fs::canonicalize(identifier)
                .map_err(|e| PipelineError::file_operation(identifier, e))?;
            return Ok(Self::Local(path));
        }

        let captures = GITHUB_URL
            .captures(identifier)
            .or_else(|| OWNER_REPO.captures(identifier))
            .ok_or_else(|| {
                PipelineError::Config(format!(
                    "Unrecognized repository identifier: {}",
                    identifier
                ))
            })?;

        Ok(Self::GitHub {
            owner: captures[1].to_string(),
            repo: captures[2].to_string(),
        })
    }
}

/// Builds links to a file's source view for the chapter code context.
#[derive(Debug, Clone)]
pub struct SourceLinker {
    repository: RepositoryId,
    branch: String,
}

impl SourceLinker {
    pub fn new(repository: RepositoryId, branch: &str) -> Self {
        let branch = if branch.trim().is_empty() {
            DEFAULT_BRANCH.to_string()
        } else {
            branch.trim().to_string()
        };
        Self { repository, branch }
    }

    pub fn link(&self, path: &str) -> String {
        match &self.repository {
            RepositoryId::GitHub { owner, repo } => with_segments(
                &GITHUB_WEB,
                [owner.as_str(), repo.as_str(), "blob"]
                    .into_iter()
                    .chain(self.branch.split('/'))
                    .chain(path.split('/')),
            )
            .to_string(),
            RepositoryId::Local(root) => {
                let full = root.join(path);
                Url::from_file_path(&full)
                    .map(String::from)
                    .unwrap_or_else(|_| format!("file://{}", full.display()))
            }
        }
    }
}
