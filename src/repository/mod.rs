// file: src/repository/mod.rs
// description: Repository fetcher port and its adapters
// reference: Internal module structure

pub mod filter;
pub mod github;
pub mod local;
pub mod source_link;

use crate::config::RepositoryConfig;
use crate::error::Result;
use std::collections::BTreeMap;
use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use std::sync::Arc;

pub use filter::PathFilter;
pub use github::GithubFetcher;
pub use local::LocalFetcher;
pub use source_link::{RepositoryId, SourceLinker};

/// Relative path to file content. Iteration order is the FileIndex order.
pub type FileMap = BTreeMap<String, String>;

pub type FetchFuture<'a> = Pin<Box<dyn Future<Output = Result<FileMap>> + Send + 'a>>;

/// Returns every file of a repository, keyed by relative path.
pub trait RepositoryFetcher: Send + Sync {
    /// # Errors
    ///
    /// Transport and authentication failures propagate unchanged.
    fn fetch<'a>(&'a self, repository: &'a str, credential: Option<&'a str>) -> FetchFuture<'a>;
}

impl<F: RepositoryFetcher + ?Sized> RepositoryFetcher for Arc<F> {
    fn fetch<'a>(&'a self, repository: &'a str, credential: Option<&'a str>) -> FetchFuture<'a> {
        (**self).fetch(repository, credential)
    }
}

/// Picks the local fetcher for existing directories and GitHub otherwise.
pub fn fetcher_for(repository: &str, config: &RepositoryConfig) -> Box<dyn RepositoryFetcher> {
    let filter = PathFilter::from_config(config);
    if Path::new(repository).is_dir() {
        Box::new(LocalFetcher::new(filter))
    } else {
        Box::new(GithubFetcher::new(filter, Some(config.branch.clone())))
    }
}
