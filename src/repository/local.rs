// file: src/repository/local.rs
// description: Directory walking fetcher for repositories already on disk
// reference: https://docs.rs/walkdir

use crate::error::{PipelineError, Result};
use crate::repository::filter::PathFilter;
use crate::repository::{FetchFuture, FileMap, RepositoryFetcher};
use crate::utils::Validator;
use std::fs;
use std::path::Path;
use tracing::{debug, info};
use walkdir::WalkDir;

pub struct LocalFetcher {
    filter: PathFilter,
}

impl LocalFetcher {
    pub fn new(filter: PathFilter) -> Self {
        Self { filter }
    }

    pub fn scan_directory(&self, root: &Path) -> Result<FileMap> {
        Validator::validate_directory(root)?;
        info!("Scanning directory: {}", root.display());
        let mut files = FileMap::new();

        for entry in WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            let relative_path = Validator::sanitize_file_path(
                &path.strip_prefix(root).unwrap_or(path).to_string_lossy(),
            );

            if self.filter.should_skip(&relative_path) {
                debug!("Skipping file: {}", relative_path);
                continue;
            }

            let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
            if self.filter.exceeds_size(size) {
                debug!("Skipping large file ({} KB): {}", size / 1024, relative_path);
                continue;
            }

            let bytes = fs::read(path).map_err(|e| PipelineError::file_operation(path, e))?;
            match String::from_utf8(bytes) {
                Ok(content) => {
                    files.insert(relative_path, content);
                }
                Err(_) => debug!("Skipping non-UTF-8 file: {}", relative_path),
            }
        }

        info!("Found {} files", files.len());
        Ok(files)
    }
}

impl RepositoryFetcher for LocalFetcher {
    fn fetch<'a>(&'a self, repository: &'a str, _credential: Option<&'a str>) -> FetchFuture<'a> {
        Box::pin(async move { self.scan_directory(Path::new(repository)) })
    }
}
