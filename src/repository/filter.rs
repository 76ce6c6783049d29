// file: src/repository/filter.rs
// description: path and size filtering shared by every repository fetcher
// reference: skip-pattern matching for repository files

use crate::config::RepositoryConfig;

#[derive(Debug, Clone)]
pub struct PathFilter {
    skip_patterns: Vec<String>,
    max_file_size: u64,
}

impl PathFilter {
    pub fn new(skip_patterns: Vec<String>, max_file_size_kb: usize) -> Self {
        Self {
            skip_patterns,
            max_file_size: (max_file_size_kb * 1024) as u64,
        }
    }

    pub fn from_config(config: &RepositoryConfig) -> Self {
        Self::new(config.skip_patterns.clone(), config.max_file_size_kb)
    }

    /// `*.ext` matches by suffix, anything else matches as a substring of
    /// the `/`-separated relative path.
    pub fn should_skip(&self, path: &str) -> bool {
        for pattern in &self.skip_patterns {
            if let Some(suffix) = pattern.strip_prefix('*') {
                if path.ends_with(suffix) {
                    return true;
                }
            } else if path.contains(pattern.as_str()) {
                return true;
            }
        }

        false
    }

    pub fn exceeds_size(&self, size: u64) -> bool {
        size > self.max_file_size
    }

    pub fn accepts(&self, path: &str, size: u64) -> bool {
        !self.should_skip(path) && !self.exceeds_size(size)
    }
}
