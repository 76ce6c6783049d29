// file: src/models/abstraction.rs
// description: canonical abstraction record produced by the extractor
// reference: internal data structures

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A core concept of the codebase, anchored to file indices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Abstraction {
    pub name: String,
    pub description: String,
    pub files: BTreeSet<usize>,
}

impl Abstraction {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        files: impl IntoIterator<Item = usize>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            files: files.into_iter().collect(),
        }
    }

    /// Lowercased name with every non-alphanumeric character replaced by `_`.
    pub fn slug(&self) -> String {
        self.name
            .chars()
            .map(|c| if c.is_alphanumeric() { c } else { '_' })
            .collect::<String>()
            .to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_files_sorted_and_deduplicated() {
        let abstraction = Abstraction::new("Router", "", [3, 1, 3, 0]);
        assert_eq!(abstraction.files.into_iter().collect::<Vec<_>>(), vec![0, 1, 3]);
    }

    #[test]
    fn test_slug() {
        assert_eq!(Abstraction::new("Core Loop", "", []).slug(), "core_loop");
        assert_eq!(
            Abstraction::new("Title: Subtitle (v2)", "", []).slug(),
            "title__subtitle__v2_"
        );
        assert_eq!(Abstraction::new("상태 관리", "", []).slug(), "상태_관리");
    }
}
