// file: src/models/file_index.rs
// description: stable, ordered file listing shared by every pipeline stage
// reference: internal data structures

use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: String,
    pub content: String,
}

/// Ordered (path, content) pairs for one pipeline run.
///
/// Positions are assigned once at construction and are the only identifiers
/// abstractions and chapters use to reference files.
#[derive(Debug, Clone, Default)]
pub struct FileIndex {
    files: Vec<SourceFile>,
}

impl FileIndex {
    pub fn new(files: Vec<SourceFile>) -> Self {
        Self { files }
    }

    pub fn from_map(map: BTreeMap<String, String>) -> Self {
        Self::new(
            map.into_iter()
                .map(|(path, content)| SourceFile { path, content })
                .collect(),
        )
    }

    pub fn get(&self, index: usize) -> Option<&SourceFile> {
        self.files.get(index)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &SourceFile)> {
        self.files.iter().enumerate()
    }

    pub fn total_bytes(&self) -> usize {
        self.files.iter().map(|f| f.content.len()).sum()
    }

    /// One `- {i} # {path}` line per file.
    pub fn reference_listing(&self) -> String {
        self.iter()
            .map(|(i, file)| format!("- {} # {}", i, file.path))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Every file's index, path and full content, in index order.
    pub fn context_dump(&self) -> String {
        self.iter()
            .map(|(i, file)| format!("--- File Index {}: {} ---\n{}", i, file.path, file.content))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> FileIndex {
        let mut map = BTreeMap::new();
        map.insert("src/main.py".to_string(), "print('hi')".to_string());
        map.insert("README.md".to_string(), "# Demo".to_string());
        FileIndex::from_map(map)
    }

    #[test]
    fn test_order_follows_map_order() {
        let index = sample();
        assert_eq!(index.len(), 2);
        assert_eq!(index.get(0).unwrap().path, "README.md");
        assert_eq!(index.get(1).unwrap().path, "src/main.py");
        assert!(index.get(2).is_none());
    }

    #[test]
    fn test_reference_listing() {
        assert_eq!(
            sample().reference_listing(),
            "- 0 # README.md\n- 1 # src/main.py"
        );
    }

    #[test]
    fn test_context_dump_matches_listing_order() {
        let dump = sample().context_dump();
        let first = dump.find("File Index 0: README.md").unwrap();
        let second = dump.find("File Index 1: src/main.py").unwrap();
        assert!(first < second);
        assert!(dump.contains("--- File Index 1: src/main.py ---\nprint('hi')"));
    }
}
