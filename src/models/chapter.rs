// file: src/models/chapter.rs
// description: persisted tutorial chapter and its naming rules
// reference: internal data structures

use crate::models::Abstraction;
use std::path::{Path, PathBuf};

/// One written chapter. Created by the generator and never mutated after
/// its file is written.
#[derive(Debug, Clone)]
pub struct TutorialChapter {
    pub order: usize,
    pub abstraction: Abstraction,
    pub body: String,
    pub destination_path: PathBuf,
}

impl TutorialChapter {
    pub fn new(order: usize, abstraction: Abstraction, body: String, output_dir: &Path) -> Self {
        let destination_path = output_dir.join(Self::file_name(order, &abstraction));
        Self {
            order,
            abstraction,
            body,
            destination_path,
        }
    }

    pub fn heading(order: usize, name: &str) -> String {
        format!("# Chapter {}: {}", order, name)
    }

    pub fn file_name(order: usize, abstraction: &Abstraction) -> String {
        format!("{:02}_{}.md", order, abstraction.slug())
    }

    /// Trims the model output and prepends the mandated heading unless the
    /// first line already is that heading.
    pub fn with_heading(order: usize, name: &str, raw: &str) -> String {
        let heading = Self::heading(order, name);
        let content = raw.trim();
        if content.lines().next().map(str::trim_end) == Some(heading.as_str()) {
            content.to_string()
        } else {
            format!("{}\n\n{}", heading, content)
        }
    }
}
