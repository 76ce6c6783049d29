// file: src/exporter/catalog.rs
// description: lists persisted chapters with display titles
// reference: https://docs.rs/pulldown-cmark

use crate::error::{PipelineError, Result};
use pulldown_cmark::{Event, HeadingLevel, Parser, Tag, TagEnd};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogEntry {
    pub file_name: String,
    pub title: String,
    pub path: PathBuf,
}

pub struct ChapterCatalog {
    output_dir: PathBuf,
}

impl ChapterCatalog {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Markdown files of the destination directory in file-name order.
    /// A missing directory yields an empty list.
    pub fn chapter_files(&self) -> Result<Vec<PathBuf>> {
        if !self.output_dir.exists() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&self.output_dir)
            .map_err(|e| PipelineError::file_operation(&self.output_dir, e))?;

        let mut files = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "md") {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    pub fn entries(&self) -> Result<Vec<CatalogEntry>> {
        let mut entries = Vec::new();
        for path in self.chapter_files()? {
            let content =
                fs::read_to_string(&path).map_err(|e| PipelineError::file_operation(&path, e))?;
            let title = first_heading(&content).unwrap_or_else(|| display_name(&path));
            debug!("Catalogued {} as {:?}", path.display(), title);

            entries.push(CatalogEntry {
                file_name: file_name(&path),
                title,
                path,
            });
        }
        Ok(entries)
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

/// `01_core_loop.md` displays as `01 core loop`.
fn display_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().replace('_', " "))
        .unwrap_or_default()
}

fn first_heading(content: &str) -> Option<String> {
    let mut current: Option<String> = None;

    for event in Parser::new(content) {
        match event {
            Event::Start(Tag::Heading {
                level: HeadingLevel::H1,
                ..
            }) => {
                current = Some(String::new());
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some(text) = current.take() {
                    let text = text.trim().to_string();
                    if !text.is_empty() {
                        return Some(text);
                    }
                }
            }
            Event::Text(text) | Event::Code(text) => {
                if let Some(ref mut heading) = current {
                    heading.push_str(&text);
                }
            }
            _ => {}
        }
    }

    None
}
