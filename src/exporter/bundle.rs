// file: src/exporter/bundle.rs
// description: packages persisted chapters into a single tar archive
// reference: https://docs.rs/tar

use crate::error::{PipelineError, Result};
use crate::exporter::catalog::ChapterCatalog;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::info;

pub struct BundleExporter {
    output_dir: PathBuf,
}

impl BundleExporter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Writes every chapter of the output directory into `archive_path`,
    /// each entry named by its bare file name. Returns the entry count.
    pub fn export(&self, archive_path: &Path) -> Result<usize> {
        let chapters = ChapterCatalog::new(&self.output_dir).chapter_files()?;
        if chapters.is_empty() {
            return Err(PipelineError::Validation(format!(
                "No chapters found in {}",
                self.output_dir.display()
            )));
        }

        if let Some(parent) = archive_path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| PipelineError::file_operation(parent, e))?;
        }

        let file =
            File::create(archive_path).map_err(|e| PipelineError::file_operation(archive_path, e))?;
        let mut builder = tar::Builder::new(file);

        for chapter in &chapters {
            let name = chapter.file_name().ok_or_else(|| {
                PipelineError::Validation(format!("Invalid chapter path: {}", chapter.display()))
            })?;
            builder
                .append_path_with_name(chapter, name)
                .map_err(|e| PipelineError::file_operation(chapter, e))?;
        }

        builder
            .finish()
            .map_err(|e| PipelineError::file_operation(archive_path, e))?;

        info!(
            "Bundled {} chapters into {}",
            chapters.len(),
            archive_path.display()
        );
        Ok(chapters.len())
    }
}
