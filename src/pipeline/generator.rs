// file: src/pipeline/generator.rs
// description: writes one markdown chapter per abstraction in teaching order
// reference: sequential LanguageModel calls, one per chapter, written to the destination directory

use crate::error::{PipelineError, Result};
use crate::llm::LanguageModel;
use crate::models::{Abstraction, FileIndex, TutorialChapter};
use crate::pipeline::progress::ChapterProgress;
use crate::pipeline::prompts::{ChapterPrompt, NO_CODE_PLACEHOLDER};
use crate::repository::SourceLinker;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info};

pub struct TutorialGenerator<'a> {
    model: &'a dyn LanguageModel,
    linker: SourceLinker,
    project_name: String,
    language: String,
    output_dir: PathBuf,
    show_progress: bool,
}

impl<'a> TutorialGenerator<'a> {
    pub fn new(
        model: &'a dyn LanguageModel,
        linker: SourceLinker,
        project_name: impl Into<String>,
        language: impl Into<String>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            model,
            linker,
            project_name: project_name.into(),
            language: language.into(),
            output_dir: output_dir.into(),
            show_progress: false,
        }
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Writes every chapter and returns their paths in abstraction order.
    ///
    /// The destination directory is emptied first. A model failure stops the
    /// run; chapters already written stay on disk.
    pub async fn generate(
        &self,
        abstractions: &[Abstraction],
        files: &FileIndex,
    ) -> Result<Vec<PathBuf>> {
        self.reset_output_dir()?;

        let total = abstractions.len();
        let progress = if self.show_progress {
            ChapterProgress::new(total)
        } else {
            ChapterProgress::hidden(total)
        };

        let mut paths = Vec::with_capacity(total);
        for (position, abstraction) in abstractions.iter().enumerate() {
            let number = position + 1;
            progress.start_chapter(number, &abstraction.name);

            let chapter = self
                .write_chapter(abstractions, position, files)
                .await?;

            progress.chapter_written();
            paths.push(chapter.destination_path);
        }

        progress.finish();
        info!(
            "Wrote {} chapters to {} in {:.1}s",
            paths.len(),
            self.output_dir.display(),
            progress.elapsed_secs()
        );
        Ok(paths)
    }

    async fn write_chapter(
        &self,
        abstractions: &[Abstraction],
        position: usize,
        files: &FileIndex,
    ) -> Result<TutorialChapter> {
        let number = position + 1;
        let abstraction = &abstractions[position];
        let code_context = self.code_context(abstraction, files);

        let prompt = ChapterPrompt {
            project_name: &self.project_name,
            language: &self.language,
            number,
            total: abstractions.len(),
            abstraction,
            previous: position.checked_sub(1).and_then(|p| abstractions.get(p)),
            next: abstractions.get(number),
            code_context: &code_context,
        }
        .render();
        debug!("Chapter {} prompt:\n{}", number, prompt);

        let response = self.model.complete(&prompt).await?;
        debug!("Chapter {} response:\n{}", number, response);

        let body = TutorialChapter::with_heading(number, &abstraction.name, &response);
        let chapter = TutorialChapter::new(number, abstraction.clone(), body, &self.output_dir);

        info!("Writing chapter {} to {}", number, chapter.destination_path.display());
        fs::write(&chapter.destination_path, &chapter.body)
            .map_err(|e| PipelineError::file_operation(&chapter.destination_path, e))?;

        Ok(chapter)
    }

    /// Source blocks for every referenced file that exists in `files`.
    pub fn code_context(&self, abstraction: &Abstraction, files: &FileIndex) -> String {
        let parts: Vec<String> = abstraction
            .files
            .iter()
            .filter_map(|&index| {
                let file = files.get(index);
                if file.is_none() {
                    debug!(
                        "Ignoring file index {} for {:?}: only {} files",
                        index,
                        abstraction.name,
                        files.len()
                    );
                }
                file
            })
            .map(|file| {
                format!(
                    "--- `{}` ([view source]({})) ---\n{}",
                    file.path,
                    self.linker.link(&file.path),
                    file.content
                )
            })
            .collect();

        if parts.is_empty() {
            NO_CODE_PLACEHOLDER.to_string()
        } else {
            parts.join("\n\n")
        }
    }

    fn reset_output_dir(&self) -> Result<()> {
        if self.output_dir.exists() {
            debug!("Removing previous output in {}", self.output_dir.display());
            fs::remove_dir_all(&self.output_dir)
                .map_err(|e| PipelineError::file_operation(&self.output_dir, e))?;
        }
        fs::create_dir_all(&self.output_dir)
            .map_err(|e| PipelineError::file_operation(&self.output_dir, e))
    }
}
