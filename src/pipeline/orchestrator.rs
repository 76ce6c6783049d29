// file: src/pipeline/orchestrator.rs
// description: coordinates repository fetching, abstraction extraction, and chapter generation
// reference: orchestrates the sequential tutorial workflow

use crate::config::Config;
use crate::error::{PipelineError, Result};
use crate::models::{Abstraction, FileIndex};
use crate::pipeline::context::PipelineContext;
use crate::pipeline::extractor::AbstractionExtractor;
use crate::pipeline::generator::TutorialGenerator;
use crate::pipeline::progress::PipelineStats;
use crate::repository::{RepositoryId, SourceLinker};
use crate::utils::Validator;
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{Instrument, error, info};
use uuid::Uuid;

/// Everything one run needs besides its capabilities.
#[derive(Debug, Clone)]
pub struct TutorialRequest {
    pub repository: String,
    pub credential: Option<String>,
    pub branch: String,
    pub project_name: String,
    pub language: String,
    pub max_abstractions: usize,
    pub output_dir: PathBuf,
    pub show_progress: bool,
}

impl TutorialRequest {
    pub fn from_config(config: &Config, repository: impl Into<String>) -> Self {
        Self {
            repository: repository.into(),
            credential: config.repository.github_token.clone(),
            branch: config.repository.branch.clone(),
            project_name: config.tutorial.project_name.clone(),
            language: config.tutorial.language.clone(),
            max_abstractions: config.tutorial.max_abstractions,
            output_dir: config.tutorial.output_dir.clone(),
            show_progress: false,
        }
    }

    pub fn validate(&self) -> Result<()> {
        Validator::validate_max_abstractions(self.max_abstractions)?;
        Validator::validate_language(&self.language)?;
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct RunReport {
    pub run_id: Uuid,
    pub abstractions: Vec<Abstraction>,
    pub chapter_paths: Vec<PathBuf>,
    pub stats: PipelineStats,
    pub finished_at: DateTime<Utc>,
}

pub struct PipelineOrchestrator {
    ctx: PipelineContext,
}

impl PipelineOrchestrator {
    pub fn new(ctx: PipelineContext) -> Self {
        Self { ctx }
    }

    /// Fetches the repository and assigns file indices. An empty repository
    /// fails here, before any model call.
    pub async fn fetch_files(&self, request: &TutorialRequest) -> Result<FileIndex> {
        info!("Fetching repository: {}", request.repository);
        let files = self
            .ctx
            .fetcher
            .fetch(&request.repository, request.credential.as_deref())
            .await?;

        if files.is_empty() {
            error!("No files found in repository: {}", request.repository);
            return Err(PipelineError::FetchEmpty {
                repository: request.repository.clone(),
            });
        }

        let index = FileIndex::from_map(files);
        info!("Retrieved {} files ({} bytes)", index.len(), index.total_bytes());
        Ok(index)
    }

    pub async fn extract(&self, request: &TutorialRequest) -> Result<(FileIndex, Vec<Abstraction>)> {
        self.fetch_and_extract(request)
            .instrument(self.ctx.span.clone())
            .await
    }

    /// Fetch, extract, then write one chapter per abstraction.
    pub async fn run(&self, request: &TutorialRequest) -> Result<RunReport> {
        self.run_stages(request)
            .instrument(self.ctx.span.clone())
            .await
    }

    async fn fetch_and_extract(
        &self,
        request: &TutorialRequest,
    ) -> Result<(FileIndex, Vec<Abstraction>)> {
        request.validate()?;
        let files = self.fetch_files(request).await?;
        let abstractions = AbstractionExtractor::new(self.ctx.model.as_ref())
            .extract(
                &files,
                &request.project_name,
                &request.language,
                request.max_abstractions,
            )
            .await?;
        Ok((files, abstractions))
    }

    async fn run_stages(&self, request: &TutorialRequest) -> Result<RunReport> {
        let start_time = Instant::now();
        info!("Starting tutorial pipeline for {}", request.repository);

        let (files, abstractions) = self.fetch_and_extract(request).await?;
        let linker = SourceLinker::new(RepositoryId::parse(&request.repository)?, &request.branch);

        let chapter_paths = TutorialGenerator::new(
            self.ctx.model.as_ref(),
            linker,
            request.project_name.clone(),
            request.language.clone(),
            request.output_dir.clone(),
        )
        .with_progress(request.show_progress)
        .generate(&abstractions, &files)
        .await?;

        let stats = PipelineStats {
            files_fetched: files.len(),
            bytes_fetched: files.total_bytes(),
            abstractions: abstractions.len(),
            chapters_written: chapter_paths.len(),
            duration_secs: start_time.elapsed().as_secs_f64(),
        };
        info!(
            "Pipeline complete: {} chapters from {} files in {:.2}s",
            stats.chapters_written, stats.files_fetched, stats.duration_secs
        );

        Ok(RunReport {
            run_id: self.ctx.run_id,
            abstractions,
            chapter_paths,
            stats,
            finished_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ScriptedModel, StaticFetcher};
    use pretty_assertions::assert_eq;
    use std::fs;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn request(output_dir: PathBuf) -> TutorialRequest {
        TutorialRequest {
            repository: "https://github.com/acme/demo".to_string(),
            credential: None,
            branch: String::new(),
            project_name: "Demo".to_string(),
            language: "english".to_string(),
            max_abstractions: 5,
            output_dir,
            show_progress: false,
        }
    }

    fn orchestrator(
        fetcher: &Arc<StaticFetcher>,
        model: &Arc<ScriptedModel>,
    ) -> PipelineOrchestrator {
        PipelineOrchestrator::new(PipelineContext::new(
            Box::new(Arc::clone(fetcher)),
            Box::new(Arc::clone(model)),
        ))
    }

    #[tokio::test]
    async fn test_end_to_end_single_chapter() {
        let temp = TempDir::new().unwrap();
        let out = temp.path().join("docs");
        let fetcher = Arc::new(StaticFetcher::new(&[("a.py", "while True: tick()"), ("b.py", "def tick(): ...")]));
        let model = Arc::new(ScriptedModel::new(vec![
            "```yaml\n- name: Core Loop\n  description: The heartbeat.\n  file_indices: [0, 1]\n```",
            "The loop keeps everything moving.",
        ]));

        let report = orchestrator(&fetcher, &model)
            .run(&request(out.clone()))
            .await
            .unwrap();

        assert_eq!(report.abstractions.len(), 1);
        assert_eq!(report.abstractions[0].name, "Core Loop");
        assert_eq!(report.abstractions[0].files.iter().copied().collect::<Vec<_>>(), vec![0, 1]);
        assert_eq!(report.chapter_paths, vec![out.join("01_core_loop.md")]);

        let body = fs::read_to_string(&report.chapter_paths[0]).unwrap();
        assert!(body.starts_with("# Chapter 1: Core Loop"));

        let chapter_prompt = &model.prompts()[1];
        assert!(chapter_prompt.contains("https://github.com/acme/demo/blob/HEAD/a.py"));
        assert!(chapter_prompt.contains("def tick(): ..."));

        assert_eq!(report.stats.files_fetched, 2);
        assert_eq!(report.stats.chapters_written, 1);
        assert!(report.stats.is_complete());
    }

    #[tokio::test]
    async fn test_n_records_give_n_chapters_in_order() {
        let temp = TempDir::new().unwrap();
        let out = temp.path().join("docs");
        let fetcher = Arc::new(StaticFetcher::new(&[("main.py", "run()")]));
        let model = Arc::new(ScriptedModel::new(vec![
            "```yaml\n- name: Alpha\n  file_indices: [0]\n- name: \"Beta: Two\"\n  file_indices: []\n- name: Gamma\n  file_indices: [\"0 # main.py\"]\n```",
            "alpha",
            "beta",
            "gamma",
        ]));

        let report = orchestrator(&fetcher, &model)
            .run(&request(out.clone()))
            .await
            .unwrap();

        let names: Vec<_> = report
            .chapter_paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["01_alpha.md", "02_beta__two.md", "03_gamma.md"]);
        assert_eq!(
            fs::read_to_string(out.join("02_beta__two.md")).unwrap(),
            "# Chapter 2: Beta: Two\n\nbeta"
        );
        assert_eq!(model.call_count(), 4);
    }

    #[tokio::test]
    async fn test_empty_fetch_makes_no_model_calls() {
        let temp = TempDir::new().unwrap();
        let fetcher = Arc::new(StaticFetcher::new(&[]));
        let model = Arc::new(ScriptedModel::new(vec!["unused"]));

        let err = orchestrator(&fetcher, &model)
            .run(&request(temp.path().join("docs")))
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::FetchEmpty { .. }));
        assert_eq!(fetcher.call_count(), 1);
        assert_eq!(model.call_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_block_writes_no_chapters() {
        let temp = TempDir::new().unwrap();
        let out = temp.path().join("docs");
        let fetcher = Arc::new(StaticFetcher::new(&[("a.py", "x")]));
        let model = Arc::new(ScriptedModel::new(vec!["Here are some thoughts, no YAML."]));

        let err = orchestrator(&fetcher, &model)
            .run(&request(out.clone()))
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::BlockNotFound { .. }));
        assert!(!out.exists());
        assert_eq!(model.call_count(), 1);
    }

    #[tokio::test]
    async fn test_zero_abstractions_rejected_before_fetch() {
        let temp = TempDir::new().unwrap();
        let fetcher = Arc::new(StaticFetcher::new(&[("a.py", "x")]));
        let model = Arc::new(ScriptedModel::new(vec![]));
        let mut request = request(temp.path().join("docs"));
        request.max_abstractions = 0;

        let err = orchestrator(&fetcher, &model).run(&request).await.unwrap_err();

        assert!(matches!(err, PipelineError::Validation(_)));
        assert_eq!(fetcher.call_count(), 0);
    }

    #[test]
    fn test_request_from_config() {
        let config = Config::default_config();
        let request = TutorialRequest::from_config(&config, "acme/demo");

        assert_eq!(request.repository, "acme/demo");
        assert_eq!(request.max_abstractions, config.tutorial.max_abstractions);
        assert_eq!(request.output_dir, config.tutorial.output_dir);
        assert!(request.validate().is_ok());
    }
}
