// file: src/pipeline/context.rs
// description: explicit bundle of the capabilities every pipeline stage receives
// reference: injected fetcher, model, and per-run tracing span

use crate::llm::LanguageModel;
use crate::repository::RepositoryFetcher;
use tracing::{Span, info_span};
use uuid::Uuid;

/// Capabilities for one pipeline run. Stages take what they need from here
/// instead of reaching for process-wide clients.
pub struct PipelineContext {
    pub fetcher: Box<dyn RepositoryFetcher>,
    pub model: Box<dyn LanguageModel>,
    pub run_id: Uuid,
    /// Every event of the run is recorded inside this span.
    pub span: Span,
}

impl PipelineContext {
    pub fn new(fetcher: Box<dyn RepositoryFetcher>, model: Box<dyn LanguageModel>) -> Self {
        let run_id = Uuid::new_v4();
        let span = info_span!("run", id = %run_id);
        Self {
            fetcher,
            model,
            run_id,
            span,
        }
    }
}
