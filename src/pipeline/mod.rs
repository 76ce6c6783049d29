// file: src/pipeline/mod.rs
// description: pipeline module exports and public api
// reference: pipeline orchestration

pub mod context;
pub mod extractor;
pub mod generator;
pub mod orchestrator;
mod progress;
pub mod prompts;

pub use context::PipelineContext;
pub use extractor::{AbstractionExtractor, normalize_records};
pub use generator::TutorialGenerator;
pub use orchestrator::{PipelineOrchestrator, RunReport, TutorialRequest};
pub use progress::{ChapterProgress, PipelineStats};
