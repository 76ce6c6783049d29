// file: src/lib.rs
// description: library entry point and public api exports
// reference: rust library patterns
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/readme.md"))]

pub mod config;
pub mod error;
pub mod exporter;
pub mod llm;
pub mod models;
pub mod parser;
pub mod pipeline;
pub mod repository;
pub mod utils;

#[cfg(test)]
mod testing;

pub use config::{Config, LlmConfig, RepositoryConfig, TutorialConfig};
pub use error::{PipelineError, Result};
pub use exporter::{BundleExporter, CatalogEntry, ChapterCatalog};
pub use llm::{LanguageModel, OpenAiChatClient};
pub use models::{Abstraction, FileIndex, SourceFile, TutorialChapter};
pub use parser::{RawRecord, StructuredBlockParser, repair_block};
pub use pipeline::{
    AbstractionExtractor, ChapterProgress, PipelineContext, PipelineOrchestrator, PipelineStats,
    RunReport, TutorialGenerator, TutorialRequest,
};
pub use repository::{
    GithubFetcher, LocalFetcher, PathFilter, RepositoryFetcher, RepositoryId, SourceLinker,
    fetcher_for,
};
pub use utils::Validator;
