// file: src/llm/mod.rs
// description: language-model port and its live adapters
// reference: internal module structure

pub mod openai;

use crate::error::Result;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

pub use openai::OpenAiChatClient;

/// Boxed future returned by [`LanguageModel::complete`]; boxing keeps the
/// trait object-safe so stages can hold `dyn LanguageModel`.
pub type CompletionFuture<'a> = Pin<Box<dyn Future<Output = Result<String>> + Send + 'a>>;

/// Prompt in, response text out. One request per call, no streaming.
pub trait LanguageModel: Send + Sync {
    /// # Errors
    ///
    /// Returns [`crate::PipelineError::Transport`] when the request fails.
    fn complete<'a>(&'a self, prompt: &'a str) -> CompletionFuture<'a>;
}

impl<M: LanguageModel + ?Sized> LanguageModel for Arc<M> {
    fn complete<'a>(&'a self, prompt: &'a str) -> CompletionFuture<'a> {
        (**self).complete(prompt)
    }
}
