// file: src/testing.rs
// description: in-memory model and fetcher doubles for pipeline tests
// reference: scripted port implementations

use crate::error::{PipelineError, Result};
use crate::llm::{CompletionFuture, LanguageModel};
use crate::repository::{FetchFuture, FileMap, RepositoryFetcher};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Replies with queued responses in order and records every prompt.
/// Once the queue is empty every call fails with a transport error.
pub struct ScriptedModel {
    responses: Mutex<VecDeque<Result<String>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedModel {
    pub fn new(responses: Vec<&str>) -> Self {
        Self::from_results(responses.into_iter().map(|r| Ok(r.to_string())).collect())
    }

    pub fn from_results(responses: Vec<Result<String>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self::from_results(vec![Err(PipelineError::Transport(message.to_string()))])
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

impl LanguageModel for ScriptedModel {
    fn complete<'a>(&'a self, prompt: &'a str) -> CompletionFuture<'a> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        let response = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(PipelineError::Transport("no scripted response left".to_string())));
        Box::pin(async move { response })
    }
}

pub struct StaticFetcher {
    files: FileMap,
    calls: AtomicUsize,
}

impl StaticFetcher {
    pub fn new(files: &[(&str, &str)]) -> Self {
        Self {
            files: files
                .iter()
                .map(|(path, content)| (path.to_string(), content.to_string()))
                .collect(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl RepositoryFetcher for StaticFetcher {
    fn fetch<'a>(&'a self, _repository: &'a str, _credential: Option<&'a str>) -> FetchFuture<'a> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let files = self.files.clone();
        Box::pin(async move { Ok(files) })
    }
}
