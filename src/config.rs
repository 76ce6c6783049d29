// file: src/config.rs
// description: application configuration management with toml support
// reference: https://docs.rs/config

use crate::error::{PipelineError, Result};
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub repository: RepositoryConfig,
    pub llm: LlmConfig,
    pub tutorial: TutorialConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RepositoryConfig {
    pub source: String,
    /// Branch used for GitHub fetches and source links. Empty means the
    /// repository's default branch.
    #[serde(default)]
    pub branch: String,
    #[serde(default)]
    pub github_token: Option<String>,
    pub skip_patterns: Vec<String>,
    pub max_file_size_kb: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LlmConfig {
    pub api_base: String,
    #[serde(default)]
    pub api_key: Option<String>,
    pub model: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TutorialConfig {
    pub project_name: String,
    pub language: String,
    pub max_abstractions: usize,
    pub output_dir: PathBuf,
    pub archive_name: String,
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenv().ok();

        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        } else {
            builder = builder.add_source(config::File::from(Path::new("config/default.toml")));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("REPO_TUTOR")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .map_err(|e| PipelineError::Config(e.to_string()))?;

        let mut config: Config = settings
            .try_deserialize()
            .map_err(|e| PipelineError::Config(e.to_string()))?;

        config.apply_env_credentials();
        config.validate()?;
        Ok(config)
    }

    pub fn default_config() -> Self {
        let mut config = Self {
            repository: RepositoryConfig {
                source: "https://github.com/user/example-repo".to_string(),
                branch: String::new(),
                github_token: None,
                skip_patterns: vec![
                    ".git/".to_string(),
                    "*.lock".to_string(),
                    "*.png".to_string(),
                    "*.jpg".to_string(),
                    "*.zip".to_string(),
                    "*.pdf".to_string(),
                    "node_modules/".to_string(),
                    "target/".to_string(),
                ],
                max_file_size_kb: 100,
            },
            llm: LlmConfig {
                api_base: "https://api.openai.com/v1".to_string(),
                api_key: None,
                model: "gpt-5-mini".to_string(),
                timeout_secs: 300,
            },
            tutorial: TutorialConfig {
                project_name: "MyProject".to_string(),
                language: "english".to_string(),
                max_abstractions: 5,
                output_dir: PathBuf::from("output"),
                archive_name: "all_tutorials.tar".to_string(),
            },
        };
        config.apply_env_credentials();
        config
    }

    /// Fills credentials left unset in the file from the conventional
    /// `OPENAI_API_KEY` and `GITHUB_TOKEN` variables.
    fn apply_env_credentials(&mut self) {
        if self.llm.api_key.is_none() {
            self.llm.api_key = std::env::var("OPENAI_API_KEY").ok().filter(|k| !k.is_empty());
        }
        if self.repository.github_token.is_none() {
            self.repository.github_token =
                std::env::var("GITHUB_TOKEN").ok().filter(|t| !t.is_empty());
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.tutorial.max_abstractions == 0 {
            return Err(PipelineError::Config(
                "max_abstractions must be greater than 0".to_string(),
            ));
        }

        if self.llm.model.trim().is_empty() {
            return Err(PipelineError::Config("llm.model must not be empty".to_string()));
        }

        if !self.llm.api_base.starts_with("http://") && !self.llm.api_base.starts_with("https://")
        {
            return Err(PipelineError::Config(format!(
                "llm.api_base must be an http(s) URL: {}",
                self.llm.api_base
            )));
        }

        if self.tutorial.archive_name.trim().is_empty() {
            return Err(PipelineError::Config(
                "archive_name must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}
