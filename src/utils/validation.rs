// file: src/utils/validation.rs
// description: input validation utilities and helpers
// reference: input validation patterns

use crate::error::{PipelineError, Result};
use std::path::Path;

pub struct Validator;

impl Validator {
    pub fn validate_directory(path: &Path) -> Result<()> {
        if !path.exists() {
            return Err(PipelineError::Validation(format!(
                "Directory does not exist: {}",
                path.display()
            )));
        }

        if !path.is_dir() {
            return Err(PipelineError::Validation(format!(
                "Path is not a directory: {}",
                path.display()
            )));
        }

        Ok(())
    }

    pub fn validate_max_abstractions(count: usize) -> Result<()> {
        if count == 0 {
            return Err(PipelineError::Validation(
                "At least one abstraction must be requested".to_string(),
            ));
        }
        Ok(())
    }

    pub fn validate_language(language: &str) -> Result<()> {
        if language.trim().is_empty() {
            return Err(PipelineError::Validation("Language is empty".to_string()));
        }
        Ok(())
    }

    pub fn sanitize_file_path(path: &str) -> String {
        path.replace('\\', "/")
            .replace("//", "/")
            .trim()
            .to_string()
    }

    pub fn truncate_text(text: &str, max_chars: usize) -> String {
        if text.chars().count() <= max_chars {
            text.to_string()
        } else {
            format!("{}...", text.chars().take(max_chars).collect::<String>())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_validate_directory() {
        let temp = TempDir::new().unwrap();
        assert!(Validator::validate_directory(temp.path()).is_ok());
        assert!(Validator::validate_directory(Path::new("/nonexistent")).is_err());

        let file = temp.path().join("file.md");
        std::fs::write(&file, "x").unwrap();
        assert!(Validator::validate_directory(&file).is_err());
    }

    #[test]
    fn test_validate_max_abstractions() {
        assert!(Validator::validate_max_abstractions(1).is_ok());
        assert!(Validator::validate_max_abstractions(0).is_err());
    }

    #[test]
    fn test_validate_language() {
        assert!(Validator::validate_language("korean").is_ok());
        assert!(Validator::validate_language("  ").is_err());
    }

    #[test]
    fn test_sanitize_file_path() {
        assert_eq!(
            Validator::sanitize_file_path("path\\to\\file"),
            "path/to/file"
        );
        assert_eq!(
            Validator::sanitize_file_path("path//to//file"),
            "path/to/file"
        );
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(Validator::truncate_text("short", 10), "short");
        assert_eq!(
            Validator::truncate_text("this is a very long text", 10),
            "this is a ..."
        );
        assert_eq!(Validator::truncate_text("튜토리얼 생성기", 4), "튜토리얼...");
    }
}
