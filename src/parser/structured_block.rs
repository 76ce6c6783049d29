// file: src/parser/structured_block.rs
// description: fenced YAML block extraction and strict parsing of model output
// reference: https://docs.rs/yaml-rust

use crate::error::{PipelineError, Result};
use crate::parser::repair::repair_block;
use tracing::debug;
use yaml_rust::{Yaml, YamlLoader};

pub const DEFAULT_LABEL: &str = "yaml";
const FENCE: &str = "```";

/// Unvalidated record as parsed from the block; normally a mapping.
pub type RawRecord = Yaml;

pub struct StructuredBlockParser {
    label: String,
}

impl StructuredBlockParser {
    pub fn new() -> Self {
        Self::with_label(DEFAULT_LABEL)
    }

    pub fn with_label(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }

    /// Returns the trimmed body of the first fence opened with the label.
    pub fn extract_block<'a>(&self, text: &'a str) -> Result<&'a str> {
        let opening = format!("{}{}", FENCE, self.label);
        let not_found = || PipelineError::BlockNotFound {
            label: self.label.clone(),
        };

        let start = text.find(&opening).ok_or_else(not_found)?;
        let rest = &text[start + opening.len()..];
        let end = rest.find(FENCE).ok_or_else(not_found)?;

        Ok(rest[..end].trim())
    }

    /// Extracts, repairs and parses the block into a list of raw records.
    pub fn parse(&self, text: &str) -> Result<Vec<RawRecord>> {
        let block = self.extract_block(text)?;
        let repaired = repair_block(block);
        if repaired != block {
            debug!("Repaired structured block:\n{}", repaired);
        }

        let docs = YamlLoader::load_from_str(&repaired)
            .map_err(|source| PipelineError::MalformedBlock { source })?;

        match docs.into_iter().next() {
            Some(Yaml::Array(records)) => Ok(records),
            Some(other) => Err(PipelineError::UnexpectedShape(format!(
                "expected a list of records, found {}",
                describe(&other)
            ))),
            None => Err(PipelineError::UnexpectedShape(
                "structured block is empty".to_string(),
            )),
        }
    }
}

impl Default for StructuredBlockParser {
    fn default() -> Self {
        Self::new()
    }
}

pub fn describe(value: &Yaml) -> &'static str {
    match value {
        Yaml::Real(_) => "a float",
        Yaml::Integer(_) => "an integer",
        Yaml::String(_) => "a string",
        Yaml::Boolean(_) => "a boolean",
        Yaml::Array(_) => "a list",
        Yaml::Hash(_) => "a mapping",
        Yaml::Alias(_) => "an alias",
        Yaml::Null => "null",
        Yaml::BadValue => "an invalid value",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use yaml_rust::YamlEmitter;

    fn fenced(body: &str) -> String {
        format!("Here you go:\n```yaml\n{}\n```\nHope this helps.", body)
    }

    #[test]
    fn test_extract_block() {
        let parser = StructuredBlockParser::new();
        let text = fenced("- name: A");
        assert_eq!(parser.extract_block(&text).unwrap(), "- name: A");
    }

    #[test]
    fn test_missing_block() {
        let parser = StructuredBlockParser::new();
        let err = parser.parse("I could not find any abstractions.").unwrap_err();
        assert!(matches!(err, PipelineError::BlockNotFound { ref label } if label == "yaml"));
    }

    #[test]
    fn test_unclosed_block() {
        let parser = StructuredBlockParser::new();
        let err = parser.parse("```yaml\n- name: A\n").unwrap_err();
        assert!(matches!(err, PipelineError::BlockNotFound { .. }));
    }

    #[test]
    fn test_custom_label() {
        let parser = StructuredBlockParser::with_label("yml");
        let records = parser.parse("```yml\n- name: A\n```").unwrap();
        assert_eq!(records.len(), 1);
        assert!(StructuredBlockParser::new().parse("```yml\n- name: A\n```").is_err());
    }

    #[test]
    fn test_colon_in_name_is_repaired() {
        let parser = StructuredBlockParser::new();
        let records = parser
            .parse(&fenced("- name: Title: Subtitle\n  description: d\n  file_indices: [0]"))
            .unwrap();
        assert_eq!(records[0]["name"].as_str(), Some("Title: Subtitle"));
    }

    #[test]
    fn test_malformed_block() {
        let parser = StructuredBlockParser::new();
        let err = parser
            .parse(&fenced("- name: A\n  description: [unclosed"))
            .unwrap_err();
        assert!(matches!(err, PipelineError::MalformedBlock { .. }));
        assert!(err.to_string().starts_with("Failed to parse structured block"));
    }

    #[test]
    fn test_non_list_root() {
        let parser = StructuredBlockParser::new();
        let err = parser.parse(&fenced("name: A\ndescription: B")).unwrap_err();
        assert!(matches!(err, PipelineError::UnexpectedShape(ref m) if m.contains("a mapping")));
    }

    #[test]
    fn test_empty_block() {
        let parser = StructuredBlockParser::new();
        let err = parser.parse("```yaml\n```").unwrap_err();
        assert!(matches!(err, PipelineError::UnexpectedShape(_)));
    }

    #[test]
    fn test_reparse_after_serialization_is_stable() {
        let parser = StructuredBlockParser::new();
        let original = fenced(
            "- name: Core Loop\n  description: |\n    Drives everything.\n    Second line.\n  file_indices:\n    - 0 # main.py\n    - 2\n- name: \"Router: Dispatch\"\n  description: Sends requests on.\n  file_indices: [\"1 # router.py\"]",
        );

        let first = parser.parse(&original).unwrap();

        let mut emitted = String::new();
        YamlEmitter::new(&mut emitted)
            .dump(&Yaml::Array(first.clone()))
            .unwrap();
        let second = parser.parse(&fenced(&emitted)).unwrap();

        assert_eq!(first, second);
    }
}
