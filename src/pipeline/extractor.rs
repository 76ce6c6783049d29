// file: src/pipeline/extractor.rs
// description: asks the model for core abstractions and normalizes its YAML reply
// reference: one LanguageModel round-trip followed by strict record normalization

use crate::error::{PipelineError, Result};
use crate::llm::LanguageModel;
use crate::models::{Abstraction, FileIndex};
use crate::parser::{RawRecord, StructuredBlockParser};
use crate::parser::structured_block::describe;
use crate::pipeline::prompts::abstraction_prompt;
use std::collections::BTreeSet;
use tracing::{debug, info, warn};
use yaml_rust::Yaml;

pub struct AbstractionExtractor<'a> {
    model: &'a dyn LanguageModel,
    parser: StructuredBlockParser,
}

impl<'a> AbstractionExtractor<'a> {
    pub fn new(model: &'a dyn LanguageModel) -> Self {
        Self {
            model,
            parser: StructuredBlockParser::new(),
        }
    }

    /// Returns at most `max_abstractions` abstractions in the model's
    /// teaching order.
    pub async fn extract(
        &self,
        files: &FileIndex,
        project_name: &str,
        language: &str,
        max_abstractions: usize,
    ) -> Result<Vec<Abstraction>> {
        let prompt = abstraction_prompt(files, project_name, language, max_abstractions);
        debug!("Abstraction prompt:\n{}", prompt);

        let response = self.model.complete(&prompt).await?;
        debug!("Abstraction response:\n{}", response);

        let records = self.parser.parse(&response)?;
        let mut abstractions = normalize_records(records)?;

        if abstractions.len() > max_abstractions {
            warn!(
                "Model returned {} abstractions, keeping the first {}",
                abstractions.len(),
                max_abstractions
            );
            abstractions.truncate(max_abstractions);
        }

        info!("Extracted {} abstractions", abstractions.len());
        Ok(abstractions)
    }
}

pub fn normalize_records(records: Vec<RawRecord>) -> Result<Vec<Abstraction>> {
    records
        .iter()
        .enumerate()
        .map(|(index, record)| normalize_record(index, record))
        .collect()
}

fn normalize_record(index: usize, record: &RawRecord) -> Result<Abstraction> {
    if !matches!(record, Yaml::Hash(_)) {
        return Err(invalid(
            index,
            format!("expected a mapping, found {}", describe(record)),
        ));
    }

    let name = scalar_text(index, "name", &record["name"])?;
    let description = scalar_text(index, "description", &record["description"])?;

    let entries: &[Yaml] = match &record["file_indices"] {
        Yaml::Array(items) => items,
        Yaml::BadValue | Yaml::Null => &[],
        other => {
            return Err(invalid(
                index,
                format!("file_indices must be a list, found {}", describe(other)),
            ));
        }
    };

    let mut files = BTreeSet::new();
    for entry in entries {
        if let Some(file) = coerce_index(index, entry)? {
            files.insert(file);
        }
    }

    Ok(Abstraction {
        name,
        description,
        files,
    })
}

/// Missing or null fields become empty strings; other scalars are
/// stringified.
fn scalar_text(index: usize, field: &str, value: &Yaml) -> Result<String> {
    match value {
        Yaml::String(text) | Yaml::Real(text) => Ok(text.clone()),
        Yaml::Integer(number) => Ok(number.to_string()),
        Yaml::Boolean(flag) => Ok(flag.to_string()),
        Yaml::Null | Yaml::BadValue => Ok(String::new()),
        other => Err(invalid(
            index,
            format!("{} must be text, found {}", field, describe(other)),
        )),
    }
}

/// Accepts `2` and `"2 # router.py"`. Negative indices can never address a
/// file and are dropped.
fn coerce_index(index: usize, entry: &Yaml) -> Result<Option<usize>> {
    let number = match entry {
        Yaml::Integer(number) => *number,
        Yaml::String(text) => {
            let head = text.split('#').next().unwrap_or("").trim();
            head.parse::<i64>().map_err(|_| {
                invalid(index, format!("file index {:?} is not an integer", text))
            })?
        }
        other => {
            return Err(invalid(
                index,
                format!("file index must be an integer, found {}", describe(other)),
            ));
        }
    };

    if number < 0 {
        debug!("Dropping negative file index {} in record #{}", number, index);
        return Ok(None);
    }

    Ok(Some(number as usize))
}

fn invalid(index: usize, message: String) -> PipelineError {
    PipelineError::InvalidRecord { index, message }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SourceFile;
    use crate::testing::ScriptedModel;
    use pretty_assertions::assert_eq;
    use yaml_rust::YamlLoader;

    fn records(yaml: &str) -> Vec<RawRecord> {
        match YamlLoader::load_from_str(yaml).unwrap().remove(0) {
            Yaml::Array(items) => items,
            other => panic!("expected list, got {:?}", other),
        }
    }

    fn files() -> FileIndex {
        FileIndex::new(vec![
            SourceFile {
                path: "a.py".to_string(),
                content: "loop()".to_string(),
            },
            SourceFile {
                path: "b.py".to_string(),
                content: "step()".to_string(),
            },
        ])
    }

    #[test]
    fn test_commented_indices_are_coerced() {
        let parsed = normalize_records(records(
            "- name: Router\n  description: d\n  file_indices: [0, \"2 # router.py\"]",
        ))
        .unwrap();

        assert_eq!(parsed[0].files, BTreeSet::from([0, 2]));
    }

    #[test]
    fn test_indices_sorted_deduplicated_negative_dropped() {
        let parsed = normalize_records(records(
            "- name: A\n  file_indices:\n    - 3\n    - \"1 # b.py\"\n    - 3\n    - -1",
        ))
        .unwrap();

        assert_eq!(parsed[0].files.iter().copied().collect::<Vec<_>>(), vec![1, 3]);
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        let parsed = normalize_records(records("- file_indices: [0]\n- name: Only name")).unwrap();

        assert_eq!(parsed[0].name, "");
        assert_eq!(parsed[0].description, "");
        assert_eq!(parsed[1].name, "Only name");
        assert!(parsed[1].files.is_empty());
    }

    #[test]
    fn test_scalar_names_are_stringified() {
        let parsed = normalize_records(records("- name: 42\n  description: true")).unwrap();
        assert_eq!(parsed[0].name, "42");
        assert_eq!(parsed[0].description, "true");
    }

    #[test]
    fn test_non_mapping_record_rejected() {
        let err = normalize_records(records("- just a string")).unwrap_err();
        assert!(matches!(err, PipelineError::InvalidRecord { index: 0, .. }));
    }

    #[test]
    fn test_unparseable_index_rejected() {
        let err = normalize_records(records(
            "- name: A\n  file_indices: [0]\n- name: B\n  file_indices: [\"main.py\"]",
        ))
        .unwrap_err();
        assert!(matches!(err, PipelineError::InvalidRecord { index: 1, .. }));
    }

    #[test]
    fn test_scalar_file_indices_rejected() {
        let err = normalize_records(records("- name: A\n  file_indices: 3")).unwrap_err();
        assert!(matches!(err, PipelineError::InvalidRecord { .. }));
    }

    #[test]
    fn test_list_name_rejected() {
        let err = normalize_records(records("- name: [a, b]")).unwrap_err();
        assert!(err.to_string().contains("name must be text"));
    }

    #[tokio::test]
    async fn test_extract_single_round_trip() {
        let model = ScriptedModel::new(vec![
            "Sure!\n```yaml\n- name: Core Loop\n  description: Runs forever.\n  file_indices:\n    - 0 # a.py\n    - 1 # b.py\n```",
        ]);
        let extractor = AbstractionExtractor::new(&model);

        let abstractions = extractor.extract(&files(), "Demo", "english", 5).await.unwrap();

        assert_eq!(
            abstractions,
            vec![Abstraction::new("Core Loop", "Runs forever.", [0, 1])]
        );
        assert_eq!(model.call_count(), 1);
        let prompt = &model.prompts()[0];
        assert!(prompt.contains("- 0 # a.py\n- 1 # b.py"));
    }

    #[tokio::test]
    async fn test_extract_truncates_to_requested_count() {
        let model = ScriptedModel::new(vec![
            "```yaml\n- name: A\n- name: B\n- name: C\n```",
        ]);
        let extractor = AbstractionExtractor::new(&model);

        let abstractions = extractor.extract(&files(), "Demo", "english", 2).await.unwrap();

        let names: Vec<_> = abstractions.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[tokio::test]
    async fn test_contextless_record_is_kept() {
        let model = ScriptedModel::new(vec!["```yaml\n- name: Ideas\n  description: x\n```"]);
        let abstractions = AbstractionExtractor::new(&model)
            .extract(&files(), "Demo", "english", 3)
            .await
            .unwrap();

        assert_eq!(abstractions.len(), 1);
        assert!(abstractions[0].files.is_empty());
    }

    #[tokio::test]
    async fn test_missing_block_propagates() {
        let model = ScriptedModel::new(vec!["I am not sure what this project does."]);
        let err = AbstractionExtractor::new(&model)
            .extract(&files(), "Demo", "english", 3)
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::BlockNotFound { .. }));
    }

    #[tokio::test]
    async fn test_transport_error_propagates() {
        let model = ScriptedModel::failing("connection reset");
        let err = AbstractionExtractor::new(&model)
            .extract(&files(), "Demo", "english", 3)
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::Transport(ref m) if m == "connection reset"));
    }
}
