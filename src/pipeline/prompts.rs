// file: src/pipeline/prompts.rs
// description: prompt templates for abstraction extraction and chapter writing
// reference: single-message prompts sent through the LanguageModel port

use crate::models::{Abstraction, FileIndex};

pub const NO_CODE_PLACEHOLDER: &str = "No specific code provided.";

/// Python-style capitalization: first character upper, the rest lower.
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

pub fn is_english(language: &str) -> bool {
    language.trim().eq_ignore_ascii_case("english")
}

pub fn abstraction_prompt(
    files: &FileIndex,
    project_name: &str,
    language: &str,
    max_abstractions: usize,
) -> String {
    let language_note = if is_english(language) {
        String::new()
    } else {
        format!("\nIMPORTANT: Write every name and description in {}.", capitalize(language))
    };

    format!(
        "Project: {project}{note}\n\n\
         Codebase:\n{context}\n\n\
         Study the codebase above and pick the {n} most important core abstractions \
         a newcomer should learn, ordered so that each one builds on the ones before it.\n\n\
         For every abstraction give:\n\
         - name (a single line)\n\
         - description (about 100 words, plain language, analogies welcome)\n\
         - file_indices (indices from the reference list, e.g. 0, 2)\n\n\
         File reference:\n{listing}\n\n\
         Reply with a YAML list in teaching order:\n\
         ```yaml\n\
         - name: Something\n  \
           description: |\n    \
             This is like ...\n  \
           file_indices:\n    \
             - 0 # main.py\n    \
             - 2 # router.py\n\
         # ... at most {n} items\n\
         ```",
        project = project_name,
        note = language_note,
        context = files.context_dump(),
        n = max_abstractions,
        listing = files.reference_listing(),
    )
}

/// Inputs for one chapter prompt.
pub struct ChapterPrompt<'a> {
    pub project_name: &'a str,
    pub language: &'a str,
    pub number: usize,
    pub total: usize,
    pub abstraction: &'a Abstraction,
    pub previous: Option<&'a Abstraction>,
    pub next: Option<&'a Abstraction>,
    pub code_context: &'a str,
}

impl ChapterPrompt<'_> {
    /// Neighbour summaries so the model can link chapters without seeing
    /// their full text.
    pub fn adjacency(&self) -> String {
        let mut text = String::new();
        if let Some(previous) = self.previous {
            text.push_str(&format!(
                "Previous Concept ({}/{}): {} - {}\n\n",
                self.number - 1,
                self.total,
                previous.name,
                previous.description
            ));
        }
        if let Some(next) = self.next {
            text.push_str(&format!(
                "Next Concept ({}/{}): {} - {}\n\n",
                self.number + 1,
                self.total,
                next.name,
                next.description
            ));
        }
        text
    }

    pub fn render(&self) -> String {
        let language_note = if is_english(self.language) {
            String::new()
        } else {
            format!(
                "Write the whole chapter in **{}**, except for code.",
                capitalize(self.language)
            )
        };

        format!(
            "{note}\n\n\
             You are writing Chapter {num}/{total} of a beginner-friendly tutorial for the project: {project}.\n\n\
             {adjacency}\
             Concept ({num}/{total}): {name}\n\
             Description: {description}\n\n\
             Code Context:\n{code}\n\n\
             Instructions:\n\
             - Begin with `# Chapter {num}: {name}`\n\
             - Follow this structure: Motivation → Key Ideas → Code → Explanation → Wrap-up\n\
             - Use simple words and analogies.\n\
             - Split code into small chunks and explain each step.\n\
             - Mention how this concept connects to the previous and next chapters.\n\
             - Output only Markdown.\n",
            note = language_note,
            num = self.number,
            total = self.total,
            project = self.project_name,
            adjacency = self.adjacency(),
            name = self.abstraction.name,
            description = self.abstraction.description,
            code = self.code_context,
        )
    }
}
