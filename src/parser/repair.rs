// file: src/parser/repair.rs
// description: line-level repairs applied to model-written YAML before strict parsing
// reference: https://docs.rs/regex

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // `- name: <value>` list item, any indentation
    static ref NAME_ITEM: Regex = Regex::new(
        r"^(\s*-\s*name:\s*)(.+)$"
    ).expect("NAME_ITEM regex is valid");
}

/// A single textual repair. `apply` returns the rewritten line, or `None`
/// when the rule does not match.
pub struct RepairRule {
    pub name: &'static str,
    pub apply: fn(&str) -> Option<String>,
}

/// Every repair the parser attempts, in order. Lines are rewritten by the
/// first matching rule only.
pub const REPAIR_RULES: &[RepairRule] = &[RepairRule {
    name: "quote_name_with_colon",
    apply: quote_name_with_colon,
}];

pub fn repair_block(block: &str) -> String {
    block
        .lines()
        .map(|line| {
            REPAIR_RULES
                .iter()
                .find_map(|rule| (rule.apply)(line))
                .unwrap_or_else(|| line.to_string())
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Wraps an unquoted `name:` value containing a colon in double quotes.
pub fn quote_name_with_colon(line: &str) -> Option<String> {
    let captures = NAME_ITEM.captures(line)?;
    let key = captures.get(1)?.as_str();
    let value = captures.get(2)?.as_str().trim_end();

    if !value.contains(':') || is_quoted(value) {
        return None;
    }

    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    Some(format!("{}\"{}\"", key, escaped))
}

fn is_quoted(value: &str) -> bool {
    let value = value.trim();
    value.len() >= 2
        && ((value.starts_with('"') && value.ends_with('"'))
            || (value.starts_with('\'') && value.ends_with('\'')))
}
