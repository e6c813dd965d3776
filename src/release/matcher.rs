//! Classify raw fragment lines by change type.

use regex_lite::Regex;

use crate::error::{ChangeTypeParseError, StrategyError};
use crate::template::{CompiledTemplate, LineShape};

/// The line template bound to one change type.
#[derive(Debug)]
pub struct LineTemplate {
    label: String,
    pattern: Regex,
}

impl LineTemplate {
    /// Compile `source` for `label`.
    ///
    /// The source is checked by the template compiler first so malformed
    /// markup surfaces as a syntax error rather than a shape error.
    pub fn compile(label: &str, source: &str) -> Result<Self, StrategyError> {
        CompiledTemplate::compile(source)?;
        let shape = LineShape::parse(source)?;
        let pattern = shape.pattern_for(label)?;
        Ok(Self {
            label: label.to_string(),
            pattern,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Match `line` against this template, extracting its fields.
    pub fn extract(&self, line: &str) -> Option<Classification> {
        let caps = self.pattern.captures(line)?;
        Some(Classification {
            label: self.label.clone(),
            message: caps.name("message").map(|m| m.as_str().to_string()),
            issue_id: caps.name("issue_id").map(|m| m.as_str().to_string()),
        })
    }
}

/// Result of classifying a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub label: String,
    pub message: Option<String>,
    pub issue_id: Option<String>,
}

/// Ordered candidates tried first to last; the first match wins.
#[derive(Debug)]
pub struct ChangeTypeMatcher {
    candidates: Vec<LineTemplate>,
}

impl ChangeTypeMatcher {
    pub fn new(candidates: Vec<LineTemplate>) -> Self {
        Self { candidates }
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.candidates.iter().map(LineTemplate::label)
    }

    /// Classify `line` without side effects.
    pub fn classify(&self, line: &str) -> Result<Classification, ChangeTypeParseError> {
        if let Some(found) = self.candidates.iter().find_map(|c| c.extract(line)) {
            return Ok(found);
        }

        let known = leading_word(line).and_then(|word| {
            self.candidates
                .iter()
                .filter(|c| word_names_label(word, c.label()))
                .max_by_key(|c| c.label().len())
        });
        match known {
            Some(candidate) => Err(ChangeTypeParseError::TemplateMismatch {
                label: candidate.label().to_string(),
                line: line.to_string(),
            }),
            None => Err(ChangeTypeParseError::UnknownChangeType {
                line: line.to_string(),
            }),
        }
    }
}

fn leading_word(line: &str) -> Option<&str> {
    line.split_whitespace().next()
}

/// Whether `word` is `label`, optionally wrapped in punctuation such as `[NEW]` or `C++:`.
fn word_names_label(word: &str, label: &str) -> bool {
    if word == label {
        return true;
    }
    word.trim_start_matches(|c: char| c.is_ascii_punctuation())
        .strip_prefix(label)
        .is_some_and(|rest| rest.chars().all(|c| c.is_ascii_punctuation()))
}
