//! Structured shape of a fragment line template.
//!
//! A line template such as `{{ changeType }}: {{ message }} ({{ issueId }})`
//! is split into literal text and field placeholders. The shape is what lets
//! a raw line be matched back to the change type it was authored for.

use std::sync::OnceLock;

use regex_lite::Regex;

use crate::error::ConfigError;

/// Fields a line template may reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineField {
    ChangeType,
    Message,
    IssueId,
}

impl LineField {
    /// Name of the field as written inside a template placeholder.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ChangeType => "changeType",
            Self::Message => "message",
            Self::IssueId => "issueId",
        }
    }

    fn from_placeholder(name: &str) -> Option<Self> {
        match name {
            "changeType" => Some(Self::ChangeType),
            "message" => Some(Self::Message),
            "issueId" => Some(Self::IssueId),
            _ => None,
        }
    }

    fn capture_name(&self) -> Option<&'static str> {
        match self {
            Self::ChangeType => None,
            Self::Message => Some("message"),
            Self::IssueId => Some("issue_id"),
        }
    }
}

/// One piece of a line template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Field(LineField),
}

/// A parsed line template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineShape {
    segments: Vec<Segment>,
}

fn placeholder_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\{\{-?\s*([A-Za-z_][A-Za-z0-9_]*)\s*-?\}\}")
            .unwrap_or_else(|e| unreachable!("placeholder pattern is valid: {e}"))
    })
}

impl LineShape {
    /// Parse a line template source into literal and field segments.
    pub fn parse(source: &str) -> Result<Self, ConfigError> {
        if source.contains("{%") || source.contains("{#") {
            return Err(ConfigError::UnsupportedLineTemplate(source.to_string()));
        }

        let mut segments = Vec::new();
        let mut last = 0;
        // `-}}` on the previous placeholder strips whitespace after it.
        let mut trim_next = false;

        for caps in placeholder_regex().captures_iter(source) {
            let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let field = LineField::from_placeholder(name.as_str()).ok_or_else(|| {
                ConfigError::UnknownPlaceholder {
                    placeholder: name.as_str().to_string(),
                    template: source.to_string(),
                }
            })?;

            let marker = whole.as_str();
            let mut literal = &source[last..whole.start()];
            if trim_next {
                literal = literal.trim_start();
            }
            if marker.starts_with("{{-") {
                literal = literal.trim_end();
            }
            if !literal.is_empty() {
                segments.push(Segment::Literal(literal.to_string()));
            }
            segments.push(Segment::Field(field));
            trim_next = marker.ends_with("-}}");
            last = whole.end();
        }

        let mut tail = &source[last..];
        if trim_next {
            tail = tail.trim_start();
        }
        if !tail.is_empty() {
            segments.push(Segment::Literal(tail.to_string()));
        }

        // Anything that still looks like a placeholder was not recognised above.
        if segments
            .iter()
            .any(|s| matches!(s, Segment::Literal(text) if text.contains("{{")))
        {
            return Err(ConfigError::UnsupportedLineTemplate(source.to_string()));
        }

        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Whether the template references the given field.
    pub fn has_field(&self, field: LineField) -> bool {
        self.segments
            .iter()
            .any(|s| matches!(s, Segment::Field(f) if *f == field))
    }

    /// Build the regex matching lines authored for `label`.
    ///
    /// The pattern is anchored at the start only: a line matches when it
    /// begins with the label's rendered shape. Variable fields are lazy
    /// when more pattern follows and greedy when they end the template.
    pub fn pattern_for(&self, label: &str) -> Result<Regex, ConfigError> {
        let mut pattern = String::from("^");
        let mut captured: Vec<&'static str> = Vec::new();
        let count = self.segments.len();

        for (i, segment) in self.segments.iter().enumerate() {
            let is_last = i + 1 == count;
            match segment {
                Segment::Literal(text) => pattern.push_str(&regex_lite::escape(text)),
                Segment::Field(LineField::ChangeType) => {
                    pattern.push_str(&regex_lite::escape(label));
                }
                Segment::Field(field) => {
                    let body = match (field, is_last) {
                        (LineField::IssueId, true) => r"\S+",
                        (LineField::IssueId, false) => r"\S+?",
                        (_, true) => ".+",
                        (_, false) => ".+?",
                    };
                    // Repeated fields keep the first occurrence as the capture.
                    match field.capture_name() {
                        Some(name) if !captured.contains(&name) => {
                            captured.push(name);
                            pattern.push_str(&format!("(?P<{name}>{body})"));
                        }
                        _ => pattern.push_str(&format!("(?:{body})")),
                    }
                }
            }
        }

        Regex::new(&pattern).map_err(|source| ConfigError::InvalidPattern { pattern, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_segments() {
        let shape = LineShape::parse("{{ changeType }}: {{message}} ({{- issueId -}})").unwrap();
        assert_eq!(
            shape.segments(),
            &[
                Segment::Field(LineField::ChangeType),
                Segment::Literal(": ".to_string()),
                Segment::Field(LineField::Message),
                Segment::Literal(" (".to_string()),
                Segment::Field(LineField::IssueId),
                Segment::Literal(")".to_string()),
            ]
        );
        assert!(shape.has_field(LineField::IssueId));
    }

    #[test]
    fn test_parse_applies_whitespace_control() {
        let shape = LineShape::parse("{{ changeType }} {{- message -}} ( {{ issueId }} )").unwrap();
        assert_eq!(
            shape.segments(),
            &[
                Segment::Field(LineField::ChangeType),
                Segment::Field(LineField::Message),
                Segment::Literal("( ".to_string()),
                Segment::Field(LineField::IssueId),
                Segment::Literal(" )".to_string()),
            ]
        );

        let shape = LineShape::parse("{{ changeType -}}  \n").unwrap();
        assert_eq!(shape.segments(), &[Segment::Field(LineField::ChangeType)]);
    }

    #[test]
    fn test_parse_literal_only() {
        let shape = LineShape::parse("IMPROVED").unwrap();
        assert_eq!(shape.segments(), &[Segment::Literal("IMPROVED".to_string())]);
        assert!(!shape.has_field(LineField::ChangeType));
    }

    #[test]
    fn test_parse_rejects_unknown_placeholder() {
        let err = LineShape::parse("{{ changeType }} {{ author }}").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::UnknownPlaceholder { ref placeholder, .. } if placeholder == "author"
        ));
    }

    #[test]
    fn test_parse_rejects_blocks_and_expressions() {
        assert!(matches!(
            LineShape::parse("{% if issueId %}{{ issueId }}{% endif %}"),
            Err(ConfigError::UnsupportedLineTemplate(_))
        ));
        assert!(matches!(
            LineShape::parse("{{ message | upper }}"),
            Err(ConfigError::UnsupportedLineTemplate(_))
        ));
    }

    #[test]
    fn test_pattern_extracts_fields() {
        let shape = LineShape::parse("[{{ issueId }}] {{ changeType }}: {{ message }}").unwrap();
        let re = shape.pattern_for("FIXED").unwrap();

        let caps = re.captures("[ABC-12] FIXED: crash on start: really").unwrap();
        assert_eq!(&caps["issue_id"], "ABC-12");
        assert_eq!(&caps["message"], "crash on start: really");
        assert!(!re.is_match("[ABC-12] NEW: crash on start"));
    }

    #[test]
    fn test_pattern_escapes_label_and_literals() {
        let shape = LineShape::parse("* {{ changeType }} {{ message }}").unwrap();
        let re = shape.pattern_for("C++").unwrap();
        assert!(re.is_match("* C++ faster templates"));
        assert!(!re.is_match("x CCC faster templates"));
    }

    #[test]
    fn test_pattern_matches_prefix() {
        let shape = LineShape::parse("IMPROVED").unwrap();
        let re = shape.pattern_for("NEW").unwrap();
        assert!(re.is_match("IMPROVED -m message"));
        assert!(!re.is_match("NEW -m message"));
    }
}
