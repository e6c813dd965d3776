//! Grouping strategies and strategy selection.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::error::{ChangeTypeParseError, ConfigError, StrategyError, TemplateError};

use super::groups::EntryGroups;
use super::matcher::{ChangeTypeMatcher, LineTemplate};
use super::renderer::{DEFAULT_RELEASE_TEMPLATE, ReleaseRenderContext, ReleaseRenderer};

/// Default line template for new fragments.
pub const DEFAULT_LINE_FORMAT: &str = "{{ changeType }}: {{ message }}";

/// Change types used when none are configured.
pub const DEFAULT_CHANGE_TYPES: [&str; 3] = ["NEW", "IMPROVED", "FIXED"];

/// Label of the single group built by [`PlainStrategy`].
pub const PLAIN_GROUP_LABEL: &str = "changes";

/// Turns fragment lines into grouped, renderable release text.
pub trait GroupingStrategy: fmt::Debug {
    /// Add one fragment line. On error the accumulated groups are untouched.
    fn process_line(&mut self, line: &str) -> Result<(), ChangeTypeParseError>;

    /// Render every accumulated group for `release_number`.
    ///
    /// `label` names the change type being finalized but does not filter
    /// the output: the whole release is always rendered.
    fn generate(&self, label: &str, release_number: &str) -> Result<String, TemplateError>;

    fn entry_groups(&self) -> &EntryGroups;
}

/// Groups lines under the change type their line template identifies.
#[derive(Debug)]
pub struct WithChangeTypeStrategy {
    matcher: ChangeTypeMatcher,
    renderer: ReleaseRenderer,
    groups: EntryGroups,
}

impl WithChangeTypeStrategy {
    pub fn new(matcher: ChangeTypeMatcher, renderer: ReleaseRenderer) -> Self {
        Self {
            matcher,
            renderer,
            groups: EntryGroups::new(),
        }
    }

    pub fn matcher(&self) -> &ChangeTypeMatcher {
        &self.matcher
    }
}

impl GroupingStrategy for WithChangeTypeStrategy {
    fn process_line(&mut self, line: &str) -> Result<(), ChangeTypeParseError> {
        let classification = self.matcher.classify(line)?;
        debug!("Classified '{}' as {}", line, classification.label);
        self.groups.push(&classification.label, line);
        Ok(())
    }

    fn generate(&self, label: &str, release_number: &str) -> Result<String, TemplateError> {
        debug!(
            "Generating release {} ({} groups, requested by {})",
            release_number,
            self.groups.len(),
            label
        );
        render(&self.renderer, &self.groups, release_number)
    }

    fn entry_groups(&self) -> &EntryGroups {
        &self.groups
    }
}

/// Collects every line into a single group without classifying it.
#[derive(Debug)]
pub struct PlainStrategy {
    renderer: ReleaseRenderer,
    groups: EntryGroups,
}

impl PlainStrategy {
    pub fn new(renderer: ReleaseRenderer) -> Self {
        Self {
            renderer,
            groups: EntryGroups::new(),
        }
    }
}

impl GroupingStrategy for PlainStrategy {
    fn process_line(&mut self, line: &str) -> Result<(), ChangeTypeParseError> {
        self.groups.push(PLAIN_GROUP_LABEL, line);
        Ok(())
    }

    fn generate(&self, _label: &str, release_number: &str) -> Result<String, TemplateError> {
        render(&self.renderer, &self.groups, release_number)
    }

    fn entry_groups(&self) -> &EntryGroups {
        &self.groups
    }
}

fn render(
    renderer: &ReleaseRenderer,
    groups: &EntryGroups,
    release_number: &str,
) -> Result<String, TemplateError> {
    renderer.render(&ReleaseRenderContext {
        entry_groups: groups.as_slice(),
        release_number,
    })
}

/// Which strategy to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StrategyMode {
    #[default]
    ChangeType,
    Plain,
}

impl StrategyMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ChangeType => "changeType",
            Self::Plain => "plain",
        }
    }
}

impl fmt::Display for StrategyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrategyMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "changeType" => Ok(Self::ChangeType),
            "plain" => Ok(Self::Plain),
            _ => Err(ConfigError::UnknownStrategy(s.to_string())),
        }
    }
}

/// Everything needed to build a strategy.
#[derive(Debug, Clone)]
pub struct StrategyConfig {
    pub mode: StrategyMode,
    /// Known change types in priority order.
    pub change_types: Vec<String>,
    /// Line template used for change types without an override.
    pub line_format: String,
    /// Per change type line template overrides.
    pub line_formats: BTreeMap<String, String>,
    pub release_template: String,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            mode: StrategyMode::default(),
            change_types: DEFAULT_CHANGE_TYPES.iter().map(|s| s.to_string()).collect(),
            line_format: DEFAULT_LINE_FORMAT.to_string(),
            line_formats: BTreeMap::new(),
            release_template: DEFAULT_RELEASE_TEMPLATE.to_string(),
        }
    }
}

impl StrategyConfig {
    /// Line template source for `label`.
    pub fn line_format_for(&self, label: &str) -> &str {
        self.line_formats
            .get(label)
            .map(String::as_str)
            .unwrap_or(self.line_format.as_str())
    }

    /// Check the change type list and per-label templates.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.change_types.is_empty() {
            return Err(ConfigError::NoChangeTypes);
        }

        let mut seen = HashSet::new();
        for label in &self.change_types {
            if !seen.insert(label.as_str()) {
                return Err(ConfigError::DuplicateChangeType(label.clone()));
            }
            if self.line_format_for(label).trim().is_empty() {
                return Err(ConfigError::MissingLineTemplate(label.clone()));
            }
        }

        if let Some(orphan) = self.line_formats.keys().find(|k| !seen.contains(k.as_str())) {
            return Err(ConfigError::OrphanLineTemplate(orphan.clone()));
        }

        Ok(())
    }
}

/// Build the strategy named by `config.mode`.
///
/// All templates are compiled here, so configuration and syntax errors
/// surface before any line is processed.
pub fn select_strategy(config: &StrategyConfig) -> Result<Box<dyn GroupingStrategy>, StrategyError> {
    let renderer = ReleaseRenderer::compile(&config.release_template)?;

    match config.mode {
        StrategyMode::ChangeType => {
            config.validate()?;
            let candidates = config
                .change_types
                .iter()
                .map(|label| LineTemplate::compile(label, config.line_format_for(label)))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Box::new(WithChangeTypeStrategy::new(
                ChangeTypeMatcher::new(candidates),
                renderer,
            )))
        }
        StrategyMode::Plain => Ok(Box::new(PlainStrategy::new(renderer))),
    }
}
