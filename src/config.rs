//! Project configuration loaded from `.changelogrc.json`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ConfigError;
use crate::release::renderer::DEFAULT_RELEASE_TEMPLATE;
use crate::release::strategy::{DEFAULT_CHANGE_TYPES, DEFAULT_LINE_FORMAT, StrategyConfig};

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = ".changelogrc.json";

pub const DEFAULT_LOGS_DIR: &str = "changelogs";

pub const DEFAULT_CHANGELOG_FILE: &str = "CHANGELOG.md";

/// Settings shared by all commands. Every field is optional; CLI flags win.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct Config {
    pub change_types: Option<Vec<String>>,
    /// Line template for new fragments.
    pub format: Option<String>,
    /// Per change type line templates.
    pub formats: BTreeMap<String, String>,
    pub changelog_file: Option<PathBuf>,
    pub logs_dir: Option<PathBuf>,
    /// Release template, either a file path or the template itself.
    pub changelog_template: Option<String>,
    pub strategy: Option<String>,
    pub validation_pattern: Option<String>,
    pub release_branch_pattern: Option<String>,
    pub git_branch_format: Option<String>,
}

impl Config {
    /// Load a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::ParseFailed {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load `explicit` if given, else the default file in `dir` if it exists.
    pub fn discover(explicit: Option<&Path>, dir: &Path) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let default_path = dir.join(DEFAULT_CONFIG_FILE);
        if default_path.is_file() {
            debug!("Loading config from {}", default_path.display());
            return Self::load(&default_path);
        }
        Ok(Self::default())
    }

    pub fn change_types(&self) -> Vec<String> {
        self.change_types.clone().unwrap_or_else(|| {
            DEFAULT_CHANGE_TYPES.iter().map(|s| s.to_string()).collect()
        })
    }

    pub fn format(&self) -> &str {
        self.format.as_deref().unwrap_or(DEFAULT_LINE_FORMAT)
    }

    /// Line template for `change_type`, falling back to [`Config::format`].
    pub fn format_for(&self, change_type: &str) -> &str {
        self.formats
            .get(change_type)
            .map(String::as_str)
            .unwrap_or_else(|| self.format())
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.logs_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOGS_DIR))
    }

    pub fn changelog_file(&self) -> PathBuf {
        self.changelog_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CHANGELOG_FILE))
    }

    /// The release template source, reading it from disk when it names a file.
    pub fn release_template(&self) -> Result<String, ConfigError> {
        match &self.changelog_template {
            Some(value) => resolve_template_source(value),
            None => Ok(DEFAULT_RELEASE_TEMPLATE.to_string()),
        }
    }

    /// Build the strategy configuration, parsing the strategy mode.
    pub fn strategy_config(&self) -> Result<StrategyConfig, ConfigError> {
        let mode = match &self.strategy {
            Some(value) => value.parse()?,
            None => Default::default(),
        };
        Ok(StrategyConfig {
            mode,
            change_types: self.change_types(),
            line_format: self.format().to_string(),
            line_formats: self.formats.clone(),
            release_template: self.release_template()?,
        })
    }
}

/// Read `value` as a file if one exists at that path, else use it verbatim.
pub fn resolve_template_source(value: &str) -> Result<String, ConfigError> {
    let path = Path::new(value);
    if !path.is_file() {
        return Ok(value.to_string());
    }
    debug!("Reading template from {}", path.display());
    std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
        path: path.to_path_buf(),
        source,
    })
}
