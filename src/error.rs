//! Error types for changes modules using thiserror.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from compiling or rendering templates.
#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Template syntax error: {0}")]
    Syntax(#[source] minijinja::Error),

    #[error("Failed to render template: {0}")]
    Render(#[source] minijinja::Error),
}

/// A fragment line that could not be classified into a change type.
///
/// Both variants describe the same failure to callers that only print the
/// message; the split lets callers tell a misspelled label apart from a
/// known label whose line does not follow its template.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChangeTypeParseError {
    #[error("unable to parse change type from line '{line}'")]
    UnknownChangeType { line: String },

    #[error(
        "unable to parse change type from line '{line}': '{label}' is a known change type but the line does not match its template"
    )]
    TemplateMismatch { label: String, line: String },
}

impl ChangeTypeParseError {
    /// The offending line.
    pub fn line(&self) -> &str {
        match self {
            Self::UnknownChangeType { line } | Self::TemplateMismatch { line, .. } => line,
        }
    }
}

/// Errors from loading or validating configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Unknown strategy '{0}'. Expected one of: changeType, plain")]
    UnknownStrategy(String),

    #[error("No line template configured for change type '{0}'")]
    MissingLineTemplate(String),

    #[error("Line template configured for '{0}', which is not a known change type")]
    OrphanLineTemplate(String),

    #[error("At least one change type must be configured")]
    NoChangeTypes,

    #[error("Change type '{0}' is configured more than once")]
    DuplicateChangeType(String),

    #[error("Unknown change type '{given}'. Known change types: {known}")]
    UnknownChangeType { given: String, known: String },

    #[error("Issue id '{0}' must be non-empty and contain no whitespace")]
    InvalidIssueId(String),

    #[error("Unknown placeholder '{placeholder}' in line template '{template}'")]
    UnknownPlaceholder { placeholder: String, template: String },

    #[error("Line templates only support {{{{ }}}} placeholders, found block or comment in '{0}'")]
    UnsupportedLineTemplate(String),

    #[error("Invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex_lite::Error,
    },

    #[error("Failed to read config {}: {source}", path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config {}: {source}", path.display())]
    ParseFailed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors from building a grouping strategy.
#[derive(Error, Debug)]
pub enum StrategyError {
    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors from reading, writing, or validating fragment files.
#[derive(Error, Debug)]
pub enum FragmentError {
    #[error("File {} already exists", .0.display())]
    AlreadyExists(PathBuf),

    #[error("Failed to create logs directory {}: {source}", path.display())]
    CreateDirFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to list fragments in {}: {source}", path.display())]
    ListFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read fragment {}: {source}", path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write fragment {}: {source}", path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to remove fragment {}: {source}", path.display())]
    RemoveFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}:{line_number}: '{line}' does not match validation pattern '{pattern}'", path.display())]
    Invalid {
        path: PathBuf,
        line_number: usize,
        line: String,
        pattern: String,
    },
}

/// Errors from changelog file operations.
#[derive(Error, Debug)]
pub enum ChangelogError {
    #[error("Failed to read changelog: {0}")]
    ReadFailed(#[source] std::io::Error),

    #[error("Failed to write changelog: {0}")]
    WriteFailed(#[source] std::io::Error),
}

/// Errors from git operations.
#[derive(Error, Debug)]
pub enum GitError {
    #[error("Failed to open repository: {0}")]
    OpenRepository(#[source] git2::Error),

    #[error("Failed to read HEAD: {0}")]
    Head(#[source] git2::Error),

    #[error("Failed to create branch '{0}': {1}")]
    CreateBranch(String, #[source] git2::Error),

    #[error("Failed to check out branch '{0}': {1}")]
    Checkout(String, #[source] git2::Error),
}

/// Errors from the prepare-release and validate actions.
#[derive(Error, Debug)]
pub enum ReleaseError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Strategy(#[from] StrategyError),

    #[error("{}:{line_number}: {source}", path.display())]
    Parse {
        path: PathBuf,
        line_number: usize,
        #[source]
        source: ChangeTypeParseError,
    },

    #[error(transparent)]
    Fragment(#[from] FragmentError),

    #[error(transparent)]
    Changelog(#[from] ChangelogError),

    #[error(transparent)]
    Git(#[from] GitError),

    #[error("{} fragment line(s) failed validation", .0.len())]
    ValidationFailed(Vec<ReleaseError>),
}
