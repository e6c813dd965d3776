//! Create new fragment files.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{ConfigError, FragmentError, ReleaseError};
use crate::git::branch::{current_branch, issue_id_from_branch, open_repository};
use crate::template::CompiledTemplate;

/// Message written when none is given.
pub const DEFAULT_MESSAGE: &str = "A user-friendly description of your change";

/// Issue id written when none is given or found.
pub const DEFAULT_ISSUE_ID: &str = "0000";

/// Options for creating one fragment.
#[derive(Debug, Clone)]
pub struct NewEntryOptions {
    pub logs_dir: PathBuf,
    pub change_type: String,
    /// Known change types; `change_type` must be one of them.
    pub change_types: Vec<String>,
    pub line_format: String,
    pub issue_id: Option<String>,
    /// Regex whose first capture group extracts an issue id from the current branch.
    pub git_branch_format: Option<String>,
    pub message: Option<String>,
    pub entry_file_name: Option<String>,
    /// Directory used to discover the git repository.
    pub repo_dir: PathBuf,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EntryContext<'a> {
    change_type: &'a str,
    message: &'a str,
    issue_id: &'a str,
}

/// Write a new fragment and return its path.
pub fn create_entry(options: &NewEntryOptions) -> Result<PathBuf, ReleaseError> {
    if !options.change_types.contains(&options.change_type) {
        return Err(ConfigError::UnknownChangeType {
            given: options.change_type.clone(),
            known: options.change_types.join(", "),
        }
        .into());
    }

    let file_name = options
        .entry_file_name
        .clone()
        .unwrap_or_else(|| format!("{}.md", Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)));
    let output_path = entry_path(&options.logs_dir, &file_name);

    if output_path.exists() {
        return Err(FragmentError::AlreadyExists(output_path).into());
    }

    let issue_id = resolve_issue_id(options)?;
    if let Some(id) = issue_id
        .as_deref()
        .filter(|id| id.is_empty() || id.contains(char::is_whitespace))
    {
        return Err(ConfigError::InvalidIssueId(id.to_string()).into());
    }
    let template = CompiledTemplate::compile(&options.line_format)?;
    let text = template.render(EntryContext {
        change_type: &options.change_type,
        message: options.message.as_deref().unwrap_or(DEFAULT_MESSAGE),
        issue_id: issue_id.as_deref().unwrap_or(DEFAULT_ISSUE_ID),
    })?;

    if !options.logs_dir.exists() {
        fs::create_dir_all(&options.logs_dir).map_err(|source| FragmentError::CreateDirFailed {
            path: options.logs_dir.clone(),
            source,
        })?;
    }

    fs::write(&output_path, text).map_err(|source| FragmentError::WriteFailed {
        path: output_path.clone(),
        source,
    })?;

    debug!("Wrote fragment {}", output_path.display());
    Ok(output_path)
}

/// Explicit issue id first, then the current branch, then nothing.
fn resolve_issue_id(options: &NewEntryOptions) -> Result<Option<String>, ReleaseError> {
    if let Some(id) = &options.issue_id {
        return Ok(Some(id.clone()));
    }
    let Some(format) = &options.git_branch_format else {
        return Ok(None);
    };

    let repo = open_repository(&options.repo_dir)?;
    match current_branch(&repo)? {
        Some(branch) => {
            let id = issue_id_from_branch(&branch, format)?;
            if id.is_none() {
                warn!("Branch '{}' does not match git branch format '{}'", branch, format);
            }
            Ok(id)
        }
        None => {
            warn!("HEAD is detached, no issue id derived from branch");
            Ok(None)
        }
    }
}

/// Replace characters that are not allowed in file names.
pub fn to_valid_filename(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '-',
            c if c.is_control() => '-',
            c => c,
        })
        .collect()
}

/// Path a fragment named `file_name` would be written to.
pub fn entry_path(logs_dir: &Path, file_name: &str) -> PathBuf {
    logs_dir.join(to_valid_filename(file_name))
}
