//! The prepare-release action: fragments in, release section out.

use std::fmt;
use std::fs;
use std::path::PathBuf;

use serde::Serialize;
use tracing::{debug, info};

use crate::changelog::prepend_release;
use crate::error::{FragmentError, ReleaseError};
use crate::fragment::{FragmentLine, ValidationPattern, list_fragments, read_all_lines};
use crate::git::{checkout_branch, open_repository};
use crate::template::CompiledTemplate;

use super::strategy::{GroupingStrategy, StrategyConfig, select_strategy};

/// A release number given up front or computed on demand.
pub enum ReleaseNumber {
    Literal(String),
    Deferred(Box<dyn Fn() -> String>),
}

impl ReleaseNumber {
    pub fn resolve(&self) -> String {
        match self {
            Self::Literal(value) => value.clone(),
            Self::Deferred(produce) => produce(),
        }
    }
}

impl fmt::Debug for ReleaseNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            Self::Deferred(_) => f.write_str("Deferred(..)"),
        }
    }
}

impl From<String> for ReleaseNumber {
    fn from(value: String) -> Self {
        Self::Literal(value)
    }
}

impl From<&str> for ReleaseNumber {
    fn from(value: &str) -> Self {
        Self::Literal(value.to_string())
    }
}

/// Options for [`prepare_release`].
#[derive(Debug)]
pub struct PrepareOptions {
    pub logs_dir: PathBuf,
    pub changelog_file: PathBuf,
    pub release_number: ReleaseNumber,
    pub strategy: StrategyConfig,
    pub validation_pattern: Option<String>,
    /// Template for a branch to check out before writing, e.g. `release/{{ releaseNumber }}`.
    pub release_branch_pattern: Option<String>,
    /// Directory used to discover the git repository.
    pub repo_dir: PathBuf,
    pub dry_run: bool,
    pub keep_fragments: bool,
}

/// What a prepare-release run produced.
#[derive(Debug, Clone)]
pub struct PrepareOutcome {
    pub release_number: String,
    pub text: String,
    /// Fragment files that were read, in processing order.
    pub fragments: Vec<PathBuf>,
    pub entry_count: usize,
    /// Release branch checked out, if any.
    pub branch: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BranchContext<'a> {
    release_number: &'a str,
}

/// Collect every fragment, render the release section, and write it.
///
/// Fails closed: the first unreadable, invalid or unclassifiable line
/// aborts the run before anything is written.
pub fn prepare_release(options: &PrepareOptions) -> Result<PrepareOutcome, ReleaseError> {
    // ── Stage 1: Build strategy and patterns ──
    let mut strategy = select_strategy(&options.strategy)?;
    let validation = options
        .validation_pattern
        .as_deref()
        .map(ValidationPattern::new)
        .transpose()?;
    let branch_template = options
        .release_branch_pattern
        .as_deref()
        .map(CompiledTemplate::compile)
        .transpose()?;

    // ── Stage 2: Read fragments ──
    let fragments = list_fragments(&options.logs_dir)?;
    let lines = read_all_lines(&fragments)?;
    info!(
        "Read {} lines from {} fragments",
        lines.len(),
        fragments.len()
    );

    // ── Stage 3: Group ──
    for line in &lines {
        process_fragment_line(&mut *strategy, validation.as_ref(), line)?;
    }

    // ── Stage 4: Render ──
    let release_number = options.release_number.resolve();
    let last_label = strategy
        .entry_groups()
        .iter()
        .last()
        .map(|g| g.label.clone())
        .unwrap_or_default();
    let text = strategy.generate(&last_label, &release_number)?;

    let mut outcome = PrepareOutcome {
        release_number,
        text,
        fragments,
        entry_count: strategy.entry_groups().entry_count(),
        branch: None,
    };

    if options.dry_run {
        debug!("Dry run, nothing written");
        return Ok(outcome);
    }

    // ── Stage 5: Release branch ──
    if let Some(template) = branch_template {
        let branch = template.render(BranchContext {
            release_number: &outcome.release_number,
        })?;
        let repo = open_repository(&options.repo_dir)?;
        let created = checkout_branch(&repo, &branch)?;
        info!(
            "{} release branch {}",
            if created { "Created" } else { "Switched to" },
            branch
        );
        outcome.branch = Some(branch);
    }

    // ── Stage 6: Write changelog and consume fragments ──
    prepend_release(&options.changelog_file, &outcome.text)?;

    if !options.keep_fragments {
        for path in &outcome.fragments {
            fs::remove_file(path).map_err(|source| FragmentError::RemoveFailed {
                path: path.clone(),
                source,
            })?;
        }
    }

    Ok(outcome)
}

/// Validate and group one line, attaching its location to any parse error.
pub(crate) fn process_fragment_line(
    strategy: &mut dyn GroupingStrategy,
    validation: Option<&ValidationPattern>,
    line: &FragmentLine,
) -> Result<(), ReleaseError> {
    if let Some(pattern) = validation {
        pattern.check(line)?;
    }
    strategy
        .process_line(&line.text)
        .map_err(|source| ReleaseError::Parse {
            path: line.path.clone(),
            line_number: line.line_number,
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_release_number_resolves() {
        assert_eq!(ReleaseNumber::from("1.0.0").resolve(), "1.0.0");
        let deferred = ReleaseNumber::Deferred(Box::new(|| format!("{}.{}", 2, 1)));
        assert_eq!(deferred.resolve(), "2.1");
        assert_eq!(format!("{deferred:?}"), "Deferred(..)");
    }
}
