//! Current branch lookup and release branch checkout.

use std::path::Path;

use git2::{BranchType, ErrorCode, ObjectType, Repository, build::CheckoutBuilder};
use regex_lite::Regex;
use tracing::{debug, info};

use crate::error::{ConfigError, GitError};

/// Open the repository containing `dir`.
pub fn open_repository(dir: &Path) -> Result<Repository, GitError> {
    Repository::discover(dir).map_err(GitError::OpenRepository)
}

/// Name of the checked-out branch, or `None` when HEAD is detached.
///
/// A freshly initialised repository without commits still reports the
/// branch HEAD points at.
pub fn current_branch(repo: &Repository) -> Result<Option<String>, GitError> {
    match repo.head() {
        Ok(head) if head.is_branch() => Ok(head.shorthand().map(str::to_string)),
        Ok(_) => Ok(None),
        Err(e) if e.code() == ErrorCode::UnbornBranch => {
            let head = repo.find_reference("HEAD").map_err(GitError::Head)?;
            Ok(head
                .symbolic_target()
                .and_then(|target| target.strip_prefix("refs/heads/"))
                .map(str::to_string))
        }
        Err(e) => Err(GitError::Head(e)),
    }
}

/// Extract an issue id from a branch name using the first capture group of `format`.
pub fn issue_id_from_branch(branch: &str, format: &str) -> Result<Option<String>, ConfigError> {
    let re = Regex::new(format).map_err(|source| ConfigError::InvalidPattern {
        pattern: format.to_string(),
        source,
    })?;
    Ok(re
        .captures(branch)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string()))
}

/// Check out `name`, creating it from HEAD when it does not exist yet.
///
/// Returns `true` if the branch was created.
pub fn checkout_branch(repo: &Repository, name: &str) -> Result<bool, GitError> {
    let (branch, created) = match repo.find_branch(name, BranchType::Local) {
        Ok(branch) => (branch, false),
        Err(e) if e.code() == ErrorCode::NotFound => {
            let head = repo
                .head()
                .and_then(|h| h.peel_to_commit())
                .map_err(GitError::Head)?;
            let branch = repo
                .branch(name, &head, false)
                .map_err(|e| GitError::CreateBranch(name.to_string(), e))?;
            info!("Created branch {}", name);
            (branch, true)
        }
        Err(e) => return Err(GitError::Checkout(name.to_string(), e)),
    };

    let reference = branch.into_reference();
    let refname = reference
        .name()
        .map(str::to_string)
        .unwrap_or_else(|| format!("refs/heads/{name}"));
    let target = reference
        .peel(ObjectType::Commit)
        .map_err(|e| GitError::Checkout(name.to_string(), e))?;

    repo.checkout_tree(&target, Some(CheckoutBuilder::new().safe()))
        .map_err(|e| GitError::Checkout(name.to_string(), e))?;
    repo.set_head(&refname)
        .map_err(|e| GitError::Checkout(name.to_string(), e))?;

    debug!("Checked out {}", refname);
    Ok(created)
}
