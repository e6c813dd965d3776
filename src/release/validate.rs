//! Check every fragment line without writing anything.

use std::path::PathBuf;

use tracing::warn;

use crate::error::ReleaseError;
use crate::fragment::{ValidationPattern, list_fragments, read_all_lines};

use super::prepare::process_fragment_line;
use super::strategy::{StrategyConfig, select_strategy};

/// Options for [`validate_fragments`].
#[derive(Debug, Clone)]
pub struct ValidateOptions {
    pub logs_dir: PathBuf,
    pub strategy: StrategyConfig,
    pub validation_pattern: Option<String>,
}

/// Summary of a successful validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub files: usize,
    pub lines: usize,
}

/// Validate all fragments, reporting every failing line rather than the first.
pub fn validate_fragments(options: &ValidateOptions) -> Result<ValidationReport, ReleaseError> {
    let mut strategy = select_strategy(&options.strategy)?;
    let validation = options
        .validation_pattern
        .as_deref()
        .map(ValidationPattern::new)
        .transpose()?;

    let fragments = list_fragments(&options.logs_dir)?;
    let lines = read_all_lines(&fragments)?;

    let failures: Vec<ReleaseError> = lines
        .iter()
        .filter_map(|line| process_fragment_line(&mut *strategy, validation.as_ref(), line).err())
        .inspect(|e| warn!("{}", e))
        .collect();

    if !failures.is_empty() {
        return Err(ReleaseError::ValidationFailed(failures));
    }

    Ok(ValidationReport {
        files: fragments.len(),
        lines: lines.len(),
    })
}
