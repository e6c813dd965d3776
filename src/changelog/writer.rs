//! Write rendered release sections into the changelog file.

use std::io::{ErrorKind, Write};
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::ChangelogError;

/// Read the changelog, treating a missing file as empty.
pub fn read_changelog(path: &Path) -> Result<String, ChangelogError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(content),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(String::new()),
        Err(e) => Err(ChangelogError::ReadFailed(e)),
    }
}

/// Put `section` at the top of the changelog, newest release first.
///
/// - Creates the file if it doesn't exist
/// - Replaces the file atomically so a failed write leaves it untouched
pub fn prepend_release(path: &Path, section: &str) -> Result<(), ChangelogError> {
    let existing = read_changelog(path)?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir).map_err(ChangelogError::WriteFailed)?;
    write_sections(&mut file, section, &existing).map_err(ChangelogError::WriteFailed)?;
    file.persist(path)
        .map_err(|e| ChangelogError::WriteFailed(e.error))?;

    debug!(
        "Wrote {} bytes to {} ({} existing)",
        section.len() + existing.len(),
        path.display(),
        existing.len()
    );
    Ok(())
}

fn write_sections(file: &mut NamedTempFile, section: &str, existing: &str) -> std::io::Result<()> {
    file.write_all(section.as_bytes())?;
    file.write_all(existing.as_bytes())?;
    file.flush()
}
