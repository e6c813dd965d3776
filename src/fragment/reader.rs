//! Enumerate fragment files and read their lines.

use std::fs;
use std::path::{Path, PathBuf};

use regex_lite::Regex;
use tracing::{debug, warn};

use crate::error::{ConfigError, FragmentError};

/// One non-empty line of a fragment file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentLine {
    pub path: PathBuf,
    /// 1-based line number within the file.
    pub line_number: usize,
    pub text: String,
}

/// List fragment files in `logs_dir`, sorted by file name.
///
/// Hidden files (such as `.gitkeep`) and subdirectories are skipped. A
/// missing directory yields no fragments.
pub fn list_fragments(logs_dir: &Path) -> Result<Vec<PathBuf>, FragmentError> {
    if !logs_dir.exists() {
        warn!("Logs directory {} does not exist", logs_dir.display());
        return Ok(Vec::new());
    }

    let list_err = |source| FragmentError::ListFailed {
        path: logs_dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(logs_dir).map_err(list_err)? {
        let entry = entry.map_err(list_err)?;
        let file_type = entry.file_type().map_err(list_err)?;
        let hidden = entry.file_name().to_string_lossy().starts_with('.');
        if file_type.is_file() && !hidden {
            files.push(entry.path());
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    debug!("Found {} fragment files in {}", files.len(), logs_dir.display());
    Ok(files)
}

/// Split file content into lines, normalizing CRLF and dropping empty lines.
pub fn split_lines(content: &str) -> Vec<(usize, &str)> {
    content
        .split('\n')
        .enumerate()
        .map(|(i, line)| (i + 1, line.strip_suffix('\r').unwrap_or(line)))
        .filter(|(_, line)| !line.is_empty())
        .collect()
}

/// Read the non-empty lines of a single fragment file.
pub fn read_lines(path: &Path) -> Result<Vec<FragmentLine>, FragmentError> {
    let content = fs::read_to_string(path).map_err(|source| FragmentError::ReadFailed {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(split_lines(&content)
        .into_iter()
        .map(|(line_number, text)| FragmentLine {
            path: path.to_path_buf(),
            line_number,
            text: text.to_string(),
        })
        .collect())
}

/// Read every line of every file, in file order then line order.
pub fn read_all_lines(files: &[PathBuf]) -> Result<Vec<FragmentLine>, FragmentError> {
    let mut lines = Vec::new();
    for file in files {
        lines.extend(read_lines(file)?);
    }
    Ok(lines)
}

/// Optional pattern every fragment line must match.
#[derive(Debug, Clone)]
pub struct ValidationPattern {
    source: String,
    regex: Regex,
}

impl ValidationPattern {
    pub fn new(source: &str) -> Result<Self, ConfigError> {
        let regex = Regex::new(source).map_err(|e| ConfigError::InvalidPattern {
            pattern: source.to_string(),
            source: e,
        })?;
        Ok(Self {
            source: source.to_string(),
            regex,
        })
    }

    pub fn check(&self, line: &FragmentLine) -> Result<(), FragmentError> {
        if self.regex.is_match(&line.text) {
            return Ok(());
        }
        Err(FragmentError::Invalid {
            path: line.path.clone(),
            line_number: line.line_number,
            line: line.text.clone(),
            pattern: self.source.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_lines_normalizes_crlf_and_drops_empty() {
        let lines = split_lines("NEW: a\r\n\r\nFIXED: b\n\n");
        assert_eq!(lines, vec![(1, "NEW: a"), (3, "FIXED: b")]);
    }

    #[test]
    fn test_list_fragments_sorted_and_filtered() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        fs::write(dir.path().join("b.md"), "NEW: b").unwrap();
        fs::write(dir.path().join("a.md"), "NEW: a").unwrap();
        fs::write(dir.path().join(".gitkeep"), "").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();

        let files = list_fragments(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.md", "b.md"]);
    }

    #[test]
    fn test_list_fragments_missing_dir() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let files = list_fragments(&dir.path().join("absent")).unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn test_validation_pattern() {
        let pattern = ValidationPattern::new(r"^(NEW|FIXED): .+").unwrap();
        let good = FragmentLine {
            path: PathBuf::from("a.md"),
            line_number: 1,
            text: "NEW: thing".to_string(),
        };
        let bad = FragmentLine {
            text: "new thing".to_string(),
            ..good.clone()
        };
        assert!(pattern.check(&good).is_ok());
        assert!(matches!(
            pattern.check(&bad),
            Err(FragmentError::Invalid { line_number: 1, .. })
        ));
        assert!(ValidationPattern::new("(unclosed").is_err());
    }
}
