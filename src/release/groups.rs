//! Ordered collection of fragment lines grouped by change type.

use std::collections::HashMap;

use serde::Serialize;

/// Lines collected for a single change type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryGroup {
    pub label: String,
    pub items: Vec<String>,
}

/// Groups in order of first insertion, at most one per label.
///
/// The label index is an auxiliary lookup into `groups`; it is never
/// exposed and is kept in sync by [`EntryGroups::push`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryGroups {
    groups: Vec<EntryGroup>,
    index: HashMap<String, usize>,
}

impl EntryGroups {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `line` to the group for `label`, creating the group at the end if needed.
    pub fn push(&mut self, label: &str, line: &str) {
        match self.index.get(label) {
            Some(&position) => self.groups[position].items.push(line.to_string()),
            None => {
                self.index.insert(label.to_string(), self.groups.len());
                self.groups.push(EntryGroup {
                    label: label.to_string(),
                    items: vec![line.to_string()],
                });
            }
        }
    }

    pub fn get(&self, label: &str) -> Option<&EntryGroup> {
        self.index.get(label).map(|&position| &self.groups[position])
    }

    pub fn as_slice(&self) -> &[EntryGroup] {
        &self.groups
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Number of groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Number of lines across all groups.
    pub fn entry_count(&self) -> usize {
        self.groups.iter().map(|g| g.items.len()).sum()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, EntryGroup> {
        self.groups.iter()
    }
}

impl<'a> IntoIterator for &'a EntryGroups {
    type Item = &'a EntryGroup;
    type IntoIter = std::slice::Iter<'a, EntryGroup>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.iter()
    }
}
