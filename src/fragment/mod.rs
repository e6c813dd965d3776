//! Fragment files: creating new entries and reading existing ones.

pub mod entry;
pub mod reader;

pub use entry::{NewEntryOptions, create_entry};
pub use reader::{FragmentLine, ValidationPattern, list_fragments, read_all_lines, read_lines};
