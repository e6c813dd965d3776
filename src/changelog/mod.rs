//! Changelog file writing.

pub mod writer;

pub use writer::{prepend_release, read_changelog};
