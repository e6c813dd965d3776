//! changes - A CLI tool that collects changelog fragments and renders them into release sections.
//!
//! # Overview
//!
//! Each change is authored as a small fragment file while developing. At
//! release time the fragments are classified by change type, grouped in the
//! order their types first appear, and rendered through a template into a
//! new section at the top of CHANGELOG.md.

pub mod changelog;
pub mod config;
pub mod error;
pub mod fragment;
pub mod git;
pub mod output;
pub mod release;
pub mod template;

// Re-export commonly used types
pub use config::Config;
pub use error::{
    ChangeTypeParseError, ChangelogError, ConfigError, FragmentError, GitError, ReleaseError,
    StrategyError, TemplateError,
};
pub use output::{OutputLevel, Reporter};
pub use release::{EntryGroup, EntryGroups, GroupingStrategy, StrategyConfig, StrategyMode};
pub use template::CompiledTemplate;
