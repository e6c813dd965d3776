//! Collect fragment lines into groups and render release sections.

pub mod groups;
pub mod matcher;
pub mod prepare;
pub mod renderer;
pub mod strategy;
pub mod validate;

pub use groups::{EntryGroup, EntryGroups};
pub use matcher::{ChangeTypeMatcher, Classification, LineTemplate};
pub use prepare::{PrepareOptions, PrepareOutcome, ReleaseNumber, prepare_release};
pub use renderer::{DEFAULT_RELEASE_TEMPLATE, ReleaseRenderContext, ReleaseRenderer};
pub use strategy::{
    GroupingStrategy, PlainStrategy, StrategyConfig, StrategyMode, WithChangeTypeStrategy,
    select_strategy,
};
pub use validate::{ValidateOptions, ValidationReport, validate_fragments};
