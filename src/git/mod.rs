//! Git integration.

pub mod branch;

pub use branch::{checkout_branch, current_branch, issue_id_from_branch, open_repository};
