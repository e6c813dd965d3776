//! Template compilation for fragment lines and release sections.

pub mod compiler;
pub mod line;

pub use compiler::CompiledTemplate;
pub use line::{LineField, LineShape};
