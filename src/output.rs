//! User-facing console output.
//!
//! Diagnostics go through `tracing`; this is for the messages a user (or a
//! script in plumbing mode) is meant to read. The level is fixed when the
//! [`Reporter`] is built and nothing here touches global state.

use std::fmt;

/// How much the reporter prints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum OutputLevel {
    /// Print nothing.
    Silent,
    /// Plumbing: print only bare values such as file paths.
    Values,
    #[default]
    Normal,
    Verbose,
}

/// Kind of message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Value,
    Info,
    Warn,
    Error,
    Success,
}

impl MessageKind {
    fn is_visible_at(self, level: OutputLevel) -> bool {
        match self {
            // Values exist for scripts, so they show only in plumbing mode.
            Self::Value => level == OutputLevel::Values,
            Self::Info => level >= OutputLevel::Verbose,
            Self::Warn | Self::Error | Self::Success => level >= OutputLevel::Normal,
        }
    }

    fn is_stderr(self) -> bool {
        matches!(self, Self::Warn | Self::Error)
    }
}

/// Prints user-facing messages at a fixed [`OutputLevel`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Reporter {
    level: OutputLevel,
}

impl Reporter {
    pub fn new(level: OutputLevel) -> Self {
        Self { level }
    }

    pub fn level(&self) -> OutputLevel {
        self.level
    }

    /// The text that would be printed for a message, if any.
    pub fn format(&self, kind: MessageKind, message: &dyn fmt::Display) -> Option<String> {
        if !kind.is_visible_at(self.level) {
            return None;
        }
        Some(match kind {
            MessageKind::Value | MessageKind::Info => message.to_string(),
            MessageKind::Warn => format!("Warning: {message}"),
            MessageKind::Error => format!("Error: {message}"),
            MessageKind::Success => format!("✓ {message}"),
        })
    }

    fn emit(&self, kind: MessageKind, message: &dyn fmt::Display) {
        if let Some(text) = self.format(kind, message) {
            if kind.is_stderr() {
                eprintln!("{text}");
            } else {
                println!("{text}");
            }
        }
    }

    pub fn value(&self, message: impl fmt::Display) {
        self.emit(MessageKind::Value, &message);
    }

    pub fn info(&self, message: impl fmt::Display) {
        self.emit(MessageKind::Info, &message);
    }

    pub fn warn(&self, message: impl fmt::Display) {
        self.emit(MessageKind::Warn, &message);
    }

    pub fn error(&self, message: impl fmt::Display) {
        self.emit(MessageKind::Error, &message);
    }

    pub fn success(&self, message: impl fmt::Display) {
        self.emit(MessageKind::Success, &message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_values_only_in_plumbing_mode() {
        let plumbing = Reporter::new(OutputLevel::Values);
        assert_eq!(
            plumbing.format(MessageKind::Value, &"changelogs/a.md"),
            Some("changelogs/a.md".to_string())
        );
        assert_eq!(plumbing.format(MessageKind::Success, &"done"), None);
        assert_eq!(plumbing.format(MessageKind::Error, &"boom"), None);

        let normal = Reporter::new(OutputLevel::Normal);
        assert_eq!(normal.format(MessageKind::Value, &"changelogs/a.md"), None);
    }

    #[test]
    fn test_normal_level() {
        let reporter = Reporter::default();
        assert_eq!(
            reporter.format(MessageKind::Success, &"done"),
            Some("✓ done".to_string())
        );
        assert_eq!(
            reporter.format(MessageKind::Warn, &"careful"),
            Some("Warning: careful".to_string())
        );
        assert_eq!(reporter.format(MessageKind::Info, &"detail"), None);
    }

    #[test]
    fn test_verbose_and_silent() {
        let verbose = Reporter::new(OutputLevel::Verbose);
        assert_eq!(
            verbose.format(MessageKind::Info, &"detail"),
            Some("detail".to_string())
        );

        let silent = Reporter::new(OutputLevel::Silent);
        assert_eq!(silent.format(MessageKind::Error, &"boom"), None);
    }
}
