//! Error types for the parity system.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.
//! Only whole-version failures are errors: a missing symbol or a mismatched
//! signature is a classification, never an `Error`.

use std::fmt;

use thiserror::Error;

/// The main error type for parity operations.
#[derive(Debug, Error)]
#[error("{kind}{}", .context.as_ref().map(|c| format!(" ({c})")).unwrap_or_default())]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Attaches a version label, keeping any context already present.
    #[must_use]
    pub fn in_version(mut self, version: impl Into<String>) -> Self {
        let context = self.context.take().unwrap_or_default();
        self.context = Some(context.with_version(version));
        self
    }

    /// Creates a source load error.
    #[must_use]
    pub fn source_load(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::SourceLoad {
            location: location.into(),
            message: message.into(),
        })
    }

    /// Creates a session mismatch error.
    #[must_use]
    pub fn session_mismatch(expected: u64, actual: u64) -> Self {
        Self::new(ErrorKind::SessionMismatch { expected, actual })
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Config(message.into()))
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// A declaration source could not be read.
    #[error("failed to load source '{location}': {message}")]
    SourceLoad {
        /// Where the source was expected.
        location: String,
        /// Underlying failure description.
        message: String,
    },

    /// Parse error in a declaration source.
    #[error("parse error at {line}:{column}: {message}")]
    Parse {
        /// Description of the parse error.
        message: String,
        /// Line number (1-indexed).
        line: u32,
        /// Column number (1-indexed).
        column: u32,
        /// The source line where the error occurred.
        context: String,
    },

    /// Two declaration trees were resolved in different sessions.
    #[error("type identities from session {actual} cannot be compared in session {expected}")]
    SessionMismatch {
        /// The session performing the comparison.
        expected: u64,
        /// The session that produced the offending tree.
        actual: u64,
    },

    /// Invalid run configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// Serialization or deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// File system failure outside of source loading.
    #[error("I/O error: {0}")]
    Io(String),

    /// Internal error (should not happen).
    #[error("internal error: {0}")]
    Internal(String),
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Version label being processed.
    pub version: Option<String>,
    /// Source location being processed.
    pub source: Option<String>,
    /// Line number in source.
    pub line: Option<usize>,
    /// Column number in source.
    pub column: Option<usize>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the version label.
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Sets the source location.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Sets the line and column.
    #[must_use]
    pub fn with_position(mut self, line: usize, column: usize) -> Self {
        self.line = Some(line);
        self.column = Some(column);
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        if let Some(version) = &self.version {
            write!(f, "version {version}")?;
            first = false;
        }
        if let Some(source) = &self.source {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "source {source}")?;
            if let (Some(line), Some(col)) = (self.line, self.column) {
                write!(f, ":{line}:{col}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_source_load() {
        let err = Error::source_load("theia.d.ts", "no such file");
        assert!(matches!(err.kind, ErrorKind::SourceLoad { .. }));
        let msg = format!("{err}");
        assert!(msg.contains("theia.d.ts"));
        assert!(msg.contains("no such file"));
    }

    #[test]
    fn error_with_context() {
        let err = Error::source_load("a.d.ts", "boom").with_context(
            ErrorContext::new()
                .with_source("a.d.ts")
                .with_position(10, 5),
        );

        let ctx = err.context.as_ref().unwrap();
        assert_eq!(ctx.source, Some("a.d.ts".to_string()));
        assert_eq!(ctx.line, Some(10));
        assert_eq!(ctx.column, Some(5));
    }

    #[test]
    fn in_version_keeps_existing_context() {
        let err = Error::source_load("b.d.ts", "boom")
            .with_context(ErrorContext::new().with_source("b.d.ts"))
            .in_version("1.2.0");

        let msg = format!("{err}");
        assert!(msg.contains("version 1.2.0"));
        assert!(msg.contains("source b.d.ts"));
    }

    #[test]
    fn session_mismatch_display() {
        let err = Error::session_mismatch(1, 2);
        let msg = format!("{err}");
        assert!(msg.contains("session 2"));
        assert!(msg.contains("session 1"));
    }

    #[test]
    fn context_display_without_fields_is_empty() {
        assert_eq!(format!("{}", ErrorContext::new()), "");
    }
}
