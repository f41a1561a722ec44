//! Error types for qnatsv.
//!
//! Library crates use [`QnaTsvError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all qnatsv operations.
///
/// Every variant is terminal for the process; nothing is retried.
#[derive(Debug, thiserror::Error)]
pub enum QnaTsvError {
    /// The input path does not reference an existing file.
    #[error("File {path:?} does not exist.")]
    InputNotFound { path: PathBuf },

    /// The input path does not end in `.json`.
    #[error("Input file {path:?} must be a JSON file with .json extension.")]
    WrongExtension { path: PathBuf },

    /// The input is not a well-formed export document.
    #[error("Invalid JSON format in {path:?}. Error details: {message}")]
    MalformedContent { path: PathBuf, message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Configuration loading error.
    #[error("config error: {message}")]
    Config { message: String },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, QnaTsvError>;

impl QnaTsvError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a malformed-content error for the given input file.
    pub fn malformed(path: impl Into<PathBuf>, msg: impl Into<String>) -> Self {
        Self::MalformedContent {
            path: path.into(),
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = QnaTsvError::config("unknown key");
        assert_eq!(err.to_string(), "config error: unknown key");

        let err = QnaTsvError::malformed("export.json", "expected value at line 1 column 1");
        let msg = err.to_string();
        assert!(msg.contains("Invalid JSON format"));
        assert!(msg.contains("line 1 column 1"));
    }

    #[test]
    fn input_errors_name_the_path() {
        let err = QnaTsvError::WrongExtension {
            path: "notes.txt".into(),
        };
        assert!(err.to_string().contains("notes.txt"));

        let err = QnaTsvError::InputNotFound {
            path: "missing.json".into(),
        };
        assert!(err.to_string().contains("does not exist"));
    }
}
