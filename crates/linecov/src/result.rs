//! Result and error types for Linecov.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for Linecov operations
pub type LinecovResult<T> = Result<T, LinecovError>;

/// Errors that can occur while analyzing, instrumenting or reading reports
#[derive(Debug, Error)]
pub enum LinecovError {
    /// The C front-end could not make sense of the source
    #[error("{path}:{line}: {message}")]
    Frontend {
        /// File being scanned
        path: String,
        /// 1-based line where the problem was found
        line: usize,
        /// Error message
        message: String,
    },

    /// More than one translation unit defines `main`
    #[error("Multiple files with 'main' detected: {}", paths.join(", "))]
    MultipleMains {
        /// Files defining `main`
        paths: Vec<String>,
    },

    /// Source directory does not exist
    #[error("Source dir not found: {}", path.display())]
    SourceDirNotFound {
        /// Directory that was requested
        path: PathBuf,
    },

    /// No C sources found under the source directory
    #[error("No .c files under: {}", path.display())]
    NoSources {
        /// Directory that was searched
        path: PathBuf,
    },

    /// Invalid configuration
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// Malformed LCOV input
    #[error("LCOV parse error at line {line}: {message}")]
    ReportParse {
        /// 1-based line in the report
        line: usize,
        /// Error message
        message: String,
    },

    /// Glob pattern error during discovery
    #[error("Invalid discovery pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

impl LinecovError {
    /// Create a front-end error
    #[must_use]
    pub fn frontend(path: impl Into<String>, line: usize, message: impl Into<String>) -> Self {
        Self::Frontend {
            path: path.into(),
            line,
            message: message.into(),
        }
    }

    /// Create a configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a report parse error
    #[must_use]
    pub fn report_parse(line: usize, message: impl Into<String>) -> Self {
        Self::ReportParse {
            line,
            message: message.into(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_frontend_error_names_location() {
        let err = LinecovError::frontend("/src/a.c", 12, "unbalanced '{'");
        assert_eq!(err.to_string(), "/src/a.c:12: unbalanced '{'");
    }

    #[test]
    fn test_multiple_mains_lists_paths() {
        let err = LinecovError::MultipleMains {
            paths: vec!["/a/main.c".into(), "/b/main.c".into()],
        };
        let msg = err.to_string();
        assert!(msg.contains("/a/main.c"));
        assert!(msg.contains("/b/main.c"));
    }

    #[test]
    fn test_io_error_from() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: LinecovError = io_err.into();
        assert!(err.to_string().contains("I/O"));
    }

    #[test]
    fn test_report_parse_error() {
        let err = LinecovError::report_parse(3, "DA outside SF block");
        assert!(err.to_string().contains("line 3"));
    }
}
