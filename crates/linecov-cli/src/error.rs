//! Error types for the CLI

use linecov::LinecovError;
use thiserror::Error;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// Errors that can occur in the CLI
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// Invalid argument
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Error message
        message: String,
    },

    /// IO error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON output error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Linecov library error
    #[error("{0}")]
    Linecov(#[from] LinecovError),
}

impl CliError {
    /// Create a configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an invalid argument error
    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Process exit code for this error.
    ///
    /// 1: source dir missing, 2: no C files, 3: planning failed,
    /// 4: anything else.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Linecov(LinecovError::SourceDirNotFound { .. }) => 1,
            Self::Linecov(LinecovError::NoSources { .. }) => 2,
            Self::Linecov(LinecovError::MultipleMains { .. }) => 3,
            _ => 4,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_config_error() {
        let err = CliError::config("bad config");
        assert!(err.to_string().contains("Configuration"));
        assert!(err.to_string().contains("bad config"));
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn test_invalid_argument_error() {
        let err = CliError::invalid_argument("bad arg");
        assert!(err.to_string().contains("Invalid argument"));
    }

    #[test]
    fn test_io_error_from() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let cli_err: CliError = io_err.into();
        assert!(cli_err.to_string().contains("I/O"));
        assert_eq!(cli_err.exit_code(), 4);
    }

    #[test]
    fn test_exit_codes_for_project_errors() {
        let missing: CliError = LinecovError::SourceDirNotFound {
            path: PathBuf::from("/nope"),
        }
        .into();
        let empty: CliError = LinecovError::NoSources {
            path: PathBuf::from("/empty"),
        }
        .into();
        let mains: CliError = LinecovError::MultipleMains {
            paths: vec!["/a.c".into(), "/b.c".into()],
        }
        .into();
        let frontend: CliError = LinecovError::frontend("/a.c", 3, "unexpected '}'").into();
        assert_eq!(missing.exit_code(), 1);
        assert_eq!(empty.exit_code(), 2);
        assert_eq!(mains.exit_code(), 3);
        assert_eq!(frontend.exit_code(), 4);
    }

    #[test]
    fn test_library_message_passes_through() {
        let err: CliError = LinecovError::SourceDirNotFound {
            path: PathBuf::from("/nope"),
        }
        .into();
        assert_eq!(err.to_string(), "Source dir not found: /nope");
    }
}
