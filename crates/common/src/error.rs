//! Error types shared across Reframe crates.

use std::path::PathBuf;

/// Top-level error type for Reframe operations.
///
/// Library crates with a richer taxonomy (the path solver) keep their own
/// error enum and convert into this one at the application boundary.
#[derive(Debug, thiserror::Error)]
pub enum ReframeError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Trace error at line {line}: {message}")]
    Trace { line: usize, message: String },

    #[error("Solver error: {message}")]
    Solver { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using ReframeError.
pub type ReframeResult<T> = Result<T, ReframeError>;

impl ReframeError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn trace(line: usize, msg: impl Into<String>) -> Self {
        Self::Trace {
            line,
            message: msg.into(),
        }
    }

    pub fn solver(msg: impl Into<String>) -> Self {
        Self::Solver {
            message: msg.into(),
        }
    }

    /// Map a missing-file I/O error onto `FileNotFound`, keeping other errors as-is.
    pub fn from_io_at(err: std::io::Error, path: impl Into<PathBuf>) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            Self::FileNotFound { path: path.into() }
        } else {
            Self::Io(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trace_error_mentions_line() {
        let err = ReframeError::trace(7, "unknown record type");
        assert_eq!(
            err.to_string(),
            "Trace error at line 7: unknown record type"
        );
    }

    #[test]
    fn test_missing_file_maps_to_file_not_found() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        match ReframeError::from_io_at(io, "/tmp/missing.json") {
            ReframeError::FileNotFound { path } => {
                assert_eq!(path, PathBuf::from("/tmp/missing.json"))
            }
            other => panic!("unexpected error: {other}"),
        }

        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope");
        assert!(matches!(
            ReframeError::from_io_at(io, "/tmp/x"),
            ReframeError::Io(_)
        ));
    }
}
