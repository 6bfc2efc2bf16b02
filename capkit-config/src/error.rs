use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result type for configuration document loading
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors that can occur while locating, reading or parsing a document
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("no {format} configuration document found (searched: {})", join_paths(.searched))]
    NotFound {
        format: &'static str,
        searched: Vec<PathBuf>,
    },

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {} as {format}: {message}", .path.display())]
    Parse {
        path: PathBuf,
        format: &'static str,
        message: String,
    },
}

impl ConfigError {
    /// Create a not found error listing every path tried
    pub fn not_found(format: &'static str, searched: Vec<PathBuf>) -> Self {
        Self::NotFound { format, searched }
    }

    /// Create an I/O error for a document path
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Create a parse error for a document path
    pub fn parse<S: Into<String>>(path: &Path, format: &'static str, message: S) -> Self {
        Self::Parse {
            path: path.to_path_buf(),
            format,
            message: message.into(),
        }
    }

    /// Absent documents are expected; everything else is worth a warning.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

fn join_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
