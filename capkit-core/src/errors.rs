//! # Errors
//!
//! capkit keeps failures local wherever it can:
//! - a candidate that fails to construct is dropped by the registry
//! - a value that fails to parse reads as `None`
//!
//! What is left is the small set of conditions a caller must see,
//! mostly "a mandatory capability has nothing usable behind it".

use anyhow::Error as AnyError;
use thiserror::Error;

/// Result type for capkit core APIs.
pub type CapkitResult<T> = std::result::Result<T, CapkitError>;

#[derive(Error, Debug)]
pub enum CapkitError {
    /// No registered candidate for a mandatory contract reported itself usable.
    #[error("no usable implementation for capability '{kind}' ({registered} registered)")]
    NoUsableCapability { kind: &'static str, registered: usize },

    /// A document nested deeper than the flattener is willing to descend.
    #[error("document nesting exceeds {max} levels at '{path}'")]
    TooDeep { path: String, max: usize },

    /// The tracing subscriber could not be installed.
    #[error("telemetry setup failed: {0}")]
    Telemetry(String),
}

impl CapkitError {
    pub fn no_usable(kind: &'static str, registered: usize) -> Self {
        Self::NoUsableCapability { kind, registered }
    }

    pub fn too_deep(path: impl Into<String>, max: usize) -> Self {
        Self::TooDeep {
            path: path.into(),
            max,
        }
    }

    /// True when the error means "selection came up empty".
    pub fn is_exhausted(&self) -> bool {
        matches!(self, Self::NoUsableCapability { .. })
    }

    /// Convert into `anyhow::Error` so it can leave a factory closure.
    pub fn into_anyhow(self) -> AnyError {
        AnyError::new(self)
    }

    /// Downcast an `anyhow::Error` to a `CapkitError` if possible.
    pub fn from_anyhow(err: &AnyError) -> Option<&CapkitError> {
        err.downcast_ref::<CapkitError>()
    }
}
