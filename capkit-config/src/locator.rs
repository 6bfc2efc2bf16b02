use std::path::PathBuf;

use crate::error::{ConfigError, ConfigResult};
use crate::format::DocumentFormat;

/// Environment variable overriding the document base name.
pub const CONFIG_NAME_ENV: &str = "CAPKIT_CONFIG_NAME";

/// Environment variable overriding the directory searched for documents.
pub const CONFIG_DIR_ENV: &str = "CAPKIT_CONFIG_DIR";

/// Base name used when no override is set.
pub const DEFAULT_CONFIG_NAME: &str = "application";

/// Where configuration documents are looked for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigLocator {
    /// Directory the documents live in
    pub dir: PathBuf,

    /// Base name without extension; may contain sub-directories
    pub name: String,
}

impl Default for ConfigLocator {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            name: DEFAULT_CONFIG_NAME.to_string(),
        }
    }
}

impl ConfigLocator {
    /// Create a locator for `<dir>/<name>.<ext>`
    pub fn new<P: Into<PathBuf>, S: Into<String>>(dir: P, name: S) -> Self {
        Self {
            dir: dir.into(),
            name: name.into(),
        }
    }

    /// Defaults, overridden by `CAPKIT_CONFIG_DIR` / `CAPKIT_CONFIG_NAME`
    pub fn from_env() -> Self {
        Self::from_overrides(
            std::env::var(CONFIG_DIR_ENV).ok(),
            std::env::var(CONFIG_NAME_ENV).ok(),
        )
    }

    /// Defaults, overridden by any non-blank value given
    pub fn from_overrides(dir: Option<String>, name: Option<String>) -> Self {
        let mut locator = Self::default();
        if let Some(dir) = dir.filter(|d| !d.trim().is_empty()) {
            locator.dir = PathBuf::from(dir);
        }
        if let Some(name) = name.filter(|n| !n.trim().is_empty()) {
            locator.name = name.trim().to_string();
        }
        locator
    }

    /// Set the search directory
    pub fn with_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.dir = dir.into();
        self
    }

    /// Set the document base name
    pub fn with_name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = name.into();
        self
    }

    /// Every path a document of `format` may live at, in lookup order
    pub fn candidates(&self, format: DocumentFormat) -> Vec<PathBuf> {
        format
            .extensions()
            .iter()
            .map(|ext| self.dir.join(format!("{}.{}", self.name, ext)))
            .collect()
    }

    /// First existing document of `format`
    pub fn find(&self, format: DocumentFormat) -> ConfigResult<PathBuf> {
        let candidates = self.candidates(format);
        match candidates.iter().find(|p| p.is_file()) {
            Some(path) => Ok(path.clone()),
            None => Err(ConfigError::not_found(format.name(), candidates)),
        }
    }
}
