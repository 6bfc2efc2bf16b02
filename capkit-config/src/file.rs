use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use capkit_core::{Capability, ConfigSource, ConfigStore, ConfigurationProvider};
use tracing::{debug, info, warn};

use crate::error::{ConfigError, ConfigResult};
use crate::format::DocumentFormat;
use crate::locator::ConfigLocator;

/// Configuration loaded from one document on disk.
///
/// Loading happens once, at construction. A provider whose document is
/// missing or broken is still constructed, it just reports itself as not
/// usable so the next format in line can take over.
#[derive(Debug, Clone)]
pub struct FileConfiguration {
    format: DocumentFormat,
    path: Option<PathBuf>,
    store: Arc<ConfigStore>,
    usable: bool,
}

impl FileConfiguration {
    /// Locate and load a document, turning any failure into an unusable provider.
    pub fn load(locator: &ConfigLocator, format: DocumentFormat) -> Self {
        match Self::try_load(locator, format) {
            Ok(loaded) => loaded,
            Err(e) if e.is_not_found() => {
                debug!("{}", e);
                Self::unusable(format)
            }
            Err(e) => {
                warn!("Ignoring {} configuration: {}", format.name(), e);
                Self::unusable(format)
            }
        }
    }

    /// Locate and load a document, reporting why it failed.
    pub fn try_load(locator: &ConfigLocator, format: DocumentFormat) -> ConfigResult<Self> {
        let path = locator.find(format)?;
        Self::from_path(&path, format)
    }

    /// Load a specific file as `format`.
    pub fn from_path(path: &Path, format: DocumentFormat) -> ConfigResult<Self> {
        let text = fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
        let document = format
            .parse(&text)
            .map_err(|message| ConfigError::parse(path, format.name(), message))?;
        let store = ConfigStore::try_from_document(&document)
            .map_err(|e| ConfigError::parse(path, format.name(), e.to_string()))?
            .with_source(ConfigSource::File {
                path: path.to_path_buf(),
                format: format.name(),
            });

        info!("Loaded {} configuration keys from {}", store.len(), store.source());

        Ok(Self {
            format,
            path: Some(path.to_path_buf()),
            store: Arc::new(store),
            usable: true,
        })
    }

    fn unusable(format: DocumentFormat) -> Self {
        Self {
            format,
            path: None,
            store: Arc::new(ConfigStore::new()),
            usable: false,
        }
    }

    pub fn format(&self) -> DocumentFormat {
        self.format
    }

    /// The document this provider was loaded from, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

impl Capability for FileConfiguration {
    fn is_usable(&self) -> bool {
        self.usable
    }

    fn priority(&self) -> i32 {
        self.format.priority()
    }

    fn name(&self) -> &str {
        self.format.name()
    }
}

impl ConfigurationProvider for FileConfiguration {
    fn store(&self) -> &Arc<ConfigStore> {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    fn write(dir: &Path, file: &str, text: &str) {
        fs::write(dir.join(file), text).unwrap();
    }

    #[test]
    fn loads_nested_yaml() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "application.yaml", "database:\n  host: db1\n  port: 5432\n");

        let provider = FileConfiguration::load(&ConfigLocator::new(dir.path(), "application"), DocumentFormat::Yaml);

        assert!(provider.is_usable());
        assert_eq!(provider.priority(), 20);
        assert_eq!(provider.path(), Some(dir.path().join("application.yaml").as_path()));

        let store = provider.store();
        assert_eq!(store.get_string("database.host").as_deref(), Some("db1"));
        assert_eq!(store.get_i32("database.port"), Some(5432));
        assert!(matches!(store.source(), ConfigSource::File { format: "yaml", .. }));
    }

    #[test]
    fn missing_document_is_unusable() {
        let dir = tempfile::tempdir().unwrap();
        let provider = FileConfiguration::load(&ConfigLocator::new(dir.path(), "application"), DocumentFormat::Json);

        assert!(!provider.is_usable());
        assert!(provider.path().is_none());
        assert!(provider.store().is_empty());
    }

    #[test]
    #[traced_test]
    fn broken_document_is_unusable_and_logged() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "application.json", "{\"database\": ");

        let locator = ConfigLocator::new(dir.path(), "application");
        let err = FileConfiguration::try_load(&locator, DocumentFormat::Json).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { format: "json", .. }));

        let provider = FileConfiguration::load(&locator, DocumentFormat::Json);
        assert!(!provider.is_usable());
        assert!(logs_contain("Ignoring json configuration"));
    }

    #[test]
    fn over_deep_document_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let depth = capkit_core::MAX_DEPTH + 1;
        let text = format!("{}\"leaf\"{}", "{\"n\": ".repeat(depth), "}".repeat(depth));
        write(dir.path(), "deep.json", &text);

        let err = FileConfiguration::from_path(&dir.path().join("deep.json"), DocumentFormat::Json).unwrap_err();
        assert!(err.to_string().contains("nesting"), "{err}");
    }
}
