pub mod json;
pub mod properties;
pub mod yaml;

use serde_json::{Map, Value};

/// Document formats a configuration file may be written in.
///
/// Flat `key=value` files are preferred over nested formats when both
/// exist, so a project can pin overrides without touching its YAML.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentFormat {
    Properties,
    Yaml,
    Json,
}

impl DocumentFormat {
    /// All formats, most preferred first.
    pub const ALL: [DocumentFormat; 3] = [Self::Properties, Self::Yaml, Self::Json];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Properties => "properties",
            Self::Yaml => "yaml",
            Self::Json => "json",
        }
    }

    /// File extensions, tried in order.
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Self::Properties => &["properties"],
            Self::Yaml => &["yaml", "yml"],
            Self::Json => &["json"],
        }
    }

    /// Selection priority of providers backed by this format.
    pub fn priority(&self) -> i32 {
        match self {
            Self::Properties => 10,
            Self::Yaml => 20,
            Self::Json => 30,
        }
    }

    /// Parse document text into the common document model.
    pub fn parse(&self, text: &str) -> Result<Map<String, Value>, String> {
        match self {
            Self::Properties => properties::parse(text),
            Self::Yaml => yaml::parse(text),
            Self::Json => json::parse(text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_format_is_preferred() {
        let priorities: Vec<_> = DocumentFormat::ALL.iter().map(|f| f.priority()).collect();
        assert!(priorities.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(DocumentFormat::ALL[0], DocumentFormat::Properties);
    }

    #[test]
    fn formats_normalize_to_same_document() {
        let from_props = DocumentFormat::Properties.parse("database.host=db1\n").unwrap();
        let from_yaml = DocumentFormat::Yaml.parse("database:\n  host: db1\n").unwrap();
        let from_json = DocumentFormat::Json.parse(r#"{"database": {"host": "db1"}}"#).unwrap();

        let flat = |doc: Map<String, Value>| capkit_core::flatten(&doc);
        assert_eq!(flat(from_props.clone()), flat(from_yaml));
        assert_eq!(flat(from_props), flat(from_json));
    }
}
