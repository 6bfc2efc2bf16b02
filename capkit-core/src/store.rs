//! # Configuration store
//!
//! A read-only, string key/value namespace addressed by dotted paths.
//! Nested documents are flattened on the way in, so every source format
//! ends up looking the same to callers:
//!
//! ```rust
//! use capkit_core::ConfigStore;
//! use serde_json::json;
//!
//! let doc = json!({"database": {"host": "db1", "port": "5432"}});
//! let store = ConfigStore::from_document(doc.as_object().unwrap());
//!
//! assert_eq!(store.get_string("database.host").as_deref(), Some("db1"));
//! assert_eq!(store.get_i32("database.port"), Some(5432));
//! assert_eq!(store.get_i32_or("database.pool", 10), 10);
//! ```
//!
//! ## Typed getters
//! Every typed getter returns `None` both for a missing key and for a
//! value that does not parse. The `_or` form substitutes the default in
//! exactly those cases.
//!
//! `get_bool` is the exception: it returns a plain `bool`, and "missing",
//! "unparseable" and "false" all read as `false`.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use num_bigint::BigInt;
use rust_decimal::Decimal;
use serde_json::{Map, Value};

use crate::coerce;
use crate::errors::CapkitResult;
use crate::flatten::{flatten, to_text, try_flatten, Flattened};

/// Where a store's values came from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConfigSource {
    /// Built in code (tests, embedders).
    #[default]
    Memory,
    /// Loaded from a document on disk.
    File { path: PathBuf, format: &'static str },
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::Memory => write!(f, "memory"),
            ConfigSource::File { path, format } => write!(f, "{} ({format})", path.display()),
        }
    }
}

macro_rules! typed_getter {
    ($(#[$doc:meta])* $get:ident, $get_or:ident, $ty:ty, $parse:path) => {
        $(#[$doc])*
        pub fn $get(&self, key: &str) -> Option<$ty> {
            self.get(key).and_then($parse)
        }

        pub fn $get_or(&self, key: &str, default: $ty) -> $ty {
            self.$get(key).unwrap_or(default)
        }
    };
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigStore {
    values: BTreeMap<String, String>,
    source: ConfigSource,
}

impl ConfigStore {
    /// An empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Flatten a nested document into a store.
    pub fn from_document(document: &Map<String, Value>) -> Self {
        Self::from_flattened(flatten(document))
    }

    /// Like [`ConfigStore::from_document`], but rejects documents nested
    /// past the flattener's depth limit.
    pub fn try_from_document(document: &Map<String, Value>) -> CapkitResult<Self> {
        Ok(Self::from_flattened(try_flatten(document)?))
    }

    /// Build from already-flat key/value pairs. Later duplicates win.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            source: ConfigSource::Memory,
        }
    }

    fn from_flattened(flat: Flattened) -> Self {
        Self {
            values: flat.iter().map(|(k, v)| (k.clone(), to_text(v))).collect(),
            source: ConfigSource::Memory,
        }
    }

    /// Tag the store with its origin.
    pub fn with_source(mut self, source: ConfigSource) -> Self {
        self.source = source;
        self
    }

    pub fn source(&self) -> &ConfigSource {
        &self.source
    }

    /// Exact key match only.
    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Every entry whose key starts with `prefix`, keyed by the full path.
    ///
    /// This is a raw string prefix match: `get_map("app.dev")` also picks up
    /// `app.device.url`. Pass a trailing dot to stay inside one subtree.
    pub fn get_map(&self, prefix: &str) -> BTreeMap<String, String> {
        self.values
            .range(prefix.to_string()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// A new store holding the entries under `prefix`, with the prefix removed.
    pub fn scoped(&self, prefix: &str) -> ConfigStore {
        Self {
            values: self
                .get_map(prefix)
                .into_iter()
                .filter_map(|(k, v)| {
                    let rest = k[prefix.len()..].to_string();
                    (!rest.is_empty()).then_some((rest, v))
                })
                .collect(),
            source: self.source.clone(),
        }
    }

    fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(|s| s.as_str())
    }

    pub fn get_string(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    pub fn get_string_or(&self, key: &str, default: impl Into<String>) -> String {
        self.get_string(key).unwrap_or_else(|| default.into())
    }

    typed_getter!(get_i32, get_i32_or, i32, coerce::parse_i32);
    typed_getter!(get_i64, get_i64_or, i64, coerce::parse_i64);
    typed_getter!(get_i16, get_i16_or, i16, coerce::parse_i16);
    typed_getter!(get_f64, get_f64_or, f64, coerce::parse_f64);
    typed_getter!(get_decimal, get_decimal_or, Decimal, coerce::parse_decimal);
    typed_getter!(get_big_int, get_big_int_or, BigInt, coerce::parse_big_int);
    typed_getter!(
        /// Human-readable durations, e.g. `30s` or `2m 5s`.
        get_duration,
        get_duration_or,
        Duration,
        coerce::parse_duration
    );

    /// `true` only for a present, parseable, true value.
    pub fn get_bool(&self, key: &str) -> bool {
        self.get(key).and_then(coerce::parse_bool).unwrap_or(false)
    }

    /// Falls back to `default` when the key is missing or not a boolean.
    pub fn get_bool_or(&self, key: &str, default: bool) -> bool {
        self.get(key).and_then(coerce::parse_bool).unwrap_or(default)
    }

    pub fn get_enum<T: FromStr>(&self, key: &str) -> Option<T> {
        self.get(key).and_then(coerce::parse_enum)
    }

    pub fn get_enum_or<T: FromStr>(&self, key: &str, default: T) -> T {
        self.get_enum(key).unwrap_or(default)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(|k| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
