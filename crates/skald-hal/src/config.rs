//! Backend configuration handed to a transport at initialization.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Key fragments whose values are never printed.
const SECRET_KEY_HINTS: &[&str] = &["token", "key", "secret", "password"];

/// Flat key/value configuration for one backend.
///
/// Built from the `;key=value` tail of a backend selector string.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Name of the backend (the selector's leading id).
    pub name: String,
    /// Additional configuration, in key order.
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

impl BackendConfig {
    /// Create a configuration with no extra keys.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            extra: BTreeMap::new(),
        }
    }

    /// Add a key/value pair. An existing key keeps its first value.
    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.entry(key.into()).or_insert_with(|| value.into());
        self
    }

    /// Look up a value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.extra.get(key).map(String::as_str)
    }

    /// Look up a value and parse it.
    pub fn parse<T: std::str::FromStr>(&self, key: &str) -> Option<Result<T, T::Err>> {
        self.get(key).map(str::parse)
    }
}

fn is_secret(key: &str) -> bool {
    let key = key.to_ascii_lowercase();
    SECRET_KEY_HINTS.iter().any(|hint| key.contains(hint))
}

impl fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redacted: BTreeMap<&str, &str> = self
            .extra
            .iter()
            .map(|(k, v)| {
                let shown = if is_secret(k) { "[REDACTED]" } else { v.as_str() };
                (k.as_str(), shown)
            })
            .collect();
        f.debug_struct("BackendConfig")
            .field("name", &self.name)
            .field("extra", &redacted)
            .finish()
    }
}
