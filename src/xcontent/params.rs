//! Rendering parameters.
//!
//! A flat `String → String` map, the same shape as a URL query string.
//! Typed accessors parse values strictly: a recognised option with a
//! malformed value is an error, never a silent default.

use std::collections::BTreeMap;
use thiserror::Error;

/// Errors raised while interpreting rendering parameters.
#[derive(Debug, Error)]
pub enum ParamError {
    /// A boolean option carried something other than `true`/`false`.
    #[error("failed to parse value [{value}] as only [true] or [false] are allowed for parameter [{key}]")]
    InvalidBoolean { key: String, value: String },

    /// A metric name that the cluster state does not know about.
    #[error("unknown metric [{0}]")]
    UnknownMetric(String),

    /// `none` was listed together with real metrics.
    #[error("metric [none] cannot be combined with other metrics, got [{0}]")]
    NoneCombined(String),

    /// A settings filter pattern could not be compiled.
    #[error("invalid settings_filter: {0}")]
    SettingsFilter(#[from] regex::Error),
}

/// Caller-supplied rendering options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    inner: BTreeMap<String, String>,
}

impl Params {
    /// No parameters at all.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.inner.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.inner.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.inner.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.inner.keys().map(String::as_str)
    }

    /// Read a boolean option.
    ///
    /// A present-but-empty value (`?pretty`) counts as `true`.
    pub fn param_as_bool(&self, key: &str, default: bool) -> Result<bool, ParamError> {
        match self.get(key) {
            None => Ok(default),
            Some("") | Some("true") => Ok(true),
            Some("false") => Ok(false),
            Some(other) => Err(ParamError::InvalidBoolean {
                key: key.to_string(),
                value: other.to_string(),
            }),
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            inner: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

impl From<BTreeMap<String, String>> for Params {
    fn from(inner: BTreeMap<String, String>) -> Self {
        Self { inner }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bool_parsing_is_strict() {
        let params = Params::empty()
            .with("explain", "true")
            .with("pretty", "")
            .with("dry_run", "yes");

        assert!(params.param_as_bool("explain", false).unwrap());
        assert!(params.param_as_bool("pretty", false).unwrap());
        assert!(!params.param_as_bool("missing", false).unwrap());

        let err = params.param_as_bool("dry_run", false).unwrap_err();
        assert!(matches!(err, ParamError::InvalidBoolean { ref key, .. } if key == "dry_run"));
    }

    #[test]
    fn test_from_iterator() {
        let params: Params = [("metric", "none")].into_iter().collect();
        assert_eq!(params.get("metric"), Some("none"));
        assert!(params.contains("metric"));
        assert_eq!(params.keys().collect::<Vec<_>>(), vec!["metric"]);
    }
}
