//! Index settings and the settings filter.
//!
//! # Design Decisions
//! - Settings are stored flat (`index.number_of_shards → "1"`) and sorted
//!   by key, so rendering is deterministic
//! - Nested rendering splits keys on `.`; a key that collides with a leaf
//!   stays flat at the deepest level where it still fits
//! - Filter patterns compile once into a `RegexSet` matched against the
//!   fully qualified key

use std::collections::BTreeMap;

use regex::RegexSet;
use serde_json::Value;

use crate::xcontent::Object;

/// Flat, key-sorted settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    values: BTreeMap<String, String>,
}

impl Settings {
    pub fn builder() -> SettingsBuilder {
        SettingsBuilder::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
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

    /// Render the settings that survive `filter`.
    pub fn to_xcontent(&self, filter: &SettingsFilter, flat: bool) -> Value {
        let mut root = Object::new();
        for (key, value) in self.iter().filter(|(key, _)| !filter.excludes(key)) {
            if flat {
                root.insert(key.to_string(), Value::String(value.to_string()));
            } else {
                insert_nested(&mut root, key, value);
            }
        }
        Value::Object(root)
    }
}

fn insert_nested(map: &mut Object, key: &str, value: &str) {
    let Some((head, rest)) = key.split_once('.') else {
        map.insert(key.to_string(), Value::String(value.to_string()));
        return;
    };

    let fits = matches!(map.get(head), None | Some(Value::Object(_)));
    if !fits {
        map.insert(key.to_string(), Value::String(value.to_string()));
        return;
    }
    if let Value::Object(child) = map
        .entry(head.to_string())
        .or_insert_with(|| Value::Object(Object::new()))
    {
        insert_nested(child, rest, value);
    }
}

#[derive(Debug, Default)]
pub struct SettingsBuilder {
    values: BTreeMap<String, String>,
}

impl SettingsBuilder {
    pub fn put(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.values.insert(key.into(), value.to_string());
        self
    }

    /// Copy every entry of `other` into this builder.
    pub fn put_all(mut self, other: &Settings) -> Self {
        self.values
            .extend(other.values.iter().map(|(k, v)| (k.clone(), v.clone())));
        self
    }

    pub fn build(self) -> Settings {
        Settings {
            values: self.values,
        }
    }
}

/// Hides settings whose keys match any of a list of patterns.
///
/// `*` matches any run of characters, dots included. A pattern without a
/// wildcard hides the exact key and everything nested below it.
#[derive(Debug, Clone, Default)]
pub struct SettingsFilter {
    patterns: Vec<String>,
    compiled: Option<RegexSet>,
}

impl SettingsFilter {
    pub fn new<I, S>(patterns: I) -> Result<Self, regex::Error>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let patterns: Vec<String> = patterns
            .into_iter()
            .map(Into::into)
            .filter(|p| !p.is_empty())
            .collect();
        if patterns.is_empty() {
            return Ok(Self::default());
        }
        let compiled = RegexSet::new(patterns.iter().map(|p| to_regex(p)))?;
        Ok(Self {
            patterns,
            compiled: Some(compiled),
        })
    }

    /// Parse a comma separated pattern list.
    pub fn parse(list: &str) -> Result<Self, regex::Error> {
        Self::new(list.split(',').map(str::trim))
    }

    pub fn excludes(&self, key: &str) -> bool {
        self.compiled
            .as_ref()
            .is_some_and(|set| set.is_match(key))
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

fn to_regex(pattern: &str) -> String {
    if pattern.contains('*') {
        let body: Vec<String> = pattern.split('*').map(regex::escape).collect();
        format!("^{}$", body.join(".*"))
    } else {
        format!(r"^{}(\..*)?$", regex::escape(pattern))
    }
}
