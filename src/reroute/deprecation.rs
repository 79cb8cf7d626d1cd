//! Deprecation warning channels.
//!
//! # Design Decisions
//! - Renderers receive the sink as an argument; there is no global logger
//! - `DeprecationLog` writes each key at WARN once per process, then DEBUG
//! - `DeprecationRecorder` collects warnings for one request so they can be
//!   returned to the client as `Warning` headers

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use crate::observability::metrics;

/// Receives deprecation warnings raised while serving a request.
pub trait DeprecationSink: Send + Sync {
    fn warn(&self, key: &str, message: &str);
}

/// Process-wide deprecation log backed by tracing.
#[derive(Debug, Default)]
pub struct DeprecationLog {
    seen: Mutex<HashSet<String>>,
}

impl DeprecationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `key` has been logged before.
    pub fn has_logged(&self, key: &str) -> bool {
        self.seen
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .contains(key)
    }
}

impl DeprecationSink for DeprecationLog {
    fn warn(&self, key: &str, message: &str) {
        metrics::record_deprecation(key);
        let first = self
            .seen
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(key.to_string());
        if first {
            tracing::warn!(target: "deprecation", key, "{}", message);
        } else {
            tracing::debug!(target: "deprecation", key, "{}", message);
        }
    }
}

/// Collects the warnings of a single request, one per key.
#[derive(Debug, Default)]
pub struct DeprecationRecorder {
    warnings: Mutex<Vec<(String, String)>>,
    forward: Option<Arc<DeprecationLog>>,
}

impl DeprecationRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record locally and also pass every warning on to `log`.
    pub fn forwarding(log: Arc<DeprecationLog>) -> Self {
        Self {
            warnings: Mutex::new(Vec::new()),
            forward: Some(log),
        }
    }

    /// Recorded messages in the order they were raised.
    pub fn messages(&self) -> Vec<String> {
        self.warnings
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .iter()
            .map(|(_, message)| message.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.warnings
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DeprecationSink for DeprecationRecorder {
    fn warn(&self, key: &str, message: &str) {
        if let Some(log) = &self.forward {
            log.warn(key, message);
        }
        let mut warnings = self
            .warnings
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if !warnings.iter().any(|(k, _)| k == key) {
            warnings.push((key.to_string(), message.to_string()));
        }
    }
}
