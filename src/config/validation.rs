//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check referential integrity (master node must be a configured node)
//! - Validate value ranges (timeouts > 0, addresses parse, shards > 0)
//! - Detect duplicate node ids and index names
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServiceConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;

use thiserror::Error;

use crate::cluster::{
    MetricSet, MAX_NUMBER_OF_REPLICAS, MAX_NUMBER_OF_SHARDS, SETTING_NUMBER_OF_REPLICAS,
    SETTING_NUMBER_OF_SHARDS,
};
use crate::config::schema::{IndexConfig, ServiceConfig};

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid address for {field}: {value}")]
    InvalidAddress { field: &'static str, value: String },

    #[error("request timeout must be greater than zero")]
    ZeroTimeout,

    #[error("max_body_bytes must be greater than zero")]
    ZeroBodyLimit,

    #[error("unknown log level: {0}")]
    UnknownLogLevel(String),

    #[error("invalid default metric [{value}]: {reason}")]
    InvalidDefaultMetric { value: String, reason: String },

    #[error("admin.api_key must not be empty")]
    EmptyApiKey,

    #[error("cluster must define at least one node")]
    NoNodes,

    #[error("node id must not be empty")]
    EmptyNodeId,

    #[error("duplicate node id: {0}")]
    DuplicateNode(String),

    #[error("master node {0} is not a configured node")]
    UnknownMaster(String),

    #[error("index name must not be empty")]
    EmptyIndexName,

    #[error("duplicate index: {0}")]
    DuplicateIndex(String),

    #[error("index {0} must have at least one shard")]
    ZeroShards(String),

    #[error("index {index}: {key} is {value}, must be <= {max}")]
    CountOutOfRange {
        index: String,
        key: &'static str,
        value: u32,
        max: u32,
    },

    #[error("index {index}: {key} must be a non-negative integer, got {value}")]
    InvalidCount {
        index: String,
        key: &'static str,
        value: String,
    },
}

/// Check every semantic constraint and report all violations.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_address(&mut errors, "listener.bind_address", &config.listener.bind_address);
    if config.listener.max_body_bytes == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    let observability = &config.observability;
    if !LOG_LEVELS.contains(&observability.log_level.to_ascii_lowercase().as_str()) {
        errors.push(ValidationError::UnknownLogLevel(observability.log_level.clone()));
    }
    if observability.metrics_enabled {
        check_address(
            &mut errors,
            "observability.metrics_address",
            &observability.metrics_address,
        );
    }

    if let Err(e) = MetricSet::parse(&config.render.default_metric) {
        errors.push(ValidationError::InvalidDefaultMetric {
            value: config.render.default_metric.clone(),
            reason: e.to_string(),
        });
    }

    if matches!(config.admin.api_key.as_deref(), Some(key) if key.trim().is_empty()) {
        errors.push(ValidationError::EmptyApiKey);
    }

    validate_cluster(config, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_cluster(config: &ServiceConfig, errors: &mut Vec<ValidationError>) {
    let cluster = &config.cluster;
    if cluster.nodes.is_empty() {
        errors.push(ValidationError::NoNodes);
    }

    let mut node_ids = HashSet::new();
    for node in &cluster.nodes {
        if node.id.is_empty() {
            errors.push(ValidationError::EmptyNodeId);
        } else if !node_ids.insert(node.id.as_str()) {
            errors.push(ValidationError::DuplicateNode(node.id.clone()));
        }
        check_address(errors, "cluster.nodes.address", &node.address);
    }

    if let Some(master) = &cluster.master_node {
        if !node_ids.contains(master.as_str()) {
            errors.push(ValidationError::UnknownMaster(master.clone()));
        }
    }

    let mut index_names = HashSet::new();
    for index in &cluster.indices {
        if index.name.is_empty() {
            errors.push(ValidationError::EmptyIndexName);
        } else if !index_names.insert(index.name.as_str()) {
            errors.push(ValidationError::DuplicateIndex(index.name.clone()));
        }
        validate_counts(index, errors);
    }
}

/// Check the shard and replica counts the index will actually get: an
/// entry in `settings` overrides the dedicated field.
fn validate_counts(index: &IndexConfig, errors: &mut Vec<ValidationError>) {
    let counts = [
        (SETTING_NUMBER_OF_SHARDS, index.number_of_shards, MAX_NUMBER_OF_SHARDS),
        (SETTING_NUMBER_OF_REPLICAS, index.number_of_replicas, MAX_NUMBER_OF_REPLICAS),
    ];
    for (key, field, max) in counts {
        let value = match index.settings.get(key) {
            None => field,
            Some(raw) => match raw.parse::<u32>() {
                Ok(value) => value,
                Err(_) => {
                    errors.push(ValidationError::InvalidCount {
                        index: index.name.clone(),
                        key,
                        value: raw.clone(),
                    });
                    continue;
                }
            },
        };

        if key == SETTING_NUMBER_OF_SHARDS && value == 0 {
            errors.push(ValidationError::ZeroShards(index.name.clone()));
        } else if value > max {
            errors.push(ValidationError::CountOutOfRange {
                index: index.name.clone(),
                key,
                value,
                max,
            });
        }
    }
}

fn check_address(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field,
            value: value.to_string(),
        });
    }
}
