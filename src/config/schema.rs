//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::cluster::DiscoveryNodeRole;

/// Root configuration for the reroute service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServiceConfig {
    /// Listener configuration (bind address, body limit).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// API authentication.
    pub admin: AdminConfig,

    /// Response rendering defaults.
    pub render: RenderConfig,

    /// Initial cluster membership and indices.
    pub cluster: ClusterConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:9200").
    pub bind_address: String,

    /// Maximum accepted request body in bytes.
    pub max_body_bytes: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:9200".to_string(),
            max_body_bytes: 1024 * 1024,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9464".to_string(),
        }
    }
}

/// API authentication.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AdminConfig {
    /// Bearer token required on `/_cluster/*`. Unset means no auth.
    pub api_key: Option<String>,
}

/// Response rendering defaults.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RenderConfig {
    /// `metric` used by the reroute endpoint when the request has none.
    pub default_metric: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            default_metric: "version,master_node,blocks,nodes,routing_table,routing_nodes"
                .to_string(),
        }
    }
}

/// Initial cluster membership and indices.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ClusterConfig {
    pub name: String,

    /// Cluster UUID; unset renders as `_na_`.
    pub uuid: Option<String>,

    pub nodes: Vec<NodeConfig>,

    /// Elected master node id.
    pub master_node: Option<String>,

    pub indices: Vec<IndexConfig>,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            name: "cluster-reroute".to_string(),
            uuid: None,
            nodes: vec![NodeConfig {
                id: "node-0".to_string(),
                name: "node-0".to_string(),
                address: "127.0.0.1:9300".to_string(),
                roles: None,
                attributes: BTreeMap::new(),
            }],
            master_node: Some("node-0".to_string()),
            indices: Vec::new(),
        }
    }
}

/// A cluster member.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NodeConfig {
    pub id: String,

    #[serde(default)]
    pub name: String,

    /// Transport address (e.g., "127.0.0.1:9300").
    pub address: String,

    /// Node roles; all built-in roles when unset.
    #[serde(default)]
    pub roles: Option<Vec<DiscoveryNodeRole>>,

    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

/// An index definition.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IndexConfig {
    pub name: String,

    #[serde(default = "default_shards")]
    pub number_of_shards: u32,

    #[serde(default = "default_replicas")]
    pub number_of_replicas: u32,

    /// Extra settings, keyed by full setting name.
    #[serde(default)]
    pub settings: BTreeMap<String, String>,
}

fn default_shards() -> u32 {
    1
}

fn default_replicas() -> u32 {
    1
}
