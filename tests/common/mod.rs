//! Shared utilities for integration tests.

use cluster_reroute::config::{IndexConfig, NodeConfig, ServiceConfig};
use cluster_reroute::lifecycle::{self, RunningService};

/// A two-node cluster with one single-shard index (`logs`, one replica),
/// listening on an ephemeral port.
pub fn test_config() -> ServiceConfig {
    let mut config = ServiceConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.cluster.nodes = vec![node("node-a", 9300), node("node-b", 9301)];
    config.cluster.master_node = Some("node-a".to_string());
    config.cluster.indices = vec![IndexConfig {
        name: "logs".to_string(),
        number_of_shards: 1,
        number_of_replicas: 1,
        settings: Default::default(),
    }];
    config
}

fn node(id: &str, port: u16) -> NodeConfig {
    NodeConfig {
        id: id.to_string(),
        name: id.to_string(),
        address: format!("127.0.0.1:{port}"),
        roles: None,
        attributes: Default::default(),
    }
}

/// Start a service and return it with its base URL.
pub async fn start_service(config: ServiceConfig) -> (RunningService, String) {
    let service = lifecycle::start(&config).await.unwrap();
    let base = format!("http://{}", service.local_addr);
    (service, base)
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
