//! The cluster state snapshot and its rendering.

use serde_json::{json, Value};

use crate::cluster::blocks::ClusterBlocks;
use crate::cluster::metadata::Metadata;
use crate::cluster::metric::{Metric, MetricSet};
use crate::cluster::nodes::DiscoveryNodes;
use crate::cluster::random_uuid;
use crate::cluster::routing::{RoutingNodes, RoutingTable};
use crate::cluster::settings::SettingsFilter;
use crate::xcontent::{Object, ParamError, Params, ToXContent};

/// How settings inside a rendered state are shaped.
#[derive(Debug, Clone, Default)]
pub struct StateView {
    pub settings_filter: SettingsFilter,
    pub flat_settings: bool,
}

impl StateView {
    /// Read `settings_filter` and `flat_settings` from `params`.
    pub fn from_params(params: &Params) -> Result<Self, ParamError> {
        let settings_filter = match params.get("settings_filter") {
            Some(list) => SettingsFilter::parse(list)?,
            None => SettingsFilter::default(),
        };
        Ok(Self {
            settings_filter,
            flat_settings: params.param_as_bool("flat_settings", false)?,
        })
    }
}

/// Immutable snapshot of the whole cluster.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterState {
    cluster_name: String,
    version: u64,
    state_uuid: String,
    nodes: DiscoveryNodes,
    blocks: ClusterBlocks,
    metadata: Metadata,
    routing_table: RoutingTable,
}

impl ClusterState {
    pub fn builder(cluster_name: impl Into<String>) -> ClusterStateBuilder {
        ClusterStateBuilder {
            cluster_name: cluster_name.into(),
            version: 0,
            state_uuid: None,
            nodes: DiscoveryNodes::default(),
            blocks: ClusterBlocks::default(),
            metadata: Metadata::default(),
            routing_table: RoutingTable::default(),
        }
    }

    pub fn cluster_name(&self) -> &str {
        &self.cluster_name
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn state_uuid(&self) -> &str {
        &self.state_uuid
    }

    pub fn nodes(&self) -> &DiscoveryNodes {
        &self.nodes
    }

    pub fn blocks(&self) -> &ClusterBlocks {
        &self.blocks
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn routing_table(&self) -> &RoutingTable {
        &self.routing_table
    }

    pub fn routing_nodes(&self) -> RoutingNodes {
        RoutingNodes::new(&self.routing_table, &self.nodes)
    }

    /// Successor state carrying `routing_table`, one version later.
    pub fn with_routing_table(&self, routing_table: RoutingTable) -> ClusterState {
        ClusterState {
            version: self.version + 1,
            state_uuid: random_uuid(),
            routing_table,
            ..self.clone()
        }
    }

    /// Render the sections selected by `metrics`.
    ///
    /// `cluster_uuid` is always written first.
    pub fn to_xcontent(&self, metrics: &MetricSet, view: &StateView) -> Value {
        let mut doc = Object::new();
        doc.insert("cluster_uuid".into(), json!(self.metadata.cluster_uuid()));

        for metric in metrics.iter() {
            match metric {
                Metric::Version => {
                    doc.insert("version".into(), json!(self.version));
                    doc.insert("state_uuid".into(), json!(self.state_uuid));
                }
                Metric::MasterNode => {
                    doc.insert("master_node".into(), json!(self.nodes.master_node_id()));
                }
                Metric::Blocks => {
                    doc.insert("blocks".into(), self.blocks.to_xcontent());
                }
                Metric::Nodes => {
                    doc.insert("nodes".into(), self.nodes.to_xcontent());
                }
                Metric::Metadata => {
                    doc.insert(
                        "metadata".into(),
                        self.metadata
                            .to_xcontent(&view.settings_filter, view.flat_settings),
                    );
                }
                Metric::RoutingTable => {
                    doc.insert("routing_table".into(), self.routing_table.to_xcontent());
                }
                Metric::RoutingNodes => {
                    doc.insert("routing_nodes".into(), self.routing_nodes().to_xcontent());
                }
            }
        }
        Value::Object(doc)
    }
}

#[derive(Debug)]
pub struct ClusterStateBuilder {
    cluster_name: String,
    version: u64,
    state_uuid: Option<String>,
    nodes: DiscoveryNodes,
    blocks: ClusterBlocks,
    metadata: Metadata,
    routing_table: RoutingTable,
}

impl ClusterStateBuilder {
    pub fn version(mut self, version: u64) -> Self {
        self.version = version;
        self
    }

    pub fn state_uuid(mut self, uuid: impl Into<String>) -> Self {
        self.state_uuid = Some(uuid.into());
        self
    }

    pub fn nodes(mut self, nodes: DiscoveryNodes) -> Self {
        self.nodes = nodes;
        self
    }

    pub fn blocks(mut self, blocks: ClusterBlocks) -> Self {
        self.blocks = blocks;
        self
    }

    pub fn metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn routing_table(mut self, routing_table: RoutingTable) -> Self {
        self.routing_table = routing_table;
        self
    }

    /// Freeze the state, generating a state UUID if none was given.
    pub fn build(self) -> ClusterState {
        ClusterState {
            cluster_name: self.cluster_name,
            version: self.version,
            state_uuid: self.state_uuid.unwrap_or_else(random_uuid),
            nodes: self.nodes,
            blocks: self.blocks,
            metadata: self.metadata,
            routing_table: self.routing_table,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::nodes::DiscoveryNode;

    fn state() -> ClusterState {
        let nodes = DiscoveryNodes::builder()
            .add(DiscoveryNode::new("node0", "0.0.0.0:9000".parse().unwrap()))
            .master_node_id("node0")
            .build()
            .unwrap();
        ClusterState::builder("test").nodes(nodes).build()
    }

    #[test]
    fn test_sections_follow_metric_order() {
        let doc = state().to_xcontent(&MetricSet::all(), &StateView::default());
        let keys: Vec<&str> = doc.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec![
                "cluster_uuid",
                "version",
                "state_uuid",
                "master_node",
                "blocks",
                "nodes",
                "metadata",
                "routing_table",
                "routing_nodes"
            ]
        );
    }

    #[test]
    fn test_metric_subset_only_renders_selected_sections() {
        let metrics = MetricSet::parse("master_node").unwrap();
        let doc = state().to_xcontent(&metrics, &StateView::default());
        assert_eq!(doc, json!({"cluster_uuid": "_na_", "master_node": "node0"}));
    }

    #[test]
    fn test_successor_state_bumps_version_and_uuid() {
        let first = state();
        let next = first.with_routing_table(RoutingTable::default());
        assert_eq!(next.version(), first.version() + 1);
        assert_ne!(next.state_uuid(), first.state_uuid());
        assert_eq!(next.nodes(), first.nodes());
    }

    #[test]
    fn test_view_from_params() {
        let params = Params::empty()
            .with("settings_filter", "index.number*")
            .with("flat_settings", "true");
        let view = StateView::from_params(&params).unwrap();
        assert!(view.flat_settings);
        assert!(view.settings_filter.excludes("index.number_of_shards"));

        let bad = Params::empty().with("flat_settings", "maybe");
        assert!(StateView::from_params(&bad).is_err());
    }
}
