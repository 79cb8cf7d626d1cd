//! Initial cluster state from the `[cluster]` table.
//!
//! Every configured index starts with all shard copies unassigned; shards
//! are placed with reroute commands.

use std::net::SocketAddr;

use crate::cluster::{
    ClusterError, ClusterState, DiscoveryNode, DiscoveryNodes, IndexMetadata, Metadata,
    RoutingTable, Settings, Version, SETTING_NUMBER_OF_REPLICAS, SETTING_NUMBER_OF_SHARDS,
    SETTING_VERSION_CREATED,
};
use crate::config::schema::{ClusterConfig, IndexConfig, NodeConfig};

impl ClusterConfig {
    /// Build the first published cluster state.
    pub fn build_state(&self) -> Result<ClusterState, ClusterError> {
        let mut nodes = DiscoveryNodes::builder();
        for node in &self.nodes {
            nodes = nodes.add(node.to_discovery_node()?);
        }
        if let Some(master) = &self.master_node {
            nodes = nodes.master_node_id(master.clone());
        }

        let mut metadata = Metadata::builder();
        if let Some(uuid) = &self.uuid {
            metadata = metadata.cluster_uuid(uuid.clone(), true);
        }
        for index in &self.indices {
            metadata = metadata.put(index.to_index_metadata()?);
        }
        let metadata = metadata.build();
        let routing_table = RoutingTable::from_metadata(&metadata);

        Ok(ClusterState::builder(self.name.clone())
            .nodes(nodes.build()?)
            .metadata(metadata)
            .routing_table(routing_table)
            .build())
    }
}

impl NodeConfig {
    fn to_discovery_node(&self) -> Result<DiscoveryNode, ClusterError> {
        let address: SocketAddr = self
            .address
            .parse()
            .map_err(|_| ClusterError::InvalidAddress(self.address.clone()))?;

        let mut node = DiscoveryNode::new(self.id.clone(), address).with_name(self.name.clone());
        if let Some(roles) = &self.roles {
            node = node.with_roles(roles.iter().copied());
        }
        for (key, value) in &self.attributes {
            node = node.with_attribute(key.clone(), value.clone());
        }
        Ok(node)
    }
}

impl IndexConfig {
    fn to_index_metadata(&self) -> Result<IndexMetadata, ClusterError> {
        let mut settings = Settings::builder()
            .put(SETTING_VERSION_CREATED, Version::CURRENT)
            .put(SETTING_NUMBER_OF_SHARDS, self.number_of_shards)
            .put(SETTING_NUMBER_OF_REPLICAS, self.number_of_replicas);
        for (key, value) in &self.settings {
            settings = settings.put(key.clone(), value);
        }
        IndexMetadata::builder(self.name.clone())
            .settings(settings.build())
            .build()
    }
}
