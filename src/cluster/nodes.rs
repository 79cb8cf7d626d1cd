//! Cluster membership: discovery nodes and the elected master.

use std::collections::{BTreeMap, BTreeSet};
use std::net::SocketAddr;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::cluster::{random_uuid, ClusterError};
use crate::xcontent::{object, Object, ToXContent};

/// Built-in node roles.
///
/// Variants are declared in name order so the derived ordering renders
/// roles alphabetically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscoveryNodeRole {
    Data,
    DataCold,
    DataContent,
    DataFrozen,
    DataHot,
    DataWarm,
    Index,
    Ingest,
    Master,
    Ml,
    RemoteClusterClient,
    Search,
    Transform,
    VotingOnly,
}

impl DiscoveryNodeRole {
    pub const ALL: [DiscoveryNodeRole; 14] = [
        DiscoveryNodeRole::Data,
        DiscoveryNodeRole::DataCold,
        DiscoveryNodeRole::DataContent,
        DiscoveryNodeRole::DataFrozen,
        DiscoveryNodeRole::DataHot,
        DiscoveryNodeRole::DataWarm,
        DiscoveryNodeRole::Index,
        DiscoveryNodeRole::Ingest,
        DiscoveryNodeRole::Master,
        DiscoveryNodeRole::Ml,
        DiscoveryNodeRole::RemoteClusterClient,
        DiscoveryNodeRole::Search,
        DiscoveryNodeRole::Transform,
        DiscoveryNodeRole::VotingOnly,
    ];

    pub fn name(self) -> &'static str {
        match self {
            DiscoveryNodeRole::Data => "data",
            DiscoveryNodeRole::DataCold => "data_cold",
            DiscoveryNodeRole::DataContent => "data_content",
            DiscoveryNodeRole::DataFrozen => "data_frozen",
            DiscoveryNodeRole::DataHot => "data_hot",
            DiscoveryNodeRole::DataWarm => "data_warm",
            DiscoveryNodeRole::Index => "index",
            DiscoveryNodeRole::Ingest => "ingest",
            DiscoveryNodeRole::Master => "master",
            DiscoveryNodeRole::Ml => "ml",
            DiscoveryNodeRole::RemoteClusterClient => "remote_cluster_client",
            DiscoveryNodeRole::Search => "search",
            DiscoveryNodeRole::Transform => "transform",
            DiscoveryNodeRole::VotingOnly => "voting_only",
        }
    }
}

/// A member of the cluster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryNode {
    id: String,
    name: String,
    ephemeral_id: String,
    transport_address: SocketAddr,
    external_id: Option<String>,
    attributes: BTreeMap<String, String>,
    roles: BTreeSet<DiscoveryNodeRole>,
}

impl DiscoveryNode {
    /// Create a node with an empty name, a fresh ephemeral id and every
    /// built-in role.
    pub fn new(id: impl Into<String>, transport_address: SocketAddr) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            ephemeral_id: random_uuid(),
            transport_address,
            external_id: None,
            attributes: BTreeMap::new(),
            roles: DiscoveryNodeRole::ALL.into_iter().collect(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_external_id(mut self, external_id: impl Into<String>) -> Self {
        self.external_id = Some(external_id.into());
        self
    }

    pub fn with_roles(mut self, roles: impl IntoIterator<Item = DiscoveryNodeRole>) -> Self {
        self.roles = roles.into_iter().collect();
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ephemeral_id(&self) -> &str {
        &self.ephemeral_id
    }

    pub fn transport_address(&self) -> SocketAddr {
        self.transport_address
    }

    /// External id, falling back to the node name.
    pub fn external_id(&self) -> &str {
        self.external_id.as_deref().unwrap_or(&self.name)
    }

    pub fn roles(&self) -> impl Iterator<Item = DiscoveryNodeRole> + '_ {
        self.roles.iter().copied()
    }

    pub fn has_role(&self, role: DiscoveryNodeRole) -> bool {
        self.roles.contains(&role)
    }
}

impl ToXContent for DiscoveryNode {
    fn to_xcontent(&self) -> Value {
        let attributes: Object = self
            .attributes
            .iter()
            .map(|(k, v)| (k.clone(), json!(v)))
            .collect();
        let roles: Vec<&str> = self.roles().map(DiscoveryNodeRole::name).collect();

        object([
            ("name", json!(self.name)),
            ("ephemeral_id", json!(self.ephemeral_id)),
            ("transport_address", json!(self.transport_address.to_string())),
            ("external_id", json!(self.external_id())),
            ("attributes", Value::Object(attributes)),
            ("roles", json!(roles)),
        ])
    }
}

/// The set of nodes in a cluster state, keyed by node id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscoveryNodes {
    nodes: BTreeMap<String, DiscoveryNode>,
    master_node_id: Option<String>,
}

impl DiscoveryNodes {
    pub fn builder() -> DiscoveryNodesBuilder {
        DiscoveryNodesBuilder::default()
    }

    pub fn get(&self, id: &str) -> Option<&DiscoveryNode> {
        self.nodes.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn master_node_id(&self) -> Option<&str> {
        self.master_node_id.as_deref()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DiscoveryNode> {
        self.nodes.values()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl ToXContent for DiscoveryNodes {
    fn to_xcontent(&self) -> Value {
        Value::Object(
            self.nodes
                .iter()
                .map(|(id, node)| (id.clone(), node.to_xcontent()))
                .collect(),
        )
    }
}

#[derive(Debug, Default)]
pub struct DiscoveryNodesBuilder {
    nodes: BTreeMap<String, DiscoveryNode>,
    master_node_id: Option<String>,
}

impl DiscoveryNodesBuilder {
    /// Add a node, replacing any node with the same id.
    pub fn add(mut self, node: DiscoveryNode) -> Self {
        self.nodes.insert(node.id.clone(), node);
        self
    }

    pub fn master_node_id(mut self, id: impl Into<String>) -> Self {
        self.master_node_id = Some(id.into());
        self
    }

    pub fn build(self) -> Result<DiscoveryNodes, ClusterError> {
        if let Some(master) = &self.master_node_id {
            if !self.nodes.contains_key(master) {
                return Err(ClusterError::UnknownMaster(master.clone()));
            }
        }
        Ok(DiscoveryNodes {
            nodes: self.nodes,
            master_node_id: self.master_node_id,
        })
    }
}
