//! Shard routing table and the per-node view derived from it.

use std::collections::BTreeMap;

use serde_json::{json, Value};

use crate::cluster::metadata::Metadata;
use crate::cluster::nodes::DiscoveryNodes;
use crate::xcontent::{object, Object, ToXContent};

/// Copies move straight between these two states; reroutes apply without
/// a recovery phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShardRoutingState {
    Unassigned,
    Started,
}

impl ShardRoutingState {
    pub fn name(self) -> &'static str {
        match self {
            ShardRoutingState::Unassigned => "UNASSIGNED",
            ShardRoutingState::Started => "STARTED",
        }
    }
}

/// One copy (primary or replica) of a shard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShardRouting {
    pub index: String,
    pub shard: u32,
    pub primary: bool,
    pub state: ShardRoutingState,
    pub node: Option<String>,
    /// Target of an in-flight relocation. Always `None` while moves
    /// complete instantly, but part of the rendered shape.
    pub relocating_node: Option<String>,
}

impl ShardRouting {
    pub fn unassigned(index: impl Into<String>, shard: u32, primary: bool) -> Self {
        Self {
            index: index.into(),
            shard,
            primary,
            state: ShardRoutingState::Unassigned,
            node: None,
            relocating_node: None,
        }
    }

    pub fn is_assigned(&self) -> bool {
        self.node.is_some()
    }

    pub fn is_on(&self, node: &str) -> bool {
        self.node.as_deref() == Some(node)
    }

    pub(crate) fn assign(&mut self, node: &str) {
        self.node = Some(node.to_string());
        self.state = ShardRoutingState::Started;
    }

    pub(crate) fn unassign(&mut self) {
        self.node = None;
        self.relocating_node = None;
        self.state = ShardRoutingState::Unassigned;
    }
}

impl ToXContent for ShardRouting {
    fn to_xcontent(&self) -> Value {
        object([
            ("state", json!(self.state.name())),
            ("primary", json!(self.primary)),
            ("node", json!(self.node)),
            ("relocating_node", json!(self.relocating_node)),
            ("shard", json!(self.shard)),
            ("index", json!(self.index)),
        ])
    }
}

/// All copies of every shard of one index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexRoutingTable {
    index: String,
    shards: BTreeMap<u32, Vec<ShardRouting>>,
}

impl IndexRoutingTable {
    /// Every copy of every shard, unassigned.
    pub fn unassigned(index: impl Into<String>, shards: u32, replicas: u32) -> Self {
        let index = index.into();
        let shards = (0..shards)
            .map(|shard| {
                let copies = std::iter::once(true)
                    .chain((0..replicas).map(|_| false))
                    .map(|primary| ShardRouting::unassigned(index.clone(), shard, primary))
                    .collect();
                (shard, copies)
            })
            .collect();
        Self { index, shards }
    }

    pub fn index(&self) -> &str {
        &self.index
    }

    pub fn shard(&self, shard: u32) -> Option<&[ShardRouting]> {
        self.shards.get(&shard).map(Vec::as_slice)
    }

    pub(crate) fn shard_mut(&mut self, shard: u32) -> Option<&mut Vec<ShardRouting>> {
        self.shards.get_mut(&shard)
    }

    pub fn copies(&self) -> impl Iterator<Item = &ShardRouting> {
        self.shards.values().flatten()
    }
}

impl ToXContent for IndexRoutingTable {
    fn to_xcontent(&self) -> Value {
        let shards: Object = self
            .shards
            .iter()
            .map(|(id, copies)| (id.to_string(), copies.to_xcontent()))
            .collect();
        object([("shards", Value::Object(shards))])
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoutingTable {
    indices: BTreeMap<String, IndexRoutingTable>,
}

impl RoutingTable {
    /// Routing for every index in `metadata`, all copies unassigned.
    pub fn from_metadata(metadata: &Metadata) -> Self {
        let indices = metadata
            .indices()
            .map(|index| {
                (
                    index.index().to_string(),
                    IndexRoutingTable::unassigned(
                        index.index(),
                        index.number_of_shards(),
                        index.number_of_replicas(),
                    ),
                )
            })
            .collect();
        Self { indices }
    }

    pub fn add(mut self, table: IndexRoutingTable) -> Self {
        self.indices.insert(table.index.clone(), table);
        self
    }

    pub fn index(&self, name: &str) -> Option<&IndexRoutingTable> {
        self.indices.get(name)
    }

    pub(crate) fn index_mut(&mut self, name: &str) -> Option<&mut IndexRoutingTable> {
        self.indices.get_mut(name)
    }

    pub fn copies(&self) -> impl Iterator<Item = &ShardRouting> {
        self.indices.values().flat_map(IndexRoutingTable::copies)
    }
}

impl ToXContent for RoutingTable {
    fn to_xcontent(&self) -> Value {
        let indices: Object = self
            .indices
            .iter()
            .map(|(name, table)| (name.clone(), table.to_xcontent()))
            .collect();
        object([("indices", Value::Object(indices))])
    }
}

/// Shard copies grouped by the node holding them.
///
/// Every known node gets an entry, even when it holds nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoutingNodes {
    unassigned: Vec<ShardRouting>,
    nodes: BTreeMap<String, Vec<ShardRouting>>,
}

impl RoutingNodes {
    pub fn new(routing_table: &RoutingTable, nodes: &DiscoveryNodes) -> Self {
        let mut by_node: BTreeMap<String, Vec<ShardRouting>> = nodes
            .iter()
            .map(|n| (n.id().to_string(), Vec::new()))
            .collect();
        let mut unassigned = Vec::new();

        for copy in routing_table.copies() {
            match &copy.node {
                Some(node) => by_node.entry(node.clone()).or_default().push(copy.clone()),
                None => unassigned.push(copy.clone()),
            }
        }

        Self {
            unassigned,
            nodes: by_node,
        }
    }

    pub fn unassigned(&self) -> &[ShardRouting] {
        &self.unassigned
    }

    pub fn node(&self, id: &str) -> Option<&[ShardRouting]> {
        self.nodes.get(id).map(Vec::as_slice)
    }
}

impl ToXContent for RoutingNodes {
    fn to_xcontent(&self) -> Value {
        let nodes: Object = self
            .nodes
            .iter()
            .map(|(id, copies)| (id.clone(), copies.to_xcontent()))
            .collect();
        object([
            ("unassigned", self.unassigned.to_xcontent()),
            ("nodes", Value::Object(nodes)),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::nodes::DiscoveryNode;

    #[test]
    fn test_unassigned_table_has_primary_first() {
        let table = IndexRoutingTable::unassigned("logs", 2, 1);
        let shard0 = table.shard(0).unwrap();
        assert_eq!(shard0.len(), 2);
        assert!(shard0[0].primary);
        assert!(!shard0[1].primary);
        assert_eq!(table.copies().count(), 4);
    }

    #[test]
    fn test_routing_nodes_lists_every_node() {
        let nodes = DiscoveryNodes::builder()
            .add(DiscoveryNode::new("a", "127.0.0.1:9300".parse().unwrap()))
            .add(DiscoveryNode::new("b", "127.0.0.1:9301".parse().unwrap()))
            .build()
            .unwrap();
        let mut index = IndexRoutingTable::unassigned("logs", 1, 1);
        index.shard_mut(0).unwrap()[0].assign("a");
        let table = RoutingTable::default().add(index);

        let routing_nodes = RoutingNodes::new(&table, &nodes);
        assert_eq!(routing_nodes.node("a").unwrap().len(), 1);
        assert!(routing_nodes.node("b").unwrap().is_empty());
        assert_eq!(routing_nodes.unassigned().len(), 1);

        let doc = routing_nodes.to_xcontent();
        assert_eq!(doc["nodes"]["a"][0]["state"], "STARTED");
        assert_eq!(doc["nodes"]["b"], json!([]));
        assert_eq!(doc["unassigned"][0]["node"], Value::Null);
    }

    #[test]
    fn test_shard_routing_key_order() {
        let mut copy = ShardRouting::unassigned("logs", 3, false);
        copy.assign("a");
        let doc = copy.to_xcontent();

        let keys: Vec<&str> = doc.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["state", "primary", "node", "relocating_node", "shard", "index"]);
        assert_eq!(doc["relocating_node"], Value::Null);
        assert_eq!(doc["node"], "a");
    }

    #[test]
    fn test_routing_table_renders_shards_by_id() {
        let table = RoutingTable::default().add(IndexRoutingTable::unassigned("logs", 1, 0));
        let doc = table.to_xcontent();
        assert_eq!(
            doc,
            json!({
                "indices": {
                    "logs": {
                        "shards": {
                            "0": [{
                                "state": "UNASSIGNED",
                                "primary": true,
                                "node": null,
                                "relocating_node": null,
                                "shard": 0,
                                "index": "logs"
                            }]
                        }
                    }
                }
            })
        );
    }
}
