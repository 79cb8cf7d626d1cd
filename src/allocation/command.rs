//! Explicit reroute commands.
//!
//! # Responsibilities
//! - Parse commands from the reroute request wire format
//! - Validate each command against metadata, nodes and current routing
//! - Apply accepted commands to a working routing table
//!
//! # Design Decisions
//! - Externally tagged serde enum: `{"move": {"index": ..., ...}}`
//! - Rejections carry the command name as decider label

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::allocation::decision::{Decision, DecisionType};
use crate::cluster::{DiscoveryNodes, IndexMetadata, Metadata, RoutingTable, ShardRouting};
use crate::xcontent::{object, Object};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub enum AllocationCommand {
    /// Assign an unassigned replica of a started primary to `node`.
    AllocateReplica {
        index: String,
        shard: u32,
        node: String,
    },
    /// Assign an unassigned primary to `node`, starting from an empty copy.
    AllocateEmptyPrimary {
        index: String,
        shard: u32,
        node: String,
        #[serde(default)]
        accept_data_loss: bool,
    },
    /// Assign an unassigned primary to `node`, reusing whatever data it holds.
    AllocateStalePrimary {
        index: String,
        shard: u32,
        node: String,
        #[serde(default)]
        accept_data_loss: bool,
    },
    /// Move a started copy between nodes.
    Move {
        index: String,
        shard: u32,
        from_node: String,
        to_node: String,
    },
    /// Drop the copy on `node` back to unassigned.
    Cancel {
        index: String,
        shard: u32,
        node: String,
        #[serde(default)]
        allow_primary: bool,
    },
}

impl AllocationCommand {
    pub fn name(&self) -> &'static str {
        match self {
            AllocationCommand::AllocateReplica { .. } => "allocate_replica",
            AllocationCommand::AllocateEmptyPrimary { .. } => "allocate_empty_primary",
            AllocationCommand::AllocateStalePrimary { .. } => "allocate_stale_primary",
            AllocationCommand::Move { .. } => "move",
            AllocationCommand::Cancel { .. } => "cancel",
        }
    }

    pub fn index(&self) -> &str {
        match self {
            AllocationCommand::AllocateReplica { index, .. }
            | AllocationCommand::AllocateEmptyPrimary { index, .. }
            | AllocationCommand::AllocateStalePrimary { index, .. }
            | AllocationCommand::Move { index, .. }
            | AllocationCommand::Cancel { index, .. } => index,
        }
    }

    pub fn shard(&self) -> u32 {
        match self {
            AllocationCommand::AllocateReplica { shard, .. }
            | AllocationCommand::AllocateEmptyPrimary { shard, .. }
            | AllocationCommand::AllocateStalePrimary { shard, .. }
            | AllocationCommand::Move { shard, .. }
            | AllocationCommand::Cancel { shard, .. } => *shard,
        }
    }

    /// The command's arguments as a flat mapping, in wire order.
    pub fn parameters(&self) -> Value {
        let mut params = Object::new();
        params.insert("index".into(), json!(self.index()));
        params.insert("shard".into(), json!(self.shard()));
        match self {
            AllocationCommand::AllocateReplica { node, .. } => {
                params.insert("node".into(), json!(node));
            }
            AllocationCommand::AllocateEmptyPrimary {
                node,
                accept_data_loss,
                ..
            }
            | AllocationCommand::AllocateStalePrimary {
                node,
                accept_data_loss,
                ..
            } => {
                params.insert("node".into(), json!(node));
                params.insert("accept_data_loss".into(), json!(accept_data_loss));
            }
            AllocationCommand::Move {
                from_node, to_node, ..
            } => {
                params.insert("from_node".into(), json!(from_node));
                params.insert("to_node".into(), json!(to_node));
            }
            AllocationCommand::Cancel {
                node, allow_primary, ..
            } => {
                params.insert("node".into(), json!(node));
                params.insert("allow_primary".into(), json!(allow_primary));
            }
        }
        Value::Object(params)
    }

    /// Wire form, `{"<name>": {<parameters>}}`.
    pub fn to_request_xcontent(&self) -> Value {
        object([(self.name(), self.parameters())])
    }

    /// Validate and apply this command.
    ///
    /// Returns `Decision::YES` when the routing table was changed, or a NO
    /// decision explaining the rejection; a rejected command leaves the
    /// table untouched.
    pub fn execute(&self, allocation: &mut RoutingAllocation<'_>) -> Decision {
        match self.try_execute(allocation) {
            Ok(()) => Decision::YES,
            Err(reason) => {
                tracing::debug!(command = self.name(), %reason, "Reroute command rejected");
                Decision::single(
                    DecisionType::No,
                    format!("{} (allocation command)", self.name()),
                    reason,
                )
            }
        }
    }

    fn try_execute(&self, allocation: &mut RoutingAllocation<'_>) -> Result<(), String> {
        let name = self.name();
        let (index, shard) = (self.index(), self.shard());
        let index_metadata = allocation.index_metadata(index).ok_or_else(|| {
            format!("[{name}] no such index [{index}]")
        })?;
        if shard >= index_metadata.number_of_shards() {
            return Err(format!(
                "[{name}] shard [{shard}] out of range for index [{index}] with [{}] shards",
                index_metadata.number_of_shards()
            ));
        }

        match self {
            AllocationCommand::AllocateReplica { node, .. } => {
                allocation.require_node(name, node)?;
                let copies = allocation.copies_mut(index, shard)?;
                let primary_started = copies.iter().any(|c| c.primary && c.is_assigned());
                if !primary_started {
                    return Err(format!(
                        "[{name}] trying to allocate a replica shard [{index}][{shard}], while corresponding primary shard is still unassigned"
                    ));
                }
                reject_if_on_node(name, copies, index, shard, node)?;
                let replica = copies
                    .iter_mut()
                    .find(|c| !c.primary && !c.is_assigned())
                    .ok_or_else(|| {
                        format!(
                            "[{name}] all copies of [{index}][{shard}] are already assigned. Use the move allocation command instead"
                        )
                    })?;
                replica.assign(node);
            }
            AllocationCommand::AllocateEmptyPrimary {
                node,
                accept_data_loss,
                ..
            }
            | AllocationCommand::AllocateStalePrimary {
                node,
                accept_data_loss,
                ..
            } => {
                allocation.require_node(name, node)?;
                if !accept_data_loss {
                    return Err(format!(
                        "[{name}] allocating a primary for [{index}][{shard}] on node [{node}] can result in data loss. Please confirm by setting the accept_data_loss parameter to true"
                    ));
                }
                let copies = allocation.copies_mut(index, shard)?;
                reject_if_on_node(name, copies, index, shard, node)?;
                let primary = copies
                    .iter_mut()
                    .find(|c| c.primary)
                    .ok_or_else(|| format!("[{name}] no primary copy for [{index}][{shard}]"))?;
                if primary.is_assigned() {
                    return Err(format!(
                        "[{name}] primary [{index}][{shard}] is already assigned"
                    ));
                }
                primary.assign(node);
            }
            AllocationCommand::Move {
                from_node, to_node, ..
            } => {
                allocation.require_node(name, from_node)?;
                allocation.require_node(name, to_node)?;
                if from_node == to_node {
                    return Err(format!(
                        "[{name}] source and target node are both [{from_node}]"
                    ));
                }
                let copies = allocation.copies_mut(index, shard)?;
                reject_if_on_node(name, copies, index, shard, to_node)?;
                let copy = copies
                    .iter_mut()
                    .find(|c| c.is_on(from_node))
                    .ok_or_else(|| {
                        format!("[{name}] failed to find [{index}][{shard}] on node [{from_node}]")
                    })?;
                copy.assign(to_node);
            }
            AllocationCommand::Cancel {
                node,
                allow_primary,
                ..
            } => {
                allocation.require_node(name, node)?;
                let copies = allocation.copies_mut(index, shard)?;
                let position = copies
                    .iter()
                    .position(|c| c.is_on(node))
                    .ok_or_else(|| {
                        format!("[{name}] failed to find [{index}][{shard}] on node [{node}]")
                    })?;
                if copies[position].primary {
                    if !allow_primary {
                        return Err(format!(
                            "[{name}] can't cancel [{index}][{shard}] on node [{node}], shard is primary and started"
                        ));
                    }
                    promote_replica(copies, position);
                }
                copies[position].unassign();
            }
        }
        Ok(())
    }
}

fn reject_if_on_node(
    name: &str,
    copies: &[ShardRouting],
    index: &str,
    shard: u32,
    node: &str,
) -> Result<(), String> {
    if copies.iter().any(|c| c.is_on(node)) {
        return Err(format!(
            "[{name}] a copy of [{index}][{shard}] is already allocated to node [{node}]"
        ));
    }
    Ok(())
}

/// Hand the primary role from `copies[primary]` to an assigned replica, if
/// there is one.
fn promote_replica(copies: &mut [ShardRouting], primary: usize) {
    if let Some(replica) = copies.iter().position(|c| !c.primary && c.is_assigned()) {
        copies[replica].primary = true;
        copies[primary].primary = false;
    }
}

/// Working context for a batch of commands.
pub struct RoutingAllocation<'a> {
    metadata: &'a Metadata,
    nodes: &'a DiscoveryNodes,
    routing_table: &'a mut RoutingTable,
}

impl<'a> RoutingAllocation<'a> {
    pub fn new(
        metadata: &'a Metadata,
        nodes: &'a DiscoveryNodes,
        routing_table: &'a mut RoutingTable,
    ) -> Self {
        Self {
            metadata,
            nodes,
            routing_table,
        }
    }

    pub fn routing_table(&self) -> &RoutingTable {
        self.routing_table
    }

    fn index_metadata(&self, index: &str) -> Option<&'a IndexMetadata> {
        self.metadata.index(index)
    }

    fn require_node(&self, command: &str, node: &str) -> Result<(), String> {
        if self.nodes.contains(node) {
            Ok(())
        } else {
            Err(format!("[{command}] could not resolve node [{node}]"))
        }
    }

    fn copies_mut(&mut self, index: &str, shard: u32) -> Result<&mut Vec<ShardRouting>, String> {
        self.routing_table
            .index_mut(index)
            .and_then(|table| table.shard_mut(shard))
            .ok_or_else(|| format!("no routing entry for [{index}][{shard}]"))
    }
}
