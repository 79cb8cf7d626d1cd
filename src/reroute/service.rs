//! Cluster service: owns the current state and executes reroutes.
//!
//! # Responsibilities
//! - Hold the published `ClusterState` for lock-free reads
//! - Run reroute commands against a working copy of the routing table
//! - Publish the successor state unless the request is a dry run
//!
//! # Design Decisions
//! - State is swapped atomically (`ArcSwap`); readers never block
//! - Reroutes are serialised so concurrent requests cannot lose updates
//! - Without `explain`, the first rejected command fails the request and
//!   nothing is published

use std::sync::Arc;

use arc_swap::ArcSwap;
use serde::Deserialize;
use thiserror::Error;
use tokio::sync::Mutex;

use crate::allocation::{
    AllocationCommand, DecisionType, RerouteExplanation, RoutingAllocation, RoutingExplanations,
};
use crate::cluster::ClusterState;
use crate::observability::metrics;
use crate::reroute::response::ClusterRerouteResponse;

#[derive(Debug, Error)]
pub enum RerouteError {
    /// A command was rejected and the caller did not ask for explanations.
    #[error("{reason}")]
    Rejected {
        command: &'static str,
        reason: String,
    },
}

/// Reroute request body: `{"commands": [...]}`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RerouteBody {
    #[serde(default)]
    pub commands: Vec<AllocationCommand>,
}

#[derive(Debug, Clone, Default)]
pub struct RerouteRequest {
    pub commands: Vec<AllocationCommand>,
    /// Compute the outcome without publishing it.
    pub dry_run: bool,
    /// Collect rejections as explanations instead of failing.
    pub explain: bool,
}

pub struct ClusterService {
    state: ArcSwap<ClusterState>,
    reroute_lock: Mutex<()>,
}

impl ClusterService {
    pub fn new(initial: ClusterState) -> Self {
        metrics::record_state_version(initial.version());
        Self {
            state: ArcSwap::from_pointee(initial),
            reroute_lock: Mutex::new(()),
        }
    }

    /// The currently published state.
    pub fn state(&self) -> Arc<ClusterState> {
        self.state.load_full()
    }

    pub async fn reroute(
        &self,
        request: RerouteRequest,
    ) -> Result<ClusterRerouteResponse, RerouteError> {
        let _guard = self.reroute_lock.lock().await;
        let current = self.state.load_full();

        let mut routing = current.routing_table().clone();
        let mut explanations = RoutingExplanations::new();
        {
            let mut allocation =
                RoutingAllocation::new(current.metadata(), current.nodes(), &mut routing);
            for command in &request.commands {
                let decision = command.execute(&mut allocation);
                let kind = decision.kind();
                metrics::record_command(command.name(), kind.name());

                if kind == DecisionType::No && !request.explain {
                    return Err(RerouteError::Rejected {
                        command: command.name(),
                        reason: decision.explanation().unwrap_or("rejected").to_string(),
                    });
                }
                explanations.push(RerouteExplanation::new(command.clone(), decision));
            }
        }

        let changed = routing != *current.routing_table();
        let next = if changed {
            Arc::new(current.with_routing_table(routing))
        } else {
            current.clone()
        };

        if changed && !request.dry_run {
            self.state.store(next.clone());
            metrics::record_state_version(next.version());
            tracing::info!(
                version = next.version(),
                state_uuid = %next.state_uuid(),
                commands = request.commands.len(),
                "Published rerouted cluster state"
            );
        } else {
            tracing::debug!(
                changed,
                dry_run = request.dry_run,
                commands = request.commands.len(),
                "Reroute left published state unchanged"
            );
        }

        Ok(ClusterRerouteResponse::new(true, next, explanations))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::{
        DiscoveryNode, DiscoveryNodes, IndexMetadata, Metadata, RoutingTable, Settings,
        SETTING_NUMBER_OF_REPLICAS,
    };

    fn service() -> ClusterService {
        let metadata = Metadata::builder()
            .put(
                IndexMetadata::builder("logs")
                    .settings(Settings::builder().put(SETTING_NUMBER_OF_REPLICAS, 0).build())
                    .build()
                    .unwrap(),
            )
            .build();
        let nodes = DiscoveryNodes::builder()
            .add(DiscoveryNode::new("a", "127.0.0.1:9300".parse().unwrap()))
            .master_node_id("a")
            .build()
            .unwrap();
        let routing = RoutingTable::from_metadata(&metadata);
        ClusterService::new(
            ClusterState::builder("test")
                .nodes(nodes)
                .metadata(metadata)
                .routing_table(routing)
                .build(),
        )
    }

    fn allocate_primary(accept_data_loss: bool) -> AllocationCommand {
        AllocationCommand::AllocateEmptyPrimary {
            index: "logs".into(),
            shard: 0,
            node: "a".into(),
            accept_data_loss,
        }
    }

    #[tokio::test]
    async fn test_reroute_publishes_successor_state() {
        let service = service();
        let before = service.state();

        let response = service
            .reroute(RerouteRequest {
                commands: vec![allocate_primary(true)],
                ..Default::default()
            })
            .await
            .unwrap();

        let after = service.state();
        assert_eq!(after.version(), before.version() + 1);
        assert_eq!(response.state().state_uuid(), after.state_uuid());
        assert_eq!(response.explanations().len(), 1);
    }

    #[tokio::test]
    async fn test_dry_run_does_not_publish() {
        let service = service();
        let before = service.state();

        let response = service
            .reroute(RerouteRequest {
                commands: vec![allocate_primary(true)],
                dry_run: true,
                explain: false,
            })
            .await
            .unwrap();

        assert_eq!(service.state().state_uuid(), before.state_uuid());
        assert_eq!(response.state().version(), before.version() + 1);
    }

    #[tokio::test]
    async fn test_rejection_fails_without_explain() {
        let service = service();
        let err = service
            .reroute(RerouteRequest {
                commands: vec![allocate_primary(false)],
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, RerouteError::Rejected { command: "allocate_empty_primary", .. }));
        assert!(err.to_string().contains("accept_data_loss"));
    }

    #[tokio::test]
    async fn test_rejection_is_explained_with_explain() {
        let service = service();
        let before = service.state();
        let response = service
            .reroute(RerouteRequest {
                commands: vec![allocate_primary(false)],
                explain: true,
                ..Default::default()
            })
            .await
            .unwrap();

        let explanation = response.explanations().iter().next().unwrap();
        assert_eq!(explanation.decision().kind(), DecisionType::No);
        assert_eq!(service.state().version(), before.version());
    }
}
