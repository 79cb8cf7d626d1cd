//! Cluster state model.
//!
//! # Data Flow
//! ```text
//! ClusterState (immutable snapshot)
//!     ├── nodes.rs     DiscoveryNodes + elected master
//!     ├── blocks.rs    global and per-index blocks
//!     ├── metadata.rs  index metadata, coordination, templates, graveyard
//!     │     └── settings.rs  flat settings + SettingsFilter
//!     └── routing.rs   routing table, derived routing nodes
//!
//! Rendering:
//!     MetricSet selects sections → StateView shapes settings → Value
//! ```
//!
//! # Design Decisions
//! - Snapshots are values: a change produces a new state with a bumped
//!   version and a fresh state UUID
//! - Identifiers (state UUID, ephemeral ids) are generated once at build time
//!   and echoed verbatim by every render
//! - No coordination logic lives here; these are data holders

pub mod blocks;
pub mod metadata;
pub mod metric;
pub mod nodes;
pub mod routing;
pub mod settings;
pub mod state;

pub use blocks::{ClusterBlock, ClusterBlockLevel, ClusterBlocks};
pub use metadata::{
    CoordinationMetadata, IndexGraveyard, IndexMetadata, IndexMetadataBuilder, IndexState,
    IndexTemplateMetadata, Metadata, MetadataBuilder, Tombstone, Version, MAX_NUMBER_OF_REPLICAS,
    MAX_NUMBER_OF_SHARDS, SETTING_NUMBER_OF_REPLICAS, SETTING_NUMBER_OF_SHARDS, SETTING_VERSION_CREATED,
};
pub use metric::{Metric, MetricSet};
pub use nodes::{DiscoveryNode, DiscoveryNodeRole, DiscoveryNodes, DiscoveryNodesBuilder};
pub use routing::{IndexRoutingTable, RoutingNodes, RoutingTable, ShardRouting, ShardRoutingState};
pub use settings::{Settings, SettingsBuilder, SettingsFilter};
pub use state::{ClusterState, ClusterStateBuilder, StateView};

use thiserror::Error;

/// Placeholder used for identifiers that have not been assigned yet.
pub const UNKNOWN_UUID: &str = "_na_";

/// Errors raised while assembling cluster state.
#[derive(Debug, Error)]
pub enum ClusterError {
    #[error("failed to parse setting [{key}] with value [{value}]")]
    InvalidSetting { key: String, value: String },

    #[error("index [{0}] must have at least one shard")]
    NoShards(String),

    #[error("master node [{0}] is not part of the cluster")]
    UnknownMaster(String),

    #[error("invalid transport address [{0}]")]
    InvalidAddress(String),

    #[error("setting [{key}] is [{value}], must be <= {max}")]
    SettingOutOfRange { key: String, value: u32, max: u32 },
}

/// Fresh random identifier for states and node incarnations.
pub(crate) fn random_uuid() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}
