//! Cluster reroute: request execution and response rendering.
//!
//! # Data Flow
//! ```text
//! RerouteRequest (commands, dry_run, explain)
//!     → service.rs (ClusterService: run commands, publish new state)
//!     → ClusterRerouteResponse (acknowledged, state, explanations)
//!
//! Params (?explain, ?metric, ?settings_filter, ?flat_settings)
//!     → mode.rs (RenderMode, computed once)
//!     → response.rs (one code path per mode)
//!     → deprecation.rs (warning when the legacy `state` field is written)
//! ```
//!
//! # Design Decisions
//! - Rendering is pure apart from the caller-supplied deprecation sink
//! - Parameter validation happens before any command runs

pub mod deprecation;
pub mod mode;
pub mod response;
pub mod service;

pub use deprecation::{DeprecationLog, DeprecationRecorder, DeprecationSink};
pub use mode::RenderMode;
pub use response::{
    ClusterRerouteResponse, STATE_FIELD_DEPRECATION_KEY, STATE_FIELD_DEPRECATION_MESSAGE,
};
pub use service::{ClusterService, RerouteBody, RerouteError, RerouteRequest};
