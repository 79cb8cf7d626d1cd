//! Cluster reroute service library.
//!
//! Renders the response of a cluster reroute (acknowledgement, routing
//! explanations, and the deprecated `state` field) and serves it over HTTP
//! together with the reroute commands that produce it.

// Document model
pub mod xcontent;

// Domain
pub mod allocation;
pub mod cluster;
pub mod reroute;

// Service surface
pub mod config;
pub mod http;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::ServiceConfig;
pub use http::HttpServer;
pub use lifecycle::RunningService;
pub use reroute::{ClusterRerouteResponse, ClusterService};
