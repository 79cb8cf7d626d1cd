//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ServiceConfig (validated, immutable)
//!     → seed.rs (initial ClusterState from the [cluster] table)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod seed;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    AdminConfig, ClusterConfig, IndexConfig, ListenerConfig, NodeConfig, ObservabilityConfig,
    RenderConfig, ServiceConfig, TimeoutConfig,
};
pub use validation::{validate_config, ValidationError};
