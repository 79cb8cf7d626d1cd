//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → stdout (fmt layer, filtered by RUST_LOG or config)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Deprecation warnings log under the `deprecation` target so they can be
//!   filtered separately
//! - Metrics are cheap (atomic increments) and no-ops until a recorder is
//!   installed

pub mod logging;
pub mod metrics;
