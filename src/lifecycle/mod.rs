//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Validated config → Seed cluster state → Bind listener → Serve
//!
//! Shutdown (RunningService in startup.rs):
//!     Broadcast → Stop accepting → Drain connections → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Ordered startup: state first, then listener (traffic only when ready)
//! - Shutdown is a broadcast so every long-running task can observe it

pub mod signals;
pub mod startup;

pub use startup::{start, RunningService, StartupError};
