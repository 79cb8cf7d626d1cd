//! Allocation decisions and reroute commands.
//!
//! # Data Flow
//! ```text
//! reroute request body
//!     → command.rs (AllocationCommand, parsed from the wire format)
//!     → RoutingAllocation (validate against metadata + nodes, apply)
//!     → decision.rs (YES / NO / THROTTLE outcome)
//!     → explanation.rs (command + decision, rendered on ?explain)
//! ```
//!
//! # Design Decisions
//! - Commands apply immediately; there is no recovery or balancing phase
//! - A rejected command is a NO decision, the caller decides whether that
//!   fails the request

pub mod command;
pub mod decision;
pub mod explanation;

pub use command::{AllocationCommand, RoutingAllocation};
pub use decision::{Decision, DecisionType};
pub use explanation::{RerouteExplanation, RoutingExplanations};
