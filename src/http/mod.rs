//! HTTP surface of the reroute service.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request id, trace, timeout, body limit)
//!     → auth.rs (bearer token on /_cluster/*)
//!     → handlers.rs (query validation, reroute, render)
//!     → error.rs (failures as {"error": {...}, "status": N})
//!     → Send to client
//! ```

pub mod auth;
pub mod error;
pub mod handlers;
pub mod server;

pub use error::ApiError;
pub use server::{AppState, HttpServer};
