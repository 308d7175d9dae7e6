//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware layers)
//!     → security::rate_limit (admission gate, every route)
//!     → matched handler → analytics::QueryService
//!     → JSON array of row objects (or text diagnostic on "/")
//! ```

pub mod server;

pub use server::{AppState, HttpServer};
