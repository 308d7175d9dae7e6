//! Rate-limited analytics API gateway.
//!
//! A read-only HTTP API over a fixed set of analytical queries, with a
//! single global fixed-window rate limiter in front of every route.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ http::server ──▶ security::rate_limit ──┬─▶ Denied: 429 payload
//!                                        (consults Clock)     │
//!                                                             ▼
//!                                                  analytics::QueryService
//!                                                             │
//!                                                             ▼
//!                                                   store::StorePool ──▶ PostgreSQL
//!
//!     Cross-cutting: config, observability (tracing + metrics), lifecycle
//! ```

// Core subsystems
pub mod analytics;
pub mod config;
pub mod error;
pub mod http;
pub mod security;
pub mod store;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::GatewayConfig;
pub use error::{Error, Result};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
