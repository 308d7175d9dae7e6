//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! optional config file (TOML)
//!     → loader.rs (parse & deserialize, env overrides)
//!     → validation.rs (semantic checks)
//!     → GatewayConfig (validated, immutable)
//!     → shared with subsystems at startup
//! ```
//!
//! Config is immutable once loaded. All fields have defaults so the
//! gateway runs with no file at all; the data store URI is the one value
//! that must be supplied, via `DATABASE_URL` or the `[database]` section.

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    DatabaseConfig, GatewayConfig, ListenerConfig, ObservabilityConfig, RateLimitConfig,
};
