//! Analytical query surface.
//!
//! # Data Flow
//! ```text
//! admitted request
//!     → service.rs (fixed SQL per route, one pooled connection per call)
//!     → rows.rs (typed row structs, column order preserved)
//!     → serialized as a JSON array by the handler
//! ```
//!
//! Every query is static: no request input reaches the SQL text. The
//! trait seam exists so integration tests can run against an in-memory
//! store instead of PostgreSQL.

pub mod rows;
pub mod service;

pub use rows::{DailyEventsRow, DailyStatsRow, HourlyEventsRow, HourlyStatsRow, PoiRow};
pub use service::{PgQueryService, QueryService};
