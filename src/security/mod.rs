//! Request admission subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → rate_limit.rs (global fixed-window admission check)
//!     → Allowed: pass to the matched handler
//!     → Denied: short-circuit with the structured rejection payload
//!
//! clock.rs supplies the current instant; tests swap in a manual clock.
//! ```
//!
//! The gate applies to every route, the diagnostic index included, and
//! fails closed: a request is only forwarded on an explicit `Allowed`.

pub mod clock;
pub mod rate_limit;

pub use clock::{Clock, ManualClock, SystemClock};
pub use rate_limit::{Decision, RateLimiter, WindowSnapshot};
