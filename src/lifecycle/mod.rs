//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main):
//!     Load config → Validate → Initialize subsystems → Start listener
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Stop accepting → Drain in-flight requests → Exit
//! ```
//!
//! Startup is ordered and fail-fast: any error before the listener is
//! bound is fatal.

pub mod shutdown;

pub use shutdown::Shutdown;
