//! Data store access.
//!
//! The gateway does not own the store's schema or lifecycle; it borrows
//! pooled connections per query and hands errors back as 5xx responses.

pub mod pool;

pub use pool::StorePool;
