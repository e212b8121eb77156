//! Persistent record boundary for customers, products, and orders.
//!
//! The trait makes no storage assumptions; one call is one atomic step. The
//! in-memory backend serves tests and development, the Postgres backend is
//! the durable one.

pub mod in_memory;
pub mod postgres;
pub mod r#trait;

pub use in_memory::InMemoryEntityStore;
pub use postgres::PostgresEntityStore;
pub use r#trait::{EntityStore, EntityStoreError};
