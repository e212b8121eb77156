//! Orders domain module.
//!
//! The pure half of order placement: given an already-resolved customer and
//! product set, decide whether an order can exist and what it totals. The
//! resolution itself (ids against the store) happens in the service layer.

pub mod order;

pub use order::{NewOrder, Order};
