//! Memory management for the pooled containers
//!
//! Every container owns exactly one [`CellPool`] sized to its capacity at
//! creation time. Nothing in this module grows after construction.

pub mod pool;

pub use pool::{CellId, CellPool, PoolStats, LINK_SIZE};
