//! # Pooled Collections: Fixed Capacity Containers over a Cell Pool
//!
//! This crate provides bounded containers whose storage is reserved once, up
//! front, and never grows. Every element lives in a cell of a fixed capacity
//! slab allocator, so insertion and removal cost O(1) allocator work and the
//! memory footprint is known at construction.
//!
//! ## Key Features
//!
//! - **Cell Pool**: Intrusive free list slab with generation checked handles
//! - **Linear Containers**: List, Stack, Queue and Set over one list engine
//! - **N-ary Tree**: Depth tracking and subtree removal with no recursion
//! - **Uniform Iteration**: One cursor protocol across every container
//! - **Configuration**: Builders, presets, environment and JSON files
//!
//! ## Quick Start
//!
//! ```rust
//! use pooled_collections::{List, Queue, Set, Stack, Tree, Traverse};
//!
//! let mut list = List::new(1, 8)?;
//! list.push(b"b")?;
//! list.unshift(b"a")?;
//! assert_eq!(list.iter().collect::<Vec<_>>(), [&b"a"[..], &b"b"[..]]);
//!
//! let mut stack = Stack::new(1, 4)?;
//! stack.push(b"x")?;
//! let mut out = [0u8; 1];
//! assert_eq!(stack.pop(&mut out)?, Some(0));
//!
//! let mut queue = Queue::new(1, 4)?;
//! queue.enq(b"q")?;
//! assert_eq!(queue.deq(&mut out)?, Some(0));
//!
//! let mut set = Set::new(1, 4)?;
//! let first = set.add(b"s")?;
//! assert_eq!(set.add(b"s")?, first);
//!
//! let mut tree = Tree::new(1, 8)?;
//! let root = tree.insert(None, b"r")?;
//! tree.insert(Some(root), b"c")?;
//! let cursor = tree.cursor()?;
//! assert_eq!(tree.iter_age(&cursor)?, 1);
//! # Ok::<(), pooled_collections::CollectionError>(())
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod containers;
pub mod error;
pub mod iter;
pub mod memory;

pub use config::{Config, ContainerConfig};
pub use containers::{ElementId, List, NodeId, Queue, Set, Stack, Tree};
pub use error::{CollectionError, Result};
pub use iter::{Cursor, Iter, Traverse};
pub use memory::{CellId, CellPool, PoolStats};

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the library (currently no-op beyond a log line)
pub fn init() {
    log::debug!("Initializing pooled-collections v{}", VERSION);
}
