//! Fixed capacity containers over a cell pool
//!
//! Each container owns one [`CellPool`](crate::CellPool) sized at
//! construction. Payloads are opaque byte strings of the configured element
//! size; the containers never grow.
//!
//! ## Linear Containers
//!
//! - **`List`** - Doubly linked list with positional insert and both-end removal
//! - **`Stack`** - LIFO view over a list
//! - **`Queue`** - FIFO view over a list
//! - **`Set`** - Insertion-ordered list that rejects duplicate payloads
//!
//! ## Hierarchical Containers
//!
//! - **`Tree`** - N-ary forest with depth tracking and stackless subtree removal
//!
//! Every container implements [`Traverse`](crate::Traverse), so one generic
//! loop can walk any of them.

pub mod list;
pub mod queue;
pub mod set;
pub mod stack;
pub mod tree;

pub use list::{ElementId, List};
pub use queue::Queue;
pub use set::Set;
pub use stack::Stack;
pub use tree::{DepthFirst, NodeId, Tree, TreeEntry, Walker};
