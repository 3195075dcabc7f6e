//! Iterator protocol shared by every container
//!
//! A [`Cursor`] is a detached position: it holds no borrow of the container it
//! walks, so a caller can hand it back to the container (for example to
//! [`List::remove`](crate::List::remove)) while keeping it. Each container
//! implements [`Traverse`], which supplies the three capabilities of the
//! protocol:
//!
//! - `advance` moves a cursor to the next position or to [`Cursor::End`]
//! - `read` returns the payload at the cursor's position
//! - `release` drops any auxiliary state the cursor owns
//!
//! Only the tree's depth-first cursor owns auxiliary state (its pending-node
//! stack). Advancing it onto `End` drops that state, so release happens
//! exactly once whether the caller exhausts the cursor or releases it early.
//!
//! A cursor is valid only while its container is not structurally mutated.
//! Inserting or removing elsewhere in the same container invalidates every
//! outstanding cursor; handles are generation checked, so a stale cursor
//! reports `InvalidArgument` instead of reading a reused cell.
//!
//! [`Iter`] wraps the protocol into a standard [`Iterator`] for borrowing
//! consumers.
//!
//! # Examples
//!
//! ```rust
//! use pooled_collections::{Cursor, List, Traverse};
//!
//! let mut list = List::new(1, 8)?;
//! for b in [1u8, 2, 3] {
//!     list.push(&[b])?;
//! }
//!
//! let mut seen = Vec::new();
//! let mut cursor = list.cursor()?;
//! while !cursor.is_end() {
//!     seen.push(list.read(&cursor)?[0]);
//!     cursor = list.advance(cursor)?;
//! }
//! assert_eq!(seen, [1, 2, 3]);
//! # Ok::<(), pooled_collections::CollectionError>(())
//! ```

use crate::containers::tree::DepthFirst;
use crate::error::{CollectionError, Result};
use crate::memory::CellId;

/// Position inside one of the containers
#[derive(Debug)]
pub enum Cursor {
    /// Past the last element
    End,
    /// An element of a list, stack, queue or set
    Element(CellId),
    /// A child of a tree node, walking the sibling chain
    Children(CellId),
    /// A tree node in pre-order, with the pending-node stack
    DepthFirst(DepthFirst),
}

impl Cursor {
    /// Check whether the cursor has run off the end
    #[inline]
    pub fn is_end(&self) -> bool {
        matches!(self, Cursor::End)
    }

    /// Handle of the element or node at the cursor, if any
    pub fn position(&self) -> Option<CellId> {
        match self {
            Cursor::End => None,
            Cursor::Element(id) | Cursor::Children(id) => Some(*id),
            Cursor::DepthFirst(walk) => Some(walk.node()),
        }
    }

    /// Depth of the current node (root level = 1)
    ///
    /// # Errors
    ///
    /// `InvalidArgument` unless this is a depth-first tree cursor.
    pub fn age(&self) -> Result<u32> {
        match self {
            Cursor::DepthFirst(walk) => Ok(walk.age()),
            Cursor::End => Err(CollectionError::invalid_argument("cursor is at end")),
            _ => Err(CollectionError::invalid_argument(
                "depth is only tracked by depth-first tree cursors",
            )),
        }
    }

    /// Drop the cursor and any state it owns
    #[inline]
    pub fn release(self) {
        drop(self);
    }

    pub(crate) fn end_error() -> CollectionError {
        CollectionError::invalid_argument("cursor is at end")
    }

    pub(crate) fn kind_error(expected: &str) -> CollectionError {
        CollectionError::invalid_argument(format!("cursor does not belong to a {}", expected))
    }
}

/// Capability set every container exposes to generic consumers
pub trait Traverse {
    /// First position of the container's natural iteration order
    fn cursor(&self) -> Result<Cursor>;

    /// Next position after `cursor`, or [`Cursor::End`]
    ///
    /// Advancing onto `End` releases state the cursor owned.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `cursor` is already at end, belongs to another
    /// kind of container, or points at an element that was removed.
    fn advance(&self, cursor: Cursor) -> Result<Cursor>;

    /// Payload at the cursor's position
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `cursor` is at end or stale.
    fn read<'a>(&'a self, cursor: &Cursor) -> Result<&'a [u8]>;

    /// Release a cursor before it reaches the end
    fn release(&self, cursor: Cursor) {
        cursor.release();
    }
}

/// Borrowing adapter from the cursor protocol to [`Iterator`]
pub struct Iter<'a, C: Traverse + ?Sized> {
    source: &'a C,
    cursor: Cursor,
}

impl<'a, C: Traverse + ?Sized> Iter<'a, C> {
    /// Iterate `source` in its natural order
    pub fn new(source: &'a C) -> Self {
        let cursor = source.cursor().unwrap_or(Cursor::End);
        Self { source, cursor }
    }

    /// Iterate `source` from an already positioned cursor
    pub fn from_cursor(source: &'a C, cursor: Cursor) -> Self {
        Self { source, cursor }
    }

    /// Cursor of the element the next call to `next` will yield
    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }
}

impl<'a, C: Traverse + ?Sized> Iterator for Iter<'a, C> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor.is_end() {
            return None;
        }

        let data = self.source.read(&self.cursor).ok()?;
        let cursor = std::mem::replace(&mut self.cursor, Cursor::End);
        self.cursor = self.source.advance(cursor).unwrap_or(Cursor::End);
        Some(data)
    }
}
