//! FIFO queue viewed through a [`List`]

use super::list::{ElementId, List};
use crate::config::ContainerConfig;
use crate::error::Result;
use crate::iter::{Cursor, Iter, Traverse};

/// Fixed capacity queue; enqueue at the tail, dequeue at the head
#[derive(Debug)]
pub struct Queue {
    list: List,
}

impl Queue {
    /// Create an empty queue
    pub fn new(element_size: usize, capacity: usize) -> Result<Self> {
        Ok(Self {
            list: List::new(element_size, capacity)?,
        })
    }

    /// Create an empty queue from a container configuration
    pub fn with_config(config: &ContainerConfig) -> Result<Self> {
        Ok(Self {
            list: List::with_config(config)?,
        })
    }

    /// Append `data` at the tail
    #[inline]
    pub fn enq(&mut self, data: &[u8]) -> Result<ElementId> {
        self.list.push(data)
    }

    /// Remove the head element into `out`
    ///
    /// `Ok(None)` means the queue was empty, otherwise the remaining length
    /// is returned.
    #[inline]
    pub fn deq(&mut self, out: &mut [u8]) -> Result<Option<usize>> {
        self.list.shift(out)
    }

    /// Drain every element, oldest first, into one contiguous buffer
    pub fn drain_to_bytes(&mut self) -> Result<Vec<u8>> {
        self.list.drain_to_bytes()
    }

    /// Remove every element
    pub fn clear(&mut self) {
        self.list.clear();
    }

    /// Number of queued elements
    #[inline]
    pub fn len(&self) -> usize {
        self.list.len()
    }

    /// Alias of [`len`](Self::len)
    #[inline]
    pub fn count(&self) -> usize {
        self.list.len()
    }

    /// Check whether the queue is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Maximum number of queued elements
    #[inline]
    pub fn capacity(&self) -> usize {
        self.list.capacity()
    }

    /// Iterate oldest to newest
    pub fn iter(&self) -> Iter<'_, Self> {
        Iter::new(self)
    }
}

impl Traverse for Queue {
    fn cursor(&self) -> Result<Cursor> {
        self.list.cursor()
    }

    fn advance(&self, cursor: Cursor) -> Result<Cursor> {
        self.list.advance(cursor)
    }

    fn read<'a>(&'a self, cursor: &Cursor) -> Result<&'a [u8]> {
        self.list.read(cursor)
    }
}
