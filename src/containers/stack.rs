//! LIFO stack viewed through a [`List`]

use super::list::{ElementId, List};
use crate::config::ContainerConfig;
use crate::error::Result;
use crate::iter::{Cursor, Iter, Traverse};

/// Fixed capacity stack; push and pop both work on the list's tail
///
/// # Examples
///
/// ```rust
/// use pooled_collections::Stack;
///
/// let mut stack = Stack::new(1, 4)?;
/// stack.push(b"a")?;
/// stack.push(b"b")?;
///
/// let mut top = [0u8; 1];
/// stack.peek(&mut top)?;
/// assert_eq!(&top, b"b");
/// assert_eq!(stack.pop(&mut top)?, Some(1));
/// # Ok::<(), pooled_collections::CollectionError>(())
/// ```
#[derive(Debug)]
pub struct Stack {
    list: List,
}

impl Stack {
    /// Create an empty stack
    pub fn new(element_size: usize, capacity: usize) -> Result<Self> {
        Ok(Self {
            list: List::new(element_size, capacity)?,
        })
    }

    /// Create an empty stack from a container configuration
    pub fn with_config(config: &ContainerConfig) -> Result<Self> {
        Ok(Self {
            list: List::with_config(config)?,
        })
    }

    /// Push `data` on top
    #[inline]
    pub fn push(&mut self, data: &[u8]) -> Result<ElementId> {
        self.list.push(data)
    }

    /// Pop the top element into `out`
    ///
    /// `Ok(None)` means the stack was empty.
    #[inline]
    pub fn pop(&mut self, out: &mut [u8]) -> Result<Option<usize>> {
        self.list.pop(out)
    }

    /// Copy the top element into `out` without removing it
    ///
    /// # Errors
    ///
    /// `OutOfRange` if the stack is empty.
    #[inline]
    pub fn peek(&self, out: &mut [u8]) -> Result<()> {
        self.list.get(-1, out)
    }

    /// Remove every element
    pub fn clear(&mut self) {
        self.list.clear();
    }

    /// Depth of the stack
    #[inline]
    pub fn len(&self) -> usize {
        self.list.len()
    }

    /// Alias of [`len`](Self::len)
    #[inline]
    pub fn count(&self) -> usize {
        self.list.len()
    }

    /// Check whether the stack is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Maximum depth
    #[inline]
    pub fn capacity(&self) -> usize {
        self.list.capacity()
    }

    /// Iterate bottom to top
    pub fn iter(&self) -> Iter<'_, Self> {
        Iter::new(self)
    }
}

impl Traverse for Stack {
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
