//! Insertion-ordered set with linear byte-equality deduplication
//!
//! No hashing: `add` scans the stored payloads, so it costs O(len). Two
//! elements never compare byte-equal as long as elements only enter through
//! [`Set::add`].

use super::list::{ElementId, List};
use crate::config::ContainerConfig;
use crate::error::{check_payload, Result};
use crate::iter::{Cursor, Iter, Traverse};

/// Fixed capacity set of fixed-size byte payloads
///
/// # Examples
///
/// ```rust
/// use pooled_collections::Set;
///
/// let mut set = Set::new(4, 8)?;
/// let first = set.add(&7u32.to_ne_bytes())?;
/// let again = set.add(&7u32.to_ne_bytes())?;
/// assert_eq!(first, again);
/// assert_eq!(set.len(), 1);
/// # Ok::<(), pooled_collections::CollectionError>(())
/// ```
#[derive(Debug)]
pub struct Set {
    list: List,
}

impl Set {
    /// Create an empty set
    pub fn new(element_size: usize, capacity: usize) -> Result<Self> {
        Ok(Self {
            list: List::new(element_size, capacity)?,
        })
    }

    /// Create an empty set from a container configuration
    pub fn with_config(config: &ContainerConfig) -> Result<Self> {
        Ok(Self {
            list: List::with_config(config)?,
        })
    }

    /// Add `data` unless a byte-equal element is already stored
    ///
    /// Returns the handle of the stored element, existing or new.
    pub fn add(&mut self, data: &[u8]) -> Result<ElementId> {
        check_payload(data, self.list.element_size())?;
        match self.find(data) {
            Some(existing) => Ok(existing),
            None => self.list.push(data),
        }
    }

    /// Handle of the element byte-equal to `data`, if present
    pub fn find(&self, data: &[u8]) -> Option<ElementId> {
        let mut cursor = self.list.cursor().ok()?;
        while let Some(id) = cursor.position() {
            if self.list.read(&cursor).ok()? == data {
                return Some(id);
            }
            cursor = self.list.advance(cursor).ok()?;
        }
        None
    }

    /// Check whether a byte-equal element is stored
    pub fn contains(&self, data: &[u8]) -> bool {
        self.find(data).is_some()
    }

    /// Remove the element behind `id`
    pub fn remove(&mut self, id: ElementId) -> Result<()> {
        self.list.remove_element(id)
    }

    /// Payload of a live element
    pub fn data(&self, id: ElementId) -> Option<&[u8]> {
        self.list.data(id)
    }

    /// Remove every element
    pub fn clear(&mut self) {
        self.list.clear();
    }

    /// Number of distinct elements
    #[inline]
    pub fn len(&self) -> usize {
        self.list.len()
    }

    /// Alias of [`len`](Self::len)
    #[inline]
    pub fn count(&self) -> usize {
        self.list.len()
    }

    /// Check whether the set is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Maximum number of elements
    #[inline]
    pub fn capacity(&self) -> usize {
        self.list.capacity()
    }

    /// Iterate in insertion order
    pub fn iter(&self) -> Iter<'_, Self> {
        Iter::new(self)
    }
}

impl Traverse for Set {
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
