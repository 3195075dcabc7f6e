//! Doubly linked list over a fixed capacity cell pool
//!
//! Payloads live in the list's [`CellPool`]; the `prev`/`next` links live in a
//! side table indexed by cell, allocated once at creation. The list owns all
//! of its nodes and the links only express order.

use crate::config::ContainerConfig;
use crate::error::{check_payload, CollectionError, Result};
use crate::iter::{Cursor, Iter, Traverse};
use crate::memory::{CellId, CellPool};

/// Handle to a stored list element
pub type ElementId = CellId;

#[derive(Debug, Clone, Copy, Default)]
struct Links {
    prev: Option<u32>,
    next: Option<u32>,
}

/// Fixed capacity doubly linked list of fixed-size byte payloads
///
/// # Examples
///
/// ```rust
/// use pooled_collections::List;
///
/// let mut list = List::new(4, 16)?;
/// list.push(&1i32.to_ne_bytes())?;
/// list.push(&3i32.to_ne_bytes())?;
/// list.insert(1, &2i32.to_ne_bytes())?;
///
/// let mut out = [0u8; 4];
/// list.get(1, &mut out)?;
/// assert_eq!(i32::from_ne_bytes(out), 2);
/// assert_eq!(list.len(), 3);
/// # Ok::<(), pooled_collections::CollectionError>(())
/// ```
#[derive(Debug)]
pub struct List {
    pool: CellPool,
    links: Vec<Links>,
    head: Option<u32>,
    tail: Option<u32>,
}

impl List {
    /// Create an empty list holding at most `capacity` elements of
    /// `element_size` bytes
    pub fn new(element_size: usize, capacity: usize) -> Result<Self> {
        Self::with_config(&ContainerConfig::new(element_size, capacity))
    }

    /// Create an empty list from a container configuration
    pub fn with_config(config: &ContainerConfig) -> Result<Self> {
        let pool = CellPool::with_config(config)?;
        let mut links = Vec::new();
        links
            .try_reserve_exact(pool.capacity())
            .map_err(|_| CollectionError::out_of_memory(pool.capacity() * std::mem::size_of::<Links>()))?;
        links.resize(pool.capacity(), Links::default());

        Ok(Self {
            pool,
            links,
            head: None,
            tail: None,
        })
    }

    /// Remove every element. All handles and cursors become stale.
    pub fn clear(&mut self) {
        self.pool.reset();
        self.head = None;
        self.tail = None;
    }

    /// Insert `data` at `index`
    ///
    /// `0` inserts at the head, a negative index appends at the tail, and a
    /// positive index inserts before the element currently at that position
    /// (`index == len()` appends).
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if `data` is not `element_size()` bytes
    /// - `OutOfRange` if `index > len()`
    /// - `ResourceExhausted` if the list is full
    pub fn insert(&mut self, index: isize, data: &[u8]) -> Result<ElementId> {
        check_payload(data, self.pool.element_size())?;

        // locate the successor before taking a cell so a range error leaks nothing
        let successor = if index > 0 {
            let mut at = self.head;
            for _ in 0..index {
                match at {
                    Some(i) => at = self.links[i as usize].next,
                    None => return Err(CollectionError::out_of_range(index, self.len())),
                }
            }
            at
        } else {
            None
        };

        let id = self.pool.acquire()?;
        self.pool.payload_mut(id.index()).copy_from_slice(data);
        let node = id.index() as u32;
        self.links[node as usize] = Links::default();

        match (index, successor) {
            (0, _) => self.link_front(node),
            (i, Some(succ)) if i > 0 => self.link_before(node, succ),
            _ => self.link_back(node),
        }

        Ok(id)
    }

    /// Copy the element at `index` into `out`; a negative index reads the tail
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `out` has the wrong length, `OutOfRange` if no
    /// element exists at `index`.
    pub fn get(&self, index: isize, out: &mut [u8]) -> Result<()> {
        check_payload(out, self.pool.element_size())?;
        let node = self.locate(index)?;
        out.copy_from_slice(self.pool.payload(node as usize));
        Ok(())
    }

    /// Append `data` at the tail
    #[inline]
    pub fn push(&mut self, data: &[u8]) -> Result<ElementId> {
        self.insert(-1, data)
    }

    /// Insert `data` at the head
    #[inline]
    pub fn unshift(&mut self, data: &[u8]) -> Result<ElementId> {
        self.insert(0, data)
    }

    /// Remove the tail element, copying it into `out`
    ///
    /// Returns `Ok(None)` when the list is empty and `Ok(Some(remaining))`
    /// after a removal.
    pub fn pop(&mut self, out: &mut [u8]) -> Result<Option<usize>> {
        check_payload(out, self.pool.element_size())?;
        match self.tail {
            Some(node) => self.take(node, out).map(Some),
            None => Ok(None),
        }
    }

    /// Remove the head element, copying it into `out`
    ///
    /// Returns `Ok(None)` when the list is empty and `Ok(Some(remaining))`
    /// after a removal.
    pub fn shift(&mut self, out: &mut [u8]) -> Result<Option<usize>> {
        check_payload(out, self.pool.element_size())?;
        match self.head {
            Some(node) => self.take(node, out).map(Some),
            None => Ok(None),
        }
    }

    /// Remove the element the cursor points at
    ///
    /// The cursor itself is stale afterwards.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if the cursor is at end, is not a list cursor, or is
    /// already stale.
    pub fn remove(&mut self, cursor: &Cursor) -> Result<()> {
        match cursor {
            Cursor::Element(id) => self.remove_element(*id),
            Cursor::End => Err(Cursor::end_error()),
            _ => Err(Cursor::kind_error("list")),
        }
    }

    /// Remove the element behind `id`
    pub fn remove_element(&mut self, id: ElementId) -> Result<()> {
        self.pool.check_live(id)?;
        let node = id.index() as u32;
        self.unlink(node);
        self.pool.release(id)
    }

    /// Payload of a live element
    pub fn data(&self, id: ElementId) -> Option<&[u8]> {
        self.pool.get(id).ok()
    }

    /// Mutable payload of a live element
    pub fn data_mut(&mut self, id: ElementId) -> Option<&mut [u8]> {
        self.pool.get_mut(id).ok()
    }

    /// Handle of the head element
    pub fn first(&self) -> Option<ElementId> {
        self.head.map(|i| self.pool.id_at(i))
    }

    /// Handle of the tail element
    pub fn last(&self) -> Option<ElementId> {
        self.tail.map(|i| self.pool.id_at(i))
    }

    /// Drain every element head first into one contiguous buffer
    pub fn drain_to_bytes(&mut self) -> Result<Vec<u8>> {
        let element_size = self.pool.element_size();
        let total = self.len() * element_size;
        let mut bytes = Vec::new();
        bytes
            .try_reserve_exact(total)
            .map_err(|_| CollectionError::out_of_memory(total))?;

        let mut node = self.head;
        while let Some(i) = node {
            bytes.extend_from_slice(self.pool.payload(i as usize));
            node = self.links[i as usize].next;
        }
        self.clear();

        Ok(bytes)
    }

    /// Payload size of every element
    #[inline]
    pub fn element_size(&self) -> usize {
        self.pool.element_size()
    }

    /// Maximum number of elements
    #[inline]
    pub fn capacity(&self) -> usize {
        self.pool.capacity()
    }

    /// Number of stored elements, read from the pool in O(1)
    #[inline]
    pub fn len(&self) -> usize {
        self.pool.live_count()
    }

    /// Alias of [`len`](Self::len)
    #[inline]
    pub fn count(&self) -> usize {
        self.len()
    }

    /// Check whether the list holds no elements
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Check whether every cell is in use
    #[inline]
    pub fn is_full(&self) -> bool {
        self.pool.freeable() == 0
    }

    /// Statistics of the backing pool
    pub fn pool(&self) -> &CellPool {
        &self.pool
    }

    /// Iterate payloads head to tail
    pub fn iter(&self) -> Iter<'_, Self> {
        Iter::new(self)
    }

    fn locate(&self, index: isize) -> Result<u32> {
        let found = if index >= 0 {
            let mut at = self.head;
            for _ in 0..index {
                match at {
                    Some(i) => at = self.links[i as usize].next,
                    None => break,
                }
            }
            at
        } else {
            self.tail
        };
        found.ok_or_else(|| CollectionError::out_of_range(index, self.len()))
    }

    fn take(&mut self, node: u32, out: &mut [u8]) -> Result<usize> {
        out.copy_from_slice(self.pool.payload(node as usize));
        self.unlink(node);
        self.pool.release(self.pool.id_at(node))?;
        Ok(self.len())
    }

    fn link_front(&mut self, node: u32) {
        match self.head {
            Some(old) => {
                self.links[node as usize].next = Some(old);
                self.links[old as usize].prev = Some(node);
                self.head = Some(node);
            }
            None => {
                self.head = Some(node);
                self.tail = Some(node);
            }
        }
    }

    fn link_back(&mut self, node: u32) {
        match self.tail {
            Some(old) => {
                self.links[node as usize].prev = Some(old);
                self.links[old as usize].next = Some(node);
                self.tail = Some(node);
            }
            None => {
                self.head = Some(node);
                self.tail = Some(node);
            }
        }
    }

    fn link_before(&mut self, node: u32, succ: u32) {
        let prev = self.links[succ as usize].prev;
        self.links[node as usize] = Links {
            prev,
            next: Some(succ),
        };
        self.links[succ as usize].prev = Some(node);
        match prev {
            Some(p) => self.links[p as usize].next = Some(node),
            None => self.head = Some(node),
        }
    }

    fn unlink(&mut self, node: u32) {
        let Links { prev, next } = self.links[node as usize];
        match prev {
            Some(p) => self.links[p as usize].next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => self.links[n as usize].prev = prev,
            None => self.tail = prev,
        }
        self.links[node as usize] = Links::default();
    }
}

impl Traverse for List {
    fn cursor(&self) -> Result<Cursor> {
        Ok(self.first().map_or(Cursor::End, Cursor::Element))
    }

    fn advance(&self, cursor: Cursor) -> Result<Cursor> {
        match cursor {
            Cursor::Element(id) => {
                self.pool.check_live(id)?;
                Ok(self.links[id.index()]
                    .next
                    .map_or(Cursor::End, |next| Cursor::Element(self.pool.id_at(next))))
            }
            Cursor::End => Err(Cursor::end_error()),
            _ => Err(Cursor::kind_error("list")),
        }
    }

    fn read<'a>(&'a self, cursor: &Cursor) -> Result<&'a [u8]> {
        match cursor {
            Cursor::Element(id) => self.pool.get(*id),
            Cursor::End => Err(Cursor::end_error()),
            _ => Err(Cursor::kind_error("list")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bytes(v: i32) -> [u8; 4] {
        v.to_ne_bytes()
    }

    fn values(list: &List) -> Vec<i32> {
        list.iter()
            .map(|b| i32::from_ne_bytes(b.try_into().unwrap()))
            .collect()
    }

    #[test]
    fn test_list_creation() {
        let list = List::new(4, 10).unwrap();
        assert_eq!(list.len(), 0);
        assert_eq!(list.capacity(), 10);
        assert_eq!(list.element_size(), 4);
        assert!(list.is_empty());
        assert!(List::new(4, 0).is_err());
        assert!(List::new(0, 4).is_err());
    }

    #[test]
    fn test_insert_positions() {
        let mut list = List::new(4, 10).unwrap();
        list.insert(0, &bytes(2)).unwrap();
        list.insert(-1, &bytes(4)).unwrap();
        list.insert(0, &bytes(1)).unwrap();
        list.insert(2, &bytes(3)).unwrap();
        list.insert(4, &bytes(5)).unwrap();
        assert_eq!(values(&list), [1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_insert_past_tail_is_range_error() {
        let mut list = List::new(4, 4).unwrap();
        list.push(&bytes(1)).unwrap();
        assert!(matches!(
            list.insert(3, &bytes(9)),
            Err(CollectionError::OutOfRange { index: 3, len: 1 })
        ));
        // the refused insert must not have consumed a cell
        assert_eq!(list.len(), 1);
        assert_eq!(list.pool().freeable(), 3);
    }

    #[test]
    fn test_get() {
        let mut list = List::new(4, 4).unwrap();
        for v in [10, 20, 30] {
            list.push(&bytes(v)).unwrap();
        }
        let mut out = [0u8; 4];
        list.get(1, &mut out).unwrap();
        assert_eq!(i32::from_ne_bytes(out), 20);
        list.get(-1, &mut out).unwrap();
        assert_eq!(i32::from_ne_bytes(out), 30);
        assert!(matches!(
            list.get(3, &mut out),
            Err(CollectionError::OutOfRange { .. })
        ));
        assert!(list.get(0, &mut [0u8; 2]).is_err());
    }

    #[test]
    fn test_push_shift_order() {
        let mut list = List::new(4, 8).unwrap();
        for v in [1, 2, 3] {
            list.push(&bytes(v)).unwrap();
        }
        let mut out = [0u8; 4];
        for (expected, remaining) in [(1, 2), (2, 1), (3, 0)] {
            assert_eq!(list.shift(&mut out).unwrap(), Some(remaining));
            assert_eq!(i32::from_ne_bytes(out), expected);
        }
        assert_eq!(list.shift(&mut out).unwrap(), None);
    }

    #[test]
    fn test_unshift_pop_order() {
        let mut list = List::new(4, 8).unwrap();
        for v in [1, 2, 3] {
            list.unshift(&bytes(v)).unwrap();
        }
        let mut out = [0u8; 4];
        for expected in [1, 2, 3] {
            list.pop(&mut out).unwrap();
            assert_eq!(i32::from_ne_bytes(out), expected);
        }
        assert_eq!(list.pop(&mut out).unwrap(), None);
        assert!(list.is_empty());
    }

    #[test]
    fn test_capacity_exhaustion() {
        let mut list = List::new(4, 2).unwrap();
        list.push(&bytes(1)).unwrap();
        list.push(&bytes(2)).unwrap();
        assert!(list.is_full());
        assert!(matches!(
            list.push(&bytes(3)),
            Err(CollectionError::ResourceExhausted { capacity: 2 })
        ));
        assert_eq!(values(&list), [1, 2]);
    }

    #[test]
    fn test_remove_via_cursor() {
        let mut list = List::new(4, 8).unwrap();
        for v in [1, 2, 3, 4] {
            list.push(&bytes(v)).unwrap();
        }

        let mut cursor = list.cursor().unwrap();
        cursor = list.advance(cursor).unwrap();
        list.remove(&cursor).unwrap();
        assert_eq!(values(&list), [1, 3, 4]);
        assert!(list.read(&cursor).is_err(), "cursor is stale after remove");

        let head = list.cursor().unwrap();
        list.remove(&head).unwrap();
        let tail = Cursor::Element(list.last().unwrap());
        list.remove(&tail).unwrap();
        assert_eq!(values(&list), [3]);
        assert_eq!(list.len(), 1);

        assert!(list.remove(&Cursor::End).is_err());
    }

    #[test]
    fn test_handles_stay_stable() {
        let mut list = List::new(4, 8).unwrap();
        let a = list.push(&bytes(1)).unwrap();
        let b = list.push(&bytes(2)).unwrap();
        list.unshift(&bytes(0)).unwrap();
        assert_eq!(list.data(a).unwrap(), &bytes(1));
        list.data_mut(b).unwrap().copy_from_slice(&bytes(22));
        assert_eq!(values(&list), [0, 1, 22]);
        list.remove_element(a).unwrap();
        assert!(list.data(a).is_none());
    }

    #[test]
    fn test_clear_and_reuse() {
        let mut list = List::new(4, 3).unwrap();
        let id = list.push(&bytes(1)).unwrap();
        list.push(&bytes(2)).unwrap();
        list.clear();
        assert!(list.is_empty());
        assert!(list.data(id).is_none());
        for v in [7, 8, 9] {
            list.push(&bytes(v)).unwrap();
        }
        assert_eq!(values(&list), [7, 8, 9]);
    }

    #[test]
    fn test_drain_to_bytes() {
        let mut list = List::new(2, 4).unwrap();
        list.push(&[1, 2]).unwrap();
        list.push(&[3, 4]).unwrap();
        assert_eq!(list.drain_to_bytes().unwrap(), vec![1, 2, 3, 4]);
        assert!(list.is_empty());
        assert_eq!(list.pool().freeable(), 4);
    }
}
