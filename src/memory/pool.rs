//! Fixed capacity cell pool
//!
//! A slab allocator over one contiguous region sliced into `capacity` cells of
//! `cell_size = max(element_size, LINK_SIZE)` bytes. Free cells form an
//! intrusive singly linked list: a free cell stores the index of the next free
//! cell in its own first [`LINK_SIZE`] bytes, so the free list costs no memory
//! beyond the region itself.
//!
//! # Architecture
//!
//! - **Fixed-size cells**: every acquisition hands out exactly one cell
//! - **LIFO free list**: O(1) acquire and release, reuse starts at the head
//! - **Capacity enforcement**: a full pool reports exhaustion, it never grows
//! - **Generation counters**: a cell's generation is odd while live and even
//!   while free, so stale handles are rejected with one comparison
//!
//! # Invariant
//!
//! Every cell is either on the free list or live, never both:
//! `freeable() + live_count() == capacity()` holds after every operation.
//!
//! The pool performs no locking. Wrap it (or the container that owns it) in
//! external synchronization if more than one thread needs it.

use crate::config::ContainerConfig;
use crate::error::{check_payload, CollectionError, Result};
use std::fmt;

/// Bytes a free cell needs to hold its free-list link
pub const LINK_SIZE: usize = std::mem::size_of::<u32>();
/// Magic value for free list termination
const LIST_TAIL: u32 = u32::MAX;

/// Handle to one cell of a [`CellPool`]
///
/// A handle stays valid until its cell is released or the pool is reset.
/// After that every accessor treats it as stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellId {
    index: u32,
    generation: u32,
}

impl CellId {
    /// Position of the cell inside the pool region
    #[inline]
    pub fn index(&self) -> usize {
        self.index as usize
    }

    /// Generation the cell had when this handle was issued
    #[inline]
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Encoded width of a handle, used when handles are stored as payloads
    pub(crate) const ENCODED_SIZE: usize = 8;

    pub(crate) fn to_bytes(self) -> [u8; Self::ENCODED_SIZE] {
        let mut out = [0u8; Self::ENCODED_SIZE];
        out[..4].copy_from_slice(&self.index.to_ne_bytes());
        out[4..].copy_from_slice(&self.generation.to_ne_bytes());
        out
    }

    pub(crate) fn from_bytes(bytes: &[u8; Self::ENCODED_SIZE]) -> Self {
        let mut index = [0u8; 4];
        let mut generation = [0u8; 4];
        index.copy_from_slice(&bytes[..4]);
        generation.copy_from_slice(&bytes[4..]);
        Self {
            index: u32::from_ne_bytes(index),
            generation: u32::from_ne_bytes(generation),
        }
    }
}

/// Counters collected when statistics are enabled
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PoolStats {
    /// Successful acquisitions
    pub acquisitions: u64,
    /// Cells returned to the free list
    pub releases: u64,
    /// Acquisitions refused because the pool was full
    pub exhausted: u64,
    /// Highest number of simultaneously live cells
    pub peak_live: usize,
}

impl PoolStats {
    /// Fraction of acquisition attempts that succeeded
    pub fn success_rate(&self) -> f64 {
        let total = self.acquisitions + self.exhausted;
        if total == 0 {
            1.0
        } else {
            self.acquisitions as f64 / total as f64
        }
    }
}

/// Fixed capacity slab of equally sized cells
pub struct CellPool {
    /// Backing region, `capacity * cell_size` bytes
    region: Vec<u8>,
    element_size: usize,
    cell_size: usize,
    capacity: usize,
    freeable: usize,
    /// Index of the first free cell, `LIST_TAIL` when exhausted
    head: u32,
    generations: Vec<u32>,
    zero_on_release: bool,
    stats: Option<PoolStats>,
}

impl CellPool {
    /// Create a pool of `capacity` cells able to hold `element_size` bytes each
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if either argument is zero or the capacity cannot be
    /// indexed, `OutOfMemory` if the region cannot be reserved.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pooled_collections::CellPool;
    ///
    /// let mut pool = CellPool::new(4, 2)?;
    /// let a = pool.acquire()?;
    /// let _b = pool.acquire()?;
    /// assert!(pool.acquire().is_err());
    ///
    /// pool.release(a)?;
    /// assert_eq!(pool.freeable(), 1);
    /// # Ok::<(), pooled_collections::CollectionError>(())
    /// ```
    pub fn new(element_size: usize, capacity: usize) -> Result<Self> {
        Self::with_config(&ContainerConfig::new(element_size, capacity))
    }

    /// Create a pool from a container configuration
    pub fn with_config(config: &ContainerConfig) -> Result<Self> {
        let element_size = config.element_size;
        let capacity = config.capacity;

        if element_size == 0 || capacity == 0 {
            return Err(CollectionError::invalid_argument(format!(
                "pool needs a non-zero element size and capacity (got {} x {})",
                element_size, capacity
            )));
        }
        if capacity >= LIST_TAIL as usize {
            return Err(CollectionError::invalid_argument(format!(
                "capacity {} exceeds the indexable maximum {}",
                capacity,
                LIST_TAIL - 1
            )));
        }

        let cell_size = element_size.max(LINK_SIZE);
        let total_size = cell_size
            .checked_mul(capacity)
            .ok_or_else(|| CollectionError::out_of_memory(usize::MAX))?;

        let mut region = Vec::new();
        region
            .try_reserve_exact(total_size)
            .map_err(|_| CollectionError::out_of_memory(total_size))?;
        region.resize(total_size, 0);

        let mut generations = Vec::new();
        generations
            .try_reserve_exact(capacity)
            .map_err(|_| CollectionError::out_of_memory(capacity * std::mem::size_of::<u32>()))?;
        generations.resize(capacity, 0);

        let mut pool = Self {
            region,
            element_size,
            cell_size,
            capacity,
            freeable: 0,
            head: LIST_TAIL,
            generations,
            zero_on_release: config.zero_on_release,
            stats: config.collect_stats.then(PoolStats::default),
        };
        pool.rebuild_free_list();

        log::debug!(
            "Created cell pool: {} cells of {} bytes ({} byte payload)",
            capacity,
            cell_size,
            element_size
        );

        Ok(pool)
    }

    /// Take one cell off the free list
    ///
    /// The returned cell's payload holds whatever was last written to it.
    ///
    /// # Errors
    ///
    /// `ResourceExhausted` when every cell is live. Live cells are untouched.
    pub fn acquire(&mut self) -> Result<CellId> {
        if self.head == LIST_TAIL {
            if let Some(stats) = &mut self.stats {
                stats.exhausted += 1;
            }
            log::trace!("Cell pool exhausted at capacity {}", self.capacity);
            return Err(CollectionError::resource_exhausted(self.capacity));
        }

        let index = self.head;
        self.head = self.read_link(index as usize);
        self.freeable -= 1;

        let generation = &mut self.generations[index as usize];
        *generation = generation.wrapping_add(1);
        let id = CellId {
            index,
            generation: *generation,
        };

        if let Some(stats) = &mut self.stats {
            stats.acquisitions += 1;
            stats.peak_live = stats.peak_live.max(self.capacity - self.freeable);
        }

        Ok(id)
    }

    /// Return a live cell to the head of the free list
    ///
    /// The next [`acquire`](Self::acquire) hands this cell out again.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `id` does not name a live cell of this pool.
    pub fn release(&mut self, id: CellId) -> Result<()> {
        if !self.is_live(id) {
            return Err(CollectionError::invalid_argument(format!(
                "cell {} generation {} is not live in this pool",
                id.index, id.generation
            )));
        }

        let index = id.index();
        if self.zero_on_release {
            let start = index * self.cell_size;
            self.region[start..start + self.cell_size].fill(0);
        }

        self.generations[index] = self.generations[index].wrapping_add(1);
        self.push_free(id.index);

        if let Some(stats) = &mut self.stats {
            stats.releases += 1;
        }

        Ok(())
    }

    /// Put every cell back on the free list
    ///
    /// All previously issued handles become stale. O(capacity).
    pub fn reset(&mut self) {
        for generation in &mut self.generations {
            if *generation & 1 == 1 {
                *generation = generation.wrapping_add(1);
            }
        }
        if self.zero_on_release {
            self.region.fill(0);
        }
        self.rebuild_free_list();
        log::debug!("Reset cell pool of {} cells", self.capacity);
    }

    /// Check that `id` points inside this pool's region
    ///
    /// This is a bounds check only; it says nothing about liveness.
    #[inline]
    pub fn contains(&self, id: CellId) -> bool {
        id.index() < self.capacity
    }

    /// Check that `id` names a cell that is currently live
    #[inline]
    pub fn is_live(&self, id: CellId) -> bool {
        self.contains(id) && {
            let generation = self.generations[id.index()];
            generation == id.generation && generation & 1 == 1
        }
    }

    /// Payload bytes of a live cell
    pub fn get(&self, id: CellId) -> Result<&[u8]> {
        self.check_live(id)?;
        Ok(self.payload(id.index()))
    }

    /// Mutable payload bytes of a live cell
    pub fn get_mut(&mut self, id: CellId) -> Result<&mut [u8]> {
        self.check_live(id)?;
        Ok(self.payload_mut(id.index()))
    }

    /// Copy `data` into a live cell's payload
    pub fn write(&mut self, id: CellId, data: &[u8]) -> Result<()> {
        check_payload(data, self.element_size)?;
        self.get_mut(id)?.copy_from_slice(data);
        Ok(())
    }

    /// Size of the payload stored in each cell
    #[inline]
    pub fn element_size(&self) -> usize {
        self.element_size
    }

    /// Size of each cell including room for the free-list link
    #[inline]
    pub fn cell_size(&self) -> usize {
        self.cell_size
    }

    /// Number of cells in the pool
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of cells on the free list
    #[inline]
    pub fn freeable(&self) -> usize {
        self.freeable
    }

    /// Number of cells currently handed out
    #[inline]
    pub fn live_count(&self) -> usize {
        self.capacity - self.freeable
    }

    /// Snapshot of the pool statistics, if enabled
    pub fn stats(&self) -> Option<PoolStats> {
        self.stats
    }

    /// Handle for the live cell at `index` with its current generation
    #[inline]
    pub(crate) fn id_at(&self, index: u32) -> CellId {
        CellId {
            index,
            generation: self.generations[index as usize],
        }
    }

    #[inline]
    pub(crate) fn payload(&self, index: usize) -> &[u8] {
        let start = index * self.cell_size;
        &self.region[start..start + self.element_size]
    }

    #[inline]
    pub(crate) fn payload_mut(&mut self, index: usize) -> &mut [u8] {
        let start = index * self.cell_size;
        &mut self.region[start..start + self.element_size]
    }

    pub(crate) fn check_live(&self, id: CellId) -> Result<()> {
        if self.is_live(id) {
            Ok(())
        } else {
            Err(CollectionError::invalid_argument(format!(
                "stale or foreign handle (cell {}, generation {})",
                id.index, id.generation
            )))
        }
    }

    /// Push every cell, last first, so the head ends at the lowest address
    fn rebuild_free_list(&mut self) {
        self.head = LIST_TAIL;
        self.freeable = 0;
        for index in (0..self.capacity as u32).rev() {
            self.push_free(index);
        }
    }

    #[inline]
    fn push_free(&mut self, index: u32) {
        let start = index as usize * self.cell_size;
        self.region[start..start + LINK_SIZE].copy_from_slice(&self.head.to_ne_bytes());
        self.head = index;
        self.freeable += 1;
    }

    #[inline]
    fn read_link(&self, index: usize) -> u32 {
        let start = index * self.cell_size;
        let mut link = [0u8; LINK_SIZE];
        link.copy_from_slice(&self.region[start..start + LINK_SIZE]);
        u32::from_ne_bytes(link)
    }
}

impl fmt::Debug for CellPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CellPool")
            .field("element_size", &self.element_size)
            .field("cell_size", &self.cell_size)
            .field("capacity", &self.capacity)
            .field("freeable", &self.freeable)
            .field("stats", &self.stats)
            .finish()
    }
}
