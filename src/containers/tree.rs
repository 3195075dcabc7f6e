//! N-ary tree (forest) over a fixed capacity cell pool
//!
//! Nodes use first-child / next-sibling / parent links, stored in a side table
//! indexed by cell alongside each node's depth (`age`, root level = 1). Nodes
//! inserted without a parent form the root-level sibling chain, so the tree
//! is really a forest whose first root is [`Tree::root`].
//!
//! # Subtree removal
//!
//! [`Tree::remove`] reclaims a whole subtree without recursion and without an
//! auxiliary stack. Every node carries a [`Walk`] state and a `thread`
//! back-link to the node the walk came from. The walk descends through
//! `first_child` first, then through `next_sibling`, and backs out along the
//! threads. A node returns to the pool only when both of its links have been
//! walked, so no node is freed before its descendants. The structural links
//! are never rewritten during the walk.
//!
//! # Iteration
//!
//! The depth-first cursor visits nodes in pre-order (a node, then its first
//! child's subtree, then its next sibling's subtree) using an owned
//! [`Stack`] of pending node handles. The children cursor follows the
//! sibling chain of one node and owns nothing.

use super::stack::Stack;
use crate::config::ContainerConfig;
use crate::error::{check_payload, CollectionError, Result};
use crate::iter::{Cursor, Iter, Traverse};
use crate::memory::{CellId, CellPool};

/// Handle to a tree node
pub type NodeId = CellId;

/// Per-node progress of the subtree removal walk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Walk {
    #[default]
    Unvisited,
    DescendingChild,
    DescendingSibling,
    Done,
}

#[derive(Debug, Clone, Copy, Default)]
struct TreeLinks {
    parent: Option<u32>,
    first_child: Option<u32>,
    next_sibling: Option<u32>,
    age: u32,
    walk: Walk,
    /// Node the removal walk arrived from
    thread: Option<u32>,
}

/// Fixed capacity n-ary tree of fixed-size byte payloads
///
/// # Examples
///
/// ```rust
/// use pooled_collections::Tree;
///
/// let mut tree = Tree::new(1, 8)?;
/// let root = tree.insert(None, b"a")?;
/// let child = tree.insert(Some(root), b"b")?;
/// tree.insert(Some(child), b"c")?;
/// tree.insert(Some(root), b"d")?;
///
/// let order: Vec<u8> = tree.iter().map(|d| d[0]).collect();
/// assert_eq!(order, b"abcd");
///
/// assert_eq!(tree.remove(child)?, 2);
/// assert_eq!(tree.len(), 2);
/// # Ok::<(), pooled_collections::CollectionError>(())
/// ```
#[derive(Debug)]
pub struct Tree {
    pool: CellPool,
    links: Vec<TreeLinks>,
    root: Option<u32>,
}

impl Tree {
    /// Create an empty tree holding at most `capacity` nodes
    pub fn new(element_size: usize, capacity: usize) -> Result<Self> {
        Self::with_config(&ContainerConfig::new(element_size, capacity))
    }

    /// Create an empty tree from a container configuration
    pub fn with_config(config: &ContainerConfig) -> Result<Self> {
        let pool = CellPool::with_config(config)?;
        let mut links = Vec::new();
        links.try_reserve_exact(pool.capacity()).map_err(|_| {
            CollectionError::out_of_memory(pool.capacity() * std::mem::size_of::<TreeLinks>())
        })?;
        links.resize(pool.capacity(), TreeLinks::default());

        Ok(Self {
            pool,
            links,
            root: None,
        })
    }

    /// Remove every node. All handles and cursors become stale.
    pub fn clear(&mut self) {
        self.pool.reset();
        self.root = None;
    }

    /// Insert `data` as the last child of `parent`
    ///
    /// In an empty tree the new node becomes the root whatever `parent` is.
    /// With `parent == None` in a non-empty tree it becomes the last
    /// root-level sibling.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if `data` has the wrong size or `parent` is stale
    /// - `ResourceExhausted` if the tree is full
    pub fn insert(&mut self, parent: Option<NodeId>, data: &[u8]) -> Result<NodeId> {
        check_payload(data, self.pool.element_size())?;
        if self.root.is_none() {
            return self.attach(None, data);
        }
        if let Some(p) = parent {
            self.pool.check_live(p)?;
        }
        self.attach(parent.map(|p| p.index() as u32), data)
    }

    /// Insert `data` at root level (no parent)
    #[inline]
    pub fn insert_root_level(&mut self, data: &[u8]) -> Result<NodeId> {
        self.insert(None, data)
    }

    /// Insert `data` under the first node, in pre-order, whose payload equals
    /// `parent_data`
    ///
    /// An empty tree takes the new node as its root.
    ///
    /// # Errors
    ///
    /// `NotFound` if no stored payload equals `parent_data`; nothing is
    /// inserted in that case.
    pub fn insert_by_parent_data(&mut self, parent_data: &[u8], data: &[u8]) -> Result<NodeId> {
        check_payload(parent_data, self.pool.element_size())?;
        check_payload(data, self.pool.element_size())?;
        if self.root.is_none() {
            return self.attach(None, data);
        }
        let parent = self
            .find_index(parent_data)
            .ok_or_else(|| CollectionError::not_found("no node carries the parent payload"))?;
        self.attach(Some(parent), data)
    }

    /// First node, in pre-order, whose payload equals `data`
    pub fn find(&self, data: &[u8]) -> Option<NodeId> {
        self.find_index(data).map(|i| self.pool.id_at(i))
    }

    /// Remove `node` together with its entire subtree
    ///
    /// Returns the number of nodes reclaimed.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `node` is stale.
    pub fn remove(&mut self, node: NodeId) -> Result<usize> {
        self.pool.check_live(node)?;
        let target = node.index() as u32;

        self.detach(target)?;
        let freed = self.reclaim_subtree(target)?;

        log::trace!("Removed subtree of {} nodes, {} remain", freed, self.len());
        Ok(freed)
    }

    /// Payload of a live node
    pub fn data(&self, node: NodeId) -> Option<&[u8]> {
        self.pool.get(node).ok()
    }

    /// Mutable payload of a live node
    pub fn data_mut(&mut self, node: NodeId) -> Option<&mut [u8]> {
        self.pool.get_mut(node).ok()
    }

    /// Depth of a live node, root level = 1
    pub fn age(&self, node: NodeId) -> Option<u32> {
        self.live_links(node).map(|l| l.age)
    }

    /// Parent of a live node; `None` at root level
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.live_links(node)?.parent.map(|i| self.pool.id_at(i))
    }

    /// Oldest child of a live node
    pub fn first_child(&self, node: NodeId) -> Option<NodeId> {
        self.live_links(node)?.first_child.map(|i| self.pool.id_at(i))
    }

    /// Next younger sibling of a live node
    pub fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        self.live_links(node)?.next_sibling.map(|i| self.pool.id_at(i))
    }

    /// First root-level node
    pub fn root(&self) -> Option<NodeId> {
        self.root.map(|i| self.pool.id_at(i))
    }

    /// Cursor over the immediate children of `node`, oldest first
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `node` is stale.
    pub fn children_cursor(&self, node: NodeId) -> Result<Cursor> {
        self.pool.check_live(node)?;
        Ok(self.links[node.index()]
            .first_child
            .map_or(Cursor::End, |child| Cursor::Children(self.pool.id_at(child))))
    }

    /// Iterate the payloads of the immediate children of `node`
    pub fn children(&self, node: NodeId) -> Result<Iter<'_, Self>> {
        Ok(Iter::from_cursor(self, self.children_cursor(node)?))
    }

    /// Depth of the node under a depth-first cursor
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for any other kind of cursor or an end cursor.
    #[inline]
    pub fn iter_age(&self, cursor: &Cursor) -> Result<u32> {
        cursor.age()
    }

    /// Iterate payloads in pre-order
    pub fn iter(&self) -> Iter<'_, Self> {
        Iter::new(self)
    }

    /// Iterate nodes in pre-order together with their handle and depth
    pub fn walk(&self) -> Walker<'_> {
        Walker {
            tree: self,
            cursor: self.cursor().unwrap_or(Cursor::End),
        }
    }

    /// Payload size of every node
    #[inline]
    pub fn element_size(&self) -> usize {
        self.pool.element_size()
    }

    /// Maximum number of nodes
    #[inline]
    pub fn capacity(&self) -> usize {
        self.pool.capacity()
    }

    /// Number of stored nodes, read from the pool in O(1)
    #[inline]
    pub fn len(&self) -> usize {
        self.pool.live_count()
    }

    /// Alias of [`len`](Self::len)
    #[inline]
    pub fn count(&self) -> usize {
        self.len()
    }

    /// Check whether the tree has no nodes
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// The backing pool
    pub fn pool(&self) -> &CellPool {
        &self.pool
    }

    fn live_links(&self, node: NodeId) -> Option<&TreeLinks> {
        self.pool.is_live(node).then(|| &self.links[node.index()])
    }

    /// Acquire a cell and hang it under `parent` (or at root level)
    fn attach(&mut self, parent: Option<u32>, data: &[u8]) -> Result<NodeId> {
        let id = self.pool.acquire()?;
        let node = id.index() as u32;
        self.pool.payload_mut(node as usize).copy_from_slice(data);

        let age = match (self.root, parent) {
            (None, _) => {
                self.root = Some(node);
                1
            }
            (Some(root), None) => {
                let last = self.last_sibling(root);
                self.links[last as usize].next_sibling = Some(node);
                1
            }
            (Some(_), Some(p)) => {
                match self.links[p as usize].first_child {
                    Some(child) => {
                        let last = self.last_sibling(child);
                        self.links[last as usize].next_sibling = Some(node);
                    }
                    None => self.links[p as usize].first_child = Some(node),
                }
                self.links[p as usize].age + 1
            }
        };

        self.links[node as usize] = TreeLinks {
            parent: if self.root == Some(node) { None } else { parent },
            age,
            ..TreeLinks::default()
        };

        Ok(id)
    }

    fn last_sibling(&self, mut node: u32) -> u32 {
        while let Some(next) = self.links[node as usize].next_sibling {
            node = next;
        }
        node
    }

    /// Unlink `target` from its parent's child chain or from the root chain
    fn detach(&mut self, target: u32) -> Result<()> {
        let TreeLinks {
            parent,
            next_sibling,
            ..
        } = self.links[target as usize];

        if self.root == Some(target) {
            self.root = next_sibling;
        } else if parent.is_some_and(|p| self.links[p as usize].first_child == Some(target)) {
            if let Some(p) = parent {
                self.links[p as usize].first_child = next_sibling;
            }
        } else {
            let mut older = match parent {
                Some(p) => self.links[p as usize].first_child,
                None => self.root,
            };
            loop {
                match older {
                    Some(o) if self.links[o as usize].next_sibling == Some(target) => {
                        self.links[o as usize].next_sibling = next_sibling;
                        break;
                    }
                    Some(o) => older = self.links[o as usize].next_sibling,
                    None => {
                        return Err(CollectionError::invalid_argument(
                            "node is not linked into this tree",
                        ))
                    }
                }
            }
        }

        let links = &mut self.links[target as usize];
        links.parent = None;
        links.next_sibling = None;
        Ok(())
    }

    /// Free `start` and everything below it, deepest nodes first
    fn reclaim_subtree(&mut self, start: u32) -> Result<usize> {
        self.links[start as usize].thread = None;
        let mut freed = 0;
        let mut current = Some(start);

        while let Some(node) = current {
            let links = self.links[node as usize];
            let descend = match (links.walk, links.first_child, links.next_sibling) {
                (Walk::Unvisited, Some(child), _) => Some((Walk::DescendingChild, child)),
                (Walk::Unvisited | Walk::DescendingChild, _, Some(sibling)) => {
                    Some((Walk::DescendingSibling, sibling))
                }
                _ => None,
            };

            match descend {
                Some((walk, next)) => {
                    self.links[node as usize].walk = walk;
                    self.links[next as usize].thread = Some(node);
                    current = Some(next);
                }
                None => {
                    let links = &mut self.links[node as usize];
                    links.walk = Walk::Done;
                    current = links.thread.take();
                    let id = self.pool.id_at(node);
                    self.pool.release(id)?;
                    freed += 1;
                }
            }
        }

        Ok(freed)
    }

    /// Pre-order successor using parent links only
    fn preorder_next(&self, node: u32) -> Option<u32> {
        if let Some(child) = self.links[node as usize].first_child {
            return Some(child);
        }
        let mut at = node;
        loop {
            if let Some(sibling) = self.links[at as usize].next_sibling {
                return Some(sibling);
            }
            at = self.links[at as usize].parent?;
        }
    }

    fn find_index(&self, data: &[u8]) -> Option<u32> {
        let mut node = self.root;
        while let Some(i) = node {
            if self.pool.payload(i as usize) == data {
                return Some(i);
            }
            node = self.preorder_next(i);
        }
        None
    }

    fn depth_first_step(&self, walk: &mut DepthFirst) -> Result<bool> {
        let mut encoded = [0u8; CellId::ENCODED_SIZE];
        if walk.fringe.pop(&mut encoded)?.is_none() {
            return Ok(false);
        }
        let id = CellId::from_bytes(&encoded);
        self.pool.check_live(id)?;

        let links = &self.links[id.index()];
        if let Some(sibling) = links.next_sibling {
            walk.fringe.push(&self.pool.id_at(sibling).to_bytes())?;
        }
        if let Some(child) = links.first_child {
            walk.fringe.push(&self.pool.id_at(child).to_bytes())?;
        }
        walk.node = id;
        walk.age = links.age;
        Ok(true)
    }
}

impl Traverse for Tree {
    /// Depth-first cursor positioned on the root, or `End` for an empty tree
    fn cursor(&self) -> Result<Cursor> {
        let root = match self.root() {
            Some(root) => root,
            None => return Ok(Cursor::End),
        };

        let mut walk = DepthFirst {
            fringe: Stack::new(CellId::ENCODED_SIZE, self.capacity())?,
            node: root,
            age: 0,
        };
        walk.fringe.push(&root.to_bytes())?;
        self.depth_first_step(&mut walk)?;
        Ok(Cursor::DepthFirst(walk))
    }

    fn advance(&self, cursor: Cursor) -> Result<Cursor> {
        match cursor {
            Cursor::DepthFirst(mut walk) => {
                if self.depth_first_step(&mut walk)? {
                    Ok(Cursor::DepthFirst(walk))
                } else {
                    // dropping `walk` here releases the fringe
                    Ok(Cursor::End)
                }
            }
            Cursor::Children(id) => {
                self.pool.check_live(id)?;
                Ok(self.links[id.index()]
                    .next_sibling
                    .map_or(Cursor::End, |next| Cursor::Children(self.pool.id_at(next))))
            }
            Cursor::End => Err(Cursor::end_error()),
            Cursor::Element(_) => Err(Cursor::kind_error("tree")),
        }
    }

    fn read<'a>(&'a self, cursor: &Cursor) -> Result<&'a [u8]> {
        match cursor {
            Cursor::DepthFirst(walk) => self.pool.get(walk.node),
            Cursor::Children(id) => self.pool.get(*id),
            Cursor::End => Err(Cursor::end_error()),
            Cursor::Element(_) => Err(Cursor::kind_error("tree")),
        }
    }
}

/// State of a depth-first tree cursor
///
/// Owns the stack of pending node handles, sized to the tree's capacity.
#[derive(Debug)]
pub struct DepthFirst {
    fringe: Stack,
    node: NodeId,
    age: u32,
}

impl DepthFirst {
    /// Node under the cursor
    #[inline]
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Depth of the node under the cursor, root level = 1
    #[inline]
    pub fn age(&self) -> u32 {
        self.age
    }

    /// Number of nodes waiting to be visited
    #[inline]
    pub fn pending(&self) -> usize {
        self.fringe.len()
    }
}

/// One node yielded by [`Tree::walk`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeEntry<'a> {
    /// Node handle
    pub id: NodeId,
    /// Depth, root level = 1
    pub age: u32,
    /// Payload bytes
    pub data: &'a [u8],
}

/// Pre-order iterator yielding [`TreeEntry`] values
pub struct Walker<'a> {
    tree: &'a Tree,
    cursor: Cursor,
}

impl<'a> Iterator for Walker<'a> {
    type Item = TreeEntry<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let (id, age) = match &self.cursor {
            Cursor::DepthFirst(walk) => (walk.node(), walk.age()),
            _ => return None,
        };
        let data = self.tree.read(&self.cursor).ok()?;
        let cursor = std::mem::replace(&mut self.cursor, Cursor::End);
        self.cursor = self.tree.advance(cursor).unwrap_or(Cursor::End);
        Some(TreeEntry { id, age, data })
    }
}
