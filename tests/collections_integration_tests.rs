//! End-to-end behavior of the pool, the linear containers, the tree and the
//! cursor protocol, exercised only through the public API.

use pooled_collections::config::{Config, ContainerConfig};
use pooled_collections::{
    CellPool, CollectionError, Cursor, List, Queue, Set, Stack, Traverse, Tree,
};

// =============================================================================
// POOL
// =============================================================================

#[test]
fn test_pool_capacity_invariant() {
    for &(size, n) in &[(1usize, 1usize), (3, 7), (16, 64), (100, 5)] {
        let mut pool = CellPool::new(size, n).unwrap();
        let ids: Vec<_> = (0..n).map(|_| pool.acquire().unwrap()).collect();
        assert!(matches!(
            pool.acquire(),
            Err(CollectionError::ResourceExhausted { capacity }) if capacity == n
        ));

        let k = n / 2 + 1;
        for &id in ids.iter().take(k) {
            pool.release(id).unwrap();
        }
        for _ in 0..k {
            pool.acquire().unwrap();
        }
        assert!(pool.acquire().is_err());
        assert_eq!(pool.freeable() + pool.live_count(), pool.capacity());
    }
}

#[test]
fn test_pool_reuse_without_clearing() {
    let mut pool = CellPool::new(4, 1).unwrap();
    let first = pool.acquire().unwrap();
    pool.write(first, &[1, 2, 3, 4]).unwrap();
    pool.release(first).unwrap();

    let second = pool.acquire().unwrap();
    assert_eq!(second.index(), first.index());
    assert_ne!(second, first);
    assert!(pool.get(first).is_err());

    pool.write(second, &[9, 9, 9, 9]).unwrap();
    assert_eq!(pool.get(second).unwrap(), &[9, 9, 9, 9]);
}

#[test]
fn test_pool_zero_on_release() {
    let config = ContainerConfig::builder()
        .element_size(8)
        .capacity(1)
        .zero_on_release(true)
        .build()
        .unwrap();
    let mut pool = CellPool::with_config(&config).unwrap();
    let id = pool.acquire().unwrap();
    pool.write(id, &[0xAA; 8]).unwrap();
    pool.release(id).unwrap();

    let id = pool.acquire().unwrap();
    // the first LINK_SIZE bytes hold the free-list link while free
    assert!(pool.get(id).unwrap()[4..].iter().all(|&b| b == 0));
}

#[test]
fn test_pool_stats() {
    let mut pool = CellPool::new(4, 2).unwrap();
    let a = pool.acquire().unwrap();
    pool.acquire().unwrap();
    let _ = pool.acquire();
    pool.release(a).unwrap();

    let stats = pool.stats().unwrap();
    assert_eq!(stats.acquisitions, 2);
    assert_eq!(stats.releases, 1);
    assert_eq!(stats.exhausted, 1);
    assert_eq!(stats.peak_live, 2);
    assert!((stats.success_rate() - 2.0 / 3.0).abs() < 1e-9);
}

// =============================================================================
// LINEAR CONTAINERS
// =============================================================================

#[test]
fn test_list_push_then_shift_preserves_order() {
    let mut list = List::new(1, 3).unwrap();
    for b in [1u8, 2, 3] {
        list.push(&[b]).unwrap();
    }
    let mut out = [0u8];
    let mut seen = Vec::new();
    while list.shift(&mut out).unwrap().is_some() {
        seen.push(out[0]);
    }
    assert_eq!(seen, [1, 2, 3]);
}

#[test]
fn test_list_unshift_then_pop_preserves_order() {
    let mut list = List::new(1, 3).unwrap();
    for b in [1u8, 2, 3] {
        list.unshift(&[b]).unwrap();
    }
    let mut out = [0u8];
    let mut seen = Vec::new();
    while list.pop(&mut out).unwrap().is_some() {
        seen.push(out[0]);
    }
    assert_eq!(seen, [1, 2, 3]);
}

#[test]
fn test_list_positional_insert() {
    let mut list = List::new(1, 8).unwrap();
    list.insert(-1, &[10]).unwrap();
    list.insert(-1, &[30]).unwrap();
    list.insert(1, &[20]).unwrap();
    list.insert(0, &[0]).unwrap();
    list.insert(4, &[40]).unwrap();

    let all: Vec<u8> = list.iter().map(|d| d[0]).collect();
    assert_eq!(all, [0, 10, 20, 30, 40]);

    assert!(matches!(
        list.insert(9, &[99]),
        Err(CollectionError::OutOfRange { index: 9, len: 5 })
    ));
    assert_eq!(list.pool().live_count(), 5);
}

#[test]
fn test_list_remove_through_cursor() {
    let mut list = List::new(1, 4).unwrap();
    for b in [1u8, 2, 3] {
        list.push(&[b]).unwrap();
    }

    let cursor = list.cursor().unwrap();
    let cursor = list.advance(cursor).unwrap();
    list.remove(&cursor).unwrap();
    assert!(list.read(&cursor).is_err());

    let all: Vec<u8> = list.iter().map(|d| d[0]).collect();
    assert_eq!(all, [1, 3]);
}

#[test]
fn test_queue_fifo() {
    let mut queue = Queue::new(1, 3).unwrap();
    for b in *b"abc" {
        queue.enq(&[b]).unwrap();
    }
    let mut out = [0u8];
    let mut seen = Vec::new();
    while queue.deq(&mut out).unwrap().is_some() {
        seen.push(out[0]);
    }
    assert_eq!(seen, b"abc");
}

#[test]
fn test_stack_lifo() {
    let mut stack = Stack::new(1, 3).unwrap();
    for b in *b"abc" {
        stack.push(&[b]).unwrap();
    }
    let mut out = [0u8];
    let mut seen = Vec::new();
    while stack.pop(&mut out).unwrap().is_some() {
        seen.push(out[0]);
    }
    assert_eq!(seen, b"cba");
}

#[test]
fn test_set_dedup() {
    let mut set = Set::new(4, 4).unwrap();
    let first = set.add(b"same").unwrap();
    let second = set.add(b"same").unwrap();
    assert_eq!(first, second);
    assert_eq!(set.count(), 1);
    assert_eq!(set.data(first), Some(&b"same"[..]));
}

#[test]
fn test_containers_report_exhaustion() {
    let mut queue = Queue::new(1, 1).unwrap();
    queue.enq(&[1]).unwrap();
    assert!(matches!(
        queue.enq(&[2]),
        Err(CollectionError::ResourceExhausted { capacity: 1 })
    ));

    let mut tree = Tree::new(1, 1).unwrap();
    tree.insert(None, &[0]).unwrap();
    assert!(tree.insert(None, &[1]).is_err());
}

// =============================================================================
// TREE
// =============================================================================

fn preorder(tree: &Tree) -> Vec<u8> {
    tree.iter().map(|d| d[0]).collect()
}

#[test]
fn test_tree_insertion_order() {
    let mut tree = Tree::new(1, 8).unwrap();
    for b in 0..5u8 {
        tree.insert(None, &[b]).unwrap();
    }
    assert_eq!(preorder(&tree), [0, 1, 2, 3, 4]);
}

#[test]
fn test_tree_depth_first_with_children() {
    let mut tree = Tree::new(1, 8).unwrap();
    let n0 = tree.insert(None, &[0]).unwrap();
    let n1 = tree.insert(Some(n0), &[1]).unwrap();
    tree.insert(Some(n0), &[2]).unwrap();
    let n3 = tree.insert(Some(n1), &[3]).unwrap();
    tree.insert(Some(n3), &[4]).unwrap();

    let mut visited = Vec::new();
    let mut cursor = tree.cursor().unwrap();
    while !cursor.is_end() {
        visited.push((tree.read(&cursor).unwrap()[0], tree.iter_age(&cursor).unwrap()));
        cursor = tree.advance(cursor).unwrap();
    }
    assert_eq!(visited, [(0, 1), (1, 2), (3, 3), (4, 4), (2, 2)]);

    let walked: Vec<(u8, u32)> = tree.walk().map(|e| (e.data[0], e.age)).collect();
    assert_eq!(walked, visited);
}

#[test]
fn test_tree_removal_preserves_siblings() {
    let mut tree = Tree::new(1, 8).unwrap();
    let ids: Vec<_> = (0..5u8).map(|b| tree.insert(None, &[b]).unwrap()).collect();
    tree.remove(ids[1]).unwrap();
    assert_eq!(preorder(&tree), [0, 2, 3, 4]);
    assert_eq!(tree.count(), 4);
}

#[test]
fn test_tree_removal_is_subtree_wide() {
    let mut tree = Tree::new(1, 8).unwrap();
    let ids: Vec<_> = (0..5u8).map(|b| tree.insert(None, &[b]).unwrap()).collect();
    tree.insert(Some(ids[3]), &[5]).unwrap();
    tree.insert(Some(ids[3]), &[6]).unwrap();

    tree.remove(ids[3]).unwrap();
    assert_eq!(preorder(&tree), [0, 1, 2, 4]);
    assert_eq!(tree.count(), 4);
    assert_eq!(tree.pool().freeable(), 4);
}

#[test]
fn test_tree_insert_by_parent_data_missing_parent() {
    let mut tree = Tree::new(2, 4).unwrap();
    tree.insert_by_parent_data(b"aa", b"aa").unwrap();
    tree.insert_by_parent_data(b"aa", b"bb").unwrap();
    assert!(matches!(
        tree.insert_by_parent_data(b"zz", b"cc"),
        Err(CollectionError::NotFound { .. })
    ));
    assert_eq!(tree.count(), 2);
}

// =============================================================================
// CURSORS
// =============================================================================

#[test]
fn test_iterator_exhaustion_list() {
    let mut list = List::new(1, 2).unwrap();
    list.push(&[1]).unwrap();
    let cursor = list.cursor().unwrap();
    let cursor = list.advance(cursor).unwrap();
    assert!(cursor.is_end());
    assert!(matches!(
        list.read(&cursor),
        Err(CollectionError::InvalidArgument { .. })
    ));
}

#[test]
fn test_iterator_exhaustion_tree() {
    let mut tree = Tree::new(1, 2).unwrap();
    let root = tree.insert(None, &[1]).unwrap();
    tree.insert(Some(root), &[2]).unwrap();

    let mut cursor = tree.cursor().unwrap();
    cursor = tree.advance(cursor).unwrap();
    cursor = tree.advance(cursor).unwrap();
    assert!(cursor.is_end());
    assert!(matches!(
        tree.read(&cursor),
        Err(CollectionError::InvalidArgument { .. })
    ));
    assert!(tree.advance(cursor).is_err());
}

#[test]
fn test_cursor_kinds_do_not_mix() {
    let mut list = List::new(1, 2).unwrap();
    let mut tree = Tree::new(1, 2).unwrap();
    list.push(&[1]).unwrap();
    tree.insert(None, &[1]).unwrap();

    let tree_cursor = tree.cursor().unwrap();
    assert!(list.read(&tree_cursor).is_err());
    tree.release(tree_cursor);

    let list_cursor = list.cursor().unwrap();
    assert!(matches!(list_cursor, Cursor::Element(_)));
    assert!(tree.advance(list_cursor).is_err());
}

#[test]
fn test_cursor_goes_stale_after_mutation() {
    let mut list = List::new(1, 2).unwrap();
    list.push(&[1]).unwrap();
    let cursor = list.cursor().unwrap();
    let mut out = [0u8];
    list.pop(&mut out).unwrap();
    list.push(&[2]).unwrap();
    assert!(list.read(&cursor).is_err());
}

#[test]
fn test_generic_consumer_over_trait_objects() {
    let mut list = List::new(1, 3).unwrap();
    let mut set = Set::new(1, 3).unwrap();
    for b in [4u8, 5, 4] {
        list.push(&[b]).unwrap();
        set.add(&[b]).unwrap();
    }

    let sources: [&dyn Traverse; 2] = [&list, &set];
    let sums: Vec<u32> = sources
        .iter()
        .map(|s| {
            let mut sum = 0u32;
            let mut cursor = s.cursor().unwrap();
            while !cursor.is_end() {
                sum += u32::from(s.read(&cursor).unwrap()[0]);
                cursor = s.advance(cursor).unwrap();
            }
            sum
        })
        .collect();
    assert_eq!(sums, [13, 9]);
}

#[test]
fn test_realtime_preset_builds_every_container() {
    let config = ContainerConfig {
        element_size: 4,
        ..ContainerConfig::realtime_preset()
    };
    assert!(List::with_config(&config).is_ok());
    assert!(Stack::with_config(&config).is_ok());
    assert!(Queue::with_config(&config).is_ok());
    assert!(Set::with_config(&config).is_ok());
    assert!(Tree::with_config(&config).is_ok());
}
