use crate::arena::{Handle, TypedArena};
use crate::entry::Entry;
use crate::splay_tree::error::{Error, Result};
use crate::splay_tree::node::{Node, Side};
use compare::Compare;
use log::{debug, trace, warn};
use std::cmp::Ordering;
use std::vec;

pub type Arena<K, V> = TypedArena<Node<K, V>>;

/// Outcome of a descent from the root.
enum Search {
    Found(Handle),
    // The slot a new node with the key would occupy, or `None` if the tree is empty.
    Vacant(Option<(Handle, Side)>),
}

/// Returns the node reached by following `side` links from `handle` as far as possible.
pub fn extreme<K, V>(arena: &Arena<K, V>, mut handle: Handle, side: Side) -> Handle {
    while let Some(child) = arena[handle].child(side) {
        handle = child;
    }
    handle
}

/// Returns the in-order neighbour of `handle` in direction `side` (`Side::Right` for the
/// successor, `Side::Left` for the predecessor).
pub fn step<K, V>(arena: &Arena<K, V>, handle: Handle, side: Side) -> Option<Handle> {
    if let Some(child) = arena[handle].child(side) {
        return Some(extreme(arena, child, side.opposite()));
    }
    let mut curr = handle;
    while let Some(parent) = arena[curr].parent {
        if arena[parent].child(side) != Some(curr) {
            return Some(parent);
        }
        curr = parent;
    }
    None
}

/// Splay tree storage: the node arena, the root, the live node count and the ordering policy.
pub struct Tree<K, V, C> {
    arena: Arena<K, V>,
    root: Option<Handle>,
    len: usize,
    cmp: C,
}

impl<K, V, C> Tree<K, V, C> {
    pub fn new(cmp: C, chunk_size: usize) -> Self {
        Tree {
            arena: TypedArena::new(chunk_size),
            root: None,
            len: 0,
            cmp,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn root(&self) -> Option<Handle> {
        self.root
    }

    pub fn arena(&self) -> &Arena<K, V> {
        &self.arena
    }

    pub fn entry(&self, handle: Handle) -> &Entry<K, V> {
        &self.arena[handle].entry
    }

    pub fn entry_mut(&mut self, handle: Handle) -> &mut Entry<K, V> {
        &mut self.arena[handle].entry
    }

    fn side_of(&self, child: Handle, parent: Handle) -> Side {
        if self.arena[parent].left == Some(child) {
            Side::Left
        } else {
            Side::Right
        }
    }

    // Rotates `x` down towards `side`; its child on the opposite side takes its place.
    fn rotate(&mut self, x: Handle, side: Side) {
        let y = self.arena[x]
            .child(side.opposite())
            .expect("Expected rotated node to have a child on the promoted side.");
        let moved = self.arena[y].child(side);
        let parent = self.arena[x].parent;

        *self.arena[x].child_mut(side.opposite()) = moved;
        if let Some(moved) = moved {
            self.arena[moved].parent = Some(x);
        }

        self.arena[y].parent = parent;
        match parent {
            None => self.root = Some(y),
            Some(parent) => {
                let parent_side = self.side_of(x, parent);
                *self.arena[parent].child_mut(parent_side) = Some(y);
            },
        }

        *self.arena[y].child_mut(side) = Some(x);
        self.arena[x].parent = Some(y);
    }

    /// Promotes the right child of `x` into its position.
    pub fn rotate_left(&mut self, x: Handle) {
        self.rotate(x, Side::Left);
    }

    /// Promotes the left child of `x` into its position.
    pub fn rotate_right(&mut self, x: Handle) {
        self.rotate(x, Side::Right);
    }

    // Rotates `x` so that its child on `side` takes its place.
    fn rotate_toward(&mut self, x: Handle, side: Side) {
        match side {
            Side::Left => self.rotate_right(x),
            Side::Right => self.rotate_left(x),
        }
    }

    /// Moves `x` to the root of the subtree whose root has no parent.
    pub fn splay(&mut self, x: Handle) {
        let mut rotations = 0;
        while let Some(parent) = self.arena[x].parent {
            let x_side = self.side_of(x, parent);
            match self.arena[parent].parent {
                // zig
                None => {
                    self.rotate_toward(parent, x_side);
                    rotations += 1;
                },
                Some(grandparent) => {
                    let parent_side = self.side_of(parent, grandparent);
                    if x_side == parent_side {
                        // zig-zig
                        self.rotate_toward(grandparent, parent_side);
                        self.rotate_toward(parent, x_side);
                    } else {
                        // zig-zag
                        self.rotate_toward(parent, x_side);
                        self.rotate_toward(grandparent, parent_side);
                    }
                    rotations += 2;
                },
            }
        }
        trace!("splayed node to the root in {} rotations", rotations);
    }

    fn search<Q>(&self, key: &Q) -> Search
    where
        C: Compare<Q, K>,
        Q: ?Sized,
    {
        let mut curr = match self.root {
            Some(root) => root,
            None => return Search::Vacant(None),
        };
        loop {
            let node = &self.arena[curr];
            let side = match self.cmp.compare(key, &node.entry.key) {
                Ordering::Less => Side::Left,
                Ordering::Greater => Side::Right,
                Ordering::Equal => return Search::Found(curr),
            };
            match node.child(side) {
                Some(child) => curr = child,
                None => return Search::Vacant(Some((curr, side))),
            }
        }
    }

    /// Looks up `key` and splays the matching node to the root. On a miss the last node visited
    /// is splayed instead.
    pub fn find<Q>(&mut self, key: &Q) -> Option<Handle>
    where
        C: Compare<Q, K>,
        Q: ?Sized,
    {
        match self.search(key) {
            Search::Found(handle) => {
                self.splay(handle);
                Some(handle)
            },
            Search::Vacant(Some((last, _))) => {
                self.splay(last);
                None
            },
            Search::Vacant(None) => None,
        }
    }

    /// Looks up `key` without restructuring the tree.
    pub fn get<Q>(&self, key: &Q) -> Option<Handle>
    where
        C: Compare<Q, K>,
        Q: ?Sized,
    {
        match self.search(key) {
            Search::Found(handle) => Some(handle),
            Search::Vacant(_) => None,
        }
    }

    /// Inserts a key-value pair unless the key is already present. Either way the node holding
    /// the key ends up at the root. Returns the node and whether it was newly created.
    pub fn insert(&mut self, key: K, value: V) -> Result<(Handle, bool)>
    where
        C: Compare<K>,
    {
        match self.search(&key) {
            Search::Found(handle) => {
                self.splay(handle);
                trace!("insert found an existing key");
                Ok((handle, false))
            },
            Search::Vacant(slot) => {
                let handle = self.arena.try_allocate(Node::new(key, value))?;
                match slot {
                    None => self.root = Some(handle),
                    Some((parent, side)) => {
                        *self.arena[parent].child_mut(side) = Some(handle);
                        self.arena[handle].parent = Some(parent);
                    },
                }
                self.len += 1;
                self.splay(handle);
                Ok((handle, true))
            },
        }
    }

    // Unlinks the root and joins its subtrees by splaying the maximum of the left subtree.
    fn remove_root(&mut self) -> Option<Entry<K, V>> {
        let root = self.root?;
        let Node {
            entry, left, right, ..
        } = self.arena.free(root);
        match left {
            Some(left) => {
                self.arena[left].parent = None;
                self.root = Some(left);
                let max = extreme(&self.arena, left, Side::Right);
                self.splay(max);
                self.arena[max].right = right;
                if let Some(right) = right {
                    self.arena[right].parent = Some(max);
                }
            },
            None => {
                if let Some(right) = right {
                    self.arena[right].parent = None;
                }
                self.root = right;
            },
        }
        self.len -= 1;
        Some(entry)
    }

    /// Removes `key` and returns its entry. The join point of the two remaining subtrees becomes
    /// the root.
    pub fn erase<Q>(&mut self, key: &Q) -> Option<Entry<K, V>>
    where
        C: Compare<Q, K>,
        Q: ?Sized,
    {
        self.find(key)?;
        let entry = self.remove_root();
        trace!("erased a node, {} remaining", self.len);
        entry
    }

    /// Returns the smallest (`Side::Left`) or largest (`Side::Right`) node without splaying.
    pub fn edge(&self, side: Side) -> Option<Handle> {
        self.root.map(|root| extreme(&self.arena, root, side))
    }

    /// Splays the smallest or largest node to the root.
    pub fn splay_edge(&mut self, side: Side) -> Result<Handle> {
        let handle = self.edge(side).ok_or(Error::EmptyTree)?;
        self.splay(handle);
        Ok(handle)
    }

    /// Removes the smallest or largest entry.
    pub fn pop_edge(&mut self, side: Side) -> Option<Entry<K, V>> {
        let handle = self.edge(side)?;
        self.splay(handle);
        self.remove_root()
    }

    /// Returns the node with the greatest key less than or equal to `key` (`Side::Left`), or the
    /// node with the least key greater than or equal to `key` (`Side::Right`).
    pub fn bound<Q>(&self, key: &Q, side: Side) -> Option<Handle>
    where
        C: Compare<Q, K>,
        Q: ?Sized,
    {
        let mut curr = self.root;
        let mut best = None;
        while let Some(handle) = curr {
            let node = &self.arena[handle];
            curr = match (self.cmp.compare(key, &node.entry.key), side) {
                (Ordering::Equal, _) => return Some(handle),
                (Ordering::Less, Side::Left) => node.left,
                (Ordering::Greater, Side::Right) => node.right,
                (Ordering::Less, Side::Right) => {
                    best = Some(handle);
                    node.left
                },
                (Ordering::Greater, Side::Left) => {
                    best = Some(handle);
                    node.right
                },
            };
        }
        best
    }

    /// Returns the number of edges between the root and the node holding `key`.
    pub fn depth<Q>(&self, key: &Q) -> Option<usize>
    where
        C: Compare<Q, K>,
        Q: ?Sized,
    {
        let mut curr = self.root;
        let mut depth = 0;
        while let Some(handle) = curr {
            let node = &self.arena[handle];
            curr = match self.cmp.compare(key, &node.entry.key) {
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
                Ordering::Equal => return Some(depth),
            };
            depth += 1;
        }
        None
    }

    /// Returns every node in key order paired with its depth.
    pub fn in_order(&self) -> Vec<(Handle, usize)> {
        let mut ret = Vec::with_capacity(self.len);
        let mut stack = Vec::new();
        let mut curr = self.root.map(|root| (root, 0));
        loop {
            while let Some((handle, depth)) = curr {
                stack.push((handle, depth));
                curr = self.arena[handle].left.map(|left| (left, depth + 1));
            }
            match stack.pop() {
                Some((handle, depth)) => {
                    ret.push((handle, depth));
                    curr = self.arena[handle].right.map(|right| (right, depth + 1));
                },
                None => break,
            }
        }
        ret
    }

    /// Returns the number of nodes without children.
    pub fn leaf_count(&self) -> usize {
        self.in_order()
            .into_iter()
            .filter(|(handle, _)| {
                let node = &self.arena[*handle];
                node.left.is_none() && node.right.is_none()
            })
            .count()
    }

    /// Returns the number of edges on the longest root-to-leaf path.
    pub fn height(&self) -> Option<usize> {
        self.in_order().into_iter().map(|(_, depth)| depth).max()
    }

    /// Returns mutable references to every entry in key order.
    pub fn entries_mut(&mut self) -> Vec<&mut Entry<K, V>> {
        let order = self
            .in_order()
            .into_iter()
            .map(|(handle, _)| self.arena.slot_index(handle))
            .collect::<Vec<usize>>();
        let mut slots = self.arena.slots_mut();
        order
            .into_iter()
            .filter_map(|slot| slots[slot].take())
            .map(|node| &mut node.entry)
            .collect()
    }

    /// Consumes the tree, yielding its entries in key order.
    pub fn into_entries(self) -> IntoEntries<K, V> {
        let order = self
            .in_order()
            .into_iter()
            .map(|(handle, _)| handle)
            .collect::<Vec<Handle>>();
        debug!("draining splay tree of {} nodes", order.len());
        IntoEntries {
            arena: self.arena,
            order: order.into_iter(),
        }
    }

    pub fn clear(&mut self) {
        debug!("clearing splay tree of {} nodes", self.len);
        self.arena.clear();
        self.root = None;
        self.len = 0;
    }

    /// Checks that every child links back to its parent and that the root has no parent.
    pub fn check_parents(&self) -> Result<()> {
        let mut stack = Vec::new();
        if let Some(root) = self.root {
            if self.arena[root].parent.is_some() {
                warn!("root of splay tree has a parent link");
                return Err(Error::ParentMismatch { depth: 0 });
            }
            stack.push((root, 0));
        }
        while let Some((handle, depth)) = stack.pop() {
            let node = &self.arena[handle];
            for child in node.left.iter().chain(node.right.iter()) {
                if self.arena[*child].parent != Some(handle) {
                    warn!("parent link mismatch below depth {}", depth);
                    return Err(Error::ParentMismatch { depth: depth + 1 });
                }
                stack.push((*child, depth + 1));
            }
        }
        Ok(())
    }

    /// Checks that an in-order walk yields strictly increasing keys.
    pub fn check_order(&self) -> Result<()>
    where
        C: Compare<K>,
    {
        let order = self.in_order();
        for pair in order.windows(2) {
            let (prev, _) = pair[0];
            let (curr, depth) = pair[1];
            if self.cmp.compare(&self.entry(prev).key, &self.entry(curr).key) != Ordering::Less {
                warn!("ordering violation at depth {}", depth);
                return Err(Error::OrderViolation { depth });
            }
        }
        Ok(())
    }

    /// Checks that the stored length matches both the reachable nodes and the live arena slots.
    pub fn check_len(&self) -> Result<()> {
        let reachable = self.in_order().len();
        for actual in [reachable, self.arena.len()].iter() {
            if *actual != self.len {
                warn!("splay tree reports {} nodes but found {}", self.len, actual);
                return Err(Error::SizeMismatch {
                    expected: self.len,
                    actual: *actual,
                });
            }
        }
        Ok(())
    }
}

impl<K, V, C> Clone for Tree<K, V, C>
where
    K: Clone,
    V: Clone,
    C: Clone,
{
    fn clone(&self) -> Self {
        let mut arena = TypedArena::new(self.arena.chunk_size());
        let mut root = None;
        let mut stack: Vec<(Handle, Option<(Handle, Side)>)> = Vec::new();
        if let Some(src_root) = self.root {
            stack.push((src_root, None));
        }
        while let Some((src, slot)) = stack.pop() {
            let src_node = &self.arena[src];
            let Entry { ref key, ref value } = src_node.entry;
            let handle = arena.allocate(Node::new(key.clone(), value.clone()));
            match slot {
                None => root = Some(handle),
                Some((parent, side)) => {
                    *arena[parent].child_mut(side) = Some(handle);
                    arena[handle].parent = Some(parent);
                },
            }
            if let Some(right) = src_node.right {
                stack.push((right, Some((handle, Side::Right))));
            }
            if let Some(left) = src_node.left {
                stack.push((left, Some((handle, Side::Left))));
            }
        }
        debug!("cloned splay tree of {} nodes", self.len);
        Tree {
            arena,
            root,
            len: self.len,
            cmp: self.cmp.clone(),
        }
    }
}

/// Owned entries of a consumed tree, in key order.
pub struct IntoEntries<K, V> {
    arena: Arena<K, V>,
    order: vec::IntoIter<Handle>,
}

impl<K, V> Iterator for IntoEntries<K, V> {
    type Item = Entry<K, V>;

    fn next(&mut self) -> Option<Self::Item> {
        let IntoEntries { arena, order } = self;
        order.next().map(|handle| arena.free(handle).entry)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.order.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IntoEntries<K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let IntoEntries { arena, order } = self;
        order.next_back().map(|handle| arena.free(handle).entry)
    }
}

impl<K, V> ExactSizeIterator for IntoEntries<K, V> {}

#[cfg(test)]
mod tests {
    use super::Tree;
    use crate::arena::Handle;
    use crate::splay_tree::error::Error;
    use crate::splay_tree::node::Side;
    use compare::{natural, Natural};

    fn tree_from(keys: &[u32]) -> Tree<u32, u32, Natural<u32>> {
        let mut tree = Tree::new(natural(), 16);
        for key in keys {
            tree.insert(*key, *key * 10).unwrap();
        }
        tree
    }

    fn keys(tree: &Tree<u32, u32, Natural<u32>>) -> Vec<u32> {
        tree.in_order()
            .into_iter()
            .map(|(handle, _)| tree.entry(handle).key)
            .collect()
    }

    fn root_key(tree: &Tree<u32, u32, Natural<u32>>) -> Option<u32> {
        tree.root().map(|root| tree.entry(root).key)
    }

    fn assert_valid(tree: &Tree<u32, u32, Natural<u32>>) {
        tree.check_parents().unwrap();
        tree.check_order().unwrap();
        tree.check_len().unwrap();
    }

    // Insertion leaves 4(3(2(1)), 6(5, 7)); one rotation balances the left side.
    fn balanced() -> Tree<u32, u32, Natural<u32>> {
        let mut tree = tree_from(&[1, 3, 2, 5, 7, 6, 4]);
        let three = tree.get(&3).unwrap();
        tree.rotate_right(three);
        assert_eq!(
            tree.in_order()
                .into_iter()
                .map(|(_, depth)| depth)
                .collect::<Vec<usize>>(),
            vec![2, 1, 2, 0, 2, 1, 2],
        );
        tree
    }

    #[test]
    fn test_rotate_left_right() {
        let mut tree = tree_from(&[1, 2]);
        let root = tree.root().unwrap();
        assert_eq!(tree.entry(root).key, 2);

        tree.rotate_right(root);
        assert_eq!(root_key(&tree), Some(1));
        assert_eq!(tree.depth(&2), Some(1));
        assert_valid(&tree);

        let root = tree.root().unwrap();
        tree.rotate_left(root);
        assert_eq!(root_key(&tree), Some(2));
        assert_eq!(tree.depth(&1), Some(1));
        assert_valid(&tree);
    }

    #[test]
    fn test_rotate_moves_inner_subtree() {
        let mut tree = balanced();
        let root = tree.root().unwrap();
        tree.rotate_left(root);
        assert_eq!(root_key(&tree), Some(6));
        assert_eq!(tree.depth(&5), Some(2));
        assert_eq!(tree.depth(&4), Some(1));
        assert_eq!(keys(&tree), vec![1, 2, 3, 4, 5, 6, 7]);
        assert_valid(&tree);
    }

    #[test]
    fn test_insert_scenario() {
        let tree = tree_from(&[5, 3, 8, 1, 4]);
        assert_eq!(keys(&tree), vec![1, 3, 4, 5, 8]);
        assert_eq!(root_key(&tree), Some(4));
        assert_valid(&tree);
    }

    #[test]
    fn test_insert_existing() {
        let mut tree = tree_from(&[5, 3, 8]);
        let (handle, inserted) = tree.insert(5, 0).unwrap();
        assert!(!inserted);
        assert_eq!(tree.root(), Some(handle));
        assert_eq!(tree.entry(handle).value, 50);
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn test_find_splays_leftmost() {
        let mut tree = balanced();
        assert_eq!(tree.depth(&7), Some(2));
        assert!(tree.find(&1).is_some());
        assert_eq!(root_key(&tree), Some(1));
        assert!(tree.depth(&7).unwrap() > 2);
        assert_valid(&tree);
    }

    #[test]
    fn test_find_zig_zag() {
        let mut tree = balanced();
        tree.find(&3);
        assert_eq!(root_key(&tree), Some(3));
        assert_eq!(tree.depth(&2), Some(1));
        assert_eq!(tree.depth(&4), Some(1));
        assert_valid(&tree);
    }

    #[test]
    fn test_find_miss_splays_last_visited() {
        let mut tree = tree_from(&[10, 20, 30]);
        assert_eq!(tree.find(&25), None);
        let root = root_key(&tree).unwrap();
        assert!(root == 20 || root == 30);
        assert_eq!(tree.len(), 3);
        assert_valid(&tree);
    }

    #[test]
    fn test_find_empty() {
        let mut tree: Tree<u32, u32, Natural<u32>> = Tree::new(natural(), 16);
        assert_eq!(tree.find(&1), None);
        assert_eq!(tree.len(), 0);
        assert_eq!(tree.root(), None);
    }

    #[test]
    fn test_erase_root_of_three() {
        let mut tree = tree_from(&[1, 3, 2]);
        assert_eq!(root_key(&tree), Some(2));
        let entry = tree.erase(&2).unwrap();
        assert_eq!((entry.key, entry.value), (2, 20));
        assert_eq!(tree.len(), 2);
        assert_eq!(keys(&tree), vec![1, 3]);
        assert_eq!(root_key(&tree), Some(1));
        assert_valid(&tree);
    }

    #[test]
    fn test_erase_without_left_subtree() {
        let mut tree = tree_from(&[3, 2, 1]);
        assert_eq!(root_key(&tree), Some(1));
        tree.erase(&1).unwrap();
        assert_eq!(root_key(&tree), Some(2));
        assert_valid(&tree);
    }

    #[test]
    fn test_erase_missing() {
        let mut tree = tree_from(&[1, 2, 3]);
        assert!(tree.erase(&4).is_none());
        assert_eq!(tree.len(), 3);
        assert_valid(&tree);
    }

    #[test]
    fn test_step_and_edges() {
        let tree = balanced();
        let min = tree.edge(Side::Left).unwrap();
        let max = tree.edge(Side::Right).unwrap();
        assert_eq!(tree.entry(min).key, 1);
        assert_eq!(tree.entry(max).key, 7);

        let mut forward = Vec::new();
        let mut curr = Some(min);
        while let Some(handle) = curr {
            forward.push(tree.entry(handle).key);
            curr = super::step(tree.arena(), handle, Side::Right);
        }
        assert_eq!(forward, vec![1, 2, 3, 4, 5, 6, 7]);

        let mut backward = Vec::new();
        let mut curr = Some(max);
        while let Some(handle) = curr {
            backward.push(tree.entry(handle).key);
            curr = super::step(tree.arena(), handle, Side::Left);
        }
        assert_eq!(backward, vec![7, 6, 5, 4, 3, 2, 1]);
    }

    #[test]
    fn test_bound() {
        let tree = tree_from(&[1, 3, 5]);
        let key_of = |handle: Option<Handle>| handle.map(|handle| tree.entry(handle).key);
        assert_eq!(key_of(tree.bound(&0, Side::Left)), None);
        assert_eq!(key_of(tree.bound(&4, Side::Left)), Some(3));
        assert_eq!(key_of(tree.bound(&5, Side::Left)), Some(5));
        assert_eq!(key_of(tree.bound(&0, Side::Right)), Some(1));
        assert_eq!(key_of(tree.bound(&4, Side::Right)), Some(5));
        assert_eq!(key_of(tree.bound(&6, Side::Right)), None);
    }

    #[test]
    fn test_splay_and_pop_edges() {
        let mut tree = tree_from(&[2, 1, 3]);
        let min = tree.splay_edge(Side::Left).unwrap();
        assert_eq!(tree.root(), Some(min));
        assert_eq!(tree.pop_edge(Side::Right).unwrap().key, 3);
        assert_eq!(tree.pop_edge(Side::Left).unwrap().key, 1);
        assert_eq!(tree.pop_edge(Side::Left).unwrap().key, 2);
        assert!(tree.pop_edge(Side::Left).is_none());
        assert_eq!(tree.splay_edge(Side::Right), Err(Error::EmptyTree));
    }

    #[test]
    fn test_height() {
        let tree = tree_from(&[1, 2, 3, 4]);
        assert_eq!(tree.height(), Some(3));
        let empty: Tree<u32, u32, Natural<u32>> = Tree::new(natural(), 16);
        assert_eq!(empty.height(), None);
    }

    #[test]
    fn test_leaf_count() {
        assert_eq!(balanced().leaf_count(), 4);
        assert_eq!(tree_from(&[1, 2, 3, 4]).leaf_count(), 1);
        let empty: Tree<u32, u32, Natural<u32>> = Tree::new(natural(), 16);
        assert_eq!(empty.leaf_count(), 0);
    }

    #[test]
    fn test_broken_parent_detected() {
        let mut tree = tree_from(&[1, 2]);
        let root = tree.root().unwrap();
        let child = tree.arena[root].left.unwrap();
        tree.arena[child].parent = None;
        assert_eq!(tree.check_parents(), Err(Error::ParentMismatch { depth: 1 }));
    }

    #[test]
    fn test_broken_order_detected() {
        let mut tree = tree_from(&[1, 2]);
        let root = tree.root().unwrap();
        tree.entry_mut(root).key = 0;
        assert_eq!(tree.check_order(), Err(Error::OrderViolation { depth: 0 }));
    }

    #[test]
    fn test_broken_len_detected() {
        let mut tree = tree_from(&[1, 2]);
        tree.len = 3;
        assert_eq!(
            tree.check_len(),
            Err(Error::SizeMismatch {
                expected: 3,
                actual: 2,
            }),
        );
    }

    #[test]
    fn test_clone_is_independent() {
        let mut tree = balanced();
        let copy = tree.clone();
        tree.erase(&4);
        tree.find(&1);
        assert_eq!(keys(&copy), vec![1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(root_key(&copy), Some(4));
        assert_valid(&copy);
        assert_valid(&tree);
    }

    #[test]
    fn test_entries_mut_in_order() {
        let mut tree = tree_from(&[4, 2, 6, 1]);
        tree.erase(&2);
        tree.insert(3, 30).unwrap();
        let keys = tree
            .entries_mut()
            .into_iter()
            .map(|entry| {
                entry.value += 1;
                entry.key
            })
            .collect::<Vec<u32>>();
        assert_eq!(keys, vec![1, 3, 4, 6]);
        let root = tree.root().unwrap();
        assert_eq!(tree.entry(root).value, 31);
    }

    #[test]
    fn test_entries_mut_across_chunks() {
        let mut tree = Tree::new(natural(), 2);
        for key in &[5, 1, 4, 2, 3] {
            tree.insert(*key, 0).unwrap();
        }
        tree.erase(&1);
        tree.insert(0, 0).unwrap();
        for (index, entry) in tree.entries_mut().into_iter().enumerate() {
            entry.value = index;
        }
        let pairs = tree
            .in_order()
            .into_iter()
            .map(|(handle, _)| (tree.entry(handle).key, tree.entry(handle).value))
            .collect::<Vec<(u32, usize)>>();
        assert_eq!(pairs, vec![(0, 0), (2, 1), (3, 2), (4, 3), (5, 4)]);
    }

    #[test]
    fn test_into_entries() {
        let tree = tree_from(&[3, 1, 2]);
        let mut entries = tree.into_entries();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries.next_back().map(|entry| entry.key), Some(3));
        assert_eq!(entries.next().map(|entry| entry.key), Some(1));
        assert_eq!(entries.next().map(|entry| entry.key), Some(2));
        assert!(entries.next().is_none());
    }

    #[test]
    fn test_clear() {
        let mut tree = tree_from(&[1, 2, 3]);
        tree.clear();
        assert_eq!(tree.len(), 0);
        assert_eq!(tree.root(), None);
        assert_valid(&tree);
        tree.insert(4, 40).unwrap();
        assert_eq!(keys(&tree), vec![4]);
    }
}
