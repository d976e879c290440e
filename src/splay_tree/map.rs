use crate::arena::Handle;
use crate::entry::Entry;
use crate::splay_tree::error::Result;
use crate::splay_tree::node::Side;
use crate::splay_tree::tree::{self, Arena, IntoEntries, Tree};
use compare::{Compare, Natural};
use serde::de::{self, Deserialize, Deserializer, MapAccess, Visitor};
use serde::ser::{Serialize, Serializer};
use std::fmt;
use std::iter::FromIterator;
use std::marker::PhantomData;
use std::ops::{Index, IndexMut};
use std::result;
use std::vec;

/// Number of nodes reserved at a time by maps built without an explicit chunk size.
pub const DEFAULT_CHUNK_SIZE: usize = 1024;

/// An ordered map implemented using a splay tree.
///
/// A splay tree is a self-adjusting binary search tree with the additional property that recently
/// accessed items are quick to access again. After each lookup, insertion or removal, the item
/// that was accessed is "splayed" to the root of the tree, which gives amortized logarithmic time
/// per operation without storing any balance information.
///
/// Nodes live in an arena and refer to their children and parent by handle, so splaying is done
/// bottom-up with the classic zig, zig-zig and zig-zag rotations. Methods that take `&self` (such
/// as `get`, `floor` and `iter`) never restructure the tree.
///
/// # Examples
///
/// ```
/// use splay_collections::splay_tree::SplayMap;
///
/// let mut map = SplayMap::new();
/// map.insert(0, 1);
/// map.insert(3, 4);
///
/// assert_eq!(map[&0], 1);
/// assert_eq!(map.get(&1), None);
/// assert_eq!(map.len(), 2);
///
/// assert_eq!(map.min(), Some(&0));
/// assert_eq!(map.ceil(&2), Some(&3));
///
/// assert_eq!(map.find(&0), Some((&0, &mut 1)));
/// assert_eq!(map.root(), Some((&0, &1)));
///
/// assert_eq!(map.remove(&0), Some((0, 1)));
/// assert_eq!(map.remove(&1), None);
/// ```
pub struct SplayMap<K, V, C = Natural<K>> {
    tree: Tree<K, V, C>,
}

impl<K, V> SplayMap<K, V>
where
    K: Ord,
{
    /// Constructs a new, empty `SplayMap<K, V>` ordered by `Ord`.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplayMap;
    ///
    /// let map: SplayMap<u32, u32> = SplayMap::new();
    /// ```
    pub fn new() -> Self {
        Self::with_comparator(compare::natural())
    }

    /// Constructs a new, empty `SplayMap<K, V>` ordered by `Ord` whose arena reserves `chunk_size`
    /// nodes at a time.
    ///
    /// # Panics
    ///
    /// Panics if `chunk_size` is zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplayMap;
    ///
    /// let map: SplayMap<u32, u32> = SplayMap::with_chunk_size(16);
    /// ```
    pub fn with_chunk_size(chunk_size: usize) -> Self {
        Self::with_comparator_and_chunk_size(compare::natural(), chunk_size)
    }
}

impl<K, V, C> SplayMap<K, V, C> {
    /// Constructs a new, empty map ordered by `cmp`.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplayMap;
    ///
    /// let mut map = SplayMap::with_comparator(|lhs: &u32, rhs: &u32| rhs.cmp(lhs));
    /// map.insert(1, 1);
    /// map.insert(2, 2);
    /// assert_eq!(map.min(), Some(&2));
    /// ```
    pub fn with_comparator(cmp: C) -> Self {
        Self::with_comparator_and_chunk_size(cmp, DEFAULT_CHUNK_SIZE)
    }

    /// Constructs a new, empty map ordered by `cmp` whose arena reserves `chunk_size` nodes at a
    /// time.
    ///
    /// # Panics
    ///
    /// Panics if `chunk_size` is zero.
    pub fn with_comparator_and_chunk_size(cmp: C, chunk_size: usize) -> Self {
        SplayMap {
            tree: Tree::new(cmp, chunk_size),
        }
    }

    /// Inserts a key-value pair into the map unless the key already exists, in which case the
    /// existing value is kept and the given pair is dropped. Either way the key is splayed to the
    /// root. Returns a mutable reference to the value stored under the key and whether the pair
    /// was inserted.
    ///
    /// # Panics
    ///
    /// Panics if storage for a new node cannot be allocated. See `try_insert`.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplayMap;
    ///
    /// let mut map = SplayMap::new();
    /// assert_eq!(map.insert(1, 1), (&mut 1, true));
    /// assert_eq!(map.insert(1, 2), (&mut 1, false));
    /// assert_eq!(map.get(&1), Some(&1));
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> (&mut V, bool)
    where
        C: Compare<K>,
    {
        match self.try_insert(key, value) {
            Ok(ret) => ret,
            Err(error) => panic!("Error: {}", error),
        }
    }

    /// Inserts a key-value pair into the map unless the key already exists. Behaves like `insert`
    /// but reports allocation failure as `Error::AllocationFailure`, leaving the map unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplayMap;
    ///
    /// let mut map = SplayMap::new();
    /// assert_eq!(map.try_insert(1, 1).unwrap(), (&mut 1, true));
    /// ```
    pub fn try_insert(&mut self, key: K, value: V) -> Result<(&mut V, bool)>
    where
        C: Compare<K>,
    {
        let (handle, inserted) = self.tree.insert(key, value)?;
        Ok((&mut self.tree.entry_mut(handle).value, inserted))
    }

    /// Looks up a key and splays it to the root of the tree. On a miss, the last node visited
    /// during the search is splayed instead, so nearby keys stay cheap to reach.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplayMap;
    ///
    /// let mut map = SplayMap::new();
    /// map.insert(1, 1);
    /// map.insert(2, 2);
    /// assert_eq!(map.find(&1), Some((&1, &mut 1)));
    /// assert_eq!(map.root(), Some((&1, &1)));
    /// assert_eq!(map.find(&3), None);
    /// ```
    pub fn find<Q>(&mut self, key: &Q) -> Option<(&K, &mut V)>
    where
        C: Compare<Q, K>,
        Q: ?Sized,
    {
        match self.tree.find(key) {
            Some(handle) => {
                let entry = self.tree.entry_mut(handle);
                Some((&entry.key, &mut entry.value))
            },
            None => None,
        }
    }

    /// Removes a key-value pair from the map. If the key exists in the map, it will return the
    /// associated key-value pair. Otherwise it will return `None`. The largest key smaller than
    /// the removed one becomes the root when it exists.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplayMap;
    ///
    /// let mut map = SplayMap::new();
    /// map.insert(1, 1);
    /// assert_eq!(map.remove(&1), Some((1, 1)));
    /// assert_eq!(map.remove(&1), None);
    /// ```
    pub fn remove<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        C: Compare<Q, K>,
        Q: ?Sized,
    {
        self.tree.erase(key).map(|Entry { key, value }| (key, value))
    }

    /// Checks if a key exists in the map. Note that `contains_key` does not splay the tree in
    /// order to use a non-mutable reference.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplayMap;
    ///
    /// let mut map = SplayMap::new();
    /// map.insert(1, 1);
    /// assert!(!map.contains_key(&0));
    /// assert!(map.contains_key(&1));
    /// ```
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        C: Compare<Q, K>,
        Q: ?Sized,
    {
        self.get(key).is_some()
    }

    /// Returns an immutable reference to the value associated with a particular key. It will
    /// return `None` if the key does not exist in the map. Note that `get` does not splay the tree
    /// in order to use a non-mutable reference.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplayMap;
    ///
    /// let mut map = SplayMap::new();
    /// map.insert(1, 1);
    /// assert_eq!(map.get(&0), None);
    /// assert_eq!(map.get(&1), Some(&1));
    /// ```
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        C: Compare<Q, K>,
        Q: ?Sized,
    {
        self.tree.get(key).map(|handle| &self.tree.entry(handle).value)
    }

    /// Returns a mutable reference to the value associated with a particular key, splaying the
    /// key to the root. Returns `None` if such a key does not exist.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplayMap;
    ///
    /// let mut map = SplayMap::new();
    /// map.insert(1, 1);
    /// *map.get_mut(&1).unwrap() = 2;
    /// assert_eq!(map.get(&1), Some(&2));
    /// ```
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        C: Compare<Q, K>,
        Q: ?Sized,
    {
        self.find(key).map(|(_, value)| value)
    }

    /// Returns the number of elements in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplayMap;
    ///
    /// let mut map = SplayMap::new();
    /// map.insert(1, 1);
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Returns `true` if the map is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplayMap;
    ///
    /// let map: SplayMap<u32, u32> = SplayMap::new();
    /// assert!(map.is_empty());
    /// ```
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clears the map, removing all values.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplayMap;
    ///
    /// let mut map = SplayMap::new();
    /// map.insert(1, 1);
    /// map.insert(2, 2);
    /// map.clear();
    /// assert_eq!(map.is_empty(), true);
    /// ```
    pub fn clear(&mut self) {
        self.tree.clear();
    }

    /// Returns a key in the map that is less than or equal to a particular key. Returns `None` if
    /// such a key does not exist. Note that `floor` does not splay the tree in order to use a
    /// non-mutable reference.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplayMap;
    ///
    /// let mut map = SplayMap::new();
    /// map.insert(1, 1);
    /// assert_eq!(map.floor(&0), None);
    /// assert_eq!(map.floor(&2), Some(&1));
    /// ```
    pub fn floor<Q>(&self, key: &Q) -> Option<&K>
    where
        C: Compare<Q, K>,
        Q: ?Sized,
    {
        self.tree
            .bound(key, Side::Left)
            .map(|handle| &self.tree.entry(handle).key)
    }

    /// Returns a key in the map that is greater than or equal to a particular key. Returns `None`
    /// if such a key does not exist. Note that `ceil` does not splay the tree in order to use a
    /// non-mutable reference.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplayMap;
    ///
    /// let mut map = SplayMap::new();
    /// map.insert(1, 1);
    /// assert_eq!(map.ceil(&0), Some(&1));
    /// assert_eq!(map.ceil(&2), None);
    /// ```
    pub fn ceil<Q>(&self, key: &Q) -> Option<&K>
    where
        C: Compare<Q, K>,
        Q: ?Sized,
    {
        self.tree
            .bound(key, Side::Right)
            .map(|handle| &self.tree.entry(handle).key)
    }

    /// Returns the minimum key of the map. Returns `None` if the map is empty. Note that `min`
    /// does not splay the tree in order to use a non-mutable reference.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplayMap;
    ///
    /// let mut map = SplayMap::new();
    /// map.insert(1, 1);
    /// map.insert(3, 3);
    /// assert_eq!(map.min(), Some(&1));
    /// ```
    pub fn min(&self) -> Option<&K> {
        self.tree
            .edge(Side::Left)
            .map(|handle| &self.tree.entry(handle).key)
    }

    /// Returns the maximum key of the map. Returns `None` if the map is empty. Note that `max`
    /// does not splay the tree in order to use a non-mutable reference.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplayMap;
    ///
    /// let mut map = SplayMap::new();
    /// map.insert(1, 1);
    /// map.insert(3, 3);
    /// assert_eq!(map.max(), Some(&3));
    /// ```
    pub fn max(&self) -> Option<&K> {
        self.tree
            .edge(Side::Right)
            .map(|handle| &self.tree.entry(handle).key)
    }

    fn splay_edge(&mut self, side: Side) -> Result<(&K, &mut V)> {
        let handle = self.tree.splay_edge(side)?;
        let entry = self.tree.entry_mut(handle);
        Ok((&entry.key, &mut entry.value))
    }

    /// Splays the minimum key to the root and returns its entry. Returns `Error::EmptyTree` if
    /// the map is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::{Error, SplayMap};
    ///
    /// let mut map = SplayMap::new();
    /// assert_eq!(map.first(), Err(Error::EmptyTree));
    /// map.insert(3, 3);
    /// map.insert(1, 1);
    /// assert_eq!(map.first(), Ok((&1, &mut 1)));
    /// ```
    pub fn first(&mut self) -> Result<(&K, &mut V)> {
        self.splay_edge(Side::Left)
    }

    /// Splays the maximum key to the root and returns its entry. Returns `Error::EmptyTree` if
    /// the map is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplayMap;
    ///
    /// let mut map = SplayMap::new();
    /// map.insert(3, 3);
    /// map.insert(1, 1);
    /// assert_eq!(map.last(), Ok((&3, &mut 3)));
    /// assert_eq!(map.root(), Some((&3, &3)));
    /// ```
    pub fn last(&mut self) -> Result<(&K, &mut V)> {
        self.splay_edge(Side::Right)
    }

    /// Removes and returns the entry with the minimum key.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplayMap;
    ///
    /// let mut map = SplayMap::new();
    /// map.insert(1, 1);
    /// map.insert(2, 2);
    /// assert_eq!(map.pop_first(), Some((1, 1)));
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn pop_first(&mut self) -> Option<(K, V)> {
        self.tree
            .pop_edge(Side::Left)
            .map(|Entry { key, value }| (key, value))
    }

    /// Removes and returns the entry with the maximum key.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplayMap;
    ///
    /// let mut map = SplayMap::new();
    /// map.insert(1, 1);
    /// map.insert(2, 2);
    /// assert_eq!(map.pop_last(), Some((2, 2)));
    /// assert_eq!(map.pop_last(), Some((1, 1)));
    /// assert_eq!(map.pop_last(), None);
    /// ```
    pub fn pop_last(&mut self) -> Option<(K, V)> {
        self.tree
            .pop_edge(Side::Right)
            .map(|Entry { key, value }| (key, value))
    }

    /// Returns the entry currently at the root of the tree, which is the most recently accessed
    /// entry.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplayMap;
    ///
    /// let mut map = SplayMap::new();
    /// assert_eq!(map.root(), None);
    /// map.insert(5, 5);
    /// map.insert(3, 3);
    /// assert_eq!(map.root(), Some((&3, &3)));
    /// ```
    pub fn root(&self) -> Option<(&K, &V)> {
        self.tree.root().map(|handle| {
            let entry = self.tree.entry(handle);
            (&entry.key, &entry.value)
        })
    }

    /// Returns the number of edges between the root and a particular key, or `None` if the key
    /// does not exist. Does not splay the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplayMap;
    ///
    /// let mut map = SplayMap::new();
    /// map.insert(1, 1);
    /// map.insert(2, 2);
    /// assert_eq!(map.depth(&2), Some(0));
    /// assert_eq!(map.depth(&1), Some(1));
    /// ```
    pub fn depth<Q>(&self, key: &Q) -> Option<usize>
    where
        C: Compare<Q, K>,
        Q: ?Sized,
    {
        self.tree.depth(key)
    }

    /// Returns the number of entries whose nodes have no children.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplayMap;
    ///
    /// let mut map = SplayMap::new();
    /// for key in &[1, 3, 2] {
    ///     map.insert(*key, ());
    /// }
    /// assert_eq!(map.leaf_count(), 2);
    /// ```
    pub fn leaf_count(&self) -> usize {
        self.tree.leaf_count()
    }

    /// Returns the number of edges on the longest path from the root to a leaf, or `None` if the
    /// map is empty.
    pub fn height(&self) -> Option<usize> {
        self.tree.height()
    }

    /// Returns every key in order together with its depth in the tree. The layout reflects the
    /// current shape of the tree and is meant for debugging.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplayMap;
    ///
    /// let mut map = SplayMap::new();
    /// map.insert(1, 1);
    /// map.insert(2, 2);
    /// assert_eq!(map.dump(), vec![(&1, 1), (&2, 0)]);
    /// ```
    pub fn dump(&self) -> Vec<(&K, usize)> {
        self.tree
            .in_order()
            .into_iter()
            .map(|(handle, depth)| (&self.tree.entry(handle).key, depth))
            .collect()
    }

    /// Checks that every child links back to its parent and that the root has no parent.
    pub fn check_parents(&self) -> Result<()> {
        self.tree.check_parents()
    }

    /// Checks that an in-order walk of the tree yields strictly increasing keys.
    pub fn check_order(&self) -> Result<()>
    where
        C: Compare<K>,
    {
        self.tree.check_order()
    }

    /// Runs every structural check: parent links, key order and size accounting.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplayMap;
    ///
    /// let mut map = SplayMap::new();
    /// for key in 0..100 {
    ///     map.insert(key, key);
    /// }
    /// map.remove(&50);
    /// assert_eq!(map.validate(), Ok(()));
    /// ```
    pub fn validate(&self) -> Result<()>
    where
        C: Compare<K>,
    {
        self.tree.check_parents()?;
        self.tree.check_order()?;
        self.tree.check_len()
    }

    /// Returns an iterator over the map. The iterator will yield key-value pairs using in-order
    /// traversal and does not splay the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplayMap;
    ///
    /// let mut map = SplayMap::new();
    /// map.insert(1, 1);
    /// map.insert(2, 2);
    ///
    /// let mut iterator = map.iter();
    /// assert_eq!(iterator.next(), Some((&1, &1)));
    /// assert_eq!(iterator.next(), Some((&2, &2)));
    /// assert_eq!(iterator.next(), None);
    /// ```
    pub fn iter(&self) -> SplayMapIter<K, V> {
        SplayMapIter {
            arena: self.tree.arena(),
            front: self.tree.edge(Side::Left),
            back: self.tree.edge(Side::Right),
            remaining: self.len(),
        }
    }

    /// Returns a mutable iterator over the map. The iterator will yield key-value pairs using
    /// in-order traversal. The traversal order is collected up front, which allocates two vectors
    /// proportional to the size of the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplayMap;
    ///
    /// let mut map = SplayMap::new();
    /// map.insert(1, 1);
    /// map.insert(2, 2);
    ///
    /// for (_, value) in &mut map {
    ///     *value += 1;
    /// }
    ///
    /// let mut iterator = map.iter_mut();
    /// assert_eq!(iterator.next(), Some((&1, &mut 2)));
    /// assert_eq!(iterator.next(), Some((&2, &mut 3)));
    /// assert_eq!(iterator.next(), None);
    /// ```
    pub fn iter_mut(&mut self) -> SplayMapIterMut<K, V> {
        SplayMapIterMut {
            entries: self.tree.entries_mut().into_iter(),
        }
    }
}

impl<K, V, C> IntoIterator for SplayMap<K, V, C> {
    type IntoIter = SplayMapIntoIter<K, V>;
    type Item = (K, V);

    fn into_iter(self) -> Self::IntoIter {
        SplayMapIntoIter {
            entries: self.tree.into_entries(),
        }
    }
}

impl<'a, K, V, C> IntoIterator for &'a SplayMap<K, V, C>
where
    K: 'a,
    V: 'a,
{
    type IntoIter = SplayMapIter<'a, K, V>;
    type Item = (&'a K, &'a V);

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V, C> IntoIterator for &'a mut SplayMap<K, V, C>
where
    K: 'a,
    V: 'a,
{
    type IntoIter = SplayMapIterMut<'a, K, V>;
    type Item = (&'a K, &'a mut V);

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

/// An owning iterator for `SplayMap<K, V, C>`.
///
/// This iterator traverses the elements of the map in-order and yields owned entries.
pub struct SplayMapIntoIter<K, V> {
    entries: IntoEntries<K, V>,
}

impl<K, V> Iterator for SplayMapIntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.entries.next().map(|Entry { key, value }| (key, value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.entries.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for SplayMapIntoIter<K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.entries.next_back().map(|Entry { key, value }| (key, value))
    }
}

impl<K, V> ExactSizeIterator for SplayMapIntoIter<K, V> {}

/// An iterator for `SplayMap<K, V, C>`.
///
/// This iterator traverses the elements of the map in-order by following parent links and yields
/// immutable references. It never splays the tree.
pub struct SplayMapIter<'a, K, V>
where
    K: 'a,
    V: 'a,
{
    arena: &'a Arena<K, V>,
    front: Option<Handle>,
    back: Option<Handle>,
    remaining: usize,
}

impl<'a, K, V> SplayMapIter<'a, K, V>
where
    K: 'a,
    V: 'a,
{
    fn advance(&mut self, side: Side) -> Option<(&'a K, &'a V)> {
        if self.remaining == 0 {
            return None;
        }
        let arena = self.arena;
        let cursor = match side {
            Side::Right => &mut self.front,
            Side::Left => &mut self.back,
        };
        let handle = cursor.take()?;
        *cursor = tree::step(arena, handle, side);
        self.remaining -= 1;
        let Entry { ref key, ref value } = arena[handle].entry;
        Some((key, value))
    }
}

impl<'a, K, V> Iterator for SplayMapIter<'a, K, V>
where
    K: 'a,
    V: 'a,
{
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.advance(Side::Right)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, K, V> DoubleEndedIterator for SplayMapIter<'a, K, V>
where
    K: 'a,
    V: 'a,
{
    fn next_back(&mut self) -> Option<Self::Item> {
        self.advance(Side::Left)
    }
}

impl<'a, K, V> ExactSizeIterator for SplayMapIter<'a, K, V>
where
    K: 'a,
    V: 'a,
{
}

/// A mutable iterator for `SplayMap<K, V, C>`.
///
/// This iterator traverses the elements of the map in-order and yields mutable references to the
/// values.
pub struct SplayMapIterMut<'a, K, V>
where
    K: 'a,
    V: 'a,
{
    entries: vec::IntoIter<&'a mut Entry<K, V>>,
}

impl<'a, K, V> Iterator for SplayMapIterMut<'a, K, V>
where
    K: 'a,
    V: 'a,
{
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        self.entries.next().map(|entry| {
            let Entry { key, value } = entry;
            (&*key, value)
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.entries.size_hint()
    }
}

impl<'a, K, V> DoubleEndedIterator for SplayMapIterMut<'a, K, V>
where
    K: 'a,
    V: 'a,
{
    fn next_back(&mut self) -> Option<Self::Item> {
        self.entries.next_back().map(|entry| {
            let Entry { key, value } = entry;
            (&*key, value)
        })
    }
}

impl<K, V> Default for SplayMap<K, V>
where
    K: Ord,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, C> Clone for SplayMap<K, V, C>
where
    K: Clone,
    V: Clone,
    C: Clone,
{
    fn clone(&self) -> Self {
        SplayMap {
            tree: self.tree.clone(),
        }
    }
}

impl<K, V, C> fmt::Debug for SplayMap<K, V, C>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, C> PartialEq for SplayMap<K, V, C>
where
    K: PartialEq,
    V: PartialEq,
{
    fn eq(&self, other: &SplayMap<K, V, C>) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<K, V, C> Eq for SplayMap<K, V, C>
where
    K: Eq,
    V: Eq,
{
}

impl<K, V, C> Extend<(K, V)> for SplayMap<K, V, C>
where
    C: Compare<K>,
{
    fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = (K, V)>,
    {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K, V, C> FromIterator<(K, V)> for SplayMap<K, V, C>
where
    C: Compare<K> + Default,
{
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let mut map = SplayMap::with_comparator(C::default());
        map.extend(iter);
        map
    }
}

impl<'a, K, V, C, Q> Index<&'a Q> for SplayMap<K, V, C>
where
    C: Compare<Q, K>,
    Q: ?Sized,
{
    type Output = V;

    fn index(&self, key: &Q) -> &Self::Output {
        self.get(key).expect("Error: key does not exist.")
    }
}

impl<'a, K, V, C, Q> IndexMut<&'a Q> for SplayMap<K, V, C>
where
    C: Compare<Q, K>,
    Q: ?Sized,
{
    fn index_mut(&mut self, key: &Q) -> &mut Self::Output {
        self.get_mut(key).expect("Error: key does not exist.")
    }
}

impl<K, V, C> Serialize for SplayMap<K, V, C>
where
    K: Serialize,
    V: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_map(self.iter())
    }
}

struct SplayMapVisitor<K, V, C> {
    marker: PhantomData<fn() -> SplayMap<K, V, C>>,
}

impl<'de, K, V, C> Visitor<'de> for SplayMapVisitor<K, V, C>
where
    K: Deserialize<'de>,
    V: Deserialize<'de>,
    C: Compare<K> + Default,
{
    type Value = SplayMap<K, V, C>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map")
    }

    fn visit_map<A>(self, mut access: A) -> result::Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut map = SplayMap::with_comparator(C::default());
        while let Some((key, value)) = access.next_entry()? {
            map.try_insert(key, value)
                .map_err(<A::Error as de::Error>::custom)?;
        }
        Ok(map)
    }
}

/// Deserializes a map. When the input repeats a key, the first occurrence wins.
impl<'de, K, V, C> Deserialize<'de> for SplayMap<K, V, C>
where
    K: Deserialize<'de>,
    V: Deserialize<'de>,
    C: Compare<K> + Default,
{
    fn deserialize<D>(deserializer: D) -> result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(SplayMapVisitor {
            marker: PhantomData,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::SplayMap;
    use crate::splay_tree::error::Error;
    use compare::{natural, Compare};
    use serde_test::{assert_tokens, Token};
    use std::cmp::Ordering;

    #[test]
    fn test_len_empty() {
        let map: SplayMap<u32, u32> = SplayMap::new();
        assert_eq!(map.len(), 0);
    }

    #[test]
    fn test_is_empty() {
        let map: SplayMap<u32, u32> = SplayMap::new();
        assert!(map.is_empty());
    }

    #[test]
    fn test_min_max_empty() {
        let map: SplayMap<u32, u32> = SplayMap::new();
        assert_eq!(map.min(), None);
        assert_eq!(map.max(), None);
    }

    #[test]
    fn test_first_last_empty() {
        let mut map: SplayMap<u32, u32> = SplayMap::new();
        assert_eq!(map.first(), Err(Error::EmptyTree));
        assert_eq!(map.last(), Err(Error::EmptyTree));
    }

    #[test]
    fn test_find_empty() {
        let mut map: SplayMap<u32, u32> = SplayMap::new();
        assert_eq!(map.find(&1), None);
        assert_eq!(map.len(), 0);
    }

    #[test]
    fn test_insert() {
        let mut map = SplayMap::new();
        assert_eq!(map.insert(1, 1), (&mut 1, true));
        assert!(map.contains_key(&1));
        assert_eq!(map.get(&1), Some(&1));
    }

    #[test]
    fn test_insert_existing() {
        let mut map = SplayMap::new();
        map.insert(1, 1);
        map.insert(2, 2);
        assert_eq!(map.insert(1, 3), (&mut 1, false));
        assert_eq!(map.get(&1), Some(&1));
        assert_eq!(map.len(), 2);
        assert_eq!(map.root(), Some((&1, &1)));
    }

    #[test]
    fn test_insert_returns_mutable_value() {
        let mut map = SplayMap::new();
        *map.insert(1, 1).0 += 10;
        assert_eq!(map[&1], 11);
    }

    #[test]
    fn test_remove() {
        let mut map = SplayMap::new();
        map.insert(1, 1);
        assert_eq!(map.remove(&1), Some((1, 1)));
        assert!(!map.contains_key(&1));
        assert_eq!(map.len(), 0);
    }

    #[test]
    fn test_min_max() {
        let mut map = SplayMap::new();
        map.insert(1, 1);
        map.insert(3, 3);
        map.insert(5, 5);

        assert_eq!(map.min(), Some(&1));
        assert_eq!(map.max(), Some(&5));
        assert_eq!(map.root(), Some((&5, &5)));
    }

    #[test]
    fn test_get_mut() {
        let mut map = SplayMap::new();
        map.insert(1, 1);
        map.insert(2, 2);
        {
            let value = map.get_mut(&1);
            *value.unwrap() = 3;
        }
        assert_eq!(map.get(&1), Some(&3));
        assert_eq!(map.root(), Some((&1, &3)));
    }

    #[test]
    fn test_index_mut() {
        let mut map = SplayMap::new();
        map.insert(1, 1);
        map[&1] = 4;
        assert_eq!(map[&1], 4);
    }

    #[test]
    #[should_panic]
    fn test_index_missing() {
        let map: SplayMap<u32, u32> = SplayMap::new();
        map[&1];
    }

    #[test]
    fn test_floor_ceil() {
        let mut map = SplayMap::new();
        map.insert(1, 1);
        map.insert(3, 3);
        map.insert(5, 5);

        assert_eq!(map.floor(&0), None);
        assert_eq!(map.floor(&2), Some(&1));
        assert_eq!(map.floor(&4), Some(&3));
        assert_eq!(map.floor(&6), Some(&5));

        assert_eq!(map.ceil(&0), Some(&1));
        assert_eq!(map.ceil(&2), Some(&3));
        assert_eq!(map.ceil(&4), Some(&5));
        assert_eq!(map.ceil(&6), None);
    }

    struct ByStr;

    impl Compare<String> for ByStr {
        fn compare(&self, lhs: &String, rhs: &String) -> Ordering {
            lhs.cmp(rhs)
        }
    }

    impl Compare<str, String> for ByStr {
        fn compare(&self, lhs: &str, rhs: &String) -> Ordering {
            lhs.cmp(rhs.as_str())
        }
    }

    #[test]
    fn test_borrowed_lookup() {
        let mut map = SplayMap::with_comparator(ByStr);
        map.insert(String::from("b"), 2);
        map.insert(String::from("a"), 1);
        assert_eq!(map.get("a"), Some(&1));
        assert_eq!(map.floor("c"), Some(&String::from("b")));
        assert_eq!(map.find("b"), Some((&String::from("b"), &mut 2)));
        assert_eq!(map.remove("a"), Some((String::from("a"), 1)));
        assert_eq!(map.validate(), Ok(()));
    }

    #[test]
    fn test_reversed_natural() {
        let mut map = SplayMap::with_comparator(natural().rev());
        for key in 0..5u32 {
            map.insert(key, key);
        }
        assert_eq!(map.min(), Some(&4));
        assert_eq!(map.pop_first(), Some((4, 4)));
        assert_eq!(
            map.iter().map(|(key, _)| *key).collect::<Vec<u32>>(),
            vec![3, 2, 1, 0],
        );
        assert_eq!(map.validate(), Ok(()));
    }

    #[test]
    fn test_try_insert_allocation_failure() {
        let mut map = SplayMap::<u64, u64>::with_chunk_size(usize::MAX);
        match map.try_insert(1, 1) {
            Err(Error::AllocationFailure(_)) => {},
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(map.len(), 0);
        assert_eq!(map.root(), None);
        assert_eq!(map.validate(), Ok(()));
    }

    #[test]
    #[should_panic]
    fn test_insert_allocation_failure() {
        let mut map = SplayMap::<u64, u64>::with_chunk_size(usize::MAX);
        map.insert(1, 1);
    }

    #[test]
    fn test_leaf_count() {
        let mut map = SplayMap::new();
        assert_eq!(map.leaf_count(), 0);
        for key in 0..10 {
            map.insert(key, key);
        }
        assert_eq!(map.leaf_count(), 1);
        map.find(&0);
        assert_eq!(map.leaf_count(), 4);
        assert_eq!(map.validate(), Ok(()));
    }

    #[test]
    fn test_custom_comparator() {
        let mut map = SplayMap::with_comparator(|lhs: &u32, rhs: &u32| rhs.cmp(lhs));
        map.insert(1, 1);
        map.insert(5, 5);
        map.insert(3, 3);

        assert_eq!(map.min(), Some(&5));
        assert_eq!(map.floor(&4), Some(&5));
        assert_eq!(
            map.iter().map(|(key, _)| *key).collect::<Vec<u32>>(),
            vec![5, 3, 1],
        );
        assert_eq!(map.validate(), Ok(()));
    }

    #[test]
    fn test_pop_first_last() {
        let mut map = SplayMap::with_chunk_size(2);
        map.insert(2, 2);
        map.insert(1, 1);
        map.insert(3, 3);
        assert_eq!(map.pop_first(), Some((1, 1)));
        assert_eq!(map.pop_last(), Some((3, 3)));
        assert_eq!(map.pop_last(), Some((2, 2)));
        assert_eq!(map.pop_first(), None);
        assert_eq!(map.validate(), Ok(()));
    }

    #[test]
    fn test_first_last_splay() {
        let mut map = SplayMap::new();
        for key in 0..10 {
            map.insert(key, key);
        }
        assert_eq!(map.first(), Ok((&0, &mut 0)));
        assert_eq!(map.root(), Some((&0, &0)));
        *map.last().unwrap().1 = 90;
        assert_eq!(map.root(), Some((&9, &90)));
    }

    #[test]
    fn test_dump_and_depth() {
        let mut map = SplayMap::new();
        map.insert(2, 2);
        map.insert(1, 1);
        map.insert(3, 3);
        assert_eq!(map.dump(), vec![(&1, 2), (&2, 1), (&3, 0)]);
        assert_eq!(map.depth(&1), Some(2));
        assert_eq!(map.depth(&4), None);
        assert_eq!(map.height(), Some(2));
    }

    #[test]
    fn test_into_iter() {
        let mut map = SplayMap::new();
        map.insert(1, 2);
        map.insert(5, 6);
        map.insert(3, 4);

        assert_eq!(
            map.into_iter().collect::<Vec<(u32, u32)>>(),
            vec![(1, 2), (3, 4), (5, 6)],
        );
    }

    #[test]
    fn test_into_iter_rev() {
        let mut map = SplayMap::new();
        map.insert(1, 2);
        map.insert(5, 6);
        map.insert(3, 4);

        assert_eq!(
            map.into_iter().rev().collect::<Vec<(u32, u32)>>(),
            vec![(5, 6), (3, 4), (1, 2)],
        );
    }

    #[test]
    fn test_iter() {
        let mut map = SplayMap::new();
        map.insert(1, 2);
        map.insert(5, 6);
        map.insert(3, 4);

        assert_eq!(
            map.iter().collect::<Vec<(&u32, &u32)>>(),
            vec![(&1, &2), (&3, &4), (&5, &6)],
        );
        assert_eq!(map.root(), Some((&3, &4)));
    }

    #[test]
    fn test_iter_double_ended() {
        let mut map = SplayMap::new();
        for key in 0..5 {
            map.insert(key, key);
        }

        let mut iterator = map.iter();
        assert_eq!(iterator.len(), 5);
        assert_eq!(iterator.next(), Some((&0, &0)));
        assert_eq!(iterator.next_back(), Some((&4, &4)));
        assert_eq!(iterator.next_back(), Some((&3, &3)));
        assert_eq!(iterator.next(), Some((&1, &1)));
        assert_eq!(iterator.len(), 1);
        assert_eq!(iterator.next(), Some((&2, &2)));
        assert_eq!(iterator.next_back(), None);
        assert_eq!(iterator.next(), None);
    }

    #[test]
    fn test_iter_mut() {
        let mut map = SplayMap::new();
        map.insert(1, 2);
        map.insert(5, 6);
        map.insert(3, 4);

        for (_, value) in &mut map {
            *value += 1;
        }

        assert_eq!(
            map.iter().collect::<Vec<(&u32, &u32)>>(),
            vec![(&1, &3), (&3, &5), (&5, &7)],
        );
    }

    #[test]
    fn test_clone() {
        let mut map = SplayMap::new();
        map.insert(1, 1);
        map.insert(2, 2);
        let copy = map.clone();
        map.remove(&1);
        map.insert(3, 3);

        assert_eq!(copy.iter().collect::<Vec<(&u32, &u32)>>(), vec![(&1, &1), (&2, &2)]);
        assert_eq!(copy.validate(), Ok(()));
        assert_ne!(map, copy);
    }

    #[test]
    fn test_eq_ignores_shape() {
        let mut left = SplayMap::new();
        let mut right = SplayMap::new();
        for key in 0..5 {
            left.insert(key, key);
            right.insert(4 - key, 4 - key);
        }
        assert_ne!(left.root(), right.root());
        assert_eq!(left, right);
    }

    #[test]
    fn test_from_iter_and_debug() {
        let map: SplayMap<u32, &str> = vec![(2, "b"), (1, "a")].into_iter().collect();
        assert_eq!(format!("{:?}", map), r#"{1: "a", 2: "b"}"#);
    }

    #[test]
    fn test_serde_tokens() {
        let mut map: SplayMap<u32, char> = SplayMap::new();
        map.insert(2, 'b');
        map.insert(1, 'a');

        assert_tokens(
            &map,
            &[
                Token::Map { len: Some(2) },
                Token::U32(1),
                Token::Char('a'),
                Token::U32(2),
                Token::Char('b'),
                Token::MapEnd,
            ],
        );
    }
}
