use crate::splay_tree::error::Result;
use crate::splay_tree::map::{SplayMap, SplayMapIntoIter, SplayMapIter};
use compare::{Compare, Natural};
use serde::de::{self, Deserialize, Deserializer, SeqAccess, Visitor};
use serde::ser::{Serialize, Serializer};
use std::fmt;
use std::iter::FromIterator;
use std::marker::PhantomData;
use std::result;

/// An ordered set implemented using a splay tree.
///
/// A splay tree is a self-adjusting binary search tree with the additional property that recently
/// accessed items are quick to access again. After each lookup, insertion or removal, the item
/// that was accessed is "splayed" to the root of the tree.
///
/// # Examples
///
/// ```
/// use splay_collections::splay_tree::SplaySet;
///
/// let mut set = SplaySet::new();
/// set.insert(0);
/// set.insert(3);
///
/// assert_eq!(set.len(), 2);
///
/// assert_eq!(set.min(), Some(&0));
/// assert_eq!(set.ceil(&2), Some(&3));
///
/// assert_eq!(set.remove(&0), Some(0));
/// assert_eq!(set.remove(&1), None);
/// ```
pub struct SplaySet<T, C = Natural<T>> {
    map: SplayMap<T, (), C>,
}

impl<T> SplaySet<T>
where
    T: Ord,
{
    /// Constructs a new, empty `SplaySet<T>` ordered by `Ord`.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplaySet;
    ///
    /// let set: SplaySet<u32> = SplaySet::new();
    /// ```
    pub fn new() -> Self {
        SplaySet {
            map: SplayMap::new(),
        }
    }
}

impl<T, C> SplaySet<T, C> {
    /// Constructs a new, empty set ordered by `cmp`.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplaySet;
    ///
    /// let mut set = SplaySet::with_comparator(|lhs: &u32, rhs: &u32| rhs.cmp(lhs));
    /// set.insert(1);
    /// set.insert(2);
    /// assert_eq!(set.iter().collect::<Vec<&u32>>(), vec![&2, &1]);
    /// ```
    pub fn with_comparator(cmp: C) -> Self {
        SplaySet {
            map: SplayMap::with_comparator(cmp),
        }
    }

    /// Inserts a key into the set unless it already exists. Returns `true` if the key was
    /// inserted. Either way the key is splayed to the root.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplaySet;
    ///
    /// let mut set = SplaySet::new();
    /// assert!(set.insert(1));
    /// assert!(!set.insert(1));
    /// assert!(set.contains(&1));
    /// ```
    pub fn insert(&mut self, key: T) -> bool
    where
        C: Compare<T>,
    {
        self.map.insert(key, ()).1
    }

    /// Inserts a key into the set, reporting allocation failure instead of panicking.
    pub fn try_insert(&mut self, key: T) -> Result<bool>
    where
        C: Compare<T>,
    {
        self.map.try_insert(key, ()).map(|(_, inserted)| inserted)
    }

    /// Looks up a key and splays it to the root. On a miss, the last node visited is splayed.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplaySet;
    ///
    /// let mut set = SplaySet::new();
    /// set.insert(1);
    /// set.insert(2);
    /// assert_eq!(set.find(&1), Some(&1));
    /// assert_eq!(set.find(&3), None);
    /// ```
    pub fn find<Q>(&mut self, key: &Q) -> Option<&T>
    where
        C: Compare<Q, T>,
        Q: ?Sized,
    {
        self.map.find(key).map(|(key, _)| key)
    }

    /// Removes a key from the set. If the key exists in the set, it will return the associated
    /// key. Otherwise it will return `None`.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplaySet;
    ///
    /// let mut set = SplaySet::new();
    /// set.insert(1);
    /// assert_eq!(set.remove(&1), Some(1));
    /// assert_eq!(set.remove(&1), None);
    /// ```
    pub fn remove<Q>(&mut self, key: &Q) -> Option<T>
    where
        C: Compare<Q, T>,
        Q: ?Sized,
    {
        self.map.remove(key).map(|pair| pair.0)
    }

    /// Checks if a key exists in the set. Note that `contains` does not splay the tree in order
    /// to use a non-mutable reference.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplaySet;
    ///
    /// let mut set = SplaySet::new();
    /// set.insert(1);
    /// assert!(!set.contains(&0));
    /// assert!(set.contains(&1));
    /// ```
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        C: Compare<Q, T>,
        Q: ?Sized,
    {
        self.map.contains_key(key)
    }

    /// Returns the number of elements in the set.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Clears the set, removing all values.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplaySet;
    ///
    /// let mut set = SplaySet::new();
    /// set.insert(1);
    /// set.insert(2);
    /// set.clear();
    /// assert_eq!(set.is_empty(), true);
    /// ```
    pub fn clear(&mut self) {
        self.map.clear();
    }

    /// Returns a key in the set that is less than or equal to a particular key. Returns `None` if
    /// such a key does not exist.
    pub fn floor<Q>(&self, key: &Q) -> Option<&T>
    where
        C: Compare<Q, T>,
        Q: ?Sized,
    {
        self.map.floor(key)
    }

    /// Returns a key in the set that is greater than or equal to a particular key. Returns `None`
    /// if such a key does not exist.
    pub fn ceil<Q>(&self, key: &Q) -> Option<&T>
    where
        C: Compare<Q, T>,
        Q: ?Sized,
    {
        self.map.ceil(key)
    }

    /// Returns the number of keys whose nodes have no children.
    pub fn leaf_count(&self) -> usize {
        self.map.leaf_count()
    }

    /// Returns the minimum key of the set without splaying.
    pub fn min(&self) -> Option<&T> {
        self.map.min()
    }

    /// Returns the maximum key of the set without splaying.
    pub fn max(&self) -> Option<&T> {
        self.map.max()
    }

    /// Splays the minimum key to the root and returns it, or `Error::EmptyTree`.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::{Error, SplaySet};
    ///
    /// let mut set = SplaySet::new();
    /// assert_eq!(set.first(), Err(Error::EmptyTree));
    /// set.insert(2);
    /// set.insert(1);
    /// assert_eq!(set.first(), Ok(&1));
    /// ```
    pub fn first(&mut self) -> Result<&T> {
        self.map.first().map(|(key, _)| key)
    }

    /// Splays the maximum key to the root and returns it, or `Error::EmptyTree`.
    pub fn last(&mut self) -> Result<&T> {
        self.map.last().map(|(key, _)| key)
    }

    /// Runs every structural check on the underlying tree.
    pub fn validate(&self) -> Result<()>
    where
        C: Compare<T>,
    {
        self.map.validate()
    }

    /// Returns an iterator over the set. The iterator will yield keys using in-order traversal.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplaySet;
    ///
    /// let mut set = SplaySet::new();
    /// set.insert(1);
    /// set.insert(2);
    ///
    /// let mut iterator = set.iter();
    /// assert_eq!(iterator.next(), Some(&1));
    /// assert_eq!(iterator.next(), Some(&2));
    /// assert_eq!(iterator.next(), None);
    /// ```
    pub fn iter(&self) -> SplaySetIter<T> {
        SplaySetIter {
            map_iter: self.map.iter(),
        }
    }
}

impl<T, C> IntoIterator for SplaySet<T, C> {
    type IntoIter = SplaySetIntoIter<T>;
    type Item = T;

    fn into_iter(self) -> Self::IntoIter {
        Self::IntoIter {
            map_iter: self.map.into_iter(),
        }
    }
}

impl<'a, T, C> IntoIterator for &'a SplaySet<T, C>
where
    T: 'a,
{
    type IntoIter = SplaySetIter<'a, T>;
    type Item = &'a T;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An owning iterator for `SplaySet<T, C>`.
///
/// This iterator traverses the elements of the set in-order and yields owned keys.
pub struct SplaySetIntoIter<T> {
    map_iter: SplayMapIntoIter<T, ()>,
}

impl<T> Iterator for SplaySetIntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.map_iter.next().map(|(key, _)| key)
    }
}

impl<T> DoubleEndedIterator for SplaySetIntoIter<T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.map_iter.next_back().map(|(key, _)| key)
    }
}

/// An iterator for `SplaySet<T, C>`.
///
/// This iterator traverses the elements of the set in-order and yields immutable references.
pub struct SplaySetIter<'a, T>
where
    T: 'a,
{
    map_iter: SplayMapIter<'a, T, ()>,
}

impl<'a, T> Iterator for SplaySetIter<'a, T>
where
    T: 'a,
{
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.map_iter.next().map(|(key, _)| key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.map_iter.size_hint()
    }
}

impl<'a, T> DoubleEndedIterator for SplaySetIter<'a, T>
where
    T: 'a,
{
    fn next_back(&mut self) -> Option<Self::Item> {
        self.map_iter.next_back().map(|(key, _)| key)
    }
}

impl<T> Default for SplaySet<T>
where
    T: Ord,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, C> Clone for SplaySet<T, C>
where
    T: Clone,
    C: Clone,
{
    fn clone(&self) -> Self {
        SplaySet {
            map: self.map.clone(),
        }
    }
}

impl<T, C> fmt::Debug for SplaySet<T, C>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T, C> PartialEq for SplaySet<T, C>
where
    T: PartialEq,
{
    fn eq(&self, other: &SplaySet<T, C>) -> bool {
        self.map == other.map
    }
}

impl<T, C> Eq for SplaySet<T, C> where T: Eq {}

impl<T, C> Extend<T> for SplaySet<T, C>
where
    C: Compare<T>,
{
    fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = T>,
    {
        self.map.extend(iter.into_iter().map(|key| (key, ())));
    }
}

impl<T, C> FromIterator<T> for SplaySet<T, C>
where
    C: Compare<T> + Default,
{
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let mut set = SplaySet::with_comparator(C::default());
        set.extend(iter);
        set
    }
}

impl<T, C> Serialize for SplaySet<T, C>
where
    T: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(self.iter())
    }
}

struct SplaySetVisitor<T, C> {
    marker: PhantomData<fn() -> SplaySet<T, C>>,
}

impl<'de, T, C> Visitor<'de> for SplaySetVisitor<T, C>
where
    T: Deserialize<'de>,
    C: Compare<T> + Default,
{
    type Value = SplaySet<T, C>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a sequence")
    }

    fn visit_seq<A>(self, mut access: A) -> result::Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut set = SplaySet::with_comparator(C::default());
        while let Some(key) = access.next_element()? {
            set.try_insert(key)
                .map_err(<A::Error as de::Error>::custom)?;
        }
        Ok(set)
    }
}

impl<'de, T, C> Deserialize<'de> for SplaySet<T, C>
where
    T: Deserialize<'de>,
    C: Compare<T> + Default,
{
    fn deserialize<D>(deserializer: D) -> result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_seq(SplaySetVisitor {
            marker: PhantomData,
        })
    }
}
