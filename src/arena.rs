//! Chunked, single-type allocator that hands out `Copy` handles.

use std::collections::TryReserveError;
use std::mem;
use std::ops::{Index, IndexMut};
use std::vec::Vec;

/// A handle to an object allocated in a `TypedArena<T>`.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Handle {
    chunk_index: usize,
    block_index: usize,
}

enum Block<T> {
    Occupied(T),
    Vacant(Option<Handle>),
}

/// A fast allocator for a single type of object.
///
/// Objects are addressed by `Handle`s, which are plain indices, so structures built on top of the
/// arena can hold any number of links to the same object without reference counting or unsafe
/// code. Freed blocks are threaded onto a free list and reused by later allocations. When every
/// chunk is full a new chunk of `chunk_size` blocks is reserved, so existing objects never move.
///
/// # Examples
///
/// ```
/// use splay_collections::arena::TypedArena;
///
/// let mut arena = TypedArena::new(1024);
///
/// let x = arena.allocate(1);
/// assert_eq!(arena[x], 1);
///
/// arena[x] += 1;
/// assert_eq!(arena[x], 2);
///
/// assert_eq!(arena.free(x), 2);
/// assert!(arena.is_empty());
/// ```
pub struct TypedArena<T> {
    head: Option<Handle>,
    chunks: Vec<Vec<Block<T>>>,
    chunk_size: usize,
    len: usize,
    capacity: usize,
}

impl<T> TypedArena<T> {
    fn is_valid_handle(&self, handle: Handle) -> bool {
        handle.chunk_index < self.chunks.len()
            && handle.block_index < self.chunks[handle.chunk_index].len()
    }

    /// Constructs a new, empty `TypedArena<T>` that reserves `chunk_size` objects at a time.
    ///
    /// # Panics
    ///
    /// Panics if `chunk_size` is zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::arena::TypedArena;
    ///
    /// let arena: TypedArena<u32> = TypedArena::new(1024);
    /// ```
    pub fn new(chunk_size: usize) -> Self {
        assert!(chunk_size > 0, "Error: chunk size must be positive.");
        TypedArena {
            head: None,
            chunks: Vec::new(),
            chunk_size,
            len: 0,
            capacity: 0,
        }
    }

    /// Allocates an object in the arena and returns its handle. Returns an error if a new chunk
    /// was needed and could not be reserved, in which case the arena is left unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::arena::TypedArena;
    ///
    /// let mut arena = TypedArena::new(1024);
    /// let x = arena.try_allocate(0).unwrap();
    /// assert_eq!(arena[x], 0);
    /// ```
    pub fn try_allocate(&mut self, value: T) -> Result<Handle, TryReserveError> {
        if self.len == self.capacity {
            let mut chunk = Vec::new();
            chunk.try_reserve_exact(self.chunk_size)?;
            self.chunks.try_reserve(1)?;
            self.chunks.push(chunk);
            self.capacity += self.chunk_size;
        }
        self.len += 1;

        match self.head.take() {
            None => {
                let chunk_count = self.chunks.len();
                let last_chunk = &mut self.chunks[chunk_count - 1];
                last_chunk.push(Block::Occupied(value));
                Ok(Handle {
                    chunk_index: chunk_count - 1,
                    block_index: last_chunk.len() - 1,
                })
            },
            Some(handle) => {
                let vacant_block = mem::replace(
                    &mut self.chunks[handle.chunk_index][handle.block_index],
                    Block::Occupied(value),
                );
                match vacant_block {
                    Block::Vacant(next_handle) => {
                        self.head = next_handle;
                        Ok(handle)
                    },
                    Block::Occupied(_) => panic!("Error: free list points to an occupied block."),
                }
            },
        }
    }

    /// Allocates an object in the arena and returns its handle.
    ///
    /// # Panics
    ///
    /// Panics if a new chunk could not be reserved.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::arena::TypedArena;
    ///
    /// let mut arena = TypedArena::new(1024);
    /// let x = arena.allocate(0);
    /// ```
    pub fn allocate(&mut self, value: T) -> Handle {
        match self.try_allocate(value) {
            Ok(handle) => handle,
            Err(error) => panic!("Error: arena allocation failed: {}", error),
        }
    }

    /// Deallocates an object in the arena and returns it.
    ///
    /// # Panics
    ///
    /// Panics if `handle` corresponds to an invalid or vacant block.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::arena::TypedArena;
    ///
    /// let mut arena = TypedArena::new(1024);
    /// let x = arena.allocate(0);
    /// assert_eq!(arena.free(x), 0);
    /// ```
    pub fn free(&mut self, handle: Handle) -> T {
        if !self.is_valid_handle(handle) {
            panic!("Error: attempting to free invalid block.");
        }
        let old_block = mem::replace(
            &mut self.chunks[handle.chunk_index][handle.block_index],
            Block::Vacant(self.head),
        );
        match old_block {
            Block::Vacant(next_handle) => {
                self.chunks[handle.chunk_index][handle.block_index] = Block::Vacant(next_handle);
                panic!("Error: attempting to free vacant block.");
            },
            Block::Occupied(value) => {
                self.len -= 1;
                self.head = Some(handle);
                value
            },
        }
    }

    /// Returns an immutable reference to an object in the arena, or `None` if the handle does not
    /// correspond to a live object.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::arena::TypedArena;
    ///
    /// let mut arena = TypedArena::new(1024);
    /// let x = arena.allocate(0);
    /// assert_eq!(arena.get(x), Some(&0));
    /// ```
    pub fn get(&self, handle: Handle) -> Option<&T> {
        if !self.is_valid_handle(handle) {
            return None;
        }
        match self.chunks[handle.chunk_index][handle.block_index] {
            Block::Occupied(ref value) => Some(value),
            Block::Vacant(_) => None,
        }
    }

    /// Returns a mutable reference to an object in the arena, or `None` if the handle does not
    /// correspond to a live object.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::arena::TypedArena;
    ///
    /// let mut arena = TypedArena::new(1024);
    /// let x = arena.allocate(0);
    /// assert_eq!(arena.get_mut(x), Some(&mut 0));
    /// ```
    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut T> {
        if !self.is_valid_handle(handle) {
            return None;
        }
        match self.chunks[handle.chunk_index][handle.block_index] {
            Block::Occupied(ref mut value) => Some(value),
            Block::Vacant(_) => None,
        }
    }

    /// Returns the number of live objects in the arena.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the arena holds no live objects.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of objects reserved per chunk.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Drops every object and releases all chunks.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::arena::TypedArena;
    ///
    /// let mut arena = TypedArena::new(2);
    /// arena.allocate(0);
    /// arena.allocate(1);
    /// arena.allocate(2);
    /// arena.clear();
    /// assert!(arena.is_empty());
    /// ```
    pub fn clear(&mut self) {
        self.head = None;
        self.chunks.clear();
        self.len = 0;
        self.capacity = 0;
    }

    /// Returns the position of `handle` in storage order, counting vacant blocks. Positions are
    /// dense, so they can index the vector returned by `slots_mut`.
    pub fn slot_index(&self, handle: Handle) -> usize {
        handle.chunk_index * self.chunk_size + handle.block_index
    }

    /// Returns a mutable reference to every live object, indexed by `slot_index`. Vacant blocks
    /// are `None`.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::arena::TypedArena;
    ///
    /// let mut arena = TypedArena::new(1);
    /// let x = arena.allocate(1);
    /// let y = arena.allocate(2);
    /// arena.free(x);
    ///
    /// let index = arena.slot_index(y);
    /// let mut slots = arena.slots_mut();
    /// assert_eq!(slots[0], None);
    /// **slots[index].as_mut().unwrap() += 1;
    /// assert_eq!(arena[y], 3);
    /// ```
    pub fn slots_mut(&mut self) -> Vec<Option<&mut T>> {
        // Every chunk but the last is filled before a new one is reserved.
        self.chunks
            .iter_mut()
            .flat_map(|chunk| chunk.iter_mut())
            .map(|block| match block {
                Block::Occupied(value) => Some(value),
                Block::Vacant(_) => None,
            })
            .collect()
    }

    /// Returns an iterator over the live objects and their handles in storage order.
    pub fn iter(&self) -> impl Iterator<Item = (Handle, &T)> {
        self.chunks.iter().enumerate().flat_map(|(chunk_index, chunk)| {
            chunk.iter().enumerate().filter_map(move |(block_index, block)| match block {
                Block::Occupied(value) => Some((
                    Handle {
                        chunk_index,
                        block_index,
                    },
                    value,
                )),
                Block::Vacant(_) => None,
            })
        })
    }

    /// Returns a mutable iterator over the live objects and their handles in storage order.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::arena::TypedArena;
    ///
    /// let mut arena = TypedArena::new(1024);
    /// let x = arena.allocate(1);
    /// let y = arena.allocate(2);
    /// for (_, value) in arena.iter_mut() {
    ///     *value *= 10;
    /// }
    /// assert_eq!((arena[x], arena[y]), (10, 20));
    /// ```
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Handle, &mut T)> {
        self.chunks.iter_mut().enumerate().flat_map(|(chunk_index, chunk)| {
            chunk.iter_mut().enumerate().filter_map(move |(block_index, block)| match block {
                Block::Occupied(value) => Some((
                    Handle {
                        chunk_index,
                        block_index,
                    },
                    value,
                )),
                Block::Vacant(_) => None,
            })
        })
    }
}

impl<T> Index<Handle> for TypedArena<T> {
    type Output = T;

    fn index(&self, handle: Handle) -> &Self::Output {
        self.get(handle).expect("Error: handle out of bounds.")
    }
}

impl<T> IndexMut<Handle> for TypedArena<T> {
    fn index_mut(&mut self, handle: Handle) -> &mut Self::Output {
        self.get_mut(handle).expect("Error: handle out of bounds.")
    }
}
