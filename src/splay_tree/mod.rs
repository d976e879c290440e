//! Self-adjusting binary search tree with the additional property that recently accessed elements
//! are quick to access again.
//!
//! Nodes are stored in a `TypedArena` and linked by handle: each node owns its two children and
//! keeps a back-reference to its parent, which lets the tree splay bottom-up and iterate in order
//! without an auxiliary stack.

mod error;
mod map;
mod node;
mod set;
mod tree;

pub use compare::{natural, Compare, Natural};
pub use self::error::{Error, Result};
pub use self::map::{
    SplayMap, SplayMapIntoIter, SplayMapIter, SplayMapIterMut, DEFAULT_CHUNK_SIZE,
};
pub use self::set::{SplaySet, SplaySetIntoIter, SplaySetIter};
