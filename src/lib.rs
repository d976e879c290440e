//! Ordered collections backed by an arena-allocated splay tree.
//!
//! # Examples
//!
//! ```
//! use splay_collections::splay_tree::SplayMap;
//!
//! let mut map = SplayMap::new();
//! for key in &[5, 3, 8, 1, 4] {
//!     map.insert(*key, ());
//! }
//!
//! assert_eq!(map.root(), Some((&4, &())));
//! assert_eq!(map.iter().map(|(key, _)| *key).collect::<Vec<_>>(), vec![1, 3, 4, 5, 8]);
//! ```

pub mod arena;
mod entry;
pub mod splay_tree;
