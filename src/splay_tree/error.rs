use std::collections::TryReserveError;
use std::result;
use thiserror::Error;

/// Errors reported by splay tree operations and integrity checks.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum Error {
    /// The operation needs at least one element.
    #[error("operation requires a non-empty tree")]
    EmptyTree,
    /// Storage for a new node could not be reserved.
    #[error("failed to allocate a tree node: {0}")]
    AllocationFailure(#[from] TryReserveError),
    /// A child does not link back to the node that owns it, or the root has a parent.
    #[error("node at depth {depth} has an inconsistent parent link")]
    ParentMismatch { depth: usize },
    /// An in-order neighbour is not strictly ordered before the node.
    #[error("node at depth {depth} violates the search tree ordering")]
    OrderViolation { depth: usize },
    /// The stored length disagrees with the number of reachable nodes.
    #[error("tree reports {expected} nodes but {actual} are reachable")]
    SizeMismatch { expected: usize, actual: usize },
}

pub type Result<T> = result::Result<T, Error>;
