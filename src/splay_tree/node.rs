use crate::arena::Handle;
use crate::entry::Entry;

/// Which child slot of a node.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// A struct representing an internal node of a splay tree.
///
/// `left` and `right` own their subtrees; `parent` is a back-reference used only to walk upwards.
pub struct Node<K, V> {
    pub entry: Entry<K, V>,
    pub left: Option<Handle>,
    pub right: Option<Handle>,
    pub parent: Option<Handle>,
}

impl<K, V> Node<K, V> {
    pub fn new(key: K, value: V) -> Self {
        Node {
            entry: Entry { key, value },
            left: None,
            right: None,
            parent: None,
        }
    }

    pub fn child(&self, side: Side) -> Option<Handle> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    pub fn child_mut(&mut self, side: Side) -> &mut Option<Handle> {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }
}
