//! Sentinel Red-Black Tree - Node Arena
//!
//! ## License
//!
//! Copyright (C) Microsoft Corporation. All rights reserved.
//!
//! SPDX-License-Identifier: BSD-2-Clause-Patent
//!
use alloc::vec::Vec;
use core::{fmt, ptr};

use crate::{Error, Result};

/// Index of a node slot in the arena.
pub(crate) type NodeId = usize;

/// The slot holding the sentinel. Every absent child or parent edge points here.
pub(crate) const SENTINEL: NodeId = 0;

/// The color of a node in a red-black tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Red,
    Black,
}

/// A single slot in the arena.
///
/// `key` is `None` for the sentinel and for released slots.
pub(crate) struct Node<K> {
    key: Option<K>,
    color: Color,
    parent: NodeId,
    left: NodeId,
    right: NodeId,
}

impl<K> Node<K> {
    fn sentinel() -> Self {
        Node { key: None, color: Color::Black, parent: SENTINEL, left: SENTINEL, right: SENTINEL }
    }

    fn new(key: K) -> Self {
        Node { key: Some(key), color: Color::Red, parent: SENTINEL, left: SENTINEL, right: SENTINEL }
    }
}

/// A growable arena for the nodes of a red-black tree.
///
/// Slot [SENTINEL] is created with the arena and is never released. Writes to its color or links are
/// ignored, which keeps it black and detached no matter what the tree algorithms do around it.
pub(crate) struct Storage<K> {
    /// The node slots, the sentinel first.
    nodes: Vec<Node<K>>,
    /// The number of live, keyed nodes.
    length: usize,
    /// Head of a linked list of released slots, chained through `right`. [SENTINEL] when empty.
    available: NodeId,
}

impl<K> Storage<K> {
    /// Create an arena with room for `capacity` nodes besides the sentinel.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut nodes = Vec::with_capacity(capacity + 1);
        nodes.push(Node::sentinel());
        Storage { nodes, length: 0, available: SENTINEL }
    }

    /// Get the number of live nodes, the sentinel excluded.
    pub fn len(&self) -> usize {
        self.length
    }

    /// Get the number of nodes the arena holds without reallocating, the sentinel excluded.
    pub fn capacity(&self) -> usize {
        self.nodes.capacity() - 1
    }

    /// Add a new red node with both children and the parent set to the sentinel.
    ///
    /// A released slot is reused before the arena grows.
    ///
    /// # Time Complexity
    ///
    /// O(1) amortized
    ///
    pub fn add(&mut self, key: K) -> NodeId {
        self.length += 1;
        if self.available != SENTINEL {
            let id = self.available;
            self.available = self.nodes[id].right;
            self.nodes[id] = Node::new(key);
            return id;
        }
        self.nodes.push(Node::new(key));
        self.nodes.len() - 1
    }

    /// Release a node, returning its key and putting the slot on the free list.
    ///
    /// The node's links are cleared but nothing that points at it is touched.
    ///
    /// # Time Complexity
    ///
    /// O(1)
    ///
    pub fn delete(&mut self, id: NodeId) -> Option<K> {
        if id == SENTINEL {
            return None;
        }
        let node = self.nodes.get_mut(id)?;
        let key = node.key.take()?;
        node.color = Color::Black;
        node.parent = SENTINEL;
        node.left = SENTINEL;
        node.right = self.available;
        self.available = id;
        self.length -= 1;
        Some(key)
    }

    /// Drop every released slot, leaving only the sentinel. Only valid once no live node remains.
    pub fn reset(&mut self) {
        debug_assert_eq!(self.length, 0);
        self.nodes.truncate(1);
        self.available = SENTINEL;
    }

    /// Gets the key stored in a node, failing for the sentinel.
    pub fn key<E>(&self, id: NodeId) -> Result<&K, E> {
        self.nodes.get(id).and_then(|n| n.key.as_ref()).ok_or(Error::SentinelKey)
    }

    pub fn color(&self, id: NodeId) -> Color {
        self.nodes[id].color
    }

    pub fn is_red(&self, id: NodeId) -> bool {
        self.color(id) == Color::Red
    }

    pub fn is_black(&self, id: NodeId) -> bool {
        self.color(id) == Color::Black
    }

    pub fn parent(&self, id: NodeId) -> NodeId {
        self.nodes[id].parent
    }

    pub fn left(&self, id: NodeId) -> NodeId {
        self.nodes[id].left
    }

    pub fn right(&self, id: NodeId) -> NodeId {
        self.nodes[id].right
    }

    pub fn set_color(&mut self, id: NodeId, color: Color) {
        if id != SENTINEL {
            self.nodes[id].color = color;
        }
    }

    pub fn set_red(&mut self, id: NodeId) {
        self.set_color(id, Color::Red);
    }

    pub fn set_black(&mut self, id: NodeId) {
        self.set_color(id, Color::Black);
    }

    pub fn set_parent(&mut self, id: NodeId, parent: NodeId) {
        if id != SENTINEL {
            self.nodes[id].parent = parent;
        }
    }

    pub fn set_left(&mut self, id: NodeId, left: NodeId) {
        if id != SENTINEL {
            self.nodes[id].left = left;
        }
    }

    pub fn set_right(&mut self, id: NodeId, right: NodeId) {
        if id != SENTINEL {
            self.nodes[id].right = right;
        }
    }

    /// Walks left from `id` to the smallest node of its subtree.
    pub fn minimum(&self, mut id: NodeId) -> NodeId {
        if id == SENTINEL {
            return SENTINEL;
        }
        while self.left(id) != SENTINEL {
            id = self.left(id);
        }
        id
    }

    /// Walks right from `id` to the largest node of its subtree.
    pub fn maximum(&self, mut id: NodeId) -> NodeId {
        if id == SENTINEL {
            return SENTINEL;
        }
        while self.right(id) != SENTINEL {
            id = self.right(id);
        }
        id
    }

    /// Returns the in-order successor of `id`, or the sentinel for the largest node.
    pub fn successor(&self, id: NodeId) -> NodeId {
        if id == SENTINEL {
            return SENTINEL;
        }
        if self.right(id) != SENTINEL {
            return self.minimum(self.right(id));
        }
        let mut current = id;
        let mut parent = self.parent(current);
        while parent != SENTINEL && current == self.right(parent) {
            current = parent;
            parent = self.parent(current);
        }
        parent
    }
}

/// A read-only handle to one node of an [RbTree](crate::RbTree), possibly the sentinel.
///
/// [find](crate::RbTree::find) hands out the sentinel handle when a key is absent, so check
/// [is_sentinel](Self::is_sentinel) (or use [key](Self::key), which fails on the sentinel) before relying
/// on the key.
pub struct NodeRef<'a, K> {
    storage: &'a Storage<K>,
    id: NodeId,
}

impl<'a, K> NodeRef<'a, K> {
    pub(crate) fn new(storage: &'a Storage<K>, id: NodeId) -> Self {
        NodeRef { storage, id }
    }

    #[cfg(test)]
    pub(crate) fn id(&self) -> NodeId {
        self.id
    }

    fn at(&self, id: NodeId) -> Self {
        NodeRef { storage: self.storage, id }
    }

    /// Indicates whether this handle is the sentinel, i.e. "no node".
    pub fn is_sentinel(&self) -> bool {
        self.id == SENTINEL
    }

    /// Returns the node's key.
    ///
    /// # Errors
    ///
    /// Returns [SentinelKey](Error::SentinelKey) if this is the sentinel.
    pub fn key(&self) -> Result<&'a K> {
        self.storage.key(self.id)
    }

    pub fn color(&self) -> Color {
        self.storage.color(self.id)
    }

    pub fn is_red(&self) -> bool {
        self.storage.is_red(self.id)
    }

    /// Indicates whether the node is black. Always true for the sentinel.
    pub fn is_black(&self) -> bool {
        self.storage.is_black(self.id)
    }

    /// Returns the left child, the sentinel handle if there is none.
    pub fn left(&self) -> Self {
        self.at(self.storage.left(self.id))
    }

    /// Returns the right child, the sentinel handle if there is none.
    pub fn right(&self) -> Self {
        self.at(self.storage.right(self.id))
    }

    /// Returns the parent, the sentinel handle for the root.
    pub fn parent(&self) -> Self {
        self.at(self.storage.parent(self.id))
    }

    /// Indicates whether this is a real node without a parent.
    pub fn is_root(&self) -> bool {
        !self.is_sentinel() && self.storage.parent(self.id) == SENTINEL
    }

    pub fn is_left_child(&self) -> bool {
        let parent = self.storage.parent(self.id);
        !self.is_sentinel() && parent != SENTINEL && self.storage.left(parent) == self.id
    }

    pub fn is_right_child(&self) -> bool {
        let parent = self.storage.parent(self.id);
        !self.is_sentinel() && parent != SENTINEL && self.storage.right(parent) == self.id
    }
}

impl<K> Clone for NodeRef<'_, K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K> Copy for NodeRef<'_, K> {}

impl<K> PartialEq for NodeRef<'_, K> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.storage, other.storage) && self.id == other.id
    }
}

impl<K> Eq for NodeRef<'_, K> {}

impl<K: fmt::Debug> fmt::Debug for NodeRef<'_, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.storage.key::<core::convert::Infallible>(self.id) {
            Ok(key) => f.debug_struct("NodeRef").field("key", key).field("color", &self.color()).finish(),
            Err(_) => write!(f, "NodeRef(sentinel)"),
        }
    }
}
