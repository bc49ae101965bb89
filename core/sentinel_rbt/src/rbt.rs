//! Sentinel Red-Black Tree - Tree Container
//!
//! ## License
//!
//! Copyright (C) Microsoft Corporation. All rights reserved.
//!
//! SPDX-License-Identifier: BSD-2-Clause-Patent
//!
use alloc::boxed::Box;
use core::fmt;

use crate::{
    Error, Iter, NodeRef, RbTreeEvent, RbTreeObserver, Result, Rotation, Violation,
    compare::{Comparator, NaturalOrder},
    node::{NodeId, SENTINEL, Storage},
};

/// A red-black tree ordered by the comparator `C`.
///
/// Every absent child or parent edge points at a shared sentinel node that is always black and holds no
/// key. Keys that compare equal are all kept; a new key equal to an existing one is placed in that key's
/// right subtree.
pub struct RbTree<K, C = NaturalOrder> {
    storage: Storage<K>,
    root: NodeId,
    comparator: C,
    observer: Option<Box<dyn RbTreeObserver<K, C>>>,
}

impl<K> RbTree<K, NaturalOrder> {
    /// Creates an empty tree ordered by [PartialOrd].
    pub fn new() -> Self {
        Self::with_comparator(NaturalOrder)
    }

    /// Creates an empty tree ordered by [PartialOrd], with room for `capacity` keys.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_comparator(capacity, NaturalOrder)
    }
}

impl<K, C> RbTree<K, C> {
    /// Creates an empty tree ordered by `comparator`.
    pub fn with_comparator(comparator: C) -> Self {
        Self::with_capacity_and_comparator(0, comparator)
    }

    /// Creates an empty tree ordered by `comparator`, with room for `capacity` keys.
    pub fn with_capacity_and_comparator(capacity: usize, comparator: C) -> Self {
        RbTree { storage: Storage::with_capacity(capacity), root: SENTINEL, comparator, observer: None }
    }

    /// Installs `observer` and returns the tree, for use while building.
    pub fn with_observer(mut self, observer: Box<dyn RbTreeObserver<K, C>>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Installs `observer`, returning the one it replaces.
    pub fn set_observer(&mut self, observer: Box<dyn RbTreeObserver<K, C>>) -> Option<Box<dyn RbTreeObserver<K, C>>> {
        self.observer.replace(observer)
    }

    /// Removes and returns the installed observer.
    pub fn take_observer(&mut self) -> Option<Box<dyn RbTreeObserver<K, C>>> {
        self.observer.take()
    }

    pub fn comparator(&self) -> &C {
        &self.comparator
    }

    /// Returns the number of keys in the tree.
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    /// Indicates whether the tree is empty.
    pub fn is_empty(&self) -> bool {
        self.root == SENTINEL
    }

    /// Returns the number of keys the tree can hold before its storage reallocates.
    pub fn capacity(&self) -> usize {
        self.storage.capacity()
    }

    /// Returns a handle to the root, the sentinel handle when the tree is empty.
    pub fn root(&self) -> NodeRef<'_, K> {
        NodeRef::new(&self.storage, self.root)
    }

    /// Returns a handle to the sentinel.
    pub fn sentinel(&self) -> NodeRef<'_, K> {
        NodeRef::new(&self.storage, SENTINEL)
    }

    /// Returns the number of nodes on the longest path from the root down to the sentinel.
    ///
    /// # Time Complexity
    ///
    /// O(n)
    ///
    pub fn height(&self) -> usize {
        self.subtree_height(self.root)
    }

    fn subtree_height(&self, id: NodeId) -> usize {
        if id == SENTINEL {
            return 0;
        }
        1 + core::cmp::max(self.subtree_height(self.storage.left(id)), self.subtree_height(self.storage.right(id)))
    }

    /// Returns the number of black nodes on the leftmost path from the root down to the sentinel, the root
    /// included and the sentinel excluded. In a valid tree every such path has the same count.
    ///
    /// # Time Complexity
    ///
    /// O(log n) for a balanced tree.
    ///
    pub fn black_height(&self) -> usize {
        let mut height = 0;
        let mut current = self.root;
        while current != SENTINEL {
            if self.storage.is_black(current) {
                height += 1;
            }
            current = self.storage.left(current);
        }
        height
    }

    /// Returns the smallest key, or `None` if the tree is empty.
    pub fn first(&self) -> Option<&K> {
        self.storage.key::<core::convert::Infallible>(self.storage.minimum(self.root)).ok()
    }

    /// Returns the largest key, or `None` if the tree is empty.
    pub fn last(&self) -> Option<&K> {
        self.storage.key::<core::convert::Infallible>(self.storage.maximum(self.root)).ok()
    }

    /// Returns an iterator over the keys in order. Equal keys come out in insertion order.
    pub fn iter(&self) -> Iter<'_, K> {
        Iter::new(&self.storage, self.root)
    }

    /// Releases every key, children before their parents. The sentinel is kept, so the tree can be reused.
    ///
    /// # Time Complexity
    ///
    /// O(n)
    ///
    pub fn clear(&mut self) {
        let released = self.detach(self.root);
        self.storage.reset();
        log::debug!("rbt: released {} nodes", released);
    }

    /// Unlinks `node` from its parent and releases it together with its whole subtree, post-order.
    ///
    /// This does no rebalancing at all. Detaching anything but the root leaves the tree violating the
    /// red-black invariants, which is why it is not part of the public interface.
    pub(crate) fn detach(&mut self, node: NodeId) -> usize {
        if node == SENTINEL {
            return 0;
        }
        let parent = self.storage.parent(node);
        if parent == SENTINEL {
            self.root = SENTINEL;
        } else if self.storage.left(parent) == node {
            self.storage.set_left(parent, SENTINEL);
        } else {
            self.storage.set_right(parent, SENTINEL);
        }
        self.release_subtree(node)
    }

    /// Recursion depth is bounded by the height of the subtree.
    fn release_subtree(&mut self, node: NodeId) -> usize {
        if node == SENTINEL {
            return 0;
        }
        let (left, right) = (self.storage.left(node), self.storage.right(node));
        let released = self.release_subtree(left) + self.release_subtree(right);
        drop(self.storage.delete(node));
        released + 1
    }

    /// Restores the red-black properties after `node` was linked in as a red leaf.
    ///
    /// Each step hands back the node to continue from, which is two levels higher after a recolor, so a
    /// red-red violation keeps being chased up the tree until the parent of the current node is black.
    fn rebalance<E>(&mut self, mut node: NodeId) -> Result<(), E> {
        while self.storage.is_red(self.storage.parent(node)) {
            node = self.fixup_step::<E>(node)?;
        }
        self.storage.set_black(self.root);
        Ok(())
    }

    /// Resolves one red-red violation between `node` and its parent, returning the node to examine next.
    fn fixup_step<E>(&mut self, node: NodeId) -> Result<NodeId, E> {
        let dad = self.storage.parent(node);
        let grandpa = self.storage.parent(dad);
        let dad_is_left = dad == self.storage.left(grandpa);
        let uncle = if dad_is_left { self.storage.right(grandpa) } else { self.storage.left(grandpa) };

        // Red uncle: push the red up to the grandparent and continue from there.
        if self.storage.is_red(uncle) {
            log::trace!("rbt fixup: red uncle, recoloring at node {}", grandpa);
            self.storage.set_black(uncle);
            self.storage.set_black(dad);
            self.storage.set_red(grandpa);
            self.notify(RbTreeEvent::AfterRecolor, node);
            return Ok(grandpa);
        }

        let mut node = node;
        if dad_is_left {
            // Inner child, turn it into an outer one first.
            if node == self.storage.right(dad) {
                node = dad;
                self.rotate_left::<E>(node)?;
            }
            let dad = self.storage.parent(node);
            let grandpa = self.storage.parent(dad);
            log::trace!("rbt fixup: black uncle, rotating right at node {}", grandpa);
            self.storage.set_black(dad);
            self.storage.set_red(grandpa);
            self.rotate_right::<E>(grandpa)?;
            self.notify(RbTreeEvent::AfterRecolorRotateRight, node);
        } else {
            if node == self.storage.left(dad) {
                node = dad;
                self.rotate_right::<E>(node)?;
            }
            let dad = self.storage.parent(node);
            let grandpa = self.storage.parent(dad);
            log::trace!("rbt fixup: black uncle, rotating left at node {}", grandpa);
            self.storage.set_black(dad);
            self.storage.set_red(grandpa);
            self.rotate_left::<E>(grandpa)?;
            self.notify(RbTreeEvent::AfterRecolorRotateLeft, node);
        }
        Ok(node)
    }

    /// Rotates the subtree at `node` to the left, promoting its right child into its place.
    ///
    /// Colors are untouched and the in-order sequence of keys is preserved.
    ///
    /// # Errors
    ///
    /// Returns [InvalidRotation](Error::InvalidRotation) if `node` has no right child.
    fn rotate_left<E>(&mut self, node: NodeId) -> Result<(), E> {
        let right = self.storage.right(node);
        if node == SENTINEL || right == SENTINEL {
            log::error!("rbt: can't rotate node {} left since the right child is nil", node);
            return Err(Error::InvalidRotation(Rotation::Left));
        }

        let parent = self.storage.parent(node);
        if parent == SENTINEL {
            self.root = right;
        } else if node == self.storage.left(parent) {
            self.storage.set_left(parent, right);
        } else {
            self.storage.set_right(parent, right);
        }
        self.storage.set_parent(right, parent);

        let inner = self.storage.left(right);
        self.storage.set_right(node, inner);
        self.storage.set_parent(inner, node);

        self.storage.set_left(right, node);
        self.storage.set_parent(node, right);

        log::trace!("rbt: rotated node {} left", node);
        self.notify(RbTreeEvent::AfterLeftRotation, node);
        Ok(())
    }

    /// Rotates the subtree at `node` to the right, promoting its left child into its place.
    ///
    /// Colors are untouched and the in-order sequence of keys is preserved.
    ///
    /// # Errors
    ///
    /// Returns [InvalidRotation](Error::InvalidRotation) if `node` has no left child.
    fn rotate_right<E>(&mut self, node: NodeId) -> Result<(), E> {
        let left = self.storage.left(node);
        if node == SENTINEL || left == SENTINEL {
            log::error!("rbt: can't rotate node {} right since the left child is nil", node);
            return Err(Error::InvalidRotation(Rotation::Right));
        }

        let parent = self.storage.parent(node);
        if parent == SENTINEL {
            self.root = left;
        } else if node == self.storage.left(parent) {
            self.storage.set_left(parent, left);
        } else {
            self.storage.set_right(parent, left);
        }
        self.storage.set_parent(left, parent);

        let inner = self.storage.right(left);
        self.storage.set_left(node, inner);
        self.storage.set_parent(inner, node);

        self.storage.set_right(left, node);
        self.storage.set_parent(node, left);

        log::trace!("rbt: rotated node {} right", node);
        self.notify(RbTreeEvent::AfterRightRotation, node);
        Ok(())
    }

    /// Reports a checkpoint to the observer, if one is installed.
    fn notify(&mut self, event: RbTreeEvent, node: NodeId) {
        if let Some(mut observer) = self.observer.take() {
            observer.on_event(event, self, NodeRef::new(&self.storage, node));
            self.observer = Some(observer);
        }
    }

    fn verify_subtree<E>(&self, node: NodeId, count: &mut usize) -> Result<usize, E> {
        if node == SENTINEL {
            return Ok(0);
        }
        *count += 1;
        if *count > self.len() {
            return Err(Error::Corrupted(Violation::LengthMismatch));
        }

        let (left, right) = (self.storage.left(node), self.storage.right(node));
        for child in [left, right] {
            if child != SENTINEL && self.storage.parent(child) != node {
                return Err(Error::Corrupted(Violation::BrokenParentLink));
            }
        }
        if self.storage.is_red(node) && (self.storage.is_red(left) || self.storage.is_red(right)) {
            return Err(Error::Corrupted(Violation::RedRedEdge));
        }

        let left_height = self.verify_subtree::<E>(left, count)?;
        let right_height = self.verify_subtree::<E>(right, count)?;
        if left_height != right_height {
            return Err(Error::Corrupted(Violation::BlackHeightMismatch));
        }
        Ok(left_height + usize::from(self.storage.is_black(node)))
    }
}

impl<K, C> RbTree<K, C>
where
    C: Comparator<K>,
{
    fn less(&self, a: &K, b: &K) -> Result<bool, C::Error> {
        self.comparator.less(a, b).map_err(Error::Compare)
    }

    /// Inserts a key and rebalances the tree. Keys equal to one already present are accepted.
    ///
    /// # Time Complexity
    ///
    /// O(log n)
    ///
    /// # Errors
    ///
    /// Returns [Compare](Error::Compare) if the comparator fails, in which case the tree is unchanged.
    ///
    pub fn insert(&mut self, key: K) -> Result<(), C::Error> {
        let node = self.insert_bst(key)?;
        self.notify(RbTreeEvent::AfterBstInsert, node);

        self.rebalance::<C::Error>(node)?;
        self.notify(RbTreeEvent::AfterInsert, node);
        Ok(())
    }

    /// Inserts every key from `keys` in order, stopping at the first failure.
    ///
    /// # Time Complexity
    ///
    /// O(m log n), where m is the number of keys to insert.
    ///
    pub fn insert_many<I>(&mut self, keys: I) -> Result<(), C::Error>
    where
        I: IntoIterator<Item = K>,
    {
        for key in keys {
            self.insert(key)?;
        }
        Ok(())
    }

    /// Links a new red leaf holding `key` below the last node visited on the search path.
    ///
    /// All comparisons happen before anything is allocated, so a failing comparator leaves the tree intact.
    fn insert_bst(&mut self, key: K) -> Result<NodeId, C::Error> {
        let mut parent = SENTINEL;
        let mut current = self.root;
        let mut go_left = false;
        while current != SENTINEL {
            parent = current;
            go_left = self.less(&key, self.storage.key::<C::Error>(current)?)?;
            current = if go_left { self.storage.left(current) } else { self.storage.right(current) };
        }

        let node = self.storage.add(key);
        self.storage.set_parent(node, parent);
        if parent == SENTINEL {
            self.root = node;
        } else if go_left {
            self.storage.set_left(parent, node);
        } else {
            self.storage.set_right(parent, node);
        }
        Ok(node)
    }

    /// Searches for a node holding a key equal to `key`.
    ///
    /// Returns the handle of the first equal node on the search path, or the [sentinel](Self::sentinel)
    /// handle if there is none.
    ///
    /// # Time Complexity
    ///
    /// O(log n)
    ///
    pub fn find(&self, key: &K) -> Result<NodeRef<'_, K>, C::Error> {
        let mut current = self.root;
        while current != SENTINEL {
            let current_key = self.storage.key::<C::Error>(current)?;
            if self.less(key, current_key)? {
                current = self.storage.left(current);
            } else if self.less(current_key, key)? {
                current = self.storage.right(current);
            } else {
                break;
            }
        }
        Ok(NodeRef::new(&self.storage, current))
    }

    /// Searches for a key equal to `key`, returning the stored key if there is one.
    pub fn get(&self, key: &K) -> Result<Option<&K>, C::Error> {
        Ok(self.find(key)?.key().ok())
    }

    /// Indicates whether a key equal to `key` is stored in the tree.
    pub fn contains(&self, key: &K) -> Result<bool, C::Error> {
        Ok(!self.find(key)?.is_sentinel())
    }

    /// Walks the whole tree, checking every red-black invariant, and returns the black-height.
    ///
    /// Checks that the sentinel and the root are black, that no red node has a red child, that all paths
    /// to the sentinel carry the same number of black nodes, that children link back to their parents,
    /// and that an in-order walk never goes backwards under the comparator.
    ///
    /// # Errors
    ///
    /// Returns [Corrupted](Error::Corrupted) with the first violation found.
    ///
    pub fn verify(&self) -> Result<usize, C::Error> {
        if self.storage.is_red(SENTINEL) {
            return Err(Error::Corrupted(Violation::RedSentinel));
        }
        if self.root != SENTINEL {
            if self.storage.is_red(self.root) {
                return Err(Error::Corrupted(Violation::RedRoot));
            }
            if self.storage.parent(self.root) != SENTINEL {
                return Err(Error::Corrupted(Violation::RootHasParent));
            }
        }

        let mut count = 0;
        let black_height = self.verify_subtree::<C::Error>(self.root, &mut count)?;
        if count != self.len() {
            return Err(Error::Corrupted(Violation::LengthMismatch));
        }

        let mut keys = self.iter();
        if let Some(mut previous) = keys.next() {
            for key in keys {
                if self.less(key, previous)? {
                    return Err(Error::Corrupted(Violation::OutOfOrder));
                }
                previous = key;
            }
        }
        Ok(black_height)
    }
}

impl<K, C: Default> Default for RbTree<K, C> {
    fn default() -> Self {
        Self::with_comparator(C::default())
    }
}

impl<K, C> Drop for RbTree<K, C> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<'a, K, C> IntoIterator for &'a RbTree<K, C> {
    type Item = &'a K;
    type IntoIter = Iter<'a, K>;

    fn into_iter(self) -> Iter<'a, K> {
        self.iter()
    }
}

impl<K, C> fmt::Debug for RbTree<K, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RbTree")
            .field("len", &self.len())
            .field("height", &self.height())
            .field("black_height", &self.black_height())
            .finish()
    }
}
