//! A `no_std` red-black tree whose absent edges all point at a single, permanently black sentinel node.
//!
//! Nodes live in an index arena owned by the tree. Child links own their targets structurally while the
//! parent link is a plain back-reference that is rewritten every time a child link changes. Slot zero of
//! the arena is the sentinel: it carries no key, it is always [Black](Color::Black), and its links are
//! never written, so the insertion fixup can read the color of any relative without a presence check.
//!
//! The tree supports construction, insertion, lookup, in-order iteration and whole-tree teardown. There is
//! no deletion. Keys that compare equal are all kept, each new one landing in the right subtree of the
//! first equal key met on the way down.
//!
//! Ordering comes from a [Comparator]. [NaturalOrder] is the default, any `Fn(&K, &K) -> bool` closure
//! works as well, and [Fallible] lets a comparator report an error that is handed back to the caller
//! unchanged as [Error::Compare].
//!
//! An optional [RbTreeObserver] can be installed to watch the intermediate states of an insertion. It
//! is purely diagnostic; [LogObserver] forwards every checkpoint to the `log` facade.
//!
//! ## Examples
//!
//! ```rust
//! use sentinel_rbt::RbTree;
//!
//! let mut tree: RbTree<i32> = RbTree::new();
//! tree.insert_many([10, 9, 20, -7, 4, 1, 0, 5, -2, 12, 6, 15, -21, 25, 8]).unwrap();
//!
//! let node = tree.find(&20).unwrap();
//! assert!(!node.is_sentinel());
//! assert_eq!(node.key(), Ok(&20));
//! assert!(tree.root().is_black());
//! assert!(tree.find(&3).unwrap().is_sentinel());
//!
//! let ordered: Vec<i32> = tree.iter().copied().collect();
//! assert_eq!(ordered, [-21, -7, -2, 0, 1, 4, 5, 6, 8, 9, 10, 12, 15, 20, 25]);
//! ```
//!
//! ## License
//!
//! Copyright (C) Microsoft Corporation. All rights reserved.
//!
//! SPDX-License-Identifier: BSD-2-Clause-Patent
//!
#![no_std]
extern crate alloc;

mod compare;
mod iter;
mod node;
mod observer;
mod rbt;

use core::{convert::Infallible, fmt};

pub use compare::{Comparator, Fallible, NaturalOrder};
pub use iter::Iter;
pub use node::{Color, NodeRef};
pub use observer::{LogObserver, RbTreeEvent, RbTreeObserver};
pub use rbt::RbTree;

/// Public result type for the crate.
///
/// `E` is the error type of the comparator in use, [Infallible] for comparators that cannot fail.
pub type Result<T, E = Infallible> = core::result::Result<T, Error<E>>;

/// Public error types for the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error<E = Infallible> {
    /// A rotation was requested on a node whose promoted child is the sentinel.
    InvalidRotation(Rotation),
    /// The key of the sentinel node was requested. The sentinel never holds a key.
    SentinelKey,
    /// The tree no longer satisfies one of the red-black invariants.
    Corrupted(Violation),
    /// The comparator failed. The error is passed through untouched.
    Compare(E),
}

/// The direction of a tree rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotation {
    /// The right child is promoted.
    Left,
    /// The left child is promoted.
    Right,
}

/// An invariant broken in a tree, as reported by [RbTree::verify].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    /// The sentinel was painted red.
    RedSentinel,
    /// The root is red.
    RedRoot,
    /// The root has a parent other than the sentinel.
    RootHasParent,
    /// A red node has a red parent.
    RedRedEdge,
    /// Two paths from the same node down to the sentinel cross a different number of black nodes.
    BlackHeightMismatch,
    /// A child does not point back at the node that links to it.
    BrokenParentLink,
    /// An in-order walk produced a key smaller than its predecessor.
    OutOfOrder,
    /// The number of reachable nodes differs from the number of stored keys.
    LengthMismatch,
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rotation::Left => write!(f, "left"),
            Rotation::Right => write!(f, "right"),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::RedSentinel => write!(f, "the sentinel is red"),
            Violation::RedRoot => write!(f, "the root is red"),
            Violation::RootHasParent => write!(f, "the root has a parent"),
            Violation::RedRedEdge => write!(f, "a red node has a red parent"),
            Violation::BlackHeightMismatch => write!(f, "black heights differ between sibling subtrees"),
            Violation::BrokenParentLink => write!(f, "a child does not link back to its parent"),
            Violation::OutOfOrder => write!(f, "keys are out of order"),
            Violation::LengthMismatch => write!(f, "reachable node count differs from the tree length"),
        }
    }
}

impl<E: fmt::Display> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidRotation(rotation) => write!(f, "invalid {} rotation: promoted child is nil", rotation),
            Error::SentinelKey => write!(f, "the sentinel node has no key"),
            Error::Corrupted(violation) => write!(f, "corrupted tree: {}", violation),
            Error::Compare(e) => write!(f, "comparator failed: {}", e),
        }
    }
}

impl<E: fmt::Debug + fmt::Display> core::error::Error for Error<E> {}

impl Error<Infallible> {
    /// Widens an error that cannot carry a comparator failure into one for any comparator error type.
    pub fn widen<E>(self) -> Error<E> {
        match self {
            Error::InvalidRotation(rotation) => Error::InvalidRotation(rotation),
            Error::SentinelKey => Error::SentinelKey,
            Error::Corrupted(violation) => Error::Corrupted(violation),
            Error::Compare(never) => match never {},
        }
    }
}
