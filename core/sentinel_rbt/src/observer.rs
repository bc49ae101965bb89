//! Sentinel Red-Black Tree - Observer Hooks
//!
//! ## License
//!
//! Copyright (C) Microsoft Corporation. All rights reserved.
//!
//! SPDX-License-Identifier: BSD-2-Clause-Patent
//!
use core::fmt;

use crate::{NodeRef, RbTree};

/// A checkpoint reached while inserting into a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RbTreeEvent {
    /// The new red node was linked in as a leaf, before any rebalancing.
    AfterBstInsert,
    /// The insertion finished and the root was painted black.
    AfterInsert,
    /// The uncle was red: parent and uncle were painted black and the grandparent red.
    AfterRecolor,
    /// The uncle was black and the parent a left child: recolored, then rotated right at the grandparent.
    AfterRecolorRotateRight,
    /// The uncle was black and the parent a right child: recolored, then rotated left at the grandparent.
    AfterRecolorRotateLeft,
    /// A left rotation finished. The node reported is the one that moved down.
    AfterLeftRotation,
    /// A right rotation finished. The node reported is the one that moved down.
    AfterRightRotation,
}

impl fmt::Display for RbTreeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RbTreeEvent::AfterBstInsert => "after BST insert",
            RbTreeEvent::AfterInsert => "after insert",
            RbTreeEvent::AfterRecolor => "after recolor",
            RbTreeEvent::AfterRecolorRotateRight => "after recolor and right rotation",
            RbTreeEvent::AfterRecolorRotateLeft => "after recolor and left rotation",
            RbTreeEvent::AfterLeftRotation => "after left rotation",
            RbTreeEvent::AfterRightRotation => "after right rotation",
        };
        f.write_str(name)
    }
}

/// Receives the intermediate states of a tree during insertion.
///
/// The tree is only ever lent out as a shared reference, so an observer can inspect it but not change it.
/// Nothing the observer does affects the outcome of the insertion.
pub trait RbTreeObserver<K, C> {
    /// Called at every checkpoint with the node currently being processed.
    fn on_event(&mut self, event: RbTreeEvent, tree: &RbTree<K, C>, node: NodeRef<'_, K>);
}

/// An observer that writes every checkpoint to the `log` facade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogObserver {
    level: log::Level,
}

impl LogObserver {
    /// Creates an observer logging at `level`.
    pub const fn new(level: log::Level) -> Self {
        LogObserver { level }
    }

    pub fn level(&self) -> log::Level {
        self.level
    }
}

impl Default for LogObserver {
    fn default() -> Self {
        Self::new(log::Level::Trace)
    }
}

impl<K: fmt::Debug, C> RbTreeObserver<K, C> for LogObserver {
    fn on_event(&mut self, event: RbTreeEvent, tree: &RbTree<K, C>, node: NodeRef<'_, K>) {
        log::log!(self.level, "rbt {}: {:?} (len {}, black height {})", event, node, tree.len(), tree.black_height());
    }
}
