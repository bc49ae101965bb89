//! Sentinel Red-Black Tree - In-Order Iteration
//!
//! ## License
//!
//! Copyright (C) Microsoft Corporation. All rights reserved.
//!
//! SPDX-License-Identifier: BSD-2-Clause-Patent
//!
use core::iter::FusedIterator;

use crate::node::{NodeId, SENTINEL, Storage};

/// An in-order iterator over the keys of an [RbTree](crate::RbTree).
///
/// Follows parent links instead of keeping a stack, so it needs constant space regardless of tree size.
pub struct Iter<'a, K> {
    storage: &'a Storage<K>,
    next: NodeId,
    remaining: usize,
}

impl<'a, K> Iter<'a, K> {
    pub(crate) fn new(storage: &'a Storage<K>, root: NodeId) -> Self {
        Iter { storage, next: storage.minimum(root), remaining: storage.len() }
    }
}

impl<'a, K> Iterator for Iter<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        if self.next == SENTINEL {
            return None;
        }
        let current = self.next;
        self.next = self.storage.successor(current);
        self.remaining = self.remaining.saturating_sub(1);
        self.storage.key::<core::convert::Infallible>(current).ok()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K> ExactSizeIterator for Iter<'_, K> {}

impl<K> FusedIterator for Iter<'_, K> {}

impl<K> Clone for Iter<'_, K> {
    fn clone(&self) -> Self {
        Iter { storage: self.storage, next: self.next, remaining: self.remaining }
    }
}
