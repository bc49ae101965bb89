//! Sentinel Red-Black Tree - Comparators
//!
//! ## License
//!
//! Copyright (C) Microsoft Corporation. All rights reserved.
//!
//! SPDX-License-Identifier: BSD-2-Clause-Patent
//!
use core::convert::Infallible;

/// A strict weak ordering over `K`.
///
/// Only `less` is ever asked. Two keys are considered equal when neither is less than the other.
pub trait Comparator<K: ?Sized> {
    /// The error a comparison can fail with. Use [Infallible] when it cannot fail.
    type Error;

    /// Returns whether `a` is ordered strictly before `b`.
    fn less(&self, a: &K, b: &K) -> Result<bool, Self::Error>;

    /// Returns whether `a` and `b` are different under this ordering.
    fn differs(&self, a: &K, b: &K) -> Result<bool, Self::Error> {
        Ok(self.less(a, b)? || self.less(b, a)?)
    }
}

/// Orders keys by their [PartialOrd] implementation.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NaturalOrder;

impl<K: PartialOrd + ?Sized> Comparator<K> for NaturalOrder {
    type Error = Infallible;

    fn less(&self, a: &K, b: &K) -> Result<bool, Infallible> {
        Ok(a < b)
    }
}

impl<K: ?Sized, F> Comparator<K> for F
where
    F: Fn(&K, &K) -> bool,
{
    type Error = Infallible;

    fn less(&self, a: &K, b: &K) -> Result<bool, Infallible> {
        Ok(self(a, b))
    }
}

/// Adapts a comparison function that can fail.
///
/// ```rust
/// use sentinel_rbt::{Error, Fallible, RbTree};
///
/// let by_value = Fallible(|a: &f64, b: &f64| a.partial_cmp(b).map(|o| o.is_lt()).ok_or("nan"));
/// let mut tree = RbTree::with_comparator(by_value);
/// tree.insert(1.0).unwrap();
/// assert_eq!(tree.insert(f64::NAN), Err(Error::Compare("nan")));
/// assert_eq!(tree.len(), 1);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Fallible<F>(pub F);

impl<K: ?Sized, E, F> Comparator<K> for Fallible<F>
where
    F: Fn(&K, &K) -> Result<bool, E>,
{
    type Error = E;

    fn less(&self, a: &K, b: &K) -> Result<bool, E> {
        (self.0)(a, b)
    }
}
