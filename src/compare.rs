//! Key ordering strategies.
//!
//! A tree never calls `Ord::cmp` directly: every comparison goes through a
//! [`Comparator`], which may refuse to order two keys.

use core::cmp::Ordering;
use core::convert::Infallible;

use crate::error::Incomparable;

/// Three-way comparison of keys that is allowed to fail.
pub trait Comparator<K: ?Sized> {
    type Error;

    fn compare(&self, lhs: &K, rhs: &K) -> Result<Ordering, Self::Error>;
}

/// Total order given by `K: Ord`. Never fails.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Natural;

impl<K: Ord + ?Sized> Comparator<K> for Natural {
    type Error = Infallible;

    #[inline]
    fn compare(&self, lhs: &K, rhs: &K) -> Result<Ordering, Infallible> {
        Ok(lhs.cmp(rhs))
    }
}

/// Order given by `K: PartialOrd`; unordered pairs yield [`Incomparable`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Partial;

impl<K: PartialOrd + ?Sized> Comparator<K> for Partial {
    type Error = Incomparable;

    #[inline]
    fn compare(&self, lhs: &K, rhs: &K) -> Result<Ordering, Incomparable> {
        lhs.partial_cmp(rhs).ok_or(Incomparable)
    }
}

/// Wraps a closure `Fn(&K, &K) -> Result<Ordering, E>`.
#[derive(Debug, Clone, Copy)]
pub struct FnComparator<F>(pub F);

impl<K: ?Sized, E, F> Comparator<K> for FnComparator<F>
where
    F: Fn(&K, &K) -> Result<Ordering, E>,
{
    type Error = E;

    #[inline]
    fn compare(&self, lhs: &K, rhs: &K) -> Result<Ordering, E> {
        (self.0)(lhs, rhs)
    }
}
