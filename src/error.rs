use thiserror::Error;

/// Failure of a tree operation.
///
/// The only way a lookup, insertion or removal can fail is the key ordering
/// refusing to compare two keys. The tree is left untouched when that
/// happens: every comparison is performed while descending, before the first
/// link is rewritten.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TreeError<E> {
    #[error("keys could not be compared: {0}")]
    Compare(E),
}

impl<E> TreeError<E> {
    /// Unwraps the comparator error.
    pub fn into_inner(self) -> E {
        match self {
            TreeError::Compare(err) => err,
        }
    }
}

/// Returned by [`Partial`](crate::Partial) when two keys have no defined order,
/// e.g. a `NaN` float.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Default)]
#[error("keys have no defined ordering")]
pub struct Incomparable;
