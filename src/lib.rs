//! Red-black tree ordered map.
//!
//! [`Redwood`] keeps its nodes in a single arena and links them through
//! indices. Lookups, insertions and removals run in `O(log n)`; balance is
//! restored after each insertion or removal with local recolorings and
//! rotations.
//!
//! Keys are ordered through a [`Comparator`], which is allowed to fail. A
//! failed comparison surfaces as [`TreeError::Compare`] and never as a missing
//! key. [`RedwoodMap`] is the convenience wrapper for `Ord` keys, whose
//! ordering cannot fail.
//!
//! ```
//! use redwood::Redwood;
//!
//! let mut tree = Redwood::new();
//! tree.insert(5, "five").unwrap();
//! tree.insert(3, "three").unwrap();
//!
//! assert_eq!(tree.get(&3), Ok(Some(&"three")));
//! assert_eq!(tree.remove(&5), Ok(Some("five")));
//! assert_eq!(tree.len(), 1);
//! ```
//!
//! The tree is not synchronized; share it across threads behind a lock.

extern crate alloc;

mod compare;
mod error;
mod iter;
mod map;
mod node;
mod tree;

pub use compare::{Comparator, FnComparator, Natural, Partial};
pub use error::{Incomparable, TreeError};
pub use iter::{IntoIter, Iter, IterMut, Keys, Values};
pub use map::RedwoodMap;
pub use tree::Redwood;
