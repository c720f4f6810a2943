//! A growable, contiguous, random-access array with detachable cursors.
//!
//! [`DynArray`] owns one heap buffer and grows it by doubling. Besides the
//! usual slice access it hands out [`Cursor`]s: index-based positions that
//! do not borrow the array and can be passed back to
//! [`insert`](DynArray::insert) and [`erase`](DynArray::erase).
//!
//! # Architecture
//!
//! ```text
//! DynArray<T> (policy: growth, cursors, access, comparisons)
//! ├── RawArray<T> (owned buffer: ptr + capacity + length, all unsafe code)
//! ├── ArrayId (process-unique identity, stamped into cursors)
//! └── Generation (advanced on every reallocation, stamped into cursors)
//! ```
//!
//! # Cursor validity
//!
//! Any operation that reallocates the buffer (a push or insert into a full
//! array, [`shrink_to_fit`](DynArray::shrink_to_fit)) invalidates every
//! cursor obtained before it. Insertions and removals that do not
//! reallocate shift elements under existing cursors without invalidating
//! them. Debug builds reject foreign and stale cursors with a panic;
//! [`DynArray::validate`] performs the same check on demand.
//!
//! # Error policy
//!
//! Only [`DynArray::at`], [`DynArray::at_mut`] and [`DynArray::validate`]
//! report errors. Every other precondition violation panics.
//!
//! # Safety
//!
//! `unsafe` is confined to the private `raw` module.
//!
//! ```
//! use dynarray::{dynarray, DynArray};
//!
//! let mut array: DynArray<i32> = DynArray::new();
//! array.push(1);
//! array.push(2);
//! array.push(3);
//! assert_eq!(array.capacity(), 4);
//!
//! let pos = array.insert(array.begin() + 1, 99);
//! assert_eq!(array, [1, 99, 2, 3]);
//! assert_eq!(*array.get_at(pos), 99);
//!
//! assert!(array.at(10).is_err());
//! assert_eq!(array, dynarray![1, 99, 2, 3]);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod array;
pub mod cursor;
pub mod error;
mod raw;

pub use array::DynArray;
pub use cursor::{ArrayId, Cursor, Generation};
pub use error::ArrayError;
pub use raw::IntoIter;

/// Build a [`DynArray`] from a literal list of elements.
///
/// The list form allocates exactly as many slots as elements; the
/// `value; n` form clones `value` into `n` slots.
///
/// ```
/// use dynarray::dynarray;
///
/// let a = dynarray![1, 2, 3];
/// assert_eq!(a.capacity(), 3);
/// let b = dynarray![0u8; 4];
/// assert_eq!(b, [0, 0, 0, 0]);
/// let c: dynarray::DynArray<u8> = dynarray![];
/// assert!(c.is_empty());
/// ```
#[macro_export]
macro_rules! dynarray {
    () => {
        $crate::DynArray::new()
    };
    ($value:expr; $n:expr) => {
        $crate::DynArray::from_elem($value, $n)
    };
    ($($element:expr),+ $(,)?) => {
        $crate::DynArray::from([$($element),+])
    };
}
