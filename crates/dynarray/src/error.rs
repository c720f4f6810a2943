//! Array error types.

use std::error::Error;
use std::fmt;

use crate::cursor::{ArrayId, Generation};

/// Errors reported by the checked array operations.
///
/// Only [`DynArray::at`](crate::DynArray::at),
/// [`DynArray::at_mut`](crate::DynArray::at_mut) and
/// [`DynArray::validate`](crate::DynArray::validate) return these. The
/// unchecked operations panic on precondition violations instead.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArrayError {
    /// An index at or past the current length.
    OutOfRange {
        /// The requested index.
        index: usize,
        /// The array length at the time of the request.
        len: usize,
    },
    /// A cursor obtained from a different array.
    ForeignCursor {
        /// The array the cursor was obtained from.
        cursor: ArrayId,
        /// The array it was presented to.
        array: ArrayId,
    },
    /// A cursor obtained before the array last reallocated its buffer.
    StaleCursor {
        /// The generation stamped into the cursor.
        cursor_generation: Generation,
        /// The array's current generation.
        current: Generation,
    },
}

impl fmt::Display for ArrayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange { index, len } => {
                write!(f, "index out of range: index {index}, length {len}")
            }
            Self::ForeignCursor { cursor, array } => {
                write!(f, "cursor from array {cursor} used on array {array}")
            }
            Self::StaleCursor {
                cursor_generation,
                current,
            } => {
                write!(
                    f,
                    "stale cursor: generation {cursor_generation}, buffer is at generation {current}"
                )
            }
        }
    }
}

impl Error for ArrayError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_message() {
        let err = ArrayError::OutOfRange { index: 5, len: 3 };
        assert_eq!(err.to_string(), "index out of range: index 5, length 3");
    }

    #[test]
    fn stale_cursor_message() {
        let err = ArrayError::StaleCursor {
            cursor_generation: Generation(1),
            current: Generation(3),
        };
        assert_eq!(
            err.to_string(),
            "stale cursor: generation 1, buffer is at generation 3"
        );
    }
}
