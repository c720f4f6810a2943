//! Array identities, buffer generations, and positional cursors.
//!
//! A [`Cursor`] is a position inside one particular [`DynArray`]. It does
//! not borrow the array, so it can be handed back to
//! [`DynArray::insert`] and [`DynArray::erase`]. In exchange it carries
//! enough information to detect the two ways it can go bad:
//!
//! - it was obtained from a different array ([`ArrayId`] mismatch), or
//! - the array has reallocated since ([`Generation`] mismatch).
//!
//! Insertions and removals that do *not* reallocate leave cursors
//! nominally valid but shift which element an index denotes. That is not
//! detected.
//!
//! [`DynArray`]: crate::DynArray
//! [`DynArray::insert`]: crate::DynArray::insert
//! [`DynArray::erase`]: crate::DynArray::erase

use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};
use std::sync::atomic::{AtomicU64, Ordering};

/// Counter for unique [`ArrayId`] allocation.
static ARRAY_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of one array instance.
///
/// Allocated from a monotonic atomic counter. Clones of an array get a new
/// identity; moving an array keeps it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArrayId(u64);

impl ArrayId {
    /// Allocate a fresh identity that has never been returned before
    /// within this process.
    pub fn next() -> Self {
        Self(ARRAY_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ArrayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Number of times an array's buffer has been reallocated.
///
/// Starts at zero and advances on every reallocation, including growth
/// and [`shrink_to_fit`](crate::DynArray::shrink_to_fit).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Generation(pub u32);

impl Generation {
    /// The generation after this one.
    pub(crate) fn advance(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Index-based position within a [`DynArray`](crate::DynArray).
///
/// Arithmetic follows pointer semantics: it wraps and performs no bounds
/// checks. A cursor is only meaningful in the range `[begin, end]`, and
/// only `[begin, end)` can be dereferenced.
///
/// Equality compares owner, generation and index. Subtracting two cursors
/// yields the signed distance between their indices; both are assumed to
/// come from the same array.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Cursor {
    owner: ArrayId,
    generation: Generation,
    index: usize,
}

impl Cursor {
    pub(crate) fn new(owner: ArrayId, generation: Generation, index: usize) -> Self {
        Self {
            owner,
            generation,
            index,
        }
    }

    /// Offset from the start of the array.
    pub fn index(&self) -> usize {
        self.index
    }

    /// The array this cursor was obtained from.
    pub fn owner(&self) -> ArrayId {
        self.owner
    }

    /// The owner's buffer generation when this cursor was obtained.
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Move one slot towards the end.
    pub fn step_forward(&mut self) -> &mut Self {
        self.index = self.index.wrapping_add(1);
        self
    }

    /// Move one slot towards the start.
    pub fn step_back(&mut self) -> &mut Self {
        self.index = self.index.wrapping_sub(1);
        self
    }
}

impl Add<isize> for Cursor {
    type Output = Cursor;

    fn add(mut self, rhs: isize) -> Cursor {
        self += rhs;
        self
    }
}

impl AddAssign<isize> for Cursor {
    fn add_assign(&mut self, rhs: isize) {
        self.index = self.index.wrapping_add_signed(rhs);
    }
}

impl Sub<isize> for Cursor {
    type Output = Cursor;

    fn sub(mut self, rhs: isize) -> Cursor {
        self -= rhs;
        self
    }
}

impl SubAssign<isize> for Cursor {
    fn sub_assign(&mut self, rhs: isize) {
        self.index = self.index.wrapping_add_signed(rhs.wrapping_neg());
    }
}

impl Sub for Cursor {
    type Output = isize;

    /// Signed distance `self - rhs` in slots.
    fn sub(self, rhs: Cursor) -> isize {
        // Indices never exceed isize::MAX (allocation limit), so the
        // two's-complement reinterpretation is the exact difference.
        self.index.wrapping_sub(rhs.index) as isize
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Cursor(array={}, gen={}, index={})",
            self.owner, self.generation, self.index
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(index: usize) -> Cursor {
        Cursor::new(ArrayId(7), Generation(0), index)
    }

    #[test]
    fn ids_are_unique() {
        let a = ArrayId::next();
        let b = ArrayId::next();
        assert_ne!(a, b);
        assert!(b > a);
    }

    #[test]
    fn step_forward_and_back() {
        let mut c = at(1);
        c.step_forward().step_forward();
        assert_eq!(c.index(), 3);
        c.step_back();
        assert_eq!(c.index(), 2);
    }

    #[test]
    fn offset_arithmetic() {
        let c = at(4);
        assert_eq!((c + 3).index(), 7);
        assert_eq!((c - 4).index(), 0);
        assert_eq!((c + -2).index(), 2);
        assert_eq!((c - -1).index(), 5);
    }

    #[test]
    fn difference_is_signed() {
        assert_eq!(at(5) - at(2), 3);
        assert_eq!(at(2) - at(5), -3);
        assert_eq!(at(0) - at(0), 0);
    }

    #[test]
    fn step_back_from_zero_round_trips() {
        let mut c = at(0);
        c.step_back();
        assert_eq!(c - at(0), -1);
        c.step_forward();
        assert_eq!(c, at(0));
    }

    #[test]
    fn equality_includes_generation() {
        let old = Cursor::new(ArrayId(1), Generation(0), 2);
        let new = Cursor::new(ArrayId(1), Generation(1), 2);
        assert_ne!(old, new);
    }

    #[test]
    fn generation_advance_wraps() {
        assert_eq!(Generation(u32::MAX).advance(), Generation(0));
        assert_eq!(Generation::default().advance(), Generation(1));
    }

    #[test]
    fn display_names_all_parts() {
        let c = Cursor::new(ArrayId(3), Generation(2), 9);
        assert_eq!(c.to_string(), "Cursor(array=3, gen=2, index=9)");
    }
}
