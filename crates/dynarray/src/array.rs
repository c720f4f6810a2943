//! The [`DynArray`] container.
//!
//! Storage is a single `RawArray` buffer. This module owns the growth
//! policy, the cursor bookkeeping (identity and generation), the checked
//! and unchecked access paths, and the comparison and conversion traits.

use std::borrow::{Borrow, BorrowMut};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Deref, DerefMut, Index, IndexMut};
use std::slice::{self, SliceIndex};

use crate::cursor::{ArrayId, Cursor, Generation};
use crate::error::ArrayError;
use crate::raw::{capacity_overflow, IntoIter, RawArray};

/// A growable, contiguous, random-access sequence.
///
/// # Growth
///
/// When a push or insert finds the buffer full, capacity grows from 0 to
/// [`INITIAL_CAPACITY`](Self::INITIAL_CAPACITY) and is multiplied by
/// [`GROWTH_FACTOR`](Self::GROWTH_FACTOR) after that. Every element is
/// moved to the new buffer before the old one is released.
///
/// # Cursors
///
/// [`begin`](Self::begin) and [`end`](Self::end) return [`Cursor`]s that
/// stay usable across mutations, subject to the rules in
/// [`crate::cursor`]: any reallocation invalidates all outstanding cursors.
/// Debug builds check the owner and generation of every cursor passed in;
/// release builds only bounds-check.
///
/// # Access paths
///
/// - [`at`](Self::at) / [`at_mut`](Self::at_mut): checked, return
///   [`ArrayError::OutOfRange`].
/// - `array[i]`, [`front`](Self::front), [`back`](Self::back): panic on
///   misuse. For a genuinely unchecked read, use `get_unchecked` on the
///   slice.
pub struct DynArray<T> {
    raw: RawArray<T>,
    id: ArrayId,
    generation: Generation,
}

impl<T> DynArray<T> {
    /// Capacity of the first buffer allocated by growth.
    pub const INITIAL_CAPACITY: usize = 1;

    /// Factor applied to a full buffer's capacity on growth.
    pub const GROWTH_FACTOR: usize = 2;

    /// Create an empty array. Does not allocate.
    pub fn new() -> Self {
        Self::from_raw(RawArray::new())
    }

    /// Create an empty array with exactly `capacity` slots.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::from_raw(RawArray::with_capacity(capacity))
    }

    fn from_raw(raw: RawArray<T>) -> Self {
        Self {
            raw,
            id: ArrayId::next(),
            generation: Generation::default(),
        }
    }

    /// Number of live elements.
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// Number of allocated slots.
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }

    /// Whether the array holds no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// This array's identity, as stamped into its cursors.
    pub fn id(&self) -> ArrayId {
        self.id
    }

    /// How many times the buffer has been reallocated.
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Capacity to grow to from `capacity`.
    fn grown_capacity(capacity: usize) -> usize {
        if capacity == 0 {
            return Self::INITIAL_CAPACITY;
        }
        match capacity.checked_mul(Self::GROWTH_FACTOR) {
            Some(next) => next,
            None => capacity_overflow(),
        }
    }

    fn reallocate(&mut self, capacity: usize) {
        self.raw.reallocate(capacity);
        self.generation = self.generation.advance();
    }

    /// Guarantee one spare slot, growing if the buffer is full.
    fn reserve_one(&mut self) {
        if self.raw.is_full() {
            self.reallocate(Self::grown_capacity(self.capacity()));
        }
    }

    /// Append `value`, growing the buffer if it is full.
    ///
    /// Amortised O(1); O(len) on a growing call.
    pub fn push(&mut self, value: T) {
        self.reserve_one();
        self.raw.push(value);
    }

    /// Remove and return the last element, or `None` if the array is empty.
    pub fn pop(&mut self) -> Option<T> {
        self.raw.pop()
    }

    /// Drop all elements. Capacity is kept.
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Reallocate to exactly `len` slots, releasing the buffer when empty.
    ///
    /// Invalidates cursors if it reallocates.
    pub fn shrink_to_fit(&mut self) {
        if self.capacity() != self.len() {
            self.reallocate(self.len());
        }
    }

    /// Insert `value` at `index`, shifting later elements right.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    pub fn insert_at(&mut self, index: usize, value: T) {
        assert!(
            index <= self.len(),
            "insertion index (is {index}) should be <= len (is {})",
            self.len()
        );
        self.reserve_one();
        self.raw.insert(index, value);
    }

    /// Remove and return the element at `index`, shifting later elements left.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len`.
    pub fn remove(&mut self, index: usize) -> T {
        self.raw.remove(index)
    }

    /// Checked access: the element at `index`.
    pub fn at(&self, index: usize) -> Result<&T, ArrayError> {
        let len = self.len();
        self.as_slice()
            .get(index)
            .ok_or(ArrayError::OutOfRange { index, len })
    }

    /// Checked mutable access: the element at `index`.
    pub fn at_mut(&mut self, index: usize) -> Result<&mut T, ArrayError> {
        let len = self.len();
        self.as_mut_slice()
            .get_mut(index)
            .ok_or(ArrayError::OutOfRange { index, len })
    }

    /// The first element.
    ///
    /// # Panics
    ///
    /// Panics if the array is empty. Use `first()` for the `Option` form.
    pub fn front(&self) -> &T {
        match self.as_slice().first() {
            Some(first) => first,
            None => panic!("front() called on an empty array"),
        }
    }

    /// The first element, mutably.
    ///
    /// # Panics
    ///
    /// Panics if the array is empty.
    pub fn front_mut(&mut self) -> &mut T {
        match self.as_mut_slice().first_mut() {
            Some(first) => first,
            None => panic!("front_mut() called on an empty array"),
        }
    }

    /// The last element.
    ///
    /// # Panics
    ///
    /// Panics if the array is empty. Use `last()` for the `Option` form.
    pub fn back(&self) -> &T {
        match self.as_slice().last() {
            Some(last) => last,
            None => panic!("back() called on an empty array"),
        }
    }

    /// The last element, mutably.
    ///
    /// # Panics
    ///
    /// Panics if the array is empty.
    pub fn back_mut(&mut self) -> &mut T {
        match self.as_mut_slice().last_mut() {
            Some(last) => last,
            None => panic!("back_mut() called on an empty array"),
        }
    }

    /// The live elements as a slice.
    pub fn as_slice(&self) -> &[T] {
        self.raw.as_slice()
    }

    /// The live elements as a mutable slice.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        self.raw.as_mut_slice()
    }

    /// Cursor at the first slot.
    pub fn begin(&self) -> Cursor {
        Cursor::new(self.id, self.generation, 0)
    }

    /// Cursor one past the last element. Not dereferenceable.
    pub fn end(&self) -> Cursor {
        Cursor::new(self.id, self.generation, self.len())
    }

    /// Check that `cursor` belongs to this array, predates no reallocation,
    /// and lies in `[begin, end]`. Returns its index.
    pub fn validate(&self, cursor: Cursor) -> Result<usize, ArrayError> {
        if cursor.owner() != self.id {
            return Err(ArrayError::ForeignCursor {
                cursor: cursor.owner(),
                array: self.id,
            });
        }
        if cursor.generation() != self.generation {
            return Err(ArrayError::StaleCursor {
                cursor_generation: cursor.generation(),
                current: self.generation,
            });
        }
        let index = cursor - self.begin();
        match usize::try_from(index) {
            Ok(index) if index <= self.len() => Ok(index),
            _ => Err(ArrayError::OutOfRange {
                index: cursor.index(),
                len: self.len(),
            }),
        }
    }

    /// Translate `cursor` into an index, checking it in debug builds.
    fn index_of(&self, cursor: Cursor) -> usize {
        if cfg!(debug_assertions) {
            if let Err(err) = self.validate(cursor) {
                panic!("invalid cursor {cursor}: {err}");
            }
        }
        cursor.index()
    }

    /// The element under `cursor`.
    ///
    /// # Panics
    ///
    /// Panics if `cursor` is at or past `end()`, or (debug builds) belongs
    /// to another array or an older generation.
    pub fn get_at(&self, cursor: Cursor) -> &T {
        let index = self.index_of(cursor);
        &self.as_slice()[index]
    }

    /// The element under `cursor`, mutably. Panics as [`get_at`](Self::get_at).
    pub fn get_at_mut(&mut self, cursor: Cursor) -> &mut T {
        let index = self.index_of(cursor);
        &mut self.as_mut_slice()[index]
    }

    /// Insert `value` before `pos` and return a cursor to it.
    ///
    /// Grows the buffer if full, which invalidates every other cursor. The
    /// returned cursor carries the current generation.
    ///
    /// # Panics
    ///
    /// Panics if `pos` lies outside `[begin, end]`, or (debug builds)
    /// belongs to another array or an older generation.
    pub fn insert(&mut self, pos: Cursor, value: T) -> Cursor {
        let index = self.index_of(pos);
        self.insert_at(index, value);
        Cursor::new(self.id, self.generation, index)
    }

    /// Remove the element at `pos` and return a cursor to the slot it
    /// occupied, which now holds the following element or is `end()`.
    ///
    /// # Panics
    ///
    /// Panics if `pos` lies outside `[begin, end)` (so always on an empty
    /// array), or (debug builds) belongs to another array or an older
    /// generation.
    pub fn erase(&mut self, pos: Cursor) -> Cursor {
        let index = self.index_of(pos);
        drop(self.raw.remove(index));
        Cursor::new(self.id, self.generation, index)
    }
}

impl<T: Clone> DynArray<T> {
    /// An array of `n` clones of `value`, with capacity exactly `n`.
    pub fn from_elem(value: T, n: usize) -> Self {
        let mut array = Self::with_capacity(n);
        for _ in 0..n {
            array.raw.push(value.clone());
        }
        array
    }
}

impl<T> Default for DynArray<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for DynArray<T> {
    fn clone(&self) -> Self {
        Self::from(self.as_slice())
    }
}

impl<T: fmt::Debug> fmt::Debug for DynArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T> Deref for DynArray<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T> DerefMut for DynArray<T> {
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T> AsRef<[T]> for DynArray<T> {
    fn as_ref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T> AsMut<[T]> for DynArray<T> {
    fn as_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T> Borrow<[T]> for DynArray<T> {
    fn borrow(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T> BorrowMut<[T]> for DynArray<T> {
    fn borrow_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T, I: SliceIndex<[T]>> Index<I> for DynArray<T> {
    type Output = I::Output;

    fn index(&self, index: I) -> &I::Output {
        Index::index(self.as_slice(), index)
    }
}

impl<T, I: SliceIndex<[T]>> IndexMut<I> for DynArray<T> {
    fn index_mut(&mut self, index: I) -> &mut I::Output {
        IndexMut::index_mut(self.as_mut_slice(), index)
    }
}

impl<T, U> PartialEq<DynArray<U>> for DynArray<T>
where
    T: PartialEq<U>,
{
    /// Equal iff the lengths match and every pair of elements is equal.
    fn eq(&self, other: &DynArray<U>) -> bool {
        self.len() == other.len() && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

impl<T: Eq> Eq for DynArray<T> {}

impl<T, U> PartialEq<[U]> for DynArray<T>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &[U]) -> bool {
        self.as_slice() == other
    }
}

impl<T, U> PartialEq<&[U]> for DynArray<T>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &&[U]) -> bool {
        self.as_slice() == *other
    }
}

impl<T, U, const N: usize> PartialEq<[U; N]> for DynArray<T>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &[U; N]) -> bool {
        self.as_slice() == other
    }
}

impl<T, U> PartialEq<Vec<U>> for DynArray<T>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &Vec<U>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: PartialOrd> PartialOrd for DynArray<T> {
    /// Lexicographic: the first unequal pair decides, otherwise the
    /// shorter array is less.
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        for (a, b) in self.iter().zip(other.iter()) {
            if a != b {
                return a.partial_cmp(b);
            }
        }
        self.len().partial_cmp(&other.len())
    }
}

impl<T: Ord> Ord for DynArray<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        for (a, b) in self.iter().zip(other.iter()) {
            if a != b {
                return a.cmp(b);
            }
        }
        self.len().cmp(&other.len())
    }
}

impl<T: Hash> Hash for DynArray<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_slice().hash(state);
    }
}

impl<T, const N: usize> From<[T; N]> for DynArray<T> {
    /// Exactly `N` slots, holding the array's elements in order.
    fn from(elements: [T; N]) -> Self {
        let mut array = Self::with_capacity(N);
        for element in elements {
            array.raw.push(element);
        }
        array
    }
}

impl<T: Clone> From<&[T]> for DynArray<T> {
    /// Exactly `elements.len()` slots, holding clones in order.
    fn from(elements: &[T]) -> Self {
        let mut array = Self::with_capacity(elements.len());
        for element in elements {
            array.raw.push(element.clone());
        }
        array
    }
}

impl<T> FromIterator<T> for DynArray<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut array = Self::new();
        array.extend(iter);
        array
    }
}

impl<T> Extend<T> for DynArray<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.push(item);
        }
    }
}

impl<'a, T: Copy + 'a> Extend<&'a T> for DynArray<T> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied());
    }
}

impl<T> IntoIterator for DynArray<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> IntoIter<T> {
        self.raw.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a DynArray<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> slice::Iter<'a, T> {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut DynArray<T> {
    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;

    fn into_iter(self) -> slice::IterMut<'a, T> {
        self.iter_mut()
    }
}
