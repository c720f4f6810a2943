//! Owned, growable element buffer.
//!
//! [`RawArray`] is the single owner of the heap allocation behind a
//! [`DynArray`](crate::DynArray). It tracks capacity and the number of live
//! elements, and it is the only place in the crate that touches raw
//! memory. Every `unsafe` block carries a `// SAFETY:` comment.
//!
//! `RawArray` implements mechanism only. Growth *policy* (when to grow and
//! by how much) lives in [`crate::array`].

#![allow(unsafe_code)]

use std::alloc::{self, Layout};
use std::iter::FusedIterator;
use std::marker::PhantomData;
use std::mem;
use std::ptr::{self, NonNull};
use std::slice;

/// Contiguous buffer of `cap` slots, of which `[0, len)` are initialised.
///
/// `ptr` is dangling iff `cap == 0` or `T` is zero-sized; no memory is
/// requested from the allocator in either case.
pub(crate) struct RawArray<T> {
    ptr: NonNull<T>,
    cap: usize,
    len: usize,
    _marker: PhantomData<T>,
}

// SAFETY: RawArray owns its elements exclusively, like Box<[T]>.
unsafe impl<T: Send> Send for RawArray<T> {}
// SAFETY: shared access only hands out &T.
unsafe impl<T: Sync> Sync for RawArray<T> {}

#[cold]
#[inline(never)]
pub(crate) fn capacity_overflow() -> ! {
    panic!("capacity overflow")
}

impl<T> RawArray<T> {
    /// An empty buffer. Does not allocate.
    pub(crate) const fn new() -> Self {
        Self {
            ptr: NonNull::dangling(),
            cap: 0,
            len: 0,
            _marker: PhantomData,
        }
    }

    /// A buffer with exactly `cap` uninitialised slots.
    pub(crate) fn with_capacity(cap: usize) -> Self {
        let mut raw = Self::new();
        raw.reallocate(cap);
        raw
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn capacity(&self) -> usize {
        self.cap
    }

    pub(crate) fn is_full(&self) -> bool {
        self.len == self.cap
    }

    /// Move the live elements into a fresh buffer of exactly `new_cap`
    /// slots and release the old one.
    ///
    /// The new buffer is fully populated before the old one is released.
    /// `new_cap == 0` releases the buffer and leaves it absent.
    ///
    /// # Panics
    ///
    /// Panics if `new_cap < len`, or if `new_cap` slots of `T` exceed
    /// `isize::MAX` bytes. Aborts through [`alloc::handle_alloc_error`] if
    /// the allocator fails.
    pub(crate) fn reallocate(&mut self, new_cap: usize) {
        assert!(
            new_cap >= self.len,
            "new capacity (is {new_cap}) should be >= len (is {})",
            self.len
        );
        if new_cap == self.cap {
            return;
        }
        let new_ptr = if new_cap == 0 {
            NonNull::dangling()
        } else {
            let layout = Layout::array::<T>(new_cap).unwrap_or_else(|_| capacity_overflow());
            if layout.size() == 0 {
                NonNull::dangling()
            } else {
                // SAFETY: layout has non-zero size.
                let fresh = unsafe { alloc::alloc(layout) }.cast::<T>();
                let Some(fresh) = NonNull::new(fresh) else {
                    alloc::handle_alloc_error(layout)
                };
                // SAFETY: the old buffer holds `len` initialised elements, the
                // new one has room for `new_cap >= len`, and they are
                // distinct allocations.
                unsafe { ptr::copy_nonoverlapping(self.ptr.as_ptr(), fresh.as_ptr(), self.len) };
                fresh
            }
        };
        // The elements were moved bitwise; the old slots are now just memory.
        self.release();
        self.ptr = new_ptr;
        self.cap = new_cap;
    }

    /// Return the allocation to the allocator without touching elements.
    ///
    /// Callers must overwrite `ptr`/`cap` afterwards (or be in `Drop`).
    fn release(&mut self) {
        if self.cap == 0 || mem::size_of::<T>() == 0 {
            return;
        }
        // The layout was valid when this buffer was allocated with `cap`.
        let Ok(layout) = Layout::array::<T>(self.cap) else {
            capacity_overflow()
        };
        // SAFETY: `ptr` was returned by `alloc::alloc` with exactly this layout
        // and has not been released since.
        unsafe { alloc::dealloc(self.ptr.as_ptr().cast(), layout) };
    }

    /// Write `value` into slot `len`.
    ///
    /// # Panics
    ///
    /// Panics if there is no spare slot. Growth is the caller's job.
    pub(crate) fn push(&mut self, value: T) {
        assert!(self.len < self.cap, "push into a full buffer");
        // SAFETY: slot `len` is in bounds (len < cap) and uninitialised.
        unsafe { ptr::write(self.ptr.as_ptr().add(self.len), value) };
        self.len += 1;
    }

    /// Move the last live element out, or `None` when empty.
    pub(crate) fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        // SAFETY: slot `len` was initialised and is now outside the live
        // range, so it is read exactly once.
        Some(unsafe { ptr::read(self.ptr.as_ptr().add(self.len)) })
    }

    /// Shift `[index, len)` one slot right and write `value` at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index > len` or there is no spare slot.
    pub(crate) fn insert(&mut self, index: usize, value: T) {
        assert!(
            index <= self.len,
            "insertion index (is {index}) should be <= len (is {})",
            self.len
        );
        assert!(self.len < self.cap, "insert into a full buffer");
        // SAFETY: index <= len < cap, so `index + 1 + (len - index) <= cap`.
        // `ptr::copy` handles the overlap. The tail move is a single block
        // copy, so an insertion at index 0 needs no countdown.
        unsafe {
            let slot = self.ptr.as_ptr().add(index);
            ptr::copy(slot, slot.add(1), self.len - index);
            ptr::write(slot, value);
        }
        self.len += 1;
    }

    /// Move the element at `index` out and shift `(index, len)` one slot left.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len`.
    pub(crate) fn remove(&mut self, index: usize) -> T {
        assert!(
            index < self.len,
            "removal index (is {index}) should be < len (is {})",
            self.len
        );
        // SAFETY: index < len, so the slot is initialised; the tail
        // `(index, len)` lies within the live range.
        unsafe {
            let slot = self.ptr.as_ptr().add(index);
            let removed = ptr::read(slot);
            ptr::copy(slot.add(1), slot, self.len - index - 1);
            self.len -= 1;
            removed
        }
    }

    /// Drop every live element and set `len` to zero. Keeps the allocation.
    pub(crate) fn clear(&mut self) {
        let live = self.len;
        // Zero the length first so a panicking destructor cannot lead to a
        // second drop of the same elements.
        self.len = 0;
        // SAFETY: `[0, live)` was initialised and is no longer reachable.
        unsafe { ptr::drop_in_place(ptr::slice_from_raw_parts_mut(self.ptr.as_ptr(), live)) };
    }

    pub(crate) fn as_slice(&self) -> &[T] {
        // SAFETY: `[0, len)` is initialised; `ptr` is non-null and aligned
        // even when dangling with len 0.
        unsafe { slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: as in `as_slice`, and `&mut self` guarantees uniqueness.
        unsafe { slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }

    /// Hand the live elements to an owning iterator.
    pub(crate) fn into_iter(mut self) -> IntoIter<T> {
        let end = self.len;
        // The iterator owns the elements from here on; the buffer itself
        // only frees memory when dropped.
        self.len = 0;
        IntoIter {
            raw: self,
            start: 0,
            end,
        }
    }
}

impl<T> Drop for RawArray<T> {
    fn drop(&mut self) {
        self.clear();
        self.release();
    }
}

/// Owning iterator over the elements of a [`DynArray`](crate::DynArray).
///
/// Elements not yielded are dropped with the iterator; the buffer is
/// released exactly once.
pub struct IntoIter<T> {
    /// Buffer with `len == 0`; slots `[start, end)` are still initialised.
    raw: RawArray<T>,
    start: usize,
    end: usize,
}

impl<T> IntoIter<T> {
    /// The elements not yet yielded.
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: `[start, end)` is initialised and inside the allocation.
        unsafe { slice::from_raw_parts(self.raw.ptr.as_ptr().add(self.start), self.end - self.start) }
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.start == self.end {
            return None;
        }
        // SAFETY: slot `start` is initialised and is read exactly once
        // because `start` advances past it.
        let item = unsafe { ptr::read(self.raw.ptr.as_ptr().add(self.start)) };
        self.start += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.end - self.start;
        (remaining, Some(remaining))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        if self.start == self.end {
            return None;
        }
        self.end -= 1;
        // SAFETY: slot `end` is initialised and now outside `[start, end)`.
        Some(unsafe { ptr::read(self.raw.ptr.as_ptr().add(self.end)) })
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> FusedIterator for IntoIter<T> {}

impl<T> Drop for IntoIter<T> {
    fn drop(&mut self) {
        let remaining = ptr::slice_from_raw_parts_mut(
            // SAFETY: `start <= end <= cap`, so the offset stays in bounds.
            unsafe { self.raw.ptr.as_ptr().add(self.start) },
            self.end - self.start,
        );
        self.start = self.end;
        // SAFETY: the unyielded slots are initialised and never read again.
        // `raw` has len 0, so its own Drop only frees the allocation.
        unsafe { ptr::drop_in_place(remaining) };
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for IntoIter<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("IntoIter").field(&self.as_slice()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_does_not_allocate() {
        let raw: RawArray<u32> = RawArray::new();
        assert_eq!(raw.capacity(), 0);
        assert_eq!(raw.len(), 0);
        assert!(raw.is_full());
        assert!(raw.as_slice().is_empty());
    }

    #[test]
    fn reallocate_preserves_elements() {
        let mut raw = RawArray::with_capacity(2);
        raw.push(String::from("a"));
        raw.push(String::from("b"));
        raw.reallocate(8);
        assert_eq!(raw.capacity(), 8);
        assert_eq!(raw.as_slice(), ["a", "b"]);
    }

    #[test]
    fn reallocate_to_zero_releases() {
        let mut raw: RawArray<u64> = RawArray::with_capacity(4);
        raw.reallocate(0);
        assert_eq!(raw.capacity(), 0);
    }

    #[test]
    #[should_panic(expected = "should be >= len")]
    fn reallocate_below_len_panics() {
        let mut raw = RawArray::with_capacity(2);
        raw.push(1u8);
        raw.push(2u8);
        raw.reallocate(1);
    }

    #[test]
    #[should_panic(expected = "push into a full buffer")]
    fn push_without_room_panics() {
        let mut raw: RawArray<u8> = RawArray::new();
        raw.push(1);
    }

    #[test]
    fn insert_at_front_shifts_everything() {
        let mut raw = RawArray::with_capacity(4);
        raw.push(2);
        raw.push(3);
        raw.insert(0, 1);
        assert_eq!(raw.as_slice(), [1, 2, 3]);
    }

    #[test]
    fn insert_at_len_appends() {
        let mut raw = RawArray::with_capacity(4);
        raw.push(1);
        raw.insert(1, 2);
        assert_eq!(raw.as_slice(), [1, 2]);
    }

    #[test]
    fn remove_shifts_tail_left() {
        let mut raw = RawArray::with_capacity(4);
        for v in [1, 2, 3, 4] {
            raw.push(v);
        }
        assert_eq!(raw.remove(1), 2);
        assert_eq!(raw.as_slice(), [1, 3, 4]);
        assert_eq!(raw.remove(2), 4);
        assert_eq!(raw.as_slice(), [1, 3]);
        assert_eq!(raw.capacity(), 4);
    }

    #[test]
    fn zero_sized_elements_need_no_memory() {
        let mut raw = RawArray::with_capacity(4);
        raw.push(());
        raw.push(());
        raw.reallocate(16);
        assert_eq!(raw.len(), 2);
        assert_eq!(raw.pop(), Some(()));
        assert_eq!(raw.len(), 1);
    }

    #[test]
    fn into_iter_yields_from_both_ends() {
        let mut raw = RawArray::with_capacity(3);
        for v in [1, 2, 3] {
            raw.push(v);
        }
        let mut iter = raw.into_iter();
        assert_eq!(iter.len(), 3);
        assert_eq!(iter.next(), Some(1));
        assert_eq!(iter.next_back(), Some(3));
        assert_eq!(iter.as_slice(), [2]);
        assert_eq!(iter.next(), Some(2));
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next_back(), None);
    }
}
