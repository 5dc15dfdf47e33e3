//! A circular buffer with fixed capacity and wrap-aware random access positions.
//! Requires Rust 1.81+
//!
//! It can be stored directly on the stack if needed.
//!
//! The buffer is a first-in first-out queue over a fixed-size array. Elements
//! are written at a write cursor and read at a read cursor, both wrapping
//! modulo the capacity; a flag tells a full buffer apart from an empty one, so
//! every slot of the backing array is usable.
//!
//! Besides single element `push`/`pop` the buffer moves contiguous batches in
//! and out with at most two slice copies, and hands out [`Position`]s: random
//! access cursors that keep counting laps, so they stay ordered and
//! subtractable across any number of wraps.
//!
//! # Feature Flags
//! The **arrayring** crate has the following cargo feature flags:
//!
//! - `std`
//!   - Optional, enabled by default
//!   - Use libstd
//!
//!
//! - `use_generic_array`
//!   - Optional
//!   - Depend on generic-array and allow using it just like a fixed
//!     size array for RingBuf storage.
//!
//! # Usage
//!
//! First, add the following to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! arrayring = "0.1"
//! ```
//!
//! Currently arrayring by default links to the standard library, but if you would
//! instead like to use arrayring in a `#![no_std]` situation or crate you can
//! request this via:
//!
//! ```toml
//! [dependencies]
//! arrayring = { version = "0.1", default-features = false }
//! ```
//!
//! # Capacity
//!
//! The `capacity()` is always `backed_array.len()`. Full and empty are told
//! apart by a flag rather than by keeping a slot free.
//!
//! # Checked and unchecked operations
//!
//! `push`, `pop`, `push_batch` and `pop_batch` validate the request and return
//! a [`BufferError`] without touching the buffer when it cannot be served.
//! `push_unchecked` and `pop_unchecked` skip the check. They never touch
//! memory out of bounds, but calling them on a full (respectively empty)
//! buffer silently corrupts its logical contents.
//!
//! # Examples
//! ```
//! use arrayring::{BufferError, RingBuffer};
//!
//! let mut buf: RingBuffer<u8, 4> = RingBuffer::new();
//! assert_eq!(buf.capacity(), 4);
//!
//! buf.push_batch(&[1, 2, 3]).unwrap();
//! buf.push(4).unwrap();
//! assert!(buf.is_full());
//! assert_eq!(buf.push(5), Err(BufferError::Full));
//!
//! let mut out = [0; 2];
//! buf.pop_batch(&mut out).unwrap();
//! assert_eq!(out, [1, 2]);
//! assert_eq!(buf.pop(), Ok(3));
//! assert_eq!(buf.len(), 1);
//! ```
//!
//! # Positions
//! ```
//! use arrayring::RingBuffer;
//!
//! let mut buf: RingBuffer<u32, 4> = RingBuffer::new();
//! buf.push_batch(&[0, 0, 0]).unwrap();
//! buf.pop_batch(&mut [0; 3]).unwrap();
//!
//! // the live range now wraps past the end of storage
//! buf.push_batch(&[7, 8, 9]).unwrap();
//!
//! let begin = buf.begin();
//! assert_eq!(begin[0], 7);
//! assert_eq!(*(begin + 2).get(), 9);
//! assert_eq!(begin + 3, buf.end());
//! assert!(begin + 2 > begin + 1);
//!
//! let values: Vec<_> = buf.iter().copied().collect();
//! assert_eq!(values, vec![7, 8, 9]);
//! ```

#![cfg_attr(not(any(feature="std", test)), no_std)]

#![deny(missing_docs)]
#![forbid(unsafe_code)]

use core::cmp;
use core::fmt;
use core::iter::FusedIterator;
use core::slice;

mod array;
mod cursor;
mod error;

pub use array::Array;
pub use cursor::{EndMarker, Position};
pub use error::BufferError;

/// A `RingBuf` backed by a plain `[T; N]`.
pub type RingBuffer<T, const N: usize> = RingBuf<[T; N]>;

/// A fixed capacity ring buffer.
///
/// It can be stored directly on the stack if needed.
///
/// The buffer is not synchronized. Sharing it between threads requires an
/// external lock.
///
/// # Capacity
///
/// The `capacity()` is always `backed_array.len()`.
#[derive(Clone)]
pub struct RingBuf<A: Array> {
    xs: A,
    write: usize,
    read: usize,
    full: bool,
}

impl<A: Array> RingBuf<A>
    where A::Item: Default
{
    /// Creates an empty `RingBuf` with every slot set to `Default::default()`.
    ///
    /// # Examples
    ///
    /// ```
    /// use arrayring::RingBuf;
    ///
    /// let buf: RingBuf<[usize; 3]> = RingBuf::new();
    /// assert!(buf.is_empty());
    /// ```
    #[inline]
    pub fn new() -> Self {
        let () = Self::CAPACITY_OK;
        RingBuf {
            xs: A::from_default(),
            write: 0,
            read: 0,
            full: false,
        }
    }
}

impl<A: Array> Default for RingBuf<A>
    where A::Item: Default
{
    #[inline]
    fn default() -> Self {
        RingBuf::new()
    }
}

impl<A: Array> RingBuf<A> {
    const CAPACITY_OK: () = assert!(A::CAPACITY > 0 && A::CAPACITY <= isize::MAX as usize,
                                    "RingBuf capacity must be in 1..=isize::MAX");

    /// Return the capacity of the `RingBuf`.
    ///
    /// # Examples
    ///
    /// ```
    /// use arrayring::RingBuffer;
    ///
    /// let buf: RingBuffer<u8, 64> = RingBuffer::new();
    /// assert_eq!(buf.capacity(), 64);
    /// ```
    #[inline]
    pub fn capacity(&self) -> usize {
        A::CAPACITY
    }

    /// Returns the number of elements in the `RingBuf`.
    ///
    /// # Examples
    ///
    /// ```
    /// use arrayring::RingBuffer;
    ///
    /// let mut buf: RingBuffer<u8, 4> = RingBuffer::new();
    /// buf.push(1).unwrap();
    /// assert_eq!(buf.len(), 1);
    /// ```
    #[inline]
    pub fn len(&self) -> usize {
        if self.full {
            A::CAPACITY
        } else {
            count(self.read, self.write, A::CAPACITY)
        }
    }

    /// Returns the number of elements that can be pushed before the
    /// `RingBuf` is full.
    #[inline]
    pub fn free(&self) -> usize {
        self.capacity() - self.len()
    }

    /// Returns true if the buffer contains no elements
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.write == self.read && !self.full
    }

    /// Returns true if the buffer is full.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.full
    }

    /// Clears the buffer.
    ///
    /// Both cursors return to the first slot. Stored values are left in place
    /// and are simply no longer considered live.
    #[inline]
    pub fn clear(&mut self) {
        log::trace!("clearing ring buffer with {} live elements", self.len());
        self.write = 0;
        self.read = 0;
        self.full = false;
    }

    /// Appends an element to the back of the buffer.
    ///
    /// Return `Err(BufferError::Full)` without touching the buffer if it is
    /// full.
    ///
    /// # Examples
    ///
    /// ```
    /// use arrayring::{BufferError, RingBuffer};
    ///
    /// let mut buf: RingBuffer<_, 2> = RingBuffer::new();
    /// assert_eq!(buf.push(1), Ok(()));
    /// assert_eq!(buf.push(2), Ok(()));
    /// assert_eq!(buf.push(3), Err(BufferError::Full));
    /// ```
    #[inline]
    pub fn push(&mut self, element: A::Item) -> Result<(), BufferError> {
        if self.full {
            log::trace!("push rejected: all {} slots in use", A::CAPACITY);
            return Err(BufferError::Full);
        }
        self.push_unchecked(element);
        Ok(())
    }

    /// Appends an element to the back of the buffer without checking for
    /// space.
    ///
    /// The caller must make sure the buffer is not full. On a full buffer the
    /// oldest unread element is overwritten and the buffer keeps reporting
    /// itself as full, leaving its contents inconsistent.
    #[inline]
    pub fn push_unchecked(&mut self, element: A::Item) {
        self.xs.as_mut_slice()[self.write] = element;
        self.write = wrap_add(self.write, 1, A::CAPACITY);
        if self.write == self.read {
            self.full = true;
        }
    }

    /// Returns the live contents as a pair of slices: the run from the read
    /// cursor towards the end of storage, then the run wrapped to the start.
    ///
    /// # Examples
    ///
    /// ```
    /// use arrayring::RingBuffer;
    ///
    /// let mut buf: RingBuffer<_, 4> = RingBuffer::new();
    /// buf.push_batch(&[0, 0, 0]).unwrap();
    /// buf.pop_batch(&mut [0; 2]).unwrap();
    /// buf.push_batch(&[1, 2, 3]).unwrap();
    /// assert_eq!(buf.as_slices(), (&[0, 1][..], &[2, 3][..]));
    /// ```
    #[inline]
    pub fn as_slices(&self) -> (&[A::Item], &[A::Item]) {
        let ring = self.xs.as_slice();
        if self.is_empty() {
            (&ring[..0], &ring[..0])
        } else if self.write > self.read {
            (&ring[self.read..self.write], &ring[..0])
        } else {
            (&ring[self.read..], &ring[..self.write])
        }
    }

    /// Returns the live contents as a pair of mutable slices, split the same
    /// way as `as_slices`.
    ///
    /// # Examples
    ///
    /// ```
    /// use arrayring::RingBuffer;
    ///
    /// let mut buf: RingBuffer<_, 4> = RingBuffer::new();
    /// buf.push_batch(&[0, 0, 0]).unwrap();
    /// buf.pop_batch(&mut [0; 2]).unwrap();
    /// buf.push_batch(&[1, 2, 3]).unwrap();
    ///
    /// buf.as_mut_slices().0[0] = 42;
    /// buf.as_mut_slices().1[0] = 24;
    /// assert_eq!(buf.as_slices(), (&[42, 1][..], &[24, 3][..]));
    /// ```
    #[inline]
    pub fn as_mut_slices(&mut self) -> (&mut [A::Item], &mut [A::Item]) {
        let (read, write) = (self.read, self.write);
        let contiguous = write > read || self.is_empty();
        let ring = self.xs.as_mut_slice();

        if contiguous {
            let (mid, _) = ring.split_at_mut(write);
            let (empty, live) = mid.split_at_mut(read);
            (live, &mut empty[..0])
        } else {
            let (left, right) = ring.split_at_mut(read);
            (right, &mut left[..write])
        }
    }

    /// Returns a position anchored at the oldest element, on lap `0`.
    #[inline]
    pub fn begin(&self) -> Position<'_, A::Item> {
        Position::new(self.xs.as_slice(), self.read, 0)
    }

    /// Returns a marker one past the newest element.
    ///
    /// Its lap is `1` when the live range crosses the end of storage (or the
    /// buffer is full), so `begin() + len() == end()` always holds. The marker
    /// is a snapshot and goes stale once the buffer is mutated.
    #[inline]
    pub fn end(&self) -> EndMarker {
        let cycle = if self.write < self.read || self.full { 1 } else { 0 };
        EndMarker::new(self.write, cycle)
    }

    /// Returns a front-to-back iterator.
    ///
    /// # Examples
    ///
    /// ```
    /// use arrayring::RingBuffer;
    ///
    /// let mut buf: RingBuffer<_, 4> = RingBuffer::new();
    /// buf.push(5).unwrap();
    /// buf.push(3).unwrap();
    /// buf.push(4).unwrap();
    /// let b: &[_] = &[&5, &3, &4];
    /// let c: Vec<&i32> = buf.iter().collect();
    /// assert_eq!(&c[..], b);
    /// ```
    #[inline]
    pub fn iter(&self) -> Iter<'_, A::Item> {
        let front = self.begin();
        Iter {
            front,
            back: front + self.len() as isize,
        }
    }

    /// Returns a front-to-back iterator that allows modifying each element.
    ///
    /// # Examples
    ///
    /// ```
    /// use arrayring::RingBuffer;
    ///
    /// let mut buf: RingBuffer<_, 4> = RingBuffer::new();
    /// buf.push(5).unwrap();
    /// buf.push(3).unwrap();
    /// buf.push(4).unwrap();
    /// for num in buf.iter_mut() {
    ///     *num = *num - 2;
    /// }
    /// let b: &[_] = &[&mut 3, &mut 1, &mut 2];
    /// assert_eq!(&buf.iter_mut().collect::<Vec<&mut i32>>()[..], b);
    /// ```
    #[inline]
    pub fn iter_mut(&mut self) -> IterMut<'_, A::Item> {
        let (head, tail) = self.as_mut_slices();
        IterMut {
            head: head.iter_mut(),
            tail: tail.iter_mut(),
        }
    }
}

impl<A: Array> RingBuf<A>
    where A::Item: Clone
{
    /// Removes the oldest element and returns it.
    ///
    /// Return `Err(BufferError::Empty)` if the buffer is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use arrayring::{BufferError, RingBuffer};
    ///
    /// let mut buf: RingBuffer<_, 2> = RingBuffer::new();
    /// buf.push(1).unwrap();
    /// assert_eq!(buf.pop(), Ok(1));
    /// assert_eq!(buf.pop(), Err(BufferError::Empty));
    /// ```
    #[inline]
    pub fn pop(&mut self) -> Result<A::Item, BufferError> {
        if self.is_empty() {
            log::trace!("pop rejected: buffer empty");
            return Err(BufferError::Empty);
        }
        Ok(self.pop_unchecked())
    }

    /// Removes the oldest element without checking that one exists.
    ///
    /// The caller must make sure the buffer is not empty. On an empty buffer
    /// this returns whatever value the slot under the read cursor last held
    /// and leaves the buffer inconsistent.
    #[inline]
    pub fn pop_unchecked(&mut self) -> A::Item {
        let element = self.xs.as_slice()[self.read].clone();
        self.read = wrap_add(self.read, 1, A::CAPACITY);
        self.full = false;
        element
    }

    /// Appends every element of `items`, or none of them.
    ///
    /// Return `Err(BufferError::Full)` without touching the buffer if
    /// `items` does not fit in the free space.
    ///
    /// # Examples
    ///
    /// ```
    /// use arrayring::{BufferError, RingBuffer};
    ///
    /// let mut buf: RingBuffer<_, 4> = RingBuffer::new();
    /// assert_eq!(buf.push_batch(&[1, 2, 3]), Ok(()));
    /// assert_eq!(buf.push_batch(&[4, 5]), Err(BufferError::Full));
    /// assert_eq!(buf.len(), 3);
    /// ```
    pub fn push_batch(&mut self, items: &[A::Item]) -> Result<(), BufferError> {
        let free = self.free();
        if items.len() > free {
            log::trace!("push_batch rejected: {} elements requested, {} free", items.len(), free);
            return Err(BufferError::Full);
        }

        let write = self.write;
        let (head, tail) = items.split_at(cmp::min(items.len(), A::CAPACITY - write));
        let ring = self.xs.as_mut_slice();
        ring[write..write + head.len()].clone_from_slice(head);
        ring[..tail.len()].clone_from_slice(tail);

        self.write = wrap_add(write, items.len(), A::CAPACITY);
        if !items.is_empty() && self.write == self.read {
            self.full = true;
        }
        Ok(())
    }

    /// Removes exactly `out.len()` of the oldest elements into `out`.
    ///
    /// Return `Err(BufferError::Empty)` without touching the buffer if it
    /// holds fewer than `out.len()` elements.
    ///
    /// # Examples
    ///
    /// ```
    /// use arrayring::{BufferError, RingBuffer};
    ///
    /// let mut buf: RingBuffer<_, 4> = RingBuffer::new();
    /// buf.push_batch(&[1, 2, 3]).unwrap();
    ///
    /// let mut out = [0; 4];
    /// assert_eq!(buf.pop_batch(&mut out), Err(BufferError::Empty));
    /// assert_eq!(buf.pop_batch(&mut out[..2]), Ok(()));
    /// assert_eq!(out, [1, 2, 0, 0]);
    /// ```
    pub fn pop_batch(&mut self, out: &mut [A::Item]) -> Result<(), BufferError> {
        let len = self.len();
        if out.len() > len {
            log::trace!("pop_batch rejected: {} elements requested, {} available", out.len(), len);
            return Err(BufferError::Empty);
        }

        {
            let (head, tail) = self.as_slices();
            let split = cmp::min(out.len(), head.len());
            let (out_head, out_tail) = out.split_at_mut(split);
            out_head.clone_from_slice(&head[..split]);
            out_tail.clone_from_slice(&tail[..out_tail.len()]);
        }

        self.read = wrap_add(self.read, out.len(), A::CAPACITY);
        if !out.is_empty() {
            self.full = false;
        }
        Ok(())
    }
}

impl<A: Array> PartialEq for RingBuf<A>
    where A::Item: PartialEq
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

#[cfg(test)]
impl<'a, A: Array> PartialEq<&'a [A::Item]> for RingBuf<A> where A::Item: PartialEq {
    fn eq(&self, other: &&'a [A::Item]) -> bool {
        if self.len() != other.len() {
            return false;
        }
        self.iter().zip(other.iter()).all(|(l, r)| l == r)
    }
}

#[cfg(test)]
impl<A: Array> PartialEq<Vec<A::Item>> for RingBuf<A> where A::Item: PartialEq {
    fn eq(&self, other: &Vec<A::Item>) -> bool {
        *self == &other[..]
    }
}

impl<A: Array> Eq for RingBuf<A> where A::Item: Eq {}

impl<'a, A: Array> IntoIterator for &'a RingBuf<A> {
    type Item = &'a A::Item;
    type IntoIter = Iter<'a, A::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, A: Array> IntoIterator for &'a mut RingBuf<A> {
    type Item = &'a mut A::Item;
    type IntoIter = IterMut<'a, A::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<A: Array> fmt::Debug for RingBuf<A>
    where A::Item: fmt::Debug
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self).finish()
    }
}

#[inline]
fn wrap_add(index: usize, addend: usize, capacity: usize) -> usize {
    debug_assert!(addend <= capacity);
    (index + addend) % capacity
}

#[inline]
fn count(tail: usize, head: usize, capacity: usize) -> usize {
    debug_assert!(head < capacity);
    debug_assert!(tail < capacity);
    if head >= tail {
        head - tail
    } else {
        capacity + head - tail
    }
}

/// `RingBuf` iterator
///
/// Walks from `begin()` to the end of the live range with a pair of
/// [`Position`]s.
#[must_use = "iterator adaptors are lazy and do nothing unless consumed"]
pub struct Iter<'a, T: 'a> {
    front: Position<'a, T>,
    back: Position<'a, T>,
}

impl<'a, T> Clone for Iter<'a, T> {
    fn clone(&self) -> Self {
        Iter {
            front: self.front,
            back: self.back,
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<&'a T> {
        if self.front == self.back {
            return None;
        }
        let element = self.front.get();
        self.front.step_forward();
        Some(element)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.front.distance_to(&self.back) as usize;
        (len, Some(len))
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    #[inline]
    fn next_back(&mut self) -> Option<&'a T> {
        if self.front == self.back {
            return None;
        }
        self.back.step_back();
        Some(self.back.get())
    }
}

impl<'a, T> ExactSizeIterator for Iter<'a, T> {}

impl<'a, T> FusedIterator for Iter<'a, T> {}

/// `RingBuf` mutable iterator
///
/// Walks the run from the read cursor, then the run wrapped to the start of
/// storage.
#[must_use = "iterator adaptors are lazy and do nothing unless consumed"]
pub struct IterMut<'a, T: 'a> {
    head: slice::IterMut<'a, T>,
    tail: slice::IterMut<'a, T>,
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    #[inline]
    fn next(&mut self) -> Option<&'a mut T> {
        match self.head.next() {
            Some(element) => Some(element),
            None => self.tail.next(),
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.head.len() + self.tail.len();
        (len, Some(len))
    }
}

impl<'a, T> DoubleEndedIterator for IterMut<'a, T> {
    #[inline]
    fn next_back(&mut self) -> Option<&'a mut T> {
        match self.tail.next_back() {
            Some(element) => Some(element),
            None => self.head.next_back(),
        }
    }
}

impl<'a, T> ExactSizeIterator for IterMut<'a, T> {}

impl<'a, T> FusedIterator for IterMut<'a, T> {}

#[cfg(test)]
mod tests {
    use super::*;

    const CAPACITY: usize = 64;

    /// Starting offsets for the internal cursors.
    const SHIFTS: [usize; 7] = [0, 1, 17, 32, 63, 64, 100];

    /// An empty buffer whose cursors were moved `shift` slots forward.
    fn rotated<const N: usize>(shift: usize) -> RingBuffer<u32, N> {
        let mut buf = RingBuffer::<u32, N>::new();
        for _ in 0..shift {
            buf.push(0).unwrap();
            buf.pop().unwrap();
        }
        buf
    }

    fn fill_by_index<const N: usize>(buf: &mut RingBuffer<u32, N>) {
        for i in 0..N {
            buf.push(i as u32).unwrap();
        }
    }

    #[test]
    fn empty_properties() {
        for &shift in &SHIFTS {
            let mut buf = rotated::<CAPACITY>(shift);
            assert_eq!(buf.capacity(), CAPACITY);
            assert_eq!(buf.len(), 0);
            assert_eq!(buf.free(), CAPACITY);
            assert!(buf.is_empty());
            assert!(!buf.is_full());

            assert_eq!(buf.pop(), Err(BufferError::Empty));
            assert_eq!(buf.len(), 0);

            buf.push(0).unwrap();
            assert!(!buf.is_empty());
        }
    }

    #[test]
    fn full_properties() {
        for &shift in &SHIFTS {
            let mut buf = rotated::<CAPACITY>(shift);
            fill_by_index(&mut buf);

            assert_eq!(buf.len(), CAPACITY);
            assert_eq!(buf.free(), 0);
            assert!(!buf.is_empty());
            assert!(buf.is_full());

            assert_eq!(buf.push(0), Err(BufferError::Full));
            assert_eq!(buf.len(), CAPACITY);

            assert_eq!(buf.pop(), Ok(0));
            assert!(!buf.is_full());
        }
    }

    #[test]
    fn fifo_order() {
        let mut buf = rotated::<CAPACITY>(50);
        let data: Vec<u32> = (0..16).map(|i| i * 7 % 255).collect();
        for &x in &data {
            buf.push(x).unwrap();
        }
        assert_eq!(buf.len(), data.len());
        assert_eq!(buf.free(), CAPACITY - data.len());
        assert_eq!(buf, data);

        let read: Vec<u32> = (0..data.len()).map(|_| buf.pop().unwrap()).collect();
        assert_eq!(read, data);
        assert!(buf.is_empty());
        assert_eq!(buf.free(), CAPACITY);
    }

    #[test]
    fn push_unchecked_overwrites_oldest_when_full() {
        let mut buf: RingBuffer<u32, 4> = RingBuffer::new();
        buf.push_batch(&[0, 1, 2, 3]).unwrap();
        buf.push_unchecked(9);
        assert!(buf.is_full());
        assert_eq!(buf.pop(), Ok(9));
    }

    #[test]
    fn clear_keeps_stored_values() {
        let mut buf: RingBuffer<u32, 4> = RingBuffer::new();
        buf.push(5).unwrap();
        buf.push(6).unwrap();
        buf.clear();
        assert!(buf.is_empty());
        assert_eq!(buf.end(), buf.begin());
        assert_eq!(buf.pop_unchecked(), 5);
    }

    #[test]
    fn push_batch_too_long_leaves_buffer_untouched() {
        let mut buf = rotated::<8>(6);
        buf.push_batch(&[1, 2, 3, 4, 5]).unwrap();
        assert_eq!(buf.push_batch(&[6, 7, 8, 9]), Err(BufferError::Full));
        assert_eq!(buf.len(), 5);
        assert_eq!(buf, vec![1, 2, 3, 4, 5]);

        buf.push_batch(&[6, 7, 8]).unwrap();
        assert!(buf.is_full());
        assert_eq!(buf.push_batch(&[9]), Err(BufferError::Full));
        assert_eq!(buf, vec![1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn pop_batch_too_long_leaves_buffer_untouched() {
        let mut buf = rotated::<8>(5);
        buf.push_batch(&[1, 2, 3]).unwrap();
        let mut out = [0; 4];
        assert_eq!(buf.pop_batch(&mut out), Err(BufferError::Empty));
        assert_eq!(out, [0; 4]);
        assert_eq!(buf, vec![1, 2, 3]);

        let mut out = [0; 3];
        buf.pop_batch(&mut out).unwrap();
        assert_eq!(out, [1, 2, 3]);
        assert!(buf.is_empty());
    }

    #[test]
    fn batch_round_trip_across_wrap() {
        let data: Vec<u8> = (0..CAPACITY as u8).map(|i| i.wrapping_mul(37)).collect();

        for &shift in &SHIFTS {
            let mut buf: RingBuffer<u8, CAPACITY> = RingBuffer::new();
            for _ in 0..shift {
                buf.push(0).unwrap();
                buf.pop().unwrap();
            }

            buf.push_batch(&data).unwrap();
            assert!(buf.is_full());

            let mut out = [0u8; CAPACITY];
            buf.pop_batch(&mut out).unwrap();
            assert_eq!(&out[..], &data[..]);
            assert!(buf.is_empty());
        }
    }

    #[test]
    fn batch_split_at_storage_end() {
        let data: Vec<u8> = (100..130).collect();
        let mut buf: RingBuffer<u8, CAPACITY> = RingBuffer::new();
        buf.push_batch(&[0; 40]).unwrap();
        buf.pop_batch(&mut [0; 40]).unwrap();

        buf.push_batch(&data).unwrap();
        let (head, tail) = buf.as_slices();
        assert_eq!(head, &data[..24]);
        assert_eq!(tail, &data[24..]);
        assert_eq!(buf.end().index(), 6);
        assert_eq!(buf.end().cycle(), 1);

        let mut out = [0u8; 30];
        buf.pop_batch(&mut out).unwrap();
        assert_eq!(&out[..], &data[..]);
        assert!(buf.is_empty());
        assert_eq!(buf.begin().index(), 6);
    }

    #[test]
    fn empty_batches_keep_state() {
        let mut buf: RingBuffer<u32, 4> = RingBuffer::new();
        buf.push_batch(&[]).unwrap();
        assert!(buf.is_empty());
        assert!(!buf.is_full());

        buf.push_batch(&[1, 2, 3, 4]).unwrap();
        buf.pop_batch(&mut []).unwrap();
        assert!(buf.is_full());
        buf.push_batch(&[]).unwrap();
        assert_eq!(buf, vec![1, 2, 3, 4]);
    }

    #[test]
    fn end_cycle_bit() {
        let mut buf = rotated::<8>(6);
        assert_eq!(buf.end().cycle(), 0);
        buf.push(1).unwrap();
        assert_eq!(buf.end().cycle(), 0);
        buf.push(2).unwrap();
        assert_eq!(buf.end().index(), 0);
        assert_eq!(buf.end().cycle(), 1);
        buf.push_batch(&[3, 4, 5, 6, 7, 8]).unwrap();
        assert!(buf.is_full());
        assert_eq!(buf.end().cycle(), 1);
    }

    #[test]
    fn position_indexing() {
        for &shift in &SHIFTS {
            let mut buf = rotated::<CAPACITY>(shift);
            fill_by_index(&mut buf);

            let begin = buf.begin();
            for k in 0..CAPACITY {
                assert_eq!(begin[k], k as u32);
                assert_eq!(*(begin + k as isize).get(), k as u32);
            }
            assert_eq!(begin + CAPACITY as isize, buf.end());
            assert_eq!(buf.end() - begin, CAPACITY as isize);
        }
    }

    #[test]
    fn position_increment_reaches_end() {
        for &shift in &SHIFTS {
            let mut buf = rotated::<CAPACITY>(shift);
            fill_by_index(&mut buf);

            for &index in &[0, CAPACITY / 4, CAPACITY / 2, CAPACITY - 1] {
                let mut pos = buf.begin();
                for _ in 0..index {
                    pos.step_forward();
                }
                assert_eq!(*pos.get(), index as u32);

                let mut pos = buf.begin();
                pos += index as isize;
                assert_eq!(*pos.get(), index as u32);
                assert_eq!(*(index as isize + buf.begin()).get(), index as u32);
            }

            let mut pos = buf.begin();
            for _ in 0..CAPACITY {
                pos.step_forward();
            }
            assert_eq!(pos, buf.end());
        }
    }

    #[test]
    fn position_decrement_from_last() {
        const LAST: isize = CAPACITY as isize - 1;

        for &shift in &SHIFTS {
            let mut buf = rotated::<CAPACITY>(shift);
            fill_by_index(&mut buf);
            let last = buf.begin() + LAST;
            assert_eq!(*last.get(), LAST as u32);

            for &offset in &[0isize, LAST / 4, LAST / 2, LAST] {
                let expected = (LAST - offset) as u32;

                let mut pos = last;
                for _ in 0..offset {
                    pos.step_back();
                }
                assert_eq!(*pos.get(), expected);
                assert_eq!(pos - buf.end(), -(offset + 1));
                assert_eq!(buf.end() - pos, offset + 1);
                assert_eq!(pos - buf.begin(), LAST - offset);

                let mut pos = last;
                pos -= offset;
                assert_eq!(*pos.get(), expected);
                assert_eq!(*(last - offset).get(), expected);
            }
        }
    }

    #[test]
    fn single_element_positions() {
        for &shift in &SHIFTS {
            let mut buf = rotated::<CAPACITY>(shift);
            buf.push(5).unwrap();

            let mut pos = buf.begin();
            assert_eq!(*pos.get(), 5);
            pos.step_forward();
            assert_eq!(pos, buf.end());
        }
    }

    #[test]
    fn position_equality_and_ordering() {
        for &shift in &SHIFTS {
            let mut buf = rotated::<CAPACITY>(shift);
            assert_eq!(buf.begin(), buf.end());

            buf.push(5).unwrap();
            assert!(buf.begin() != buf.end());
            buf.pop().unwrap();

            fill_by_index(&mut buf);
            let begin = buf.begin();
            assert!(begin != buf.end());
            assert_eq!(begin, buf.begin());
            assert_eq!(begin + CAPACITY as isize, buf.end());

            for &index in &[1, CAPACITY / 4, CAPACITY / 2, CAPACITY] {
                let pos = begin + index as isize;
                assert!(pos != begin);
                assert!(pos > begin);
                assert!(begin < pos);
            }
        }
    }

    #[test]
    fn iter_follows_live_range() {
        let mut buf = rotated::<8>(5);
        buf.push_batch(&[1, 2, 3, 4, 5]).unwrap();

        let iter = buf.iter();
        assert_eq!(iter.len(), 5);
        assert_eq!(iter.clone().copied().collect::<Vec<_>>(), vec![1, 2, 3, 4, 5]);
        assert_eq!(iter.rev().copied().collect::<Vec<_>>(), vec![5, 4, 3, 2, 1]);

        let mut iter = buf.iter();
        assert_eq!(iter.next(), Some(&1));
        assert_eq!(iter.next_back(), Some(&5));
        assert_eq!(iter.len(), 3);
        assert_eq!((&buf).into_iter().count(), 5);

        let mut full = rotated::<8>(3);
        fill_by_index(&mut full);
        assert_eq!(full.iter().len(), 8);
        assert_eq!(full.iter().copied().collect::<Vec<_>>(), (0..8).collect::<Vec<_>>());
    }

    #[test]
    fn iter_mut_writes_live_elements() {
        for &shift in &SHIFTS {
            let mut buf = rotated::<CAPACITY>(shift);
            fill_by_index(&mut buf);

            assert_eq!(buf.iter_mut().len(), CAPACITY);
            for x in buf.iter_mut() {
                *x *= 3;
            }
            for k in 0..CAPACITY {
                assert_eq!(buf.pop(), Ok(k as u32 * 3));
            }
            assert!(buf.is_empty());
        }
    }

    #[test]
    fn iter_mut_both_ends() {
        let mut buf = rotated::<8>(5);
        buf.push_batch(&[1, 2, 3, 4, 5]).unwrap();

        {
            let mut iter = buf.iter_mut();
            *iter.next().unwrap() = 10;
            *iter.next_back().unwrap() = 50;
            assert_eq!(iter.len(), 3);
            assert_eq!(iter.rev().map(|x| *x).collect::<Vec<_>>(), vec![4, 3, 2]);
        }
        for x in &mut buf {
            *x += 1;
        }
        assert_eq!(buf, vec![11, 3, 4, 5, 51]);
        assert!(!buf.is_full());
        assert_eq!(buf.len(), 5);

        let mut empty = rotated::<8>(3);
        assert_eq!(empty.iter_mut().next(), None);
        let (head, tail) = empty.as_mut_slices();
        assert!(head.is_empty() && tail.is_empty());
    }

    #[test]
    fn as_mut_slices_match_as_slices() {
        for &shift in &SHIFTS {
            let mut buf = rotated::<CAPACITY>(shift);
            buf.push_batch(&[7; 40]).unwrap();

            let (head, tail) = buf.as_mut_slices();
            let (head_len, tail_len) = (head.len(), tail.len());
            head[0] = 1;
            if let Some(x) = tail.last_mut() {
                *x = 2;
            }

            let (head, tail) = buf.as_slices();
            assert_eq!((head.len(), tail.len()), (head_len, tail_len));
            assert_eq!(head_len + tail_len, 40);
            assert_eq!(buf.pop(), Ok(1));
            if tail_len > 0 {
                assert_eq!(*(buf.begin() + 38).get(), 2);
            }
        }
    }

    #[test]
    fn eq_ignores_cursor_placement() {
        let mut lhs = rotated::<8>(0);
        let mut rhs = rotated::<8>(6);
        lhs.push_batch(&[1, 2, 3]).unwrap();
        rhs.push_batch(&[1, 2, 3]).unwrap();
        assert_eq!(lhs, rhs);
        rhs.pop().unwrap();
        assert!(lhs != rhs);
    }

    #[test]
    fn debug_and_display() {
        let mut buf: RingBuffer<u8, 4> = RingBuffer::new();
        buf.push_batch(&[1, 2, 3]).unwrap();
        assert_eq!(format!("{:?}", buf), "[1, 2, 3]");
        assert_eq!(format!("{}", BufferError::Full), "Buffer full");
        assert_eq!(format!("{}", BufferError::Empty), "Buffer empty");
        assert!(BufferError::Full.is_full());
        assert!(BufferError::Empty.is_empty());
        assert!(BufferError::Full != BufferError::Empty);
    }
}
