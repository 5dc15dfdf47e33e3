//! Random access positions over the wrapped storage of a `RingBuf`.
//!
//! A [`Position`] pairs a physical slot index with a signed lap counter, so
//! the logical index `ptr + cycle * capacity` keeps growing (or shrinking)
//! across any number of wraps while the physical index stays in
//! `0..capacity`. Arithmetic is always defined, even when it lands on slots
//! that hold no live element; only the caller knows whether dereferencing
//! such a position is meaningful.
//!
//! Positions and markers obtained from *different* buffers must not be
//! compared or subtracted. This is not checked and the result is meaningless.

use core::cmp::Ordering;
use core::fmt;
use core::ops::{Add, AddAssign, Index, Sub, SubAssign};

/// A random access cursor into the storage of a `RingBuf`.
///
/// Obtained from [`RingBuf::begin`](crate::RingBuf::begin). It borrows the
/// buffer, so it can never outlive it nor observe a mutation.
///
/// # Examples
///
/// ```
/// use arrayring::RingBuffer;
///
/// let mut buf: RingBuffer<u32, 4> = RingBuffer::new();
/// buf.push_batch(&[10, 11, 12]).unwrap();
///
/// let begin = buf.begin();
/// assert_eq!(*(begin + 2).get(), 12);
/// assert_eq!(begin[1], 11);
/// assert_eq!(buf.end() - begin, 3);
/// ```
pub struct Position<'a, T: 'a> {
    ring: &'a [T],
    ptr: usize,
    cycle: isize,
}

/// Snapshot of the logical end of a `RingBuf`.
///
/// The marker holds no borrow. Once the buffer is mutated the marker no
/// longer tracks its end, and comparing it against positions taken after the
/// mutation gives unspecified (but memory safe) results.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct EndMarker {
    ptr: usize,
    cycle: isize,
}

/// Splits `offset` into whole laps and a forward remainder in `0..len`.
#[inline]
fn split_offset(offset: isize, len: usize) -> (isize, usize) {
    let len = len as isize;
    (offset.div_euclid(len), offset.rem_euclid(len) as usize)
}

/// `lhs - rhs` in logical slots, exact whenever the result fits an `isize`.
#[inline]
fn logical_diff(lhs: (usize, isize), rhs: (usize, isize), len: usize) -> isize {
    let laps = lhs.1.wrapping_sub(rhs.1);
    let slots = lhs.0 as isize - rhs.0 as isize;
    laps.wrapping_mul(len as isize).wrapping_add(slots)
}

impl<'a, T> Position<'a, T> {
    #[inline]
    pub(crate) fn new(ring: &'a [T], ptr: usize, cycle: isize) -> Self {
        debug_assert!(ptr < ring.len(), "ptr={} len={}", ptr, ring.len());
        Position { ring, ptr, cycle }
    }

    /// Physical slot index, always in `0..capacity`.
    #[inline]
    pub fn index(&self) -> usize {
        self.ptr
    }

    /// Number of times the position has wrapped relative to `begin()`.
    #[inline]
    pub fn cycle(&self) -> isize {
        self.cycle
    }

    /// Returns a reference to the slot under the position.
    #[inline]
    pub fn get(&self) -> &'a T {
        &self.ring[self.ptr]
    }

    /// Returns the slot `index` steps ahead without moving the position.
    ///
    /// Wraps around the storage for any `index`.
    #[inline]
    pub fn at(&self, index: usize) -> &'a T {
        let len = self.ring.len();
        &self.ring[(self.ptr + index % len) % len]
    }

    /// Moves one slot forward.
    #[inline]
    pub fn step_forward(&mut self) {
        if self.ptr + 1 == self.ring.len() {
            self.ptr = 0;
            self.cycle = self.cycle.wrapping_add(1);
        } else {
            self.ptr += 1;
        }
    }

    /// Moves one slot back.
    #[inline]
    pub fn step_back(&mut self) {
        if self.ptr == 0 {
            self.ptr = self.ring.len() - 1;
            self.cycle = self.cycle.wrapping_sub(1);
        } else {
            self.ptr -= 1;
        }
    }

    /// Moves `offset` slots forward (backward if negative) in one step.
    #[inline]
    pub fn advance_by(&mut self, offset: isize) {
        let (laps, rem) = split_offset(offset, self.ring.len());
        self.wrap_forward(laps, rem);
    }

    /// Moves `offset` slots backward (forward if negative) in one step.
    ///
    /// `isize::MIN` is accepted; the offset is never negated.
    #[inline]
    pub fn retreat_by(&mut self, offset: isize) {
        let len = self.ring.len();
        let (laps, rem) = split_offset(offset, len);
        // -(laps * len + rem) == (-laps - 1) * len + (len - rem)
        if rem == 0 {
            self.wrap_forward(laps.wrapping_neg(), 0);
        } else {
            self.wrap_forward(laps.wrapping_neg().wrapping_sub(1), len - rem);
        }
    }

    /// Returns the position `offset` slots away.
    #[inline]
    pub fn offset(mut self, offset: isize) -> Self {
        self.advance_by(offset);
        self
    }

    /// Signed number of slots from `self` to `other`, i.e. `other - self`.
    #[inline]
    pub fn distance_to(&self, other: &Self) -> isize {
        logical_diff(other.parts(), self.parts(), self.ring.len())
    }

    #[inline]
    fn parts(&self) -> (usize, isize) {
        (self.ptr, self.cycle)
    }

    #[inline]
    fn wrap_forward(&mut self, laps: isize, rem: usize) {
        debug_assert!(rem < self.ring.len());
        let len = self.ring.len();
        let mut cycle = self.cycle.wrapping_add(laps);
        let mut ptr = self.ptr + rem;
        if ptr >= len {
            ptr -= len;
            cycle = cycle.wrapping_add(1);
        }
        self.ptr = ptr;
        self.cycle = cycle;
    }
}

impl EndMarker {
    #[inline]
    pub(crate) fn new(ptr: usize, cycle: isize) -> Self {
        EndMarker { ptr, cycle }
    }

    /// Physical slot index of the end.
    #[inline]
    pub fn index(&self) -> usize {
        self.ptr
    }

    /// `1` if the end lies past the physical end of storage relative to
    /// `begin()`, else `0`.
    #[inline]
    pub fn cycle(&self) -> isize {
        self.cycle
    }

    #[inline]
    fn parts(&self) -> (usize, isize) {
        (self.ptr, self.cycle)
    }
}

impl<'a, T> Clone for Position<'a, T> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, T> Copy for Position<'a, T> {}

impl<'a, T> PartialEq for Position<'a, T> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.cycle == other.cycle && self.ptr == other.ptr
    }
}

impl<'a, T> Eq for Position<'a, T> {}

impl<'a, T> PartialOrd for Position<'a, T> {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<'a, T> Ord for Position<'a, T> {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.cycle.cmp(&other.cycle).then(self.ptr.cmp(&other.ptr))
    }
}

impl<'a, T> PartialEq<EndMarker> for Position<'a, T> {
    #[inline]
    fn eq(&self, other: &EndMarker) -> bool {
        self.parts() == other.parts()
    }
}

impl<'a, T> PartialEq<Position<'a, T>> for EndMarker {
    #[inline]
    fn eq(&self, other: &Position<'a, T>) -> bool {
        self.parts() == other.parts()
    }
}

impl<'a, T> PartialOrd<EndMarker> for Position<'a, T> {
    #[inline]
    fn partial_cmp(&self, other: &EndMarker) -> Option<Ordering> {
        Some(self.cycle.cmp(&other.cycle).then(self.ptr.cmp(&other.ptr)))
    }
}

impl<'a, T> PartialOrd<Position<'a, T>> for EndMarker {
    #[inline]
    fn partial_cmp(&self, other: &Position<'a, T>) -> Option<Ordering> {
        Some(self.cycle.cmp(&other.cycle).then(self.ptr.cmp(&other.ptr)))
    }
}

impl<'a, T> Add<isize> for Position<'a, T> {
    type Output = Position<'a, T>;

    #[inline]
    fn add(self, offset: isize) -> Self::Output {
        self.offset(offset)
    }
}

impl<'a, T> Add<Position<'a, T>> for isize {
    type Output = Position<'a, T>;

    #[inline]
    fn add(self, position: Position<'a, T>) -> Self::Output {
        position.offset(self)
    }
}

impl<'a, T> Sub<isize> for Position<'a, T> {
    type Output = Position<'a, T>;

    #[inline]
    fn sub(mut self, offset: isize) -> Self::Output {
        self.retreat_by(offset);
        self
    }
}

impl<'a, T> AddAssign<isize> for Position<'a, T> {
    #[inline]
    fn add_assign(&mut self, offset: isize) {
        self.advance_by(offset);
    }
}

impl<'a, T> SubAssign<isize> for Position<'a, T> {
    #[inline]
    fn sub_assign(&mut self, offset: isize) {
        self.retreat_by(offset);
    }
}

impl<'a, T> Sub for Position<'a, T> {
    type Output = isize;

    #[inline]
    fn sub(self, other: Self) -> isize {
        other.distance_to(&self)
    }
}

impl<'a, T> Sub<EndMarker> for Position<'a, T> {
    type Output = isize;

    #[inline]
    fn sub(self, end: EndMarker) -> isize {
        logical_diff(self.parts(), end.parts(), self.ring.len())
    }
}

impl<'a, T> Sub<Position<'a, T>> for EndMarker {
    type Output = isize;

    #[inline]
    fn sub(self, position: Position<'a, T>) -> isize {
        logical_diff(self.parts(), position.parts(), position.ring.len())
    }
}

impl<'a, T> Index<usize> for Position<'a, T> {
    type Output = T;

    #[inline]
    fn index(&self, index: usize) -> &T {
        self.at(index)
    }
}

impl<'a, T> fmt::Debug for Position<'a, T>
    where T: fmt::Debug
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Position")
            .field("ptr", &self.ptr)
            .field("cycle", &self.cycle)
            .field("data", &self.ring)
            .finish()
    }
}
