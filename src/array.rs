//! Fixed-size arrays.

/// Trait for fixed size arrays used as `RingBuf` storage.
pub trait Array {
    /// The array’s element type
    type Item;

    /// Number of elements the array holds.
    const CAPACITY: usize;

    /// Creates an array with every slot set to `Item::default()`.
    fn from_default() -> Self
        where Self::Item: Default;

    /// Converts the array to immutable slice
    fn as_slice(&self) -> &[Self::Item];

    /// Converts the array to mutable slice
    fn as_mut_slice(&mut self) -> &mut [Self::Item];
}

impl<T, const N: usize> Array for [T; N] {
    type Item = T;

    const CAPACITY: usize = N;

    #[inline]
    fn from_default() -> Self
        where T: Default
    {
        core::array::from_fn(|_| T::default())
    }

    #[inline(always)]
    fn as_slice(&self) -> &[T] {
        self
    }

    #[inline(always)]
    fn as_mut_slice(&mut self) -> &mut [T] {
        self
    }
}

#[cfg(feature = "use_generic_array")]
mod generic_impl {
    use super::Array;
    use generic_array::typenum::Unsigned;
    use generic_array::{ArrayLength, GenericArray};

    impl<T, N> Array for GenericArray<T, N>
        where N: ArrayLength<T>
    {
        type Item = T;

        const CAPACITY: usize = N::USIZE;

        #[inline]
        fn from_default() -> Self
            where T: Default
        {
            GenericArray::default()
        }

        #[inline(always)]
        fn as_slice(&self) -> &[T] {
            GenericArray::as_slice(self)
        }

        #[inline(always)]
        fn as_mut_slice(&mut self) -> &mut [T] {
            GenericArray::as_mut_slice(self)
        }
    }
}
