use alloc::vec::Vec;
use core::{
    borrow::Borrow,
    cmp,
    convert::Infallible,
    fmt,
    hash::{Hash, Hasher},
    mem::{ManuallyDrop, MaybeUninit},
    ops::Deref,
    ptr, slice,
};

#[allow(unused_imports)]
use crate::{
    array_data::ArrayOptions,
    error::{AllocErrorImpl, TryReserveError},
    growth,
    growth::{AllocationOption, CutResult, GrowthPosition},
    msrv::NonNullExt,
    pointer::ArrayDataPointer,
    utils::{debug_slice, panic_index_out_of_bounds, panic_out_of_range, UnwrapChecked},
};

/// A growable array whose storage is implicitly shared between clones.
///
/// Cloning a `SharedVec` only increments the reference count of its block; the first
/// mutation of a shared block copies the elements into a block owned by the mutated
/// vector ("copy-on-write", or detach). Read accesses never copy.
///
/// The vector keeps track of free space on both sides of its elements, so that
/// [`prepend`](Self::prepend) and [`remove(0)`](Self::remove) are as cheap as their
/// counterparts at the end.
///
/// ```rust
/// use shared_array::SharedVec;
///
/// let mut a = SharedVec::from_slice(&[1, 2, 3]);
/// let b = a.clone();
/// assert!(a.is_shared_with(&b));
/// a.push(4);
/// assert_eq!(a, [1, 2, 3, 4]);
/// assert_eq!(b, [1, 2, 3]);
/// ```
///
/// Mutations that may allocate come in two flavors: the plain ones, enabled by the
/// `oom-handling` feature, panic on capacity overflow and abort on allocation failure,
/// while the `try_` ones return a [`TryReserveError`].
pub struct SharedVec<T> {
    pub(crate) d: ArrayDataPointer<T>,
}

impl<T> SharedVec<T> {
    /// Creates an empty vector, without allocating.
    pub const fn new() -> Self {
        Self {
            d: ArrayDataPointer::null(),
        }
    }

    /// Creates a vector viewing static data, without allocating nor copying.
    ///
    /// The data is copied the first time the vector is mutated.
    pub fn from_static(slice: &'static [T]) -> Self {
        Self {
            d: ArrayDataPointer::from_static(slice),
        }
    }

    pub(crate) fn with_capacity_impl<E: AllocErrorImpl>(capacity: usize) -> Result<Self, E> {
        Ok(Self {
            d: ArrayDataPointer::allocate_impl::<E>(capacity, AllocationOption::KeepSize)?,
        })
    }

    /// Creates an empty vector with room for exactly `capacity` elements.
    #[cfg(feature = "oom-handling")]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_impl::<Infallible>(capacity).unwrap_checked()
    }

    pub fn try_with_capacity(capacity: usize) -> Result<Self, TryReserveError> {
        Self::with_capacity_impl::<TryReserveError>(capacity)
    }

    fn from_vec_impl<E: AllocErrorImpl>(mut vec: Vec<T>) -> Result<Self, E> {
        let mut this = Self::with_capacity_impl::<E>(vec.len())?;
        unsafe {
            ptr::copy_nonoverlapping(vec.as_ptr(), this.d.ptr.as_ptr(), vec.len());
            this.d.size = vec.len();
            vec.set_len(0);
        }
        Ok(this)
    }

    fn from_array_impl<E: AllocErrorImpl, const N: usize>(array: [T; N]) -> Result<Self, E> {
        let mut this = Self::with_capacity_impl::<E>(N)?;
        let array = ManuallyDrop::new(array);
        unsafe { ptr::copy_nonoverlapping(array.as_ptr(), this.d.ptr.as_ptr(), N) };
        this.d.size = N;
        Ok(this)
    }

    pub fn try_from_array<const N: usize>(array: [T; N]) -> Result<Self, TryReserveError> {
        Self::from_array_impl::<TryReserveError, N>(array)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.d.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.d.is_empty()
    }

    /// Number of elements the block can hold, including the free space before the first
    /// element.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.d.allocated_capacity()
    }

    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.d.as_ptr()
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        self.d.as_slice()
    }

    /// The underlying holder of the block.
    #[inline]
    pub fn data_pointer(&self) -> &ArrayDataPointer<T> {
        &self.d
    }

    /// Whether the block may be observed by another vector (or is static/null).
    #[inline]
    pub fn is_shared(&self) -> bool {
        self.d.is_shared()
    }

    /// Whether the vector is the unique holder of an allocated block.
    #[inline]
    pub fn is_detached(&self) -> bool {
        !self.d.is_shared()
    }

    /// Whether both vectors view the same elements.
    #[inline]
    pub fn is_shared_with(&self, other: &Self) -> bool {
        self.d.is_shared_with(&other.d)
    }

    /// Whether the capacity was explicitly reserved and is kept across detaches.
    #[inline]
    pub fn is_capacity_reserved(&self) -> bool {
        self.d.flags().contains(ArrayOptions::CAPACITY_RESERVED)
    }

    /// Returns a mutable slice if no other vector can observe the elements, without
    /// detaching.
    #[inline]
    pub fn get_mut(&mut self) -> Option<&mut [T]> {
        self.d.get_mut()
    }

    /// Appends `value` if the vector is detached and has free space at the end, giving it
    /// back otherwise.
    pub fn push_within_capacity(&mut self, value: T) -> Result<(), T> {
        if self.d.needs_detach() || self.d.free_space_at_end() == 0 {
            return Err(value);
        }
        unsafe { self.d.ptr.add(self.d.size).write(value) };
        self.d.size += 1;
        Ok(())
    }

    /// Removes every element.
    ///
    /// A detached vector keeps its block; a shared one releases it and becomes empty
    /// without allocating.
    pub fn clear(&mut self) {
        if self.d.needs_detach() {
            self.d = ArrayDataPointer::null();
        } else {
            unsafe { self.d.truncate(0) };
        }
    }

    /// Free space after the last element, empty if the vector is not detached.
    pub fn spare_capacity_mut(&mut self) -> &mut [MaybeUninit<T>] {
        if self.d.needs_detach() {
            return &mut [];
        }
        unsafe {
            let end = self.d.ptr.add(self.d.size).as_ptr().cast();
            slice::from_raw_parts_mut(end, self.d.free_space_at_end())
        }
    }

    /// # Safety
    ///
    /// The vector must be detached, `new_len` must not exceed the length plus the free
    /// space at the end, and the first `new_len` elements must be initialized.
    pub unsafe fn set_len(&mut self, new_len: usize) {
        debug_assert!(new_len <= self.len() || !self.d.needs_detach());
        self.d.size = new_len;
    }

    /// Converts into a `Vec`, moving the elements out if the vector is detached.
    pub fn into_vec(mut self) -> Vec<T>
    where
        T: Clone,
    {
        if self.d.needs_detach() {
            return self.as_slice().to_vec();
        }
        let len = self.len();
        let mut vec = Vec::with_capacity(len);
        unsafe {
            ptr::copy_nonoverlapping(self.d.ptr.as_ptr(), vec.as_mut_ptr(), len);
            vec.set_len(len);
        }
        self.d.size = 0;
        vec
    }
}

impl<T: Clone> SharedVec<T> {
    fn from_slice_impl<E: AllocErrorImpl>(slice: &[T]) -> Result<Self, E> {
        let mut this = Self::with_capacity_impl::<E>(slice.len())?;
        unsafe { this.d.copy_append(slice) };
        Ok(this)
    }

    /// Creates a vector by cloning the elements of `slice`.
    #[cfg(feature = "oom-handling")]
    pub fn from_slice(slice: &[T]) -> Self {
        Self::from_slice_impl::<Infallible>(slice).unwrap_checked()
    }

    pub fn try_from_slice(slice: &[T]) -> Result<Self, TryReserveError> {
        Self::from_slice_impl::<TryReserveError>(slice)
    }

    /// Makes the vector the unique holder of its block, copying the elements if they are
    /// shared.
    #[cfg(feature = "oom-handling")]
    pub fn detach(&mut self) {
        self.d.detach_impl::<Infallible>().unwrap_checked();
    }

    pub fn try_detach(&mut self) -> Result<(), TryReserveError> {
        self.d.detach_impl::<TryReserveError>()
    }

    /// Detaches the vector and returns a mutable slice of its elements.
    #[cfg(feature = "oom-handling")]
    pub fn make_mut(&mut self) -> &mut [T] {
        self.detach();
        unsafe { self.d.as_mut_slice_unchecked() }
    }

    fn reserve_impl<E: AllocErrorImpl>(&mut self, additional: usize) -> Result<(), E> {
        let len = self.len();
        let requested = len.checked_add(additional).ok_or_else(E::capacity_overflow)?;
        if !self.d.needs_detach()
            && requested <= self.d.allocated_capacity() - self.d.free_space_at_begin()
        {
            if !self.is_capacity_reserved() {
                self.d.set_flag(ArrayOptions::CAPACITY_RESERVED);
            }
            return Ok(());
        }
        // a shared block is detached, keeping its reserved capacity if larger
        let capacity = self.d.detach_capacity(requested);
        self.d.reallocate_exact::<E>(capacity, len)?;
        if self.d.is_mutable() {
            self.d.set_flag(ArrayOptions::CAPACITY_RESERVED);
        }
        Ok(())
    }

    /// Ensures room for at least `additional` more elements, and marks the capacity as
    /// reserved: it will be kept when the vector is detached or shrunk, until
    /// [`squeeze`](Self::squeeze).
    ///
    /// The reservation is exact, unlike the geometric growth of appends.
    #[cfg(feature = "oom-handling")]
    pub fn reserve(&mut self, additional: usize) {
        self.reserve_impl::<Infallible>(additional).unwrap_checked();
    }

    pub fn try_reserve(&mut self, additional: usize) -> Result<(), TryReserveError> {
        self.reserve_impl::<TryReserveError>(additional)
    }

    fn squeeze_impl<E: AllocErrorImpl>(&mut self) -> Result<(), E> {
        if !self.d.is_mutable() {
            return Ok(());
        }
        let len = self.len();
        if self.d.needs_detach() || len < self.capacity() {
            self.d.reallocate_exact::<E>(len, len)?;
        }
        if self.d.is_mutable() {
            self.d.clear_flag(ArrayOptions::CAPACITY_RESERVED);
        }
        Ok(())
    }

    /// Shrinks the capacity to the length, and clears the reserved capacity mark.
    #[cfg(feature = "oom-handling")]
    pub fn squeeze(&mut self) {
        self.squeeze_impl::<Infallible>().unwrap_checked();
    }

    pub fn try_squeeze(&mut self) -> Result<(), TryReserveError> {
        self.squeeze_impl::<TryReserveError>()
    }

    fn extend_from_slice_impl<E: AllocErrorImpl>(&mut self, slice: &[T]) -> Result<(), E> {
        self.d.detach_and_grow::<E>(GrowthPosition::GrowsAtEnd, slice.len())?;
        unsafe { self.d.copy_append(slice) };
        Ok(())
    }

    #[cfg(feature = "oom-handling")]
    pub fn extend_from_slice(&mut self, slice: &[T]) {
        self.extend_from_slice_impl::<Infallible>(slice).unwrap_checked();
    }

    pub fn try_extend_from_slice(&mut self, slice: &[T]) -> Result<(), TryReserveError> {
        self.extend_from_slice_impl::<TryReserveError>(slice)
    }

    /// Ensures room for `additional` elements at the end, growing the block geometrically
    /// if needed.
    #[cfg(feature = "oom-handling")]
    pub(crate) fn grow_at_end(&mut self, additional: usize) {
        self.d
            .detach_and_grow::<Infallible>(GrowthPosition::GrowsAtEnd, additional)
            .unwrap_checked();
    }

    fn push_impl<E: AllocErrorImpl>(&mut self, value: T) -> Result<(), E> {
        self.d.detach_and_grow::<E>(GrowthPosition::GrowsAtEnd, 1)?;
        unsafe { self.d.ptr.add(self.d.size).write(value) };
        self.d.size += 1;
        Ok(())
    }

    /// Appends an element, growing the block geometrically if needed.
    #[cfg(feature = "oom-handling")]
    pub fn push(&mut self, value: T) {
        self.push_impl::<Infallible>(value).unwrap_checked();
    }

    pub fn try_push(&mut self, value: T) -> Result<(), TryReserveError> {
        self.push_impl::<TryReserveError>(value)
    }

    /// Inserts an element at the beginning, using the free space before the first
    /// element.
    #[cfg(feature = "oom-handling")]
    pub fn prepend(&mut self, value: T) {
        self.insert(0, value);
    }

    /// Inserts an element at `index`, shifting the following ones.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    #[cfg(feature = "oom-handling")]
    pub fn insert(&mut self, index: usize, value: T) {
        let len = self.len();
        if index > len {
            panic_out_of_range(index, len);
        }
        if index == 0 && len != 0 {
            self.d
                .detach_and_grow::<Infallible>(GrowthPosition::GrowsAtBeginning, 1)
                .unwrap_checked();
            unsafe {
                self.d.ptr = self.d.ptr.sub(1);
                self.d.ptr.write(value);
            }
        } else {
            self.d
                .detach_and_grow::<Infallible>(GrowthPosition::GrowsAtEnd, 1)
                .unwrap_checked();
            unsafe {
                let at = self.d.ptr.add(index);
                ptr::copy(at.as_ptr(), at.add(1).as_ptr(), len - index);
                at.write(value);
            }
        }
        self.d.size += 1;
    }

    /// Inserts clones of `slice` at `index`, shifting the following elements.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    #[cfg(feature = "oom-handling")]
    pub fn insert_from_slice(&mut self, index: usize, slice: &[T]) {
        let len = self.len();
        if index > len {
            panic_out_of_range(index, len);
        }
        let n = slice.len();
        if n == 0 {
            return;
        }
        if index == 0 && len != 0 {
            self.d
                .detach_and_grow::<Infallible>(GrowthPosition::GrowsAtBeginning, n)
                .unwrap_checked();
            // elements are written backwards, each one becoming the new first element, so
            // that a panicking `clone` leaves the vector consistent
            for item in slice.iter().rev() {
                unsafe {
                    self.d.ptr = self.d.ptr.sub(1);
                    self.d.ptr.write(item.clone());
                }
                self.d.size += 1;
            }
        } else {
            self.d
                .detach_and_grow::<Infallible>(GrowthPosition::GrowsAtEnd, n)
                .unwrap_checked();
            unsafe {
                let at = self.d.ptr.add(index);
                // leak the shifted tail rather than double drop it if `clone` panics
                self.d.size = index;
                ptr::copy(at.as_ptr(), at.add(n).as_ptr(), len - index);
                for (i, item) in slice.iter().enumerate() {
                    at.add(i).write(item.clone());
                }
            }
            self.d.size = len + n;
        }
    }

    /// Removes and returns the element at `index`, shifting the following ones.
    ///
    /// Removing the first element only moves the start of the vector.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len`.
    #[cfg(feature = "oom-handling")]
    pub fn remove(&mut self, index: usize) -> T {
        let len = self.len();
        if index >= len {
            panic_index_out_of_bounds(index, len);
        }
        self.detach();
        unsafe {
            let at = self.d.ptr.add(index);
            let value = at.read();
            if index == 0 && len > 1 {
                self.d.ptr = self.d.ptr.add(1);
            } else {
                ptr::copy(at.add(1).as_ptr(), at.as_ptr(), len - index - 1);
            }
            self.d.size -= 1;
            value
        }
    }

    #[cfg(feature = "oom-handling")]
    pub fn pop(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        self.detach();
        self.d.size -= 1;
        Some(unsafe { self.d.ptr.add(self.d.size).read() })
    }

    #[cfg(feature = "oom-handling")]
    pub fn pop_front(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        Some(self.remove(0))
    }

    /// Shortens the vector to `len` elements.
    ///
    /// A shared vector detaches into a block of `len` elements (or of the reserved
    /// capacity), without copying the truncated elements.
    #[cfg(feature = "oom-handling")]
    pub fn truncate(&mut self, len: usize) {
        if len >= self.len() {
            return;
        }
        if self.d.needs_detach() {
            self.d
                .reallocate_exact::<Infallible>(self.d.detach_capacity(len), len)
                .unwrap_checked();
        } else {
            unsafe { self.d.truncate(len) };
        }
    }

    /// Resizes the vector to `new_len` elements, filling new slots with clones of `value`.
    ///
    /// Growing past the capacity allocates exactly what is needed.
    #[cfg(feature = "oom-handling")]
    pub fn resize(&mut self, new_len: usize, value: T) {
        let len = self.len();
        if self.d.needs_detach()
            || new_len > self.d.allocated_capacity() - self.d.free_space_at_begin()
        {
            self.d
                .reallocate_exact::<Infallible>(
                    self.d.detach_capacity(new_len),
                    cmp::min(new_len, len),
                )
                .unwrap_checked();
        }
        if new_len <= self.len() {
            unsafe { self.d.truncate(new_len) };
            return;
        }
        while self.d.size < new_len {
            unsafe { self.d.ptr.add(self.d.size).write(value.clone()) };
            self.d.size += 1;
        }
    }

    /// Removes the first `count` elements.
    ///
    /// # Panics
    ///
    /// Panics if `count > len`.
    #[cfg(feature = "oom-handling")]
    pub fn advance(&mut self, count: usize) {
        let len = self.len();
        if count > len {
            panic_out_of_range(count, len);
        }
        if count == 0 {
            return;
        }
        if self.d.needs_detach() {
            *self = Self::from_slice(&self[count..]);
            return;
        }
        unsafe {
            let head = ptr::slice_from_raw_parts_mut(self.d.ptr.as_ptr(), count);
            self.d.ptr = self.d.ptr.add(count);
            self.d.size -= count;
            ptr::drop_in_place(head);
        }
    }

    /// Returns the `length` elements starting at `position`.
    ///
    /// A negative `position` counts elements before the start, which are cut from
    /// `length`; a negative `length` means up to the end. The whole vector is shared
    /// rather than copied, and an out-of-range request gives an empty vector.
    ///
    /// ```rust
    /// use shared_array::SharedVec;
    ///
    /// let v = SharedVec::from_slice(&[0, 1, 2, 3, 4]);
    /// assert_eq!(v.mid(1, 2), [1, 2]);
    /// assert_eq!(v.mid(-2, 3), [0]);
    /// assert_eq!(v.mid(3, -1), [3, 4]);
    /// assert!(v.mid(0, -1).is_shared_with(&v));
    /// assert!(v.mid(7, 1).is_empty());
    /// ```
    #[cfg(feature = "oom-handling")]
    pub fn mid(&self, position: isize, length: isize) -> Self {
        let original_length = isize::try_from(self.len()).unwrap_or(isize::MAX);
        match growth::mid(original_length, position, length) {
            (CutResult::Null | CutResult::Empty, _, _) => Self::new(),
            (CutResult::Full, _, _) => self.clone(),
            (CutResult::Subset, position, length) => {
                let start = position as usize;
                Self::from_slice(&self[start..start + length as usize])
            }
        }
    }
}

impl<T> Clone for SharedVec<T> {
    fn clone(&self) -> Self {
        Self { d: self.d.clone() }
    }
}

impl<T> Default for SharedVec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Deref for SharedVec<T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        self.as_slice()
    }
}

impl<T> AsRef<[T]> for SharedVec<T> {
    fn as_ref(&self) -> &[T] {
        self
    }
}

impl<T> Borrow<[T]> for SharedVec<T> {
    fn borrow(&self) -> &[T] {
        self
    }
}

impl<T: fmt::Debug + 'static> fmt::Debug for SharedVec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        debug_slice(self.as_slice(), f)
    }
}

impl<T: Hash> Hash for SharedVec<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_slice().hash(state);
    }
}

impl<T: PartialEq> PartialEq for SharedVec<T> {
    fn eq(&self, other: &Self) -> bool {
        self.is_shared_with(other) || **self == **other
    }
}

impl<T: Eq> Eq for SharedVec<T> {}

impl<T: PartialOrd> PartialOrd for SharedVec<T> {
    fn partial_cmp(&self, other: &Self) -> Option<cmp::Ordering> {
        (**self).partial_cmp(&**other)
    }
}

impl<T: Ord> Ord for SharedVec<T> {
    fn cmp(&self, other: &Self) -> cmp::Ordering {
        (**self).cmp(&**other)
    }
}

impl<T: PartialEq> PartialEq<[T]> for SharedVec<T> {
    fn eq(&self, other: &[T]) -> bool {
        **self == *other
    }
}

impl<'a, T: PartialEq> PartialEq<&'a [T]> for SharedVec<T> {
    fn eq(&self, other: &&'a [T]) -> bool {
        **self == **other
    }
}

impl<T: PartialEq, const N: usize> PartialEq<[T; N]> for SharedVec<T> {
    fn eq(&self, other: &[T; N]) -> bool {
        **self == *other
    }
}

impl<'a, T: PartialEq, const N: usize> PartialEq<&'a [T; N]> for SharedVec<T> {
    fn eq(&self, other: &&'a [T; N]) -> bool {
        **self == **other
    }
}

impl<T: PartialEq> PartialEq<Vec<T>> for SharedVec<T> {
    fn eq(&self, other: &Vec<T>) -> bool {
        **self == **other
    }
}

impl<T: PartialEq> PartialEq<SharedVec<T>> for Vec<T> {
    fn eq(&self, other: &SharedVec<T>) -> bool {
        **self == **other
    }
}

impl<T: PartialEq> PartialEq<SharedVec<T>> for [T] {
    fn eq(&self, other: &SharedVec<T>) -> bool {
        *self == **other
    }
}

impl<'a, T> IntoIterator for &'a SharedVec<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(feature = "oom-handling")]
impl<T: Clone> Extend<T> for SharedVec<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        self.d
            .detach_and_grow::<Infallible>(GrowthPosition::GrowsAtEnd, iter.size_hint().0)
            .unwrap_checked();
        for item in iter {
            self.push(item);
        }
    }
}

#[cfg(feature = "oom-handling")]
impl<'a, T: Copy + 'a> Extend<&'a T> for SharedVec<T> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied());
    }
}

#[cfg(feature = "oom-handling")]
impl<T: Clone> FromIterator<T> for SharedVec<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut this = Self::new();
        this.extend(iter);
        this
    }
}

#[cfg(feature = "oom-handling")]
impl<'a, T: Clone> From<&'a [T]> for SharedVec<T> {
    fn from(value: &'a [T]) -> Self {
        Self::from_slice(value)
    }
}

#[cfg(feature = "oom-handling")]
impl<T> From<Vec<T>> for SharedVec<T> {
    fn from(value: Vec<T>) -> Self {
        Self::from_vec_impl::<Infallible>(value).unwrap_checked()
    }
}

#[cfg(feature = "oom-handling")]
impl<T, const N: usize> From<[T; N]> for SharedVec<T> {
    fn from(value: [T; N]) -> Self {
        Self::from_array_impl::<Infallible, N>(value).unwrap_checked()
    }
}

impl<T: Clone> From<SharedVec<T>> for Vec<T> {
    fn from(value: SharedVec<T>) -> Self {
        value.into_vec()
    }
}

#[cfg(all(feature = "std", feature = "oom-handling"))]
const _: () = {
    extern crate std;

    impl std::io::Write for SharedVec<u8> {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }
};
