use core::{cmp::max, fmt, marker::PhantomData, mem, ptr, ptr::NonNull, slice};

#[allow(unused_imports)]
use crate::msrv::{NonNullExt, SubPtrExt};
use crate::{
    array_data::{ArrayData, ArrayOptions},
    error::{AllocErrorImpl, TryReserveError},
    growth::{AllocationOption, GrowthPosition},
    macros::trace,
    typed::TypedArrayData,
};

/// Holder of a shared array block.
///
/// Each holder has its own view of the block: a start pointer and a number of live
/// elements. The view may begin after the start of the payload, leaving free space at the
/// beginning for cheap prepends, and may end before the end of the payload.
///
/// Without a block (`d == None`), the pointer is either the shared null state, or a view
/// on static data; both are considered shared, so that any mutation allocates first.
///
/// A holder may only mutate the payload (or the header flags) when it does not need to
/// detach, i.e. when it is the unique holder of the block.
pub struct ArrayDataPointer<T> {
    pub(crate) d: Option<NonNull<TypedArrayData<T>>>,
    pub(crate) ptr: NonNull<T>,
    pub(crate) size: usize,
    _phantom: PhantomData<T>,
}

unsafe impl<T: Send + Sync> Send for ArrayDataPointer<T> {}
unsafe impl<T: Send + Sync> Sync for ArrayDataPointer<T> {}

impl<T> ArrayDataPointer<T> {
    /// The shared null state: no block, no element.
    pub const fn null() -> Self {
        Self {
            d: None,
            ptr: NonNull::dangling(),
            size: 0,
            _phantom: PhantomData,
        }
    }

    /// View on static data, without block; any mutation copies the data first.
    pub fn from_static(data: &'static [T]) -> Self {
        Self {
            d: None,
            // SAFETY: slice pointers are never null
            ptr: unsafe { NonNull::new_unchecked(data.as_ptr() as *mut T) },
            size: data.len(),
            _phantom: PhantomData,
        }
    }

    pub(crate) fn allocate_impl<E: AllocErrorImpl>(
        capacity: usize,
        option: AllocationOption,
    ) -> Result<Self, E> {
        match TypedArrayData::<T>::allocate(capacity, option) {
            Ok(Some((d, ptr))) => Ok(Self {
                d: Some(d),
                ptr,
                size: 0,
                _phantom: PhantomData,
            }),
            Ok(None) => Ok(Self::null()),
            Err(err) => Err(E::from_reserve_error(
                err,
                TypedArrayData::<T>::layout_hint(capacity),
            )),
        }
    }

    /// Allocates an empty holder for `capacity` elements.
    pub fn try_allocate(
        capacity: usize,
        option: AllocationOption,
    ) -> Result<Self, TryReserveError> {
        Self::allocate_impl::<TryReserveError>(capacity, option)
    }

    #[inline]
    fn header(&self) -> Option<&ArrayData> {
        self.d.map(|d| unsafe { &*d.as_ptr() }.header())
    }

    #[inline]
    fn header_mut(&mut self) -> Option<&mut ArrayData> {
        debug_assert!(!self.is_shared(), "mutating the header of a shared block");
        self.d.map(|d| unsafe { &mut *d.as_ptr() }.header_mut())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.ptr.as_ptr()
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        unsafe { slice::from_raw_parts(self.ptr.as_ptr(), self.size) }
    }

    /// Mutable access to the elements, only possible if no other holder can observe them.
    #[inline]
    pub fn get_mut(&mut self) -> Option<&mut [T]> {
        if self.size != 0 && self.needs_detach() {
            return None;
        }
        Some(unsafe { slice::from_raw_parts_mut(self.ptr.as_ptr(), self.size) })
    }

    /// # Safety
    ///
    /// The pointer must not need to detach.
    #[inline]
    pub(crate) unsafe fn as_mut_slice_unchecked(&mut self) -> &mut [T] {
        debug_assert!(self.size == 0 || !self.needs_detach());
        unsafe { slice::from_raw_parts_mut(self.ptr.as_ptr(), self.size) }
    }

    /// Whether the pointer has no block (shared null state or static data).
    #[inline]
    pub fn is_null(&self) -> bool {
        self.d.is_none()
    }

    /// Whether the pointer owns a block, which can then be mutated once detached.
    #[inline]
    pub fn is_mutable(&self) -> bool {
        self.d.is_some()
    }

    #[inline]
    pub fn is_shared(&self) -> bool {
        self.header().map_or(true, ArrayData::is_shared)
    }

    #[inline]
    pub fn needs_detach(&self) -> bool {
        self.header().map_or(true, ArrayData::needs_detach)
    }

    /// Whether both pointers are views on the same elements.
    #[inline]
    pub fn is_shared_with(&self, other: &Self) -> bool {
        self.ptr == other.ptr && self.size == other.size
    }

    #[inline]
    pub fn allocated_capacity(&self) -> usize {
        self.header().map_or(0, ArrayData::allocated_capacity)
    }

    /// Number of free slots before the first element.
    pub fn free_space_at_begin(&self) -> usize {
        match self.d {
            Some(d) => unsafe { self.ptr.sub_ptr(TypedArrayData::data_start(d)) },
            None => 0,
        }
    }

    /// Number of free slots after the last element.
    pub fn free_space_at_end(&self) -> usize {
        match self.d {
            Some(_) => self.allocated_capacity() - self.free_space_at_begin() - self.size,
            None => 0,
        }
    }

    #[inline]
    pub fn flags(&self) -> ArrayOptions {
        self.header().map_or(ArrayOptions::DEFAULT, ArrayData::flags)
    }

    pub(crate) fn set_flags(&mut self, flags: ArrayOptions) {
        if let Some(header) = self.header_mut() {
            header.set_flags(flags);
        }
    }

    pub(crate) fn set_flag(&mut self, flag: ArrayOptions) {
        let mut flags = self.flags();
        flags.insert(flag);
        self.set_flags(flags);
    }

    pub(crate) fn clear_flag(&mut self, flag: ArrayOptions) {
        let mut flags = self.flags();
        flags.remove(flag);
        self.set_flags(flags);
    }

    /// See [`ArrayData::detach_capacity`].
    #[inline]
    pub fn detach_capacity(&self, new_size: usize) -> usize {
        self.header()
            .map_or(new_size, |header| header.detach_capacity(new_size))
    }

    /// Drops the elements after `len`.
    ///
    /// # Safety
    ///
    /// The pointer must not need to detach.
    pub(crate) unsafe fn truncate(&mut self, len: usize) {
        if len >= self.size {
            return;
        }
        debug_assert!(!self.needs_detach());
        let tail = unsafe {
            ptr::slice_from_raw_parts_mut(self.ptr.add(len).as_ptr(), self.size - len)
        };
        // update the size first, so a panicking drop cannot cause a double drop
        self.size = len;
        unsafe { ptr::drop_in_place(tail) };
    }

    /// Moves every element of `other` at the end of `self`.
    ///
    /// # Safety
    ///
    /// `self` must have enough free space at the end, and `other` must not need to detach.
    pub(crate) unsafe fn move_append(&mut self, other: &mut Self) {
        debug_assert!(self.free_space_at_end() >= other.size);
        debug_assert!(other.size == 0 || !other.needs_detach());
        unsafe {
            ptr::copy_nonoverlapping(
                other.ptr.as_ptr(),
                self.ptr.add(self.size).as_ptr(),
                other.size,
            );
        }
        self.size += other.size;
        other.size = 0;
    }

    /// Moves the elements so that the first one is `offset` slots after the payload start.
    fn relocate(&mut self, offset: usize) {
        let d = match self.d {
            Some(d) => d,
            None => return,
        };
        debug_assert!(offset + self.size <= self.allocated_capacity());
        unsafe {
            let new_ptr = TypedArrayData::data_start(d).add(offset);
            ptr::copy(self.ptr.as_ptr(), new_ptr.as_ptr(), self.size);
            self.ptr = new_ptr;
        }
    }

    /// Makes room for `n` elements at `position` by moving the elements inside the block,
    /// if enough free space lies on the other side and the block is not too full.
    ///
    /// Moving towards the beginning (to grow at the end) happens when the elements fill
    /// less than two thirds of the capacity; moving towards the end (to grow at the
    /// beginning) when they fill less than one third, balancing the free space around
    /// them. Returns `false` when nothing was moved.
    pub(crate) fn try_readjust_free_space(&mut self, position: GrowthPosition, n: usize) -> bool {
        debug_assert!(!self.needs_detach());
        debug_assert!(n > 0);
        let capacity = self.allocated_capacity();
        let free_at_begin = self.free_space_at_begin();
        let free_at_end = self.free_space_at_end();
        let triple_size = self.size.saturating_mul(3);
        let data_start_offset = match position {
            GrowthPosition::GrowsAtEnd if free_at_begin >= n && triple_size < 2 * capacity => 0,
            GrowthPosition::GrowsAtBeginning if free_at_end >= n && triple_size < capacity => {
                n + (capacity - self.size - n) / 2
            }
            _ => return false,
        };
        self.relocate(data_start_offset);
        true
    }

    /// # Safety
    ///
    /// The pointer must be the unique holder of a block, and `T` must satisfy
    /// [`TypedArrayData::can_reallocate`].
    pub(crate) unsafe fn reallocate_impl<E: AllocErrorImpl>(
        &mut self,
        capacity: usize,
        option: AllocationOption,
    ) -> Result<(), E> {
        debug_assert!(!self.is_shared());
        let d = unsafe { self.d.unwrap_unchecked() };
        match unsafe { TypedArrayData::reallocate_unaligned(d, self.ptr, capacity, option) } {
            Ok((d, ptr)) => {
                self.d = Some(d);
                self.ptr = ptr;
                Ok(())
            }
            Err(err) => Err(E::from_reserve_error(
                err,
                TypedArrayData::<T>::layout_hint(capacity),
            )),
        }
    }
}

impl<T: Clone> ArrayDataPointer<T> {
    /// Clones `items` at the end of `self`.
    ///
    /// # Safety
    ///
    /// `self` must have enough free space at the end.
    pub(crate) unsafe fn copy_append(&mut self, items: &[T]) {
        debug_assert!(self.free_space_at_end() >= items.len());
        for item in items {
            // the size is updated after each write, so a panicking `clone` leaves the
            // pointer consistent
            unsafe { self.ptr.add(self.size).write(item.clone()) };
            self.size += 1;
        }
    }

    /// Allocates a new holder able to receive the elements of `from` plus `n` more at
    /// `position`.
    ///
    /// The free space on the side that does not grow is kept, to avoid quadratic behavior
    /// when appends and prepends are mixed. When growing at the beginning, the extra free
    /// space is split between both sides. The flags of `from` are carried over, and the
    /// returned holder has no element.
    pub(crate) fn allocate_grow<E: AllocErrorImpl>(
        from: &Self,
        n: usize,
        position: GrowthPosition,
    ) -> Result<Self, E> {
        // `max` because static data has no allocated capacity
        let minimal_capacity = max(from.size, from.allocated_capacity())
            .checked_add(n)
            .ok_or_else(E::capacity_overflow)?
            - match position {
                GrowthPosition::GrowsAtEnd => from.free_space_at_end(),
                GrowthPosition::GrowsAtBeginning => from.free_space_at_begin(),
            };
        let capacity = from.detach_capacity(minimal_capacity);
        let option = if capacity > from.allocated_capacity() {
            AllocationOption::Grow
        } else {
            AllocationOption::KeepSize
        };
        let mut dp = Self::allocate_impl::<E>(capacity, option)?;
        if dp.d.is_some() {
            let offset = match position {
                GrowthPosition::GrowsAtBeginning => {
                    n + (dp.allocated_capacity() - from.size - n) / 2
                }
                GrowthPosition::GrowsAtEnd => from.free_space_at_begin(),
            };
            dp.ptr = unsafe { dp.ptr.add(offset) };
            dp.set_flags(from.flags());
        }
        Ok(dp)
    }

    /// Moves (or copies, if shared) the elements into a new block with room for `n` more
    /// elements at `position`.
    pub(crate) fn reallocate_and_grow<E: AllocErrorImpl>(
        &mut self,
        position: GrowthPosition,
        n: usize,
    ) -> Result<(), E> {
        if TypedArrayData::<T>::can_reallocate()
            && position == GrowthPosition::GrowsAtEnd
            && !self.needs_detach()
            && n > 0
        {
            let capacity = (self.allocated_capacity() - self.free_space_at_end())
                .checked_add(n)
                .ok_or_else(E::capacity_overflow)?;
            return unsafe { self.reallocate_impl::<E>(capacity, AllocationOption::Grow) };
        }
        let mut dp = Self::allocate_grow::<E>(self, n, position)?;
        if self.needs_detach() {
            trace!(len = self.size, additional = n, "detaching shared array");
            unsafe { dp.copy_append(self.as_slice()) };
        } else {
            unsafe { dp.move_append(self) };
        }
        mem::swap(self, &mut dp);
        Ok(())
    }

    /// Ensures the pointer is the unique holder of its block and has room for `n` more
    /// elements at `position`.
    pub(crate) fn detach_and_grow<E: AllocErrorImpl>(
        &mut self,
        position: GrowthPosition,
        n: usize,
    ) -> Result<(), E> {
        if !self.needs_detach() {
            let free_space = match position {
                GrowthPosition::GrowsAtBeginning => self.free_space_at_begin(),
                GrowthPosition::GrowsAtEnd => self.free_space_at_end(),
            };
            if n == 0 || free_space >= n || self.try_readjust_free_space(position, n) {
                return Ok(());
            }
        }
        self.reallocate_and_grow::<E>(position, n)
    }

    /// Fallible version of the detach-and-grow step every mutation starts with.
    pub fn try_detach_and_grow(
        &mut self,
        position: GrowthPosition,
        n: usize,
    ) -> Result<(), TryReserveError> {
        self.detach_and_grow::<TryReserveError>(position, n)
    }

    pub(crate) fn detach_impl<E: AllocErrorImpl>(&mut self) -> Result<(), E> {
        if self.needs_detach() {
            self.reallocate_and_grow::<E>(GrowthPosition::GrowsAtEnd, 0)?;
        }
        Ok(())
    }

    /// Replaces the block with a new one of exactly `capacity` elements, keeping the first
    /// `count` elements and the flags.
    pub(crate) fn reallocate_exact<E: AllocErrorImpl>(
        &mut self,
        capacity: usize,
        count: usize,
    ) -> Result<(), E> {
        debug_assert!(count <= capacity && count <= self.size);
        let mut dp = Self::allocate_impl::<E>(capacity, AllocationOption::KeepSize)?;
        if self.needs_detach() {
            unsafe { dp.copy_append(&self.as_slice()[..count]) };
        } else {
            unsafe {
                self.truncate(count);
                dp.move_append(self);
            }
        }
        if dp.d.is_some() {
            dp.set_flags(self.flags());
        }
        mem::swap(self, &mut dp);
        Ok(())
    }
}

impl<T> Clone for ArrayDataPointer<T> {
    fn clone(&self) -> Self {
        if let Some(header) = self.header() {
            header.ref_();
        }
        Self {
            d: self.d,
            ptr: self.ptr,
            size: self.size,
            _phantom: PhantomData,
        }
    }
}

impl<T> Drop for ArrayDataPointer<T> {
    fn drop(&mut self) {
        if let Some(d) = self.d {
            if unsafe { d.as_ref() }.header().deref() {
                unsafe {
                    ptr::drop_in_place(ptr::slice_from_raw_parts_mut(self.ptr.as_ptr(), self.size));
                    TypedArrayData::deallocate(d);
                }
            }
        }
    }
}

impl<T> Default for ArrayDataPointer<T> {
    fn default() -> Self {
        Self::null()
    }
}

impl<T> fmt::Debug for ArrayDataPointer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArrayDataPointer")
            .field("d", &self.header())
            .field("ptr", &self.ptr)
            .field("size", &self.size)
            .finish()
    }
}
