use core::{alloc::Layout, fmt, marker::PhantomData, mem, ptr::NonNull};

use crate::{array_data::ArrayData, error::TryReserveError, growth::AllocationOption};

/// Typed view of an [`ArrayData`] block holding `T` elements.
///
/// It has exactly the same layout as the untyped header, so pointers to both can be cast
/// into each other; the element type only provides the object size and alignment to the
/// untyped allocator.
#[repr(transparent)]
pub struct TypedArrayData<T> {
    header: ArrayData,
    _phantom: PhantomData<T>,
}

const _: () = assert!(mem::size_of::<TypedArrayData<u64>>() == mem::size_of::<ArrayData>());

impl<T> TypedArrayData<T> {
    const ELEMENT_SIZE: usize = {
        assert!(mem::size_of::<T>() != 0, "zero-sized elements are not supported");
        mem::size_of::<T>()
    };
    const ALIGNMENT: usize = mem::align_of::<T>();

    /// Allocates a block for `capacity` elements.
    ///
    /// See [`ArrayData::allocate`].
    pub fn allocate(
        capacity: usize,
        option: AllocationOption,
    ) -> Result<Option<(NonNull<Self>, NonNull<T>)>, TryReserveError> {
        let allocation =
            ArrayData::allocate(Self::ELEMENT_SIZE, Self::ALIGNMENT, capacity, option)?;
        Ok(allocation.map(|(header, data)| (header.cast(), data.cast())))
    }

    /// Whether [`reallocate_unaligned`](Self::reallocate_unaligned) can be used with `T`.
    pub const fn can_reallocate() -> bool {
        Self::ALIGNMENT <= ArrayData::HEADER_ALIGN
    }

    /// Resizes a block, preserving the offset of `data_pointer`.
    ///
    /// # Safety
    ///
    /// See [`ArrayData::reallocate_unaligned`]; moreover, `T` must satisfy
    /// [`can_reallocate`](Self::can_reallocate).
    pub unsafe fn reallocate_unaligned(
        data: NonNull<Self>,
        data_pointer: NonNull<T>,
        capacity: usize,
        option: AllocationOption,
    ) -> Result<(NonNull<Self>, NonNull<T>), TryReserveError> {
        debug_assert!(Self::can_reallocate());
        let (header, data) = unsafe {
            ArrayData::reallocate_unaligned(
                data.cast(),
                data_pointer.cast(),
                Self::ELEMENT_SIZE,
                capacity,
                option,
            )
        }?;
        Ok((header.cast(), data.cast()))
    }

    /// Frees a block; elements must have been dropped beforehand.
    ///
    /// # Safety
    ///
    /// See [`ArrayData::deallocate`].
    pub unsafe fn deallocate(data: NonNull<Self>) {
        unsafe { ArrayData::deallocate(data.cast(), Self::ELEMENT_SIZE, Self::ALIGNMENT) }
    }

    /// First element slot of the payload.
    ///
    /// # Safety
    ///
    /// `data` must point to a live block.
    pub unsafe fn data_start(data: NonNull<Self>) -> NonNull<T> {
        unsafe { ArrayData::data_start(data.cast(), Self::ALIGNMENT) }.cast()
    }

    /// Layout reported to `handle_alloc_error` when allocating `capacity` elements fails.
    pub(crate) fn layout_hint(capacity: usize) -> Layout {
        Layout::array::<T>(capacity).unwrap_or_else(|_| Layout::new::<ArrayData>())
    }

    #[inline]
    pub fn header(&self) -> &ArrayData {
        &self.header
    }

    #[inline]
    pub fn header_mut(&mut self) -> &mut ArrayData {
        &mut self.header
    }
}

impl<T> fmt::Debug for TypedArrayData<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TypedArrayData").field(&self.header).finish()
    }
}
