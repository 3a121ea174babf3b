use alloc::alloc::{alloc, dealloc, realloc};
use core::{
    alloc::Layout,
    cmp::max,
    fmt, mem,
    ops::{BitOr, BitOrAssign},
    ptr,
    ptr::NonNull,
};

use crate::{
    error::TryReserveError,
    growth,
    growth::AllocationOption,
    macros::trace,
    msrv::SubPtrExt,
    refcount::RefCount,
};

/// Flags stored in an [`ArrayData`] header.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArrayOptions(u32);

impl ArrayOptions {
    pub const DEFAULT: Self = Self(0);
    /// The capacity was explicitly reserved and must not be shrunk implicitly.
    pub const CAPACITY_RESERVED: Self = Self(0x1);

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: Self) {
        self.0 &= !other.0;
    }
}

impl BitOr for ArrayOptions {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for ArrayOptions {
    fn bitor_assign(&mut self, rhs: Self) {
        self.insert(rhs);
    }
}

/// Header of a shared array block.
///
/// The header is placed at the start of a single allocation and is followed by the payload,
/// at the first offset aligned for the element type. The block layout is:
///
/// ```text
/// [ ref_count | flags | alloc | padding | element 0 | element 1 | ... ]
/// ```
///
/// Only the reference count may be touched concurrently; `flags` and the capacity are
/// owned by the unique holder of the block.
// `repr(C)` so that the header size is a multiple of its (pointer) alignment, and so that
// `TypedArrayData<T>` can be cast from/to it.
#[repr(C)]
pub struct ArrayData {
    ref_count: RefCount,
    flags: ArrayOptions,
    alloc: usize,
}

impl ArrayData {
    /// Alignment guaranteed for every block.
    pub const HEADER_ALIGN: usize = mem::align_of::<Self>();

    /// Offset of the payload from the start of the block.
    pub const fn header_size(alignment: usize) -> usize {
        let size = mem::size_of::<Self>();
        (size + alignment - 1) & !(alignment - 1)
    }

    fn block_layout(size: usize, alignment: usize) -> Result<Layout, TryReserveError> {
        Layout::from_size_align(size, max(alignment, Self::HEADER_ALIGN))
            .map_err(|_| TryReserveError::CapacityOverflow)
    }

    // Size of an existing block, as computed when it was (re)allocated.
    fn block_size(&self, object_size: usize, header_size: usize) -> usize {
        header_size + self.alloc * object_size
    }

    /// Allocates a block able to hold `capacity` elements of `object_size` bytes aligned to
    /// `alignment`.
    ///
    /// Returns the header and the start of the payload. The header has a single holder, no
    /// flag, and the capacity actually available, which may be larger than requested when
    /// `option` is [`AllocationOption::Grow`].
    ///
    /// A zero capacity allocates nothing and returns `Ok(None)`: empty arrays use the shared
    /// null state. Errors are reported, never raised: the block size overflowing
    /// `isize::MAX` gives [`TryReserveError::CapacityOverflow`], and the allocator failing
    /// gives [`TryReserveError::AllocError`].
    pub fn allocate(
        object_size: usize,
        alignment: usize,
        capacity: usize,
        option: AllocationOption,
    ) -> Result<Option<(NonNull<Self>, NonNull<u8>)>, TryReserveError> {
        debug_assert!(object_size > 0);
        debug_assert!(alignment.is_power_of_two());
        if capacity == 0 {
            return Ok(None);
        }
        let header_size = Self::header_size(alignment);
        let block = growth::block_size(capacity, object_size, header_size, option)
            .ok_or(TryReserveError::CapacityOverflow)?;
        let layout = Self::block_layout(block.size, alignment)?;
        let ptr = unsafe { alloc(layout) };
        let header = NonNull::new(ptr.cast::<Self>()).ok_or(TryReserveError::AllocError)?;
        unsafe {
            header.as_ptr().write(Self {
                ref_count: RefCount::new(),
                flags: ArrayOptions::DEFAULT,
                alloc: block.element_count,
            });
        }
        trace!(
            size = block.size,
            capacity = block.element_count,
            "allocated array block"
        );
        let data = unsafe { NonNull::new_unchecked(ptr.add(header_size)) };
        Ok(Some((header, data)))
    }

    /// Resizes a block to `capacity` elements, possibly moving it.
    ///
    /// The offset of `data_pointer` from the header is preserved, so free space at the
    /// beginning of the payload is kept. On error, the original block is left untouched.
    ///
    /// # Safety
    ///
    /// - `data` must have been returned by [`allocate`](Self::allocate) (or this function)
    ///   with the same `object_size` and an alignment not greater than
    ///   [`HEADER_ALIGN`](Self::HEADER_ALIGN).
    /// - The caller must be the unique holder of the block.
    /// - `data_pointer` must point inside the payload, and the new capacity must still
    ///   contain every element after it that the caller cares about.
    pub unsafe fn reallocate_unaligned(
        data: NonNull<Self>,
        data_pointer: NonNull<u8>,
        object_size: usize,
        capacity: usize,
        option: AllocationOption,
    ) -> Result<(NonNull<Self>, NonNull<u8>), TryReserveError> {
        debug_assert!(!unsafe { data.as_ref() }.is_shared(), "reallocating a shared block");
        let header_size = mem::size_of::<Self>();
        let block = growth::block_size(capacity, object_size, header_size, option)
            .ok_or(TryReserveError::CapacityOverflow)?;
        let new_layout = Self::block_layout(block.size, Self::HEADER_ALIGN)?;
        let offset = unsafe { data_pointer.sub_ptr(data.cast()) };
        debug_assert!(offset >= header_size && offset <= block.size);
        let old_size = unsafe { data.as_ref() }.block_size(object_size, header_size);
        let old_layout = unsafe { Layout::from_size_align_unchecked(old_size, Self::HEADER_ALIGN) };
        let ptr = unsafe { realloc(data.as_ptr().cast(), old_layout, new_layout.size()) };
        let header = NonNull::new(ptr.cast::<Self>()).ok_or(TryReserveError::AllocError)?;
        unsafe { (*header.as_ptr()).alloc = block.element_count };
        trace!(
            old_size,
            size = block.size,
            capacity = block.element_count,
            "reallocated array block"
        );
        Ok((header, unsafe { NonNull::new_unchecked(ptr.add(offset)) }))
    }

    /// Frees a block.
    ///
    /// # Safety
    ///
    /// - `data` must have been returned by [`allocate`](Self::allocate) or
    ///   [`reallocate_unaligned`](Self::reallocate_unaligned) with the same `object_size`
    ///   and `alignment`.
    /// - The caller must have observed [`deref`](Self::deref) returning `true`, and the
    ///   payload elements must already have been dropped.
    pub unsafe fn deallocate(data: NonNull<Self>, object_size: usize, alignment: usize) {
        let header_size = Self::header_size(alignment);
        let size = unsafe { data.as_ref() }.block_size(object_size, header_size);
        let layout =
            unsafe { Layout::from_size_align_unchecked(size, max(alignment, Self::HEADER_ALIGN)) };
        trace!(size, "deallocated array block");
        unsafe { ptr::drop_in_place(data.as_ptr()) };
        unsafe { dealloc(data.as_ptr().cast(), layout) };
    }

    /// Start of the payload of a block allocated with `alignment`.
    ///
    /// # Safety
    ///
    /// `data` must point to a live block allocated with `alignment`.
    pub unsafe fn data_start(data: NonNull<Self>, alignment: usize) -> NonNull<u8> {
        let header_size = Self::header_size(alignment);
        unsafe { NonNull::new_unchecked(data.as_ptr().cast::<u8>().add(header_size)) }
    }

    #[inline]
    pub fn ref_count(&self) -> &RefCount {
        &self.ref_count
    }

    /// Registers a new holder of the block.
    #[inline]
    pub fn ref_(&self) -> bool {
        self.ref_count.ref_()
    }

    /// Unregisters a holder, returning `true` if the block must now be freed.
    #[inline]
    #[must_use = "the last holder must free the block"]
    pub fn deref(&self) -> bool {
        self.ref_count.deref()
    }

    #[inline]
    pub fn is_shared(&self) -> bool {
        self.ref_count.is_shared()
    }

    #[inline]
    pub fn needs_detach(&self) -> bool {
        self.ref_count.needs_detach()
    }

    /// Element capacity of the payload.
    #[inline]
    pub fn allocated_capacity(&self) -> usize {
        self.alloc
    }

    #[inline]
    pub fn flags(&self) -> ArrayOptions {
        self.flags
    }

    /// Only the unique holder may change the flags, hence `&mut self`.
    #[inline]
    pub fn set_flags(&mut self, flags: ArrayOptions) {
        self.flags = flags;
    }

    /// Capacity to allocate when detaching into `new_size` elements.
    ///
    /// A reserved capacity is kept as long as `new_size` fits in it.
    #[inline]
    pub fn detach_capacity(&self, new_size: usize) -> usize {
        if self.flags.contains(ArrayOptions::CAPACITY_RESERVED) && new_size < self.alloc {
            return self.alloc;
        }
        new_size
    }
}

impl fmt::Debug for ArrayData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArrayData")
            .field("ref_count", &self.ref_count)
            .field("flags", &self.flags)
            .field("alloc", &self.alloc)
            .finish()
    }
}

#[cfg(all(test, not(loom)))]
mod tests {
    use core::{mem, ptr::NonNull};

    use super::{ArrayData, ArrayOptions};
    use crate::{error::TryReserveError, growth::AllocationOption};

    fn allocate(
        object_size: usize,
        alignment: usize,
        capacity: usize,
        option: AllocationOption,
    ) -> (NonNull<ArrayData>, NonNull<u8>) {
        ArrayData::allocate(object_size, alignment, capacity, option)
            .unwrap()
            .unwrap()
    }

    #[test]
    fn header_is_pointer_aligned() {
        assert_eq!(mem::size_of::<ArrayData>() % mem::align_of::<usize>(), 0);
        assert_eq!(ArrayData::header_size(1), mem::size_of::<ArrayData>());
        assert_eq!(ArrayData::header_size(64) % 64, 0);
    }

    #[test]
    fn zero_capacity_is_null() {
        assert_eq!(
            ArrayData::allocate(4, 4, 0, AllocationOption::Grow),
            Ok(None)
        );
    }

    #[test]
    fn overflow_fails_cleanly() {
        let res = ArrayData::allocate(16, 8, usize::MAX / 8, AllocationOption::KeepSize);
        assert_eq!(res, Err(TryReserveError::CapacityOverflow));
    }

    #[test]
    fn payload_is_aligned() {
        for alignment in [1, 2, 4, 8, 16, 32, 64, 4096] {
            let (header, data) = allocate(alignment, alignment, 3, AllocationOption::KeepSize);
            assert_eq!(data.as_ptr() as usize % alignment, 0);
            assert_eq!(unsafe { ArrayData::data_start(header, alignment) }, data);
            let header_ref = unsafe { header.as_ref() };
            assert_eq!(header_ref.allocated_capacity(), 3);
            assert_eq!(header_ref.flags(), ArrayOptions::DEFAULT);
            assert!(!header_ref.is_shared());
            assert!(header_ref.deref());
            unsafe { ArrayData::deallocate(header, alignment, alignment) };
        }
    }

    #[test]
    fn grow_rounds_capacity_up() {
        let (header, _) = allocate(8, 8, 1, AllocationOption::Grow);
        let capacity = unsafe { header.as_ref() }.allocated_capacity();
        assert!(capacity > 1);
        let block = ArrayData::header_size(8) + capacity * 8;
        assert!(block.is_power_of_two());
        assert!(unsafe { header.as_ref() }.deref());
        unsafe { ArrayData::deallocate(header, 8, 8) };
    }

    #[test]
    fn reallocate_keeps_offset_and_content() {
        let (header, data) = allocate(4, 4, 8, AllocationOption::KeepSize);
        let start = unsafe { data.as_ptr().add(2 * 4) };
        let values = [1u32, 2, 3];
        unsafe { start.cast::<u32>().copy_from_nonoverlapping(values.as_ptr(), 3) };
        let start = NonNull::new(start).unwrap();
        let (header, start) = unsafe {
            ArrayData::reallocate_unaligned(header, start, 4, 100, AllocationOption::KeepSize)
        }
        .unwrap();
        let offset = start.as_ptr() as usize - header.as_ptr() as usize;
        assert_eq!(offset, ArrayData::header_size(4) + 2 * 4);
        assert_eq!(unsafe { header.as_ref() }.allocated_capacity(), 100);
        let moved = unsafe { core::slice::from_raw_parts(start.as_ptr().cast::<u32>(), 3) };
        assert_eq!(moved, values);
        assert!(unsafe { header.as_ref() }.deref());
        unsafe { ArrayData::deallocate(header, 4, 4) };
    }

    #[test]
    fn reserved_capacity_is_kept() {
        let (header, _) = allocate(4, 4, 10, AllocationOption::KeepSize);
        let header_mut = unsafe { &mut *header.as_ptr() };
        assert_eq!(header_mut.detach_capacity(5), 5);
        header_mut.set_flags(ArrayOptions::CAPACITY_RESERVED);
        assert_eq!(header_mut.detach_capacity(5), 10);
        assert_eq!(header_mut.detach_capacity(12), 12);
        assert!(header_mut.deref());
        unsafe { ArrayData::deallocate(header, 4, 4) };
    }

    #[test]
    fn options() {
        let mut flags = ArrayOptions::DEFAULT;
        assert!(!flags.contains(ArrayOptions::CAPACITY_RESERVED));
        flags |= ArrayOptions::CAPACITY_RESERVED;
        assert!(flags.contains(ArrayOptions::CAPACITY_RESERVED));
        flags.remove(ArrayOptions::CAPACITY_RESERVED);
        assert_eq!(flags.bits(), 0);
    }
}
