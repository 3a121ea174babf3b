//! Capacity and growth policy of shared arrays.
//!
//! Translates "room for N elements" into an actual block size, and classifies sub-range
//! requests with [`mid`].

/// How the allocator derives the capacity from the requested one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AllocationOption {
    /// Leave headroom, so that repeated appends are amortized.
    Grow,
    /// Allocate exactly the requested capacity.
    KeepSize,
}

/// Side of the payload where the spare capacity of a new block is placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GrowthPosition {
    GrowsAtEnd,
    GrowsAtBeginning,
}

/// Byte size of a block and the element capacity it provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockSize {
    pub size: usize,
    pub element_count: usize,
}

const MAX_ALLOC_SIZE: usize = isize::MAX as usize;

/// Exact size of a block made of a header followed by `element_count` elements.
///
/// Returns `None` if the size overflows or exceeds `isize::MAX`.
pub fn calculate_block_size(
    element_count: usize,
    element_size: usize,
    header_size: usize,
) -> Option<usize> {
    debug_assert!(element_size > 0);
    debug_assert!(header_size <= MAX_ALLOC_SIZE);
    let bytes = element_size
        .checked_mul(element_count)?
        .checked_add(header_size)?;
    (bytes <= MAX_ALLOC_SIZE).then_some(bytes)
}

/// Size of a block able to hold at least `element_count` elements, rounded up to the next
/// power of two bytes.
///
/// When the next power of two would exceed `isize::MAX`, the block grows by half the
/// distance to that limit instead. The returned element count is what actually fits in
/// the block.
pub fn calculate_growing_block_size(
    element_count: usize,
    element_size: usize,
    header_size: usize,
) -> Option<BlockSize> {
    let bytes = calculate_block_size(element_count, element_size, header_size)?;
    // next power of two strictly greater than `bytes`
    let bytes = match bytes.checked_add(1).and_then(usize::checked_next_power_of_two) {
        Some(more_bytes) if more_bytes <= MAX_ALLOC_SIZE => more_bytes,
        _ => bytes + ((MAX_ALLOC_SIZE - bytes) >> 1),
    };
    let element_count = (bytes - header_size) / element_size;
    Some(BlockSize {
        size: element_count * element_size + header_size,
        element_count,
    })
}

/// Block size for `capacity` elements according to `option`.
pub fn block_size(
    capacity: usize,
    element_size: usize,
    header_size: usize,
    option: AllocationOption,
) -> Option<BlockSize> {
    match option {
        AllocationOption::Grow => calculate_growing_block_size(capacity, element_size, header_size),
        AllocationOption::KeepSize => Some(BlockSize {
            size: calculate_block_size(capacity, element_size, header_size)?,
            element_count: capacity,
        }),
    }
}

/// Classification of a sub-range request, see [`mid`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CutResult {
    /// The range lies outside of the sequence.
    Null,
    /// The range is inside the sequence but has no element.
    Empty,
    /// The range covers the whole sequence.
    Full,
    /// The range is a proper, non-empty sub-range.
    Subset,
}

/// Normalizes a `(position, length)` request against a sequence of `original_length`
/// elements.
///
/// A negative `position` counts elements before the start of the sequence, which are
/// cut from `length`; a negative `length` means "up to the end". Returns the
/// classification along with the normalized position and length.
///
/// ```
/// use shared_array::{growth::mid, CutResult};
///
/// assert_eq!(mid(10, -3, 5), (CutResult::Subset, 0, 2));
/// assert_eq!(mid(10, 15, 2), (CutResult::Null, 0, 0));
/// assert_eq!(mid(10, 0, 10), (CutResult::Full, 0, 10));
/// ```
pub const fn mid(
    original_length: isize,
    position: isize,
    length: isize,
) -> (CutResult, isize, isize) {
    let mut position = position;
    let mut length = length;
    if position > original_length {
        return (CutResult::Null, 0, 0);
    }
    if position < 0 {
        if length < 0 || length + position >= original_length {
            return (CutResult::Full, 0, original_length);
        }
        if length + position <= 0 {
            return (CutResult::Null, 0, 0);
        }
        length += position;
        position = 0;
    } else if length as usize > (original_length - position) as usize {
        length = original_length - position;
    }
    if position == 0 && length == original_length {
        return (CutResult::Full, position, length);
    }
    if length > 0 {
        (CutResult::Subset, position, length)
    } else {
        (CutResult::Empty, position, length)
    }
}
