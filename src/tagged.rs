//! Pointers carrying a small tag in their alignment bits.

use core::{
    cmp, fmt,
    hash::{Hash, Hasher},
    marker::PhantomData,
    mem, ptr,
};

#[allow(unused_imports)]
use crate::msrv::StrictProvenance;

/// Value that can be stored in the low bits of a [`TaggedPointer`].
///
/// Conversions must round-trip for every value whose bits fit in the tag mask.
pub trait PointerTag: Copy {
    fn into_bits(self) -> usize;
    fn from_bits(bits: usize) -> Self;
}

macro_rules! unsigned_tag {
    ($($ty:ty),*) => {$(
        impl PointerTag for $ty {
            #[inline]
            fn into_bits(self) -> usize {
                self as usize
            }
            #[inline]
            fn from_bits(bits: usize) -> Self {
                bits as $ty
            }
        }
    )*};
}
unsigned_tag!(u8, u16, u32, usize);

impl PointerTag for bool {
    #[inline]
    fn into_bits(self) -> usize {
        self as usize
    }
    #[inline]
    fn from_bits(bits: usize) -> Self {
        bits != 0
    }
}

/// A pointer to `T` storing a tag in its `log2(align_of::<T>())` low bits.
///
/// The tag is metadata: comparisons and hashing only consider the pointer. The type has
/// no ownership semantics, and dereferencing the pointer is as unsafe as with a raw
/// pointer.
///
/// ```rust
/// use shared_array::TaggedPointer;
///
/// let mut value = 42u64;
/// let mut tagged = TaggedPointer::<u64, u8>::new(&mut value, 5);
/// assert_eq!(tagged.data(), &mut value as *mut u64);
/// assert_eq!(tagged.tag(), 5);
/// tagged.set_tag(7);
/// assert_eq!(unsafe { *tagged.as_ref().unwrap() }, 42);
/// assert_eq!(TaggedPointer::<u64, u8>::maximum_tag(), 7);
/// ```
pub struct TaggedPointer<T, G: PointerTag = usize> {
    raw: *mut T,
    _tag: PhantomData<G>,
}

impl<T, G: PointerTag> TaggedPointer<T, G> {
    const TAG_MASK: usize = mem::align_of::<T>() - 1;
    const POINTER_MASK: usize = !Self::TAG_MASK;

    /// Null pointer with a zero tag.
    pub const fn null() -> Self {
        Self {
            raw: ptr::null_mut(),
            _tag: PhantomData,
        }
    }

    /// Largest tag value that fits in the alignment bits of `T`.
    pub const fn maximum_tag() -> usize {
        Self::TAG_MASK
    }

    #[inline]
    fn is_valid(pointer: *mut T, tag: G) -> (bool, bool) {
        (
            pointer.addr() & Self::TAG_MASK == 0,
            tag.into_bits() & Self::POINTER_MASK == 0,
        )
    }

    /// Returns `None` if `pointer` is not aligned for `T` or `tag` does not fit.
    #[inline]
    pub fn try_new(pointer: *mut T, tag: G) -> Option<Self> {
        match Self::is_valid(pointer, tag) {
            (true, true) => Some(unsafe { Self::new_unchecked(pointer, tag) }),
            _ => None,
        }
    }

    /// # Panics
    ///
    /// Panics if `pointer` is not aligned for `T`, or if `tag` exceeds
    /// [`maximum_tag`](Self::maximum_tag).
    #[inline]
    #[track_caller]
    pub fn new(pointer: *mut T, tag: G) -> Self {
        check(Self::is_valid(pointer, tag));
        unsafe { Self::new_unchecked(pointer, tag) }
    }

    /// # Safety
    ///
    /// `pointer` must be aligned for `T`, and `tag` must not exceed
    /// [`maximum_tag`](Self::maximum_tag).
    #[inline]
    pub unsafe fn new_unchecked(pointer: *mut T, tag: G) -> Self {
        debug_assert_eq!(Self::is_valid(pointer, tag), (true, true));
        Self {
            raw: pointer.map_addr(|addr| addr | tag.into_bits()),
            _tag: PhantomData,
        }
    }

    /// Tagged pointer with a zero tag.
    #[inline]
    #[track_caller]
    pub fn from_pointer(pointer: *mut T) -> Self {
        Self::new(pointer, G::from_bits(0))
    }

    /// The pointer, tag bits masked off.
    #[inline]
    pub fn data(&self) -> *mut T {
        self.raw.map_addr(|addr| addr & Self::POINTER_MASK)
    }

    #[inline]
    pub fn tag(&self) -> G {
        G::from_bits(self.raw.addr() & Self::TAG_MASK)
    }

    /// Replaces the tag, keeping the pointer.
    ///
    /// # Panics
    ///
    /// Panics if `tag` exceeds [`maximum_tag`](Self::maximum_tag).
    #[inline]
    #[track_caller]
    pub fn set_tag(&mut self, tag: G) {
        *self = Self::new(self.data(), tag);
    }

    /// Replaces the pointer, keeping the tag.
    ///
    /// # Panics
    ///
    /// Panics if `pointer` is not aligned for `T`.
    #[inline]
    #[track_caller]
    pub fn set_pointer(&mut self, pointer: *mut T) {
        *self = Self::new(pointer, self.tag());
    }

    /// Resets both the pointer and the tag.
    #[inline]
    pub fn clear(&mut self) {
        *self = Self::null();
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        self.data().is_null()
    }

    /// # Safety
    ///
    /// See [`pointer::as_ref`](https://doc.rust-lang.org/std/primitive.pointer.html#method.as_ref).
    #[inline]
    pub unsafe fn as_ref<'a>(&self) -> Option<&'a T> {
        unsafe { self.data().as_ref() }
    }

    /// # Safety
    ///
    /// See [`pointer::as_mut`](https://doc.rust-lang.org/std/primitive.pointer.html#method.as_mut).
    #[inline]
    pub unsafe fn as_mut<'a>(&self) -> Option<&'a mut T> {
        unsafe { self.data().as_mut() }
    }

    #[inline]
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(self, other);
    }
}

#[cold]
#[track_caller]
fn panic_invalid(aligned: bool) -> ! {
    if aligned {
        panic!("tag does not fit in the pointer alignment bits")
    }
    panic!("pointer is not aligned")
}

#[inline]
#[track_caller]
fn check((aligned, tag_fits): (bool, bool)) {
    if !(aligned && tag_fits) {
        panic_invalid(aligned);
    }
}

impl<T, G: PointerTag> Clone for TaggedPointer<T, G> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, G: PointerTag> Copy for TaggedPointer<T, G> {}

impl<T, G: PointerTag> Default for TaggedPointer<T, G> {
    fn default() -> Self {
        Self::null()
    }
}

impl<T, G: PointerTag> PartialEq for TaggedPointer<T, G> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.data() == other.data()
    }
}

impl<T, G: PointerTag> Eq for TaggedPointer<T, G> {}

impl<T, G: PointerTag> PartialEq<*mut T> for TaggedPointer<T, G> {
    #[inline]
    fn eq(&self, other: &*mut T) -> bool {
        self.data() == *other
    }
}

impl<T, G: PointerTag> PartialOrd for TaggedPointer<T, G> {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<T, G: PointerTag> Ord for TaggedPointer<T, G> {
    #[inline]
    fn cmp(&self, other: &Self) -> cmp::Ordering {
        self.data().cmp(&other.data())
    }
}

impl<T, G: PointerTag> Hash for TaggedPointer<T, G> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.data().hash(state);
    }
}

impl<T, G: PointerTag> fmt::Debug for TaggedPointer<T, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaggedPointer")
            .field("data", &self.data())
            .field("tag", &self.tag().into_bits())
            .finish()
    }
}

impl<T, G: PointerTag> fmt::Pointer for TaggedPointer<T, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Pointer::fmt(&self.data(), f)
    }
}
