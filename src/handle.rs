//! Exclusive ownership of native resource handles.

use core::{
    cmp, fmt,
    hash::{Hash, Hasher},
    marker::PhantomData,
    mem,
};

/// Describes a kind of native handle: its type, its invalid value, and how to close it.
///
/// ```rust
/// use shared_array::{HandleTraits, UniqueHandle};
///
/// struct FakeFd;
///
/// impl HandleTraits for FakeFd {
///     type Handle = i32;
///     fn invalid_value() -> i32 {
///         -1
///     }
///     fn close(_handle: i32) -> bool {
///         true
///     }
/// }
///
/// let mut fd = UniqueHandle::<FakeFd>::new(3);
/// assert!(fd.is_valid());
/// assert_eq!(fd.release(), 3);
/// assert!(!fd.is_valid());
/// ```
pub trait HandleTraits {
    type Handle: Copy + PartialEq;

    fn invalid_value() -> Self::Handle;

    /// Closes a valid handle, returning whether it succeeded.
    ///
    /// Closing is assumed to never fail; failures are only reported by a debug assertion.
    fn close(handle: Self::Handle) -> bool;
}

/// Owner of a single native handle, closed on drop.
///
/// There is at most one owner of a valid handle: the type is not `Clone`, and moving
/// ownership out of a place goes through [`take`](Self::take) or
/// [`release`](Self::release), which leave the invalid value behind.
pub struct UniqueHandle<H: HandleTraits> {
    handle: H::Handle,
    _traits: PhantomData<fn() -> H>,
}

impl<H: HandleTraits> UniqueHandle<H> {
    /// Takes ownership of `handle`, which may be the invalid value.
    #[inline]
    pub fn new(handle: H::Handle) -> Self {
        Self {
            handle,
            _traits: PhantomData,
        }
    }

    /// Wrapper holding the invalid value.
    #[inline]
    pub fn invalid() -> Self {
        Self::new(H::invalid_value())
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.handle != H::invalid_value()
    }

    /// The owned handle, still owned by the wrapper.
    #[inline]
    pub fn get(&self) -> H::Handle {
        self.handle
    }

    /// Closes the current handle and takes ownership of `handle`.
    ///
    /// Nothing happens if `handle` is the one already owned.
    pub fn reset(&mut self, handle: H::Handle) {
        if handle == self.handle {
            return;
        }
        self.close();
        self.handle = handle;
    }

    /// Gives up ownership of the handle without closing it.
    #[inline]
    #[must_use = "the released handle is no longer closed automatically"]
    pub fn release(&mut self) -> H::Handle {
        mem::replace(&mut self.handle, H::invalid_value())
    }

    /// Closes the handle if valid; calling it again is a no-op.
    pub fn close(&mut self) {
        if !self.is_valid() {
            return;
        }
        let closed = H::close(self.handle);
        debug_assert!(closed, "failed to close handle");
        self.handle = H::invalid_value();
    }

    /// Moves ownership into a new wrapper, leaving this one invalid.
    #[inline]
    pub fn take(&mut self) -> Self {
        Self::new(self.release())
    }

    /// Move assignment: closes the current handle and takes ownership of the one of
    /// `other`, which becomes invalid.
    pub fn assign_from(&mut self, other: &mut Self) {
        let handle = other.release();
        self.reset(handle);
    }

    /// Slot to be filled by a function returning a handle through an output parameter.
    ///
    /// The wrapper must not own a valid handle, as it would be leaked.
    #[inline]
    pub fn out_slot(&mut self) -> &mut H::Handle {
        debug_assert!(!self.is_valid(), "output slot would leak a valid handle");
        &mut self.handle
    }

    #[inline]
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(&mut self.handle, &mut other.handle);
    }
}

impl<H: HandleTraits> Drop for UniqueHandle<H> {
    fn drop(&mut self) {
        self.close();
    }
}

impl<H: HandleTraits> Default for UniqueHandle<H> {
    fn default() -> Self {
        Self::invalid()
    }
}

impl<H: HandleTraits> PartialEq for UniqueHandle<H> {
    fn eq(&self, other: &Self) -> bool {
        self.handle == other.handle
    }
}

impl<H: HandleTraits> Eq for UniqueHandle<H> where H::Handle: Eq {}

impl<H: HandleTraits> PartialOrd for UniqueHandle<H>
where
    H::Handle: PartialOrd,
{
    fn partial_cmp(&self, other: &Self) -> Option<cmp::Ordering> {
        self.handle.partial_cmp(&other.handle)
    }
}

impl<H: HandleTraits> Ord for UniqueHandle<H>
where
    H::Handle: Ord,
{
    fn cmp(&self, other: &Self) -> cmp::Ordering {
        self.handle.cmp(&other.handle)
    }
}

impl<H: HandleTraits> Hash for UniqueHandle<H>
where
    H::Handle: Hash,
{
    fn hash<S: Hasher>(&self, state: &mut S) {
        self.handle.hash(state);
    }
}

impl<H: HandleTraits> fmt::Debug for UniqueHandle<H>
where
    H::Handle: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("UniqueHandle").field(&self.handle).finish()
    }
}
