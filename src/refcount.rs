use core::fmt;

use crate::loom::sync::{
    atomic,
    atomic::{AtomicUsize, Ordering},
};

const MAX_REFCOUNT: usize = isize::MAX as usize;

/// Thread-safe counter of the holders of a shared array block.
///
/// A freshly allocated block starts with one holder. [`ref_`](Self::ref_) registers a new
/// holder and [`deref`](Self::deref) unregisters one; the holder that observes the count
/// dropping to zero is the one responsible for freeing the block.
pub struct RefCount(AtomicUsize);

impl RefCount {
    /// Counter for a block with exactly one holder.
    #[cfg(not(all(loom, test)))]
    pub const fn new() -> Self {
        Self(AtomicUsize::new(1))
    }

    /// Counter for a block with exactly one holder.
    #[cfg(all(loom, test))]
    pub fn new() -> Self {
        Self(AtomicUsize::new(1))
    }

    /// Registers a new holder.
    ///
    /// Never frees anything, so it always returns `true`.
    #[inline]
    pub fn ref_(&self) -> bool {
        // See `Arc` documentation: a new reference can only be created from an existing one,
        // so no synchronization is needed here.
        let old_count = self.0.fetch_add(1, Ordering::Relaxed);
        if old_count > MAX_REFCOUNT {
            overflow();
        }
        true
    }

    /// Unregisters a holder, returning `true` if it was the last one.
    ///
    /// When `true` is returned, every write made by the other holders before their own
    /// `deref` is visible to the caller, which can then safely free the block.
    #[inline]
    #[must_use = "the last holder must free the block"]
    pub fn deref(&self) -> bool {
        if self.0.fetch_sub(1, Ordering::Release) != 1 {
            return false;
        }
        atomic::fence(Ordering::Acquire);
        true
    }

    /// Whether the block is not exclusively owned by the caller.
    ///
    /// The load synchronizes with the release decrement of [`deref`](Self::deref): once
    /// it returns `false`, the accesses of the holders that left happen before any
    /// following write.
    #[inline]
    pub fn is_shared(&self) -> bool {
        self.0.load(Ordering::Acquire) != 1
    }

    /// Whether a copy must be made before mutating the block.
    #[inline]
    pub fn needs_detach(&self) -> bool {
        self.0.load(Ordering::Acquire) > 1
    }

    /// Current number of holders.
    #[inline]
    pub fn count(&self) -> usize {
        self.0.load(Ordering::Relaxed)
    }
}

impl Default for RefCount {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RefCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RefCount").field(&self.count()).finish()
    }
}

#[cfg(feature = "abort-on-refcount-overflow")]
#[cold]
fn overflow() -> ! {
    crate::utils::abort()
}

#[cfg(not(feature = "abort-on-refcount-overflow"))]
#[cold]
fn overflow() -> ! {
    panic!("reference count overflow")
}

#[cfg(all(test, not(loom)))]
mod tests {
    use super::RefCount;

    #[test]
    fn single_holder_is_last() {
        let rc = RefCount::new();
        assert!(!rc.is_shared());
        assert!(!rc.needs_detach());
        assert!(rc.deref());
    }

    #[test]
    fn last_deref_reported_once() {
        let rc = RefCount::new();
        for _ in 0..10 {
            assert!(rc.ref_());
        }
        assert!(rc.is_shared());
        assert!(rc.needs_detach());
        assert_eq!(rc.count(), 11);
        let last = (0..11).filter(|_| rc.deref()).count();
        assert_eq!(last, 1);
    }

    #[test]
    fn last_deref_comes_last() {
        let rc = RefCount::new();
        rc.ref_();
        rc.ref_();
        assert!(!rc.deref());
        assert!(!rc.deref());
        assert!(!rc.is_shared());
        assert!(rc.deref());
    }
}
