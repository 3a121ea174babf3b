//! The errors.

use core::{fmt, str::Utf8Error};

pub(crate) use private::AllocErrorImpl;

/// The memory allocator returned an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocError;

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("allocation error")
    }
}

/// Error which can occur when trying to allocate or grow a shared array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TryReserveError {
    /// The memory allocator returned an error.
    AllocError,
    /// The required capacity exceeds the maximum block size (`isize::MAX` bytes).
    CapacityOverflow,
}

impl From<AllocError> for TryReserveError {
    fn from(_: AllocError) -> Self {
        Self::AllocError
    }
}

impl fmt::Display for TryReserveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AllocError => f.write_str("allocation error"),
            Self::CapacityOverflow => f.write_str("capacity overflow"),
        }
    }
}

/// Bytes that could not be converted into a string, along with the UTF-8 error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FromUtf8Error<B> {
    pub bytes: B,
    pub error: Utf8Error,
}

impl<B> FromUtf8Error<B> {
    pub fn into_bytes(self) -> B {
        self.bytes
    }

    pub fn utf8_error(&self) -> Utf8Error {
        self.error
    }
}

impl<B> fmt::Display for FromUtf8Error<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.error.fmt(f)
    }
}

#[cfg(feature = "std")]
const _: () = {
    extern crate std;
    impl std::error::Error for AllocError {}
    impl std::error::Error for TryReserveError {}
    impl<B: fmt::Debug> std::error::Error for FromUtf8Error<B> {}
};

mod private {
    use alloc::alloc::handle_alloc_error;
    use core::{alloc::Layout, convert::Infallible};

    use crate::error::TryReserveError;

    /// Error policy of the internal `*_impl` functions.
    ///
    /// `TryReserveError` reports failures to the caller, `Infallible` panics on capacity
    /// overflow and calls `handle_alloc_error` when the allocator fails.
    pub trait AllocErrorImpl: Sized {
        fn capacity_overflow() -> Self;
        fn alloc_error(layout: Layout) -> Self;
        fn from_reserve_error(error: TryReserveError, layout: Layout) -> Self {
            match error {
                TryReserveError::CapacityOverflow => Self::capacity_overflow(),
                TryReserveError::AllocError => Self::alloc_error(layout),
            }
        }
    }

    impl AllocErrorImpl for TryReserveError {
        fn capacity_overflow() -> Self {
            Self::CapacityOverflow
        }
        fn alloc_error(_layout: Layout) -> Self {
            Self::AllocError
        }
    }

    impl AllocErrorImpl for Infallible {
        #[cold]
        #[inline(never)]
        fn capacity_overflow() -> Self {
            panic!("capacity overflow")
        }
        #[cold]
        #[inline(never)]
        fn alloc_error(layout: Layout) -> Self {
            handle_alloc_error(layout)
        }
    }
}
