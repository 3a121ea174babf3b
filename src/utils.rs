use core::{any::Any, convert::Infallible, fmt};

use crate::macros::is;

#[inline(always)]
pub(crate) fn try_transmute_slice<T: Any, U: Any>(slice: &[T]) -> Option<&[U]> {
    is!(T, U).then(|| unsafe { slice.align_to().1 })
}

/// Alternative implementation of `std::fmt::Debug` for byte slice.
///
/// Standard `Debug` implementation for `[u8]` is comma separated
/// list of numbers. Since large amount of byte strings are in fact
/// ASCII strings or contain a lot of ASCII strings (e. g. HTTP),
/// it is convenient to print strings as ASCII when possible.
fn debug_bytes(bytes: &[u8], f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "b\"")?;
    for &b in bytes {
        // https://doc.rust-lang.org/reference/tokens.html#byte-escapes
        if b == b'\n' {
            write!(f, "\\n")?;
        } else if b == b'\r' {
            write!(f, "\\r")?;
        } else if b == b'\t' {
            write!(f, "\\t")?;
        } else if b == b'\\' || b == b'"' {
            write!(f, "\\{}", b as char)?;
        } else if b == b'\0' {
            write!(f, "\\0")?;
        // ASCII printable
        } else if (0x20..0x7f).contains(&b) {
            write!(f, "{}", b as char)?;
        } else {
            write!(f, "\\x{b:02x}")?;
        }
    }
    write!(f, "\"")?;
    Ok(())
}

pub(crate) fn debug_slice<T>(slice: &[T], f: &mut fmt::Formatter<'_>) -> fmt::Result
where
    T: fmt::Debug + 'static,
{
    match try_transmute_slice(slice) {
        Some(bytes) => debug_bytes(bytes, f),
        None => write!(f, "{slice:?}"),
    }
}

#[cold]
pub(crate) fn panic_out_of_range(index: usize, len: usize) -> ! {
    panic!("index (is {index}) should be <= len (is {len})")
}

#[cold]
pub(crate) fn panic_index_out_of_bounds(index: usize, len: usize) -> ! {
    panic!("index (is {index}) should be < len (is {len})")
}

#[cfg(feature = "abort-on-refcount-overflow")]
#[inline(never)]
#[cold]
pub(crate) fn abort() -> ! {
    #[cfg(feature = "std")]
    {
        extern crate std;
        std::process::abort();
    }
    // in no_std, use double panic
    #[cfg(not(feature = "std"))]
    {
        struct Abort;
        impl Drop for Abort {
            fn drop(&mut self) {
                panic!("abort");
            }
        }
        let _guard = Abort;
        panic!("abort");
    }
}

pub(crate) trait UnwrapChecked<T> {
    fn unwrap_checked(self) -> T;
}

impl<T> UnwrapChecked<T> for Result<T, Infallible> {
    #[inline(always)]
    fn unwrap_checked(self) -> T {
        match self {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }
}
