macro_rules! is {
    ($ty:ty, $($other:ty),+ $(,)?) => {
        crate::macros::is!({ core::any::TypeId::of::<$ty>() }, $($other),+)
    };
    ({$ty:expr}, $($other:ty),+ $(,)?) => {
        false $(|| $ty == core::any::TypeId::of::<$other>())+
    };
}
pub(crate) use is;

// Expands to nothing unless the `tracing` feature is enabled.
macro_rules! trace {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        tracing::trace!($($arg)*);
    };
}
pub(crate) use trace;
