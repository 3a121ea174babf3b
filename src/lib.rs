#![no_std]
extern crate alloc;

mod array_data;
#[cfg(feature = "bytemuck")]
mod bytemuck;
#[cfg(feature = "bytes")]
mod bytes;
pub mod error;
pub mod growth;
pub mod handle;
mod loom;
mod macros;
mod msrv;
mod pointer;
mod refcount;
#[cfg(feature = "serde")]
mod serde;
mod string;
pub mod tagged;
mod typed;
mod utils;
mod vec;

pub use crate::{
    array_data::{ArrayData, ArrayOptions},
    error::{AllocError, FromUtf8Error, TryReserveError},
    growth::{AllocationOption, CutResult, GrowthPosition},
    handle::{HandleTraits, UniqueHandle},
    pointer::ArrayDataPointer,
    refcount::RefCount,
    string::SharedString,
    tagged::{PointerTag, TaggedPointer},
    typed::TypedArrayData,
    vec::SharedVec,
};

pub type SharedBytes = SharedVec<u8>;
