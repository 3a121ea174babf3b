#[allow(unused_imports)]
use core::{convert::Infallible, ptr};

use bytemuck::{Pod, Zeroable};

use crate::{
    error::{AllocErrorImpl, TryReserveError},
    utils::UnwrapChecked,
    SharedVec,
};

impl<T: Zeroable> SharedVec<T> {
    fn zeroed_impl<E: AllocErrorImpl>(length: usize) -> Result<Self, E> {
        let mut this = Self::with_capacity_impl::<E>(length)?;
        unsafe { ptr::write_bytes(this.d.ptr.as_ptr(), 0, length) };
        this.d.size = length;
        Ok(this)
    }

    /// Creates a vector of `length` zeroed elements.
    #[cfg(feature = "oom-handling")]
    pub fn zeroed(length: usize) -> Self {
        Self::zeroed_impl::<Infallible>(length).unwrap_checked()
    }

    pub fn try_zeroed(length: usize) -> Result<Self, TryReserveError> {
        Self::zeroed_impl::<TryReserveError>(length)
    }
}

impl<T: Pod> SharedVec<T> {
    /// The elements as raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use crate::SharedVec;

    #[test]
    fn zeroed() {
        let v = SharedVec::<u32>::zeroed(4);
        assert_eq!(v, [0; 4]);
        assert_eq!(v.capacity(), 4);
        assert_eq!(v.as_bytes(), [0; 16]);
    }
}
