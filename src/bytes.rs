use crate::{SharedString, SharedVec};

impl bytes::Buf for SharedVec<u8> {
    fn remaining(&self) -> usize {
        self.len()
    }

    fn chunk(&self) -> &[u8] {
        self.as_slice()
    }

    fn advance(&mut self, cnt: usize) {
        self.advance(cnt);
    }
}

unsafe impl bytes::BufMut for SharedVec<u8> {
    fn remaining_mut(&self) -> usize {
        isize::MAX as usize - self.len()
    }

    unsafe fn advance_mut(&mut self, cnt: usize) {
        // SAFETY: same function contract
        unsafe { self.set_len(self.len() + cnt) }
    }

    fn chunk_mut(&mut self) -> &mut bytes::buf::UninitSlice {
        if self.spare_capacity_mut().is_empty() {
            self.grow_at_end(64);
        }
        self.spare_capacity_mut().into()
    }

    fn put_slice(&mut self, src: &[u8]) {
        self.extend_from_slice(src);
    }
}

impl bytes::Buf for SharedString {
    fn remaining(&self) -> usize {
        self.len()
    }

    fn chunk(&self) -> &[u8] {
        self.as_bytes()
    }

    fn advance(&mut self, cnt: usize) {
        self.advance(cnt);
    }
}

impl From<SharedVec<u8>> for bytes::Bytes {
    fn from(value: SharedVec<u8>) -> Self {
        bytes::Bytes::from_owner(value)
    }
}

impl From<SharedString> for bytes::Bytes {
    fn from(value: SharedString) -> Self {
        bytes::Bytes::from_owner(value.into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use bytes::{Buf, BufMut, Bytes};

    use crate::{SharedString, SharedVec};

    #[test]
    fn buf_advances() {
        let mut v = SharedVec::from_slice(b"hello world");
        let clone = v.clone();
        Buf::advance(&mut v, 6);
        assert_eq!(v.chunk(), b"world");
        assert_eq!(clone, *b"hello world");
    }

    #[test]
    fn buf_mut_appends() {
        let mut v = SharedVec::new();
        v.put_u16(0x0102);
        v.put_slice(b"ab");
        for i in 0..100u8 {
            v.put_u8(i);
        }
        assert_eq!(&v[..4], [1, 2, b'a', b'b']);
        assert_eq!(v.len(), 104);
    }

    #[test]
    fn into_bytes() {
        let s = SharedString::from("shared");
        let bytes = Bytes::from(s.clone());
        assert_eq!(bytes, "shared");
        assert!(s.is_shared());
    }
}
