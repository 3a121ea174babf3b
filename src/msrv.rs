use core::ptr::NonNull;

// 1.84: strict provenance API (`addr`, `with_addr`, `map_addr`) on raw pointers

pub(crate) trait StrictProvenance<T>: Sized + Copy {
    type Addr;
    fn addr(self) -> Self::Addr;
    fn with_addr(self, addr: Self::Addr) -> Self;
    fn map_addr(self, f: impl FnOnce(Self::Addr) -> Self::Addr) -> Self {
        self.with_addr(f(self.addr()))
    }
}

impl<T> StrictProvenance<T> for *const T {
    type Addr = usize;
    fn addr(self) -> Self::Addr {
        self as usize
    }
    fn with_addr(self, addr: Self::Addr) -> Self {
        let ptr_addr = self as isize;
        let dest_addr = addr as isize;
        let offset = dest_addr.wrapping_sub(ptr_addr);
        self.cast::<u8>().wrapping_offset(offset).cast()
    }
}

impl<T> StrictProvenance<T> for *mut T {
    type Addr = usize;
    fn addr(self) -> Self::Addr {
        (self as *const T).addr()
    }
    fn with_addr(self, addr: Self::Addr) -> Self {
        (self as *const T).with_addr(addr) as *mut T
    }
}

pub(crate) trait SubPtrExt<T>: Sized + Copy {
    type Origin;
    unsafe fn sub_ptr(self, origin: Self::Origin) -> usize;
}

impl<T> SubPtrExt<T> for *const T {
    type Origin = *const T;
    unsafe fn sub_ptr(self, origin: Self::Origin) -> usize {
        let offset = unsafe { self.offset_from(origin) };
        debug_assert!(offset >= 0);
        offset as usize
    }
}

impl<T> SubPtrExt<T> for NonNull<T> {
    type Origin = NonNull<T>;
    unsafe fn sub_ptr(self, origin: Self::Origin) -> usize {
        unsafe { (self.as_ptr() as *const T).sub_ptr(origin.as_ptr()) }
    }
}

pub(crate) trait NonNullExt<T>: Sized + Copy {
    unsafe fn add(self, count: usize) -> NonNull<T>;
    unsafe fn sub(self, count: usize) -> NonNull<T>;
    unsafe fn read(self) -> T;
    unsafe fn write(self, val: T);
}

impl<T> NonNullExt<T> for NonNull<T> {
    unsafe fn add(self, count: usize) -> NonNull<T> {
        unsafe { NonNull::new_unchecked(self.as_ptr().add(count)) }
    }

    unsafe fn sub(self, count: usize) -> NonNull<T> {
        unsafe { NonNull::new_unchecked(self.as_ptr().sub(count)) }
    }

    unsafe fn read(self) -> T {
        unsafe { self.as_ptr().read() }
    }

    unsafe fn write(self, val: T) {
        unsafe { self.as_ptr().write(val) }
    }
}
