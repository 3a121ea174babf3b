#[cfg(not(all(loom, test)))]
#[cfg(not(feature = "portable-atomic"))]
pub(crate) use core::sync;

#[cfg(not(all(loom, test)))]
#[cfg(feature = "portable-atomic")]
pub(crate) mod sync {
    pub(crate) mod atomic {
        pub(crate) use portable_atomic::*;
    }
}

#[cfg(all(loom, test))]
pub(crate) use loom::sync;

#[cfg(all(loom, test))]
mod tests {
    use loom::{sync::Arc, thread};

    use crate::SharedVec;

    #[test]
    fn shared_vec_concurrent_clone() {
        loom::model(|| {
            let vec = Arc::new(SharedVec::from_slice(&[42u8]));
            let vec2 = Arc::clone(&vec);
            let thread = thread::spawn(move || {
                assert_eq!(*vec2, [42]);
                (*vec2).clone()
            });
            let clone1 = (*vec).clone();
            let clone2 = thread.join().unwrap();
            assert!(clone1.is_shared_with(&clone2));
            drop(clone1);
            drop(clone2);
            let vec = Arc::try_unwrap(vec).unwrap();
            assert!(vec.is_detached());
        });
    }

    #[test]
    fn concurrent_detach() {
        loom::model(|| {
            let vec = SharedVec::from_slice(&[1u8, 2, 3]);
            let mut vec2 = vec.clone();
            let thread = thread::spawn(move || {
                vec2.push(4);
                vec2
            });
            assert_eq!(vec, [1, 2, 3]);
            let vec2 = thread.join().unwrap();
            assert_eq!(vec2, [1, 2, 3, 4]);
            assert_eq!(vec, [1, 2, 3]);
        });
    }

    #[test]
    fn make_mut_while_reader_leaves() {
        loom::model(|| {
            let mut vec = SharedVec::from_slice(&[1u8, 2]);
            let view = vec.clone();
            let thread = thread::spawn(move || {
                assert_eq!(*view, [1, 2]);
            });
            vec.make_mut()[0] = 3;
            thread.join().unwrap();
            assert_eq!(vec, [3, 2]);
        });
    }
}
