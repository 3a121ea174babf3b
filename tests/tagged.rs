use std::collections::HashSet;

use shared_array::TaggedPointer;

#[test]
fn tag_round_trip_on_heap_pointer() {
    let value = Box::into_raw(Box::new(7u64));
    let mut tagged = TaggedPointer::<u64, u8>::from_pointer(value);
    for tag in 0..=7 {
        tagged.set_tag(tag);
        assert_eq!(tagged.tag(), tag);
        assert_eq!(tagged.data(), value);
        assert_eq!(unsafe { *tagged.as_ref().unwrap() }, 7);
    }
    unsafe { *tagged.as_mut().unwrap() += 1 };
    assert_eq!(unsafe { *value }, 8);
    drop(unsafe { Box::from_raw(tagged.data()) });
}

#[test]
fn equality_ignores_tag() {
    let mut values = [0u32; 2];
    let a = TaggedPointer::<u32, u8>::new(&mut values[0], 1);
    let b = TaggedPointer::<u32, u8>::new(&mut values[0], 2);
    let c = TaggedPointer::<u32, u8>::new(&mut values[1], 1);
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert!(a < c);
    assert_eq!(a, values.as_mut_ptr());
    let set: HashSet<_> = [a, b, c].into_iter().collect();
    assert_eq!(set.len(), 2);
}

#[test]
fn swap_and_default() {
    let mut value = 0u32;
    let mut a = TaggedPointer::<u32, bool>::new(&mut value, true);
    let mut b = TaggedPointer::default();
    assert!(b.is_null());
    a.swap(&mut b);
    assert!(a.is_null());
    assert!(!a.tag());
    assert!(b.tag());
    assert_eq!(b.data(), &mut value as *mut u32);
}

#[test]
#[should_panic = "pointer is not aligned"]
fn misaligned_pointer() {
    let mut values = [0u32; 2];
    let misaligned = unsafe { values.as_mut_ptr().cast::<u8>().add(2).cast::<u32>() };
    TaggedPointer::<u32, u8>::from_pointer(misaligned);
}

#[test]
fn debug_shows_tag() {
    let tagged = TaggedPointer::<u64, u8>::null();
    assert!(format!("{tagged:?}").contains("tag: 0"));
    assert_eq!(TaggedPointer::<u64>::maximum_tag(), 7);
}
