use std::{cell::Cell, rc::Rc};

use shared_array::{GrowthPosition, SharedBytes, SharedVec, TryReserveError};

#[derive(Clone)]
struct Tracked(Rc<Cell<usize>>);

impl Drop for Tracked {
    fn drop(&mut self) {
        self.0.set(self.0.get() + 1);
    }
}

#[test]
fn empty_does_not_allocate() {
    let v = SharedVec::<u64>::new();
    assert!(v.is_empty());
    assert_eq!(v.capacity(), 0);
    assert!(v.data_pointer().is_null());
    assert!(v.is_shared());
    assert!(!v.is_detached());
    let v = SharedVec::<u64>::with_capacity(0);
    assert!(v.data_pointer().is_null());
}

#[test]
fn clone_shares_and_mutation_detaches() {
    let mut a = SharedVec::from_slice(&[1, 2, 3]);
    assert!(a.is_detached());
    let b = a.clone();
    assert!(a.is_shared());
    assert!(a.is_shared_with(&b));
    assert!(a.get_mut().is_none());
    a.make_mut()[1] = 20;
    assert_eq!(a, [1, 20, 3]);
    assert_eq!(b, [1, 2, 3]);
    assert!(a.is_detached());
    assert!(b.is_detached());
}

#[test]
fn static_data_is_never_freed() {
    static DATA: [u16; 4] = [1, 2, 3, 4];
    let mut v = SharedVec::from_static(&DATA);
    assert_eq!(v.as_ptr(), DATA.as_ptr());
    let clone = v.clone();
    assert!(v.is_shared_with(&clone));
    v.push(5);
    assert_eq!(v, [1, 2, 3, 4, 5]);
    assert_eq!(clone, DATA);
    v.squeeze();
    drop(clone);
    let mut s = SharedVec::from_static(&DATA);
    s.squeeze();
    assert!(s.data_pointer().is_null());
}

#[test]
fn elements_dropped_exactly_once() {
    let drops = Rc::new(Cell::new(0));
    let item = Tracked(drops.clone());
    let mut a = SharedVec::new();
    a.resize(10, item);
    assert_eq!(drops.get(), 1);
    let b = a.clone();
    a.truncate(4);
    assert_eq!(drops.get(), 1);
    a.remove(0);
    assert_eq!(drops.get(), 2);
    drop(b);
    assert_eq!(drops.get(), 12);
    a.clear();
    assert_eq!(drops.get(), 15);
    drop(a);
    assert_eq!(drops.get(), 15);
}

#[test]
fn insert_and_remove() {
    let mut v = SharedVec::from_slice(&[1, 5]);
    v.insert(1, 2);
    v.insert_from_slice(2, &[3, 4]);
    v.insert(0, 0);
    v.push(6);
    assert_eq!(v, [0, 1, 2, 3, 4, 5, 6]);
    assert_eq!(v.remove(3), 3);
    assert_eq!(v.pop(), Some(6));
    assert_eq!(v.pop_front(), Some(0));
    assert_eq!(v, [1, 2, 4, 5]);
}

#[test]
#[should_panic = "should be <= len"]
fn insert_out_of_range() {
    SharedVec::from_slice(&[1]).insert(2, 0);
}

#[test]
#[should_panic = "should be < len"]
fn remove_out_of_range() {
    SharedVec::<u8>::new().remove(0);
}

#[test]
fn prepend_is_amortized() {
    let mut v = SharedVec::new();
    let mut reallocations = 0;
    for i in 0..1000 {
        let capacity = v.capacity();
        v.prepend(i);
        if v.capacity() != capacity {
            reallocations += 1;
        }
    }
    assert!(reallocations < 30, "{reallocations} reallocations");
    assert_eq!(v.first(), Some(&999));
    assert_eq!(v.last(), Some(&0));
}

#[test]
fn mixed_appends_and_prepends_keep_both_sides() {
    let mut v = SharedVec::new();
    for i in 0..100 {
        v.push(i);
        v.prepend(-i);
    }
    assert_eq!(v.len(), 200);
    assert_eq!(v[0], -99);
    assert_eq!(v[199], 99);
    let d = v.data_pointer();
    assert_eq!(
        d.free_space_at_begin() + d.len() + d.free_space_at_end(),
        d.allocated_capacity()
    );
}

#[test]
fn reserve_then_shrink_keeps_capacity() {
    let mut v = SharedVec::from_slice(&[1, 2, 3]);
    v.reserve(50);
    let capacity = v.capacity();
    assert!(capacity >= 53);
    assert!(v.is_capacity_reserved());
    let clone = v.clone();
    v.resize(10, 0);
    assert_eq!(v.capacity(), capacity);
    v.truncate(1);
    assert_eq!(v.capacity(), capacity);
    v.squeeze();
    assert_eq!(v.capacity(), 1);
    assert!(!v.is_capacity_reserved());
    assert_eq!(clone, [1, 2, 3]);
}

#[test]
fn reserve_on_shared_vector_detaches() {
    let mut v = SharedVec::from_slice(&[1, 2]);
    let clone = v.clone();
    v.reserve(1);
    assert!(!v.is_shared_with(&clone));
    assert!(v.is_detached());
    assert_eq!(v.capacity(), 3);
}

#[test]
fn reserve_detaches_shared_reserved_block() {
    let mut v = SharedVec::<u32>::new();
    v.reserve(11);
    v.clear();
    let snapshot = v.clone();
    v.reserve(1);
    assert!(v.is_detached());
    assert!(v.is_capacity_reserved());
    assert_eq!(v.capacity(), 11);
    assert_eq!(v.push_within_capacity(0), Ok(()));
    assert!(snapshot.is_empty());

    let mut v = SharedVec::new();
    v.reserve(10);
    v.push(1);
    v.push(2);
    v.remove(0);
    let clone = v.clone();
    v.reserve(1);
    assert!(v.is_detached());
    assert!(v.is_capacity_reserved());
    assert_eq!(v.push_within_capacity(3), Ok(()));
    assert_eq!(v, [2, 3]);
    assert_eq!(clone, [2]);
}

#[test]
fn try_reserve_reports_overflow() {
    let mut v = SharedVec::from_slice(&[1u64]);
    assert_eq!(v.try_reserve(usize::MAX), Err(TryReserveError::CapacityOverflow));
    assert_eq!(
        v.try_reserve(usize::MAX / 8),
        Err(TryReserveError::CapacityOverflow)
    );
    assert_eq!(v, [1]);
    assert_eq!(
        SharedVec::<u64>::try_with_capacity(usize::MAX / 4).unwrap_err(),
        TryReserveError::CapacityOverflow
    );
}

#[test]
fn mid_shares_full_range() {
    let v = SharedVec::from_slice(&[0, 1, 2, 3, 4, 5, 6, 7, 8, 9]);
    assert!(v.mid(0, 10).is_shared_with(&v));
    assert!(v.mid(-3, 100).is_shared_with(&v));
    assert_eq!(v.mid(-3, 5), [0, 1]);
    assert!(v.mid(15, 2).is_empty());
    assert!(v.mid(10, 2).is_empty());
    assert_eq!(v.mid(7, -1), [7, 8, 9]);
}

#[test]
fn advance_shared() {
    let mut v = SharedBytes::from_slice(b"hello world");
    let clone = v.clone();
    v.advance(6);
    assert_eq!(v, *b"world");
    assert_eq!(clone, *b"hello world");
    v.advance(5);
    assert!(v.is_empty());
}

#[test]
fn conversions() {
    let v = SharedVec::from(vec![1, 2, 3]);
    assert_eq!(v, vec![1, 2, 3]);
    let v2: SharedVec<i32> = [1, 2, 3].into();
    assert_eq!(v, v2);
    let v3: SharedVec<i32> = (1..=3).collect();
    assert_eq!(v, v3);
    let clone = v.clone();
    assert_eq!(Vec::from(v), [1, 2, 3]);
    assert_eq!(clone.into_vec(), [1, 2, 3]);
}

#[test]
fn extend_and_fallible_appends() {
    let mut v = SharedVec::<u8>::new();
    v.extend(&[1, 2]);
    v.extend(3..5);
    v.try_extend_from_slice(&[5]).unwrap();
    assert_eq!(v, [1, 2, 3, 4, 5]);
    let clone = v.clone();
    v.try_detach().unwrap();
    assert!(!v.is_shared_with(&clone));
}

#[test]
fn grow_at_beginning_through_data_pointer() {
    let mut d = SharedVec::from_slice(&[1u8, 2]).data_pointer().clone();
    d.try_detach_and_grow(GrowthPosition::GrowsAtBeginning, 4)
        .unwrap();
    assert!(d.free_space_at_begin() >= 4);
    assert_eq!(d.as_slice(), [1, 2]);
}

#[test]
fn debug_prints_bytes() {
    let v = SharedBytes::from_slice(b"a\n\x01");
    assert_eq!(format!("{v:?}"), r#"b"a\n\x01""#);
    let v = SharedVec::from_slice(&[1, 2]);
    assert_eq!(format!("{v:?}"), "[1, 2]");
}

#[test]
fn io_write() {
    use std::io::Write;
    let mut v = SharedBytes::new();
    write!(v, "{}-{}", 1, 2).unwrap();
    assert_eq!(v, *b"1-2");
}
