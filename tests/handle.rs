use std::cell::RefCell;

use shared_array::{HandleTraits, UniqueHandle};

thread_local! {
    static CLOSED: RefCell<Vec<i32>> = RefCell::new(Vec::new());
}

fn closed() -> Vec<i32> {
    CLOSED.with(|closed| closed.borrow_mut().drain(..).collect())
}

struct Fd;

impl HandleTraits for Fd {
    type Handle = i32;

    fn invalid_value() -> i32 {
        -1
    }

    fn close(handle: i32) -> bool {
        CLOSED.with(|closed| closed.borrow_mut().push(handle));
        true
    }
}

type UniqueFd = UniqueHandle<Fd>;

#[test]
fn closed_once_across_moves() {
    let mut fd = UniqueFd::new(3);
    let moved = fd.take();
    assert!(!fd.is_valid());
    let mut handles = vec![moved];
    drop(fd);
    assert!(closed().is_empty());
    handles.push(UniqueFd::new(4));
    let last = handles.pop().unwrap();
    drop(handles);
    assert_eq!(closed(), [3]);
    drop(last);
    assert_eq!(closed(), [4]);
}

#[test]
fn released_handle_is_not_closed() {
    let mut fd = UniqueFd::new(5);
    let raw = fd.release();
    assert_eq!(raw, 5);
    drop(fd);
    assert!(closed().is_empty());
    // ownership can be taken back
    let mut fd = UniqueFd::invalid();
    fd.reset(raw);
    assert_eq!(fd.get(), 5);
    drop(fd);
    assert_eq!(closed(), [5]);
}

#[test]
fn swap_exchanges_ownership() {
    let mut a = UniqueFd::new(6);
    let mut b = UniqueFd::new(7);
    a.swap(&mut b);
    assert_eq!((a.get(), b.get()), (7, 6));
    drop(a);
    assert_eq!(closed(), [7]);
    drop(b);
    assert_eq!(closed(), [6]);
}

#[test]
fn self_assignment_keeps_handle() {
    let mut fd = UniqueFd::new(8);
    fd.reset(fd.get());
    assert!(fd.is_valid());
    assert!(closed().is_empty());
    drop(fd);
    assert_eq!(closed(), [8]);
}

#[test]
fn comparisons() {
    let a = UniqueFd::new(1);
    let b = UniqueFd::new(2);
    assert!(a < b);
    assert_ne!(a, b);
    assert_eq!(UniqueFd::default(), UniqueFd::invalid());
    assert_eq!(format!("{a:?}"), "UniqueHandle(1)");
    drop((a, b));
    assert_eq!(closed(), [1, 2]);
}
