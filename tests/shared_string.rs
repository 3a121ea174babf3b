use std::fmt::Write;

use shared_array::{SharedBytes, SharedString};

#[test]
fn clone_then_append_detaches() {
    let mut s = SharedString::from("hello");
    let t = s.clone();
    assert!(s.is_shared_with(&t));
    s.push_str(" world");
    assert_eq!(s, "hello world");
    assert_eq!(t, "hello");
    assert!(s.is_detached());
}

static STATIC: &str = "static";

#[test]
fn static_string_is_copied_on_write() {
    let mut s = SharedString::from_static(STATIC);
    assert!(s.is_shared());
    assert_eq!(s.as_ptr(), STATIC.as_ptr());
    s.push('!');
    assert_eq!(s, "static!");
    assert!(s.is_detached());
}

#[test]
fn prepend_and_insert() {
    let mut s = SharedString::from("world");
    s.prepend("hello");
    s.insert(5, ' ');
    s.insert_str(0, ">> ");
    assert_eq!(s, ">> hello world");
}

#[test]
fn multibyte_removal() {
    let mut s = SharedString::from("héllo wörld");
    assert_eq!(s.remove(1), 'é');
    assert_eq!(s.remove(0), 'h');
    assert_eq!(s, "llo wörld");
    assert_eq!(s.pop(), Some('d'));
    s.truncate(5);
    assert_eq!(s, "llo w");
}

#[test]
#[should_panic = "not a char boundary"]
fn insert_inside_char() {
    SharedString::from("é").insert(1, 'a');
}

#[test]
fn mid() {
    let s = SharedString::from("hello world");
    assert_eq!(s.mid(6, -1), "world");
    assert!(s.mid(0, -1).is_shared_with(&s));
    assert!(s.mid(20, 1).is_empty());
    assert_eq!(s.mid(-2, 4), "he");
}

#[test]
#[should_panic = "not a char boundary"]
fn mid_inside_char() {
    SharedString::from("héllo").mid(2, 1);
}

#[test]
fn advance_shared() {
    let mut s = SharedString::from("hello world");
    let t = s.clone();
    s.advance(6);
    assert_eq!(s, "world");
    assert_eq!(t, "hello world");
}

#[test]
fn from_utf8() {
    let bytes = SharedBytes::from_slice("ok".as_bytes());
    let s = SharedString::from_utf8(bytes.clone()).unwrap();
    assert!(s.as_shared_bytes().is_shared_with(&bytes));

    let invalid = SharedBytes::from_slice(&[b'a', 0xff]);
    let err = SharedString::from_utf8(invalid).unwrap_err();
    assert_eq!(err.utf8_error().valid_up_to(), 1);
    assert_eq!(err.into_bytes(), [b'a', 0xff]);
}

#[test]
fn conversions() {
    let s: SharedString = "abc".chars().rev().collect();
    assert_eq!(s, "cba");
    assert_eq!(String::from(s.clone()), "cba");
    assert_eq!(SharedBytes::from(s), *b"cba");
    let mut s: SharedString = "x".parse().unwrap();
    s.extend(["y", "z"]);
    s.extend(['!']);
    assert_eq!(s, "xyz!");
}

#[test]
fn fmt_write() {
    let mut s = SharedString::new();
    write!(s, "{}-{}", 1, 2).unwrap();
    assert_eq!(s, "1-2");
    assert_eq!(format!("{s:?}"), r#""1-2""#);
    assert_eq!(format!("{s}"), "1-2");
}

#[test]
fn reserve_survives_clear() {
    let mut s = SharedString::new();
    s.reserve(32);
    assert!(s.is_capacity_reserved());
    s.push_str("abc");
    let capacity = s.capacity();
    s.clear();
    assert_eq!(s.capacity(), capacity);
    s.squeeze();
    assert!(!s.is_capacity_reserved());
}
