#[test]
fn readme_example() {
    use shared_array::SharedVec;

    let mut a = SharedVec::from_slice(b"world");
    let b = a.clone();
    assert!(a.is_shared_with(&b));

    a.prepend(b' ');
    a.insert_from_slice(0, b"hello");
    assert_eq!(a, b"hello world");
    assert_eq!(b, b"world");
}
