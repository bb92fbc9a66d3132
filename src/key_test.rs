use super::*;

#[test]
fn empty_bytes_rejected() {
    assert!(Key::new(vec![]).is_err());
}

#[test]
fn byte_lexicographic_order() {
    let a = Key::new(vec![1, 2]).unwrap();
    let b = Key::new(vec![1, 2, 0]).unwrap();
    let c = Key::new(vec![1, 3]).unwrap();
    assert!(a < b, "shorter of a shared prefix ranks first");
    assert!(b < c);
    assert!(a < c);
}

#[test]
fn unsigned_byte_comparison() {
    let low = Key::new(vec![0x01]).unwrap();
    let high = Key::new(vec![0xff]).unwrap();
    assert!(low < high);
}

#[test]
fn range_inverted_is_empty() {
    let a = Key::new(vec![5]).unwrap();
    let b = Key::new(vec![1]).unwrap();
    let range = KeyRange::new(Some(a.clone()), Some(b));
    assert!(range.is_empty());
    assert!(!range.contains(&a));
}

#[test]
fn range_open_bounds() {
    let range = KeyRange::all();
    assert!(range.contains(&Key::new(vec![0]).unwrap()));
    assert!(range.contains(&Key::new(vec![255]).unwrap()));
}
