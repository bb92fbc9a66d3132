use super::*;

#[test]
fn bytes_round_trip_and_rejects_empty() {
    let coder = Lexicoder::Bytes;
    assert!(coder.encode(&Value::Bytes(vec![])).is_err());
    let key = coder.encode(&Value::Bytes(vec![1, 2, 3])).unwrap();
    assert_eq!(coder.decode(key.as_bytes()).unwrap(), Value::Bytes(vec![1, 2, 3]));
}

#[test]
fn string_round_trip_and_rejects_empty() {
    let coder = Lexicoder::Str { charset: Charset::Utf8 };
    assert!(coder.encode(&Value::Str(String::new())).is_err());
    let key = coder.encode(&Value::Str("hello".into())).unwrap();
    assert_eq!(coder.decode(key.as_bytes()).unwrap(), Value::Str("hello".into()));
}

#[test]
fn reverse_inverts_order() {
    let coder = Lexicoder::Reverse(Box::new(Lexicoder::Integer));
    let lo = coder.encode(&Value::Int(1)).unwrap();
    let hi = coder.encode(&Value::Int(2)).unwrap();
    assert!(hi < lo, "reverse(integer) should sort larger numbers first");

    assert_eq!(coder.decode(lo.as_bytes()).unwrap(), Value::Int(1));
    assert_eq!(coder.decode(hi.as_bytes()).unwrap(), Value::Int(2));
}

#[test]
fn mismatched_value_rejected() {
    let coder = Lexicoder::Integer;
    assert!(coder.encode(&Value::Str("nope".into())).is_err());
}

#[test]
fn trailing_bytes_rejected_on_decode() {
    let coder = Lexicoder::Integer;
    let mut key = coder.encode(&Value::Int(5)).unwrap().into_bytes();
    key.push(0xff);
    assert!(coder.decode(&key).is_err());
}
