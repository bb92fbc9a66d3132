use super::super::{Lexicoder, Value};

#[test]
fn seq_round_trip() {
    let coder = Lexicoder::Seq(Box::new(Lexicoder::Integer));
    let value = Value::Seq(vec![Value::Int(1), Value::Int(-5), Value::Int(1000)]);
    let key = coder.encode(&value).unwrap();
    let decoded = coder.decode(key.as_bytes()).unwrap();
    assert_eq!(decoded, value);
}

#[test]
fn seq_escapes_separator_bytes() {
    // bytes lexicoder elements that themselves contain 0x00/0x01 must not
    // be confused with the element separator.
    let coder = Lexicoder::Seq(Box::new(Lexicoder::Bytes));
    let value = Value::Seq(vec![
        Value::Bytes(vec![0x00, 0x01, 0x02]),
        Value::Bytes(vec![0xff]),
    ]);
    let key = coder.encode(&value).unwrap();
    let decoded = coder.decode(key.as_bytes()).unwrap();
    assert_eq!(decoded, value);
}

#[test]
fn tuple_arity_mismatch_rejected() {
    let coder = Lexicoder::Tuple(vec![Lexicoder::Integer, Lexicoder::Integer]);
    let value = Value::Tuple(vec![Value::Int(1)]);
    assert!(coder.encode(&value).is_err());
}

#[test]
fn tuple_round_trip() {
    let coder = Lexicoder::Tuple(vec![Lexicoder::Integer, Lexicoder::Str { charset: Default::default() }]);
    let value = Value::Tuple(vec![Value::Int(7), Value::Str("hello".into())]);
    let key = coder.encode(&value).unwrap();
    let decoded = coder.decode(key.as_bytes()).unwrap();
    assert_eq!(decoded, value);
}
