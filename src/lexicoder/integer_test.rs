use super::*;

#[test]
fn boundary_headers_match_spec() {
    assert_eq!(encode(0)[0], 0x80);
    assert_eq!(encode(255)[0], 0x80);
    assert_eq!(encode(256)[0], 0x81);
    assert_eq!(encode(-1)[0], 0x7f);
    assert_eq!(encode(-256)[0], 0x7f);
    assert_eq!(encode(-257)[0], 0x7e);
}

#[test]
fn sixty_four_bit_range_headers() {
    assert_eq!(encode(i64::MAX)[0], 0x87);
    assert_eq!(encode(i64::MIN)[0], 0x78);
    assert!((2..=9).contains(&encode(i64::MAX).len()));
    assert!((2..=9).contains(&encode(i64::MIN).len()));
}

#[test]
fn round_trip() {
    let samples = [
        0i64, 1, -1, 255, 256, -256, -257, 1000, -1000, i64::MAX, i64::MIN, 42, -42,
    ];
    for &i in &samples {
        let bytes = encode(i);
        let (got, n) = decode(&bytes).unwrap();
        assert_eq!(got, i);
        assert_eq!(n, bytes.len());
    }
}

#[test]
fn order_preservation() {
    let mut samples: Vec<i64> = vec![
        i64::MIN, -1_000_000, -257, -256, -255, -1, 0, 1, 255, 256, 257, 1_000_000, i64::MAX,
    ];
    let encoded: Vec<Vec<u8>> = samples.iter().map(|&i| encode(i)).collect();
    samples.sort();
    let mut by_encoding: Vec<(Vec<u8>, i64)> =
        encoded.into_iter().zip(samples.iter().copied()).collect();
    by_encoding.sort_by(|a, b| a.0.cmp(&b.0));
    let resorted: Vec<i64> = by_encoding.into_iter().map(|(_, i)| i).collect();
    assert_eq!(resorted, samples);
}
