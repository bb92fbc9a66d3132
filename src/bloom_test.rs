use super::*;

#[test]
fn no_false_negatives() {
    let mut bloom = FixedBloom::for_capacity(1000, 0.01).unwrap();
    let items: Vec<String> = (0..1000).map(|i| format!("key-{}", i)).collect();
    for item in &items {
        bloom.insert(item);
    }
    for item in &items {
        assert!(bloom.contains(item), "inserted key must be found: {}", item);
    }
}

#[test]
fn false_positive_rate_within_factor_of_two() {
    let target = 0.01;
    let n = 2000usize;
    let mut bloom = FixedBloom::for_capacity(n, target).unwrap();
    for i in 0..n {
        bloom.insert(&format!("present-{}", i));
    }
    let mut false_positives = 0usize;
    let trials = 20_000usize;
    for i in 0..trials {
        if bloom.contains(&format!("absent-{}", i)) {
            false_positives += 1;
        }
    }
    let observed = false_positives as f64 / trials as f64;
    assert!(
        observed <= target * 2.0,
        "observed fp rate {} exceeds 2x target {}",
        observed,
        target
    );
}

#[test]
fn merge_requires_matching_shape() {
    let a = FixedBloom::new(10, 3).unwrap();
    let b = FixedBloom::new(11, 3).unwrap();
    assert!(a.or(&b).is_err());
}

#[test]
fn merge_is_union() {
    let mut a = FixedBloom::new(12, 4).unwrap();
    let mut b = FixedBloom::new(12, 4).unwrap();
    a.insert(&"alpha");
    b.insert(&"beta");
    let merged = a.or(&b).unwrap();
    assert!(merged.contains(&"alpha"));
    assert!(merged.contains(&"beta"));
}

#[test]
fn round_trip_triple() {
    let mut bloom = FixedBloom::new(10, 3).unwrap();
    bloom.insert(&"a");
    bloom.insert(&"b");
    let (k, bits, table) = bloom.to_triple();
    let restored = FixedBloom::from_triple(k, bits, table).unwrap();
    assert!(restored.contains(&"a"));
    assert!(restored.contains(&"b"));
}

#[test]
fn rejects_invalid_sizes() {
    assert!(FixedBloom::new(0, 3).is_err());
    assert!(FixedBloom::new(10, 0).is_err());
}
