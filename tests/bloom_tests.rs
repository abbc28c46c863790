// Copyright (c) 2026 Adrian Robinson. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.

use stream_sketches::{BloomFilter, Fnv64, Fnv64a, SketchError};

#[test]
fn test_bloom_sizing() {
    // 107 items at roughly 1% false positives: 1024 bits, 7 probes.
    let bf = BloomFilter::new(107, 0.0101, Fnv64::new());
    assert_eq!(bf.m(), 1024);
    assert_eq!(bf.k(), 7);

    let bf = BloomFilter::new(5000, 0.0101, Fnv64::new());
    assert_eq!(bf.m(), 65536);
    assert_eq!(bf.k(), 9);
}

#[test]
fn test_bloom_membership_and_false_positive_rate() {
    let target = 0.0101;
    let mut bf = BloomFilter::new(107, target, Fnv64::new());
    for i in 0u64..107 {
        bf.add(&i.to_le_bytes());
    }

    // Never a false negative.
    for i in 0u64..107 {
        assert!(bf.check(&i.to_le_bytes()), "inserted item {i} not found");
    }

    // Measured false positives over 1000 fresh items stay within target.
    let false_positives = (1000u64..2000)
        .filter(|i| bf.check(&i.to_le_bytes()))
        .count();
    let measured = false_positives as f64 / 1000.0;
    assert!(
        measured <= target,
        "measured false-positive rate {measured} exceeds target {target}"
    );
    assert!(measured <= bf.false_positive_rate());
}

#[test]
fn test_bloom_distinct_estimate() {
    let mut bf = BloomFilter::new(107, 0.0101, Fnv64::new());
    for i in 0u64..107 {
        bf.add(&i.to_le_bytes());
    }

    let estimate = bf.distinct();
    let expected_error = 2.0
        * ((bf.occupancy().exp() - bf.occupancy() - 1.0) * bf.k() as f64 / bf.m() as f64).sqrt()
        / bf.occupancy();
    let actual_error = (estimate as f64 - 107.0).abs() / 107.0;
    assert!(
        actual_error <= expected_error,
        "distinct estimate {estimate} off by {actual_error}"
    );
}

#[test]
fn test_bloom_double_add_is_idempotent() {
    let mut bf = BloomFilter::new(107, 0.0101, Fnv64::new());
    bf.add(b"payload");
    let occupied = bf.bit_vector().popcount();
    bf.add(b"payload");
    assert_eq!(bf.bit_vector().popcount(), occupied);
}

#[test]
fn test_bloom_union_and_intersect() {
    let mut a = BloomFilter::new(300, 0.05, Fnv64::new());
    let mut b = BloomFilter::new(300, 0.05, Fnv64::new());
    for i in 0u64..200 {
        a.add(&i.to_le_bytes());
    }
    for i in 100u64..300 {
        b.add(&i.to_le_bytes());
    }

    // Everything from either side is in the union.
    let union = a.union(&b).unwrap();
    for i in 0u64..300 {
        assert!(union.check(&i.to_le_bytes()), "union misses item {i}");
    }

    // Items added to both sides survive the intersection.
    let intersect = a.intersect(&b).unwrap();
    for i in 100u64..200 {
        assert!(intersect.check(&i.to_le_bytes()), "intersection misses item {i}");
    }

    // Both operations are bitwise and commute exactly.
    let reversed = b.union(&a).unwrap();
    assert_eq!(
        reversed.bit_vector().as_words(),
        union.bit_vector().as_words()
    );
    let reversed = b.intersect(&a).unwrap();
    assert_eq!(
        reversed.bit_vector().as_words(),
        intersect.bit_vector().as_words()
    );

    // The union holds at least as many bits as each input, the
    // intersection at most.
    assert!(union.bit_vector().popcount() >= a.bit_vector().popcount());
    assert!(intersect.bit_vector().popcount() <= a.bit_vector().popcount());
}

#[test]
fn test_bloom_shape_mismatch() {
    // Different sizes.
    let a = BloomFilter::new(107, 0.0101, Fnv64::new());
    let b = BloomFilter::new(5000, 0.0101, Fnv64::new());
    assert!(matches!(a.union(&b), Err(SketchError::ShapeMismatch(_))));
    assert!(matches!(a.intersect(&b), Err(SketchError::ShapeMismatch(_))));

    // Same size, different probe counts: 90 items at 3% also sizes to
    // 1024 bits but derives 8 probes instead of 7.
    let c = BloomFilter::new(90, 0.03, Fnv64::new());
    assert_eq!(c.m(), a.m());
    assert_ne!(c.k(), a.k());
    assert!(matches!(a.union(&c), Err(SketchError::ShapeMismatch(_))));
}

#[test]
fn test_bloom_hash_mismatch() {
    let a = BloomFilter::new(107, 0.0101, Fnv64::new());
    let b = BloomFilter::new(107, 0.0101, Fnv64a::new());
    assert!(matches!(a.union(&b), Err(SketchError::HashMismatch(_))));
    assert!(matches!(a.intersect(&b), Err(SketchError::HashMismatch(_))));
}
