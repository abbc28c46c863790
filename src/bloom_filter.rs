// Copyright (c) 2026 Adrian Robinson. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.

use crate::bit_vector::BitVector;
use crate::traits::{canary_digest, Hash64, SketchError};
use std::f64::consts::LN_2;

/// Fixed canary hashed by both sides of a combine to prove the hash
/// functions agree.
const BLOOM_FILTER_CANARY: &[u8] = b"BloomFilter";

/// Only 32 bits of the 64-bit digest index the filter, so m caps at 2^32.
const MAX_BLOOM_FILTER_M: u64 = 1 << 32;

/// Bloom filter for approximate set membership.
///
/// Sized from a target item count and false-positive rate: the optimal bit
/// count `n * ln(1/f) / ln(2)^2` is rounded up to a power of two (capped at
/// 2^32) and the hash count `k` is chosen to match. The `k` probe indices
/// for an item are derived from a single 64-bit digest by double hashing
/// its 32-bit halves, `h1 + i * h2 (mod m)`, after Kirsch and Mitzenmacher.
///
/// # Key Properties
///
/// - **No false negatives**: `check` always returns true for an item that
///   was added.
/// - **Bounded false positives**: at the design load the false-positive
///   rate stays at or below the requested `f`.
/// - **Mergeable**: filters with the same shape and hash combine by OR
///   (union) or AND (intersection) of their bitmaps.
///
/// # Example
///
/// ```
/// use stream_sketches::{BloomFilter, Fnv64};
///
/// let mut bf = BloomFilter::new(100, 0.01, Fnv64::new());
/// bf.add(b"alpha");
/// bf.add(b"beta");
///
/// assert!(bf.check(b"alpha"));
/// assert!(bf.check(b"beta"));
/// assert!(!bf.check(b"gamma"));
/// ```
#[derive(Debug, Clone)]
pub struct BloomFilter<H> {
    /// Size of the filter in bits; always a power of two.
    m: u64,
    /// Number of probe indices derived per item.
    k: u64,
    /// Owned hash capability, mutated on every `add` and `check`.
    hash: H,
    /// One bit per bucket.
    bits: BitVector,
}

impl<H: Hash64 + Clone> BloomFilter<H> {
    /// Creates a filter sized for `n_items` items at a target
    /// false-positive rate of `f`.
    pub fn new(n_items: u64, f: f64, hash: H) -> Self {
        let opt_m = (-(n_items as f64) * f.ln() / (LN_2 * LN_2)).ceil() as u64;
        let m = if opt_m > MAX_BLOOM_FILTER_M {
            MAX_BLOOM_FILTER_M
        } else {
            opt_m.next_power_of_two()
        };
        let k = ((m as f64 * LN_2 / n_items as f64 + 0.5) as u64).max(1);
        Self {
            m,
            k,
            hash,
            bits: BitVector::new(m),
        }
    }

    /// Adds an item to the set, setting all `k` probe bits.
    pub fn add(&mut self, item: &[u8]) {
        self.hash.reset();
        self.hash.write(item);
        let digest = self.hash.sum64();
        let mut h1 = digest & 0xffff_ffff;
        let h2 = digest >> 32;
        let mask = self.m - 1;
        self.bits.set(h1 & mask);
        for _ in 1..self.k {
            h1 = h1.wrapping_add(h2);
            self.bits.set(h1 & mask);
        }
    }

    /// Tests membership; false means the item was definitely never added,
    /// true means it was added or is a false positive.
    ///
    /// Probes through a clone of the hash capability, leaving the filter
    /// untouched, so checks may run concurrently with other queries.
    pub fn check(&self, item: &[u8]) -> bool {
        let mut hash = self.hash.clone();
        hash.reset();
        hash.write(item);
        let digest = hash.sum64();
        let mut h1 = digest & 0xffff_ffff;
        let h2 = digest >> 32;
        let mask = self.m - 1;
        if self.bits.get(h1 & mask) != 1 {
            return false;
        }
        for _ in 1..self.k {
            h1 = h1.wrapping_add(h2);
            if self.bits.get(h1 & mask) != 1 {
                return false;
            }
        }
        true
    }

    /// Size of the filter in bits.
    pub fn m(&self) -> u64 {
        self.m
    }

    /// Number of probe indices derived per item.
    pub fn k(&self) -> u64 {
        self.k
    }

    /// Fraction of bits set.
    pub fn occupancy(&self) -> f64 {
        self.bits.popcount() as f64 / self.m as f64
    }

    /// Expected false-positive rate at the current occupancy,
    /// `occupancy^k`. This tracks the observed load, not the design target.
    pub fn false_positive_rate(&self) -> f64 {
        self.occupancy().powf(self.k as f64)
    }

    /// Estimated number of distinct items added, inverting the expected
    /// occupancy for `k` probes per item: `-(m/k) * ln(1 - occupancy)`.
    /// Saturates at `m` once every bit is set.
    pub fn distinct(&self) -> u64 {
        let occupancy = self.occupancy();
        if occupancy >= 1.0 {
            return self.m;
        }
        (-(self.m as f64 / self.k as f64) * (1.0 - occupancy).ln()) as u64
    }

    /// Read-only view of the bitmap, for callers that serialize.
    pub fn bit_vector(&self) -> &BitVector {
        &self.bits
    }

    /// Combines two filters into one containing every item added to either.
    /// Fails unless both have the same size, the same probe count and a
    /// hash capability that agrees on the canary string.
    pub fn union(&self, other: &Self) -> Result<BloomFilter<H>, SketchError> {
        self.combine_with(other, |a, b| a | b)
    }

    /// Combines two filters into one whose bitmap keeps only the bits set
    /// in both. Fails unless both have the same size, the same probe count
    /// and a hash capability that agrees on the canary string.
    pub fn intersect(&self, other: &Self) -> Result<BloomFilter<H>, SketchError> {
        self.combine_with(other, |a, b| a & b)
    }

    fn combine_with(
        &self,
        other: &Self,
        merge: fn(u64, u64) -> u64,
    ) -> Result<BloomFilter<H>, SketchError> {
        if self.m != other.m {
            return Err(SketchError::ShapeMismatch(format!(
                "BloomFilters differ in size: m {} != {}",
                self.m, other.m
            )));
        }
        if self.k != other.k {
            return Err(SketchError::ShapeMismatch(format!(
                "BloomFilters differ in hash count: k {} != {}",
                self.k, other.k
            )));
        }
        let ours = canary_digest(&self.hash, BLOOM_FILTER_CANARY);
        let theirs = canary_digest(&other.hash, BLOOM_FILTER_CANARY);
        if ours != theirs {
            return Err(SketchError::HashMismatch(format!(
                "hash functions return {ours:#x} != {theirs:#x} for \"BloomFilter\""
            )));
        }
        let words: Vec<u64> = self
            .bits
            .words
            .iter()
            .zip(&other.bits.words)
            .map(|(&a, &b)| merge(a, b))
            .collect();
        Ok(BloomFilter {
            m: self.m,
            k: self.k,
            hash: self.hash.clone(),
            bits: BitVector { words },
        })
    }
}
