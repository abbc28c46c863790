// Copyright (c) 2026 Adrian Robinson. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.

use crate::bit_vector::BitVector;
use crate::traits::{canary_digest, Hash64, SketchError};
use std::fmt;

/// Fixed canary hashed by both sides of a combine to prove the hash
/// functions agree.
const LINEAR_COUNTING_CANARY: &[u8] = b"LinearCounting";

/// Precision bounds for practical bitmap sizes.
const MIN_LINEAR_COUNTING_P: u8 = 6;
const MAX_LINEAR_COUNTING_P: u8 = 24;

/// Linear Counting cardinality estimator over a `2^p`-bit bitmap.
///
/// Each item's digest selects one bit by its top `p` bits; the estimate is
/// derived from the fraction of bits still unset. At one bit per bucket
/// this uses an eighth of the memory of a HyperLogLog with the same `p`
/// and is cheaper per operation, in exchange for a hard ceiling: once
/// every bit is set the estimate saturates at `m = 2^p`.
///
/// # Key Properties
///
/// - **Fixed memory**: `2^p` bits, `p` in [6, 24].
/// - **Bounded range**: accurate while the bitmap is not close to full;
///   saturates at `m`.
/// - **Mergeable**: union is the bitwise OR of the bitmaps, intersection
///   the bitwise AND, both exact at the bitmap level.
///
/// # Example
///
/// ```
/// use stream_sketches::{Fnv64, LinearCounting};
///
/// let mut lc = LinearCounting::new(10, Fnv64::new());
/// lc.add(&1u64.to_le_bytes());
/// lc.add(&2u64.to_le_bytes());
/// lc.add(&1u64.to_le_bytes()); // duplicate
///
/// assert_eq!(lc.distinct(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct LinearCounting<H> {
    /// Number of index bits; the bitmap holds `2^p` buckets.
    p: u8,
    /// Owned hash capability, mutated on every `add`.
    hash: H,
    /// One bit per bucket.
    bits: BitVector,
}

impl<H: Hash64 + Clone> LinearCounting<H> {
    /// Creates a sketch with a `2^p`-bit bitmap, clamping `p` to [6, 24].
    pub fn new(p: u8, hash: H) -> Self {
        let p = p.clamp(MIN_LINEAR_COUNTING_P, MAX_LINEAR_COUNTING_P);
        Self {
            p,
            hash,
            bits: BitVector::new(1u64 << p),
        }
    }

    /// Adds an item to the multiset.
    pub fn add(&mut self, item: &[u8]) {
        self.hash.reset();
        self.hash.write(item);
        let bucket = self.hash.sum64() >> (64 - self.p);
        self.bits.set(bucket);
    }

    /// Estimated number of distinct items, `m * ln(m / z)` over the `z`
    /// unset bits; returns `m` once the bitmap is full.
    pub fn distinct(&self) -> u64 {
        let m = 1u64 << self.p;
        let zeros = m - self.bits.popcount();
        if zeros == 0 {
            return m;
        }
        (m as f64 * (m as f64 / zeros as f64).ln()) as u64
    }

    /// Fraction of bits set.
    pub fn occupancy(&self) -> f64 {
        self.bits.popcount() as f64 / (1u64 << self.p) as f64
    }

    /// Expected relative error at the current occupancy,
    /// `2 * sqrt((e^rho - rho - 1) / m) / rho`. For an empty sketch the
    /// rho -> 0 limit `sqrt(2 / m)` is returned.
    pub fn expected_error(&self) -> f64 {
        let m = (1u64 << self.p) as f64;
        let rho = self.occupancy();
        if rho == 0.0 {
            return (2.0 / m).sqrt();
        }
        2.0 * ((rho.exp() - rho - 1.0) / m).sqrt() / rho
    }

    /// Number of index bits.
    pub fn precision(&self) -> u8 {
        self.p
    }

    /// Read-only view of the bitmap, for callers that serialize.
    pub fn bit_vector(&self) -> &BitVector {
        &self.bits
    }

    /// Produces a sketch with precision reduced by `factor` index bits,
    /// clamped to the minimum precision of 6.
    ///
    /// The bitmap is folded in half once per dropped bit, OR-ing the upper
    /// half onto the lower, so bucket `b` collapses onto `b mod 2^(p-1)` at
    /// every step. A `factor` of 0 produces a copy.
    pub fn compress(&self, factor: u8) -> LinearCounting<H> {
        let new_p = self
            .p
            .saturating_sub(factor)
            .max(MIN_LINEAR_COUNTING_P);
        let mut words = self.bits.words.clone();
        for i in (new_p + 1..=self.p).rev() {
            // Half the current bit length, in 64-bit words.
            let half = 1usize << (i - 7);
            for j in 0..half {
                words[j] |= words[j + half];
            }
        }
        words.truncate(1usize << (new_p - 6));
        LinearCounting {
            p: new_p,
            hash: self.hash.clone(),
            bits: BitVector { words },
        }
    }

    /// Combines two sketches into one counting the union of their streams,
    /// at the smaller of the two precisions. Fails if the two hash
    /// capabilities disagree on the canary string.
    pub fn union(&self, other: &Self) -> Result<LinearCounting<H>, SketchError> {
        self.combine_with(other, |a, b| a | b)
    }

    /// Combines two sketches into one whose bitmap keeps only the buckets
    /// occupied in both, at the smaller of the two precisions. Fails if the
    /// two hash capabilities disagree on the canary string.
    pub fn intersect(&self, other: &Self) -> Result<LinearCounting<H>, SketchError> {
        self.combine_with(other, |a, b| a & b)
    }

    fn combine_with(
        &self,
        other: &Self,
        merge: fn(u64, u64) -> u64,
    ) -> Result<LinearCounting<H>, SketchError> {
        let ours = canary_digest(&self.hash, LINEAR_COUNTING_CANARY);
        let theirs = canary_digest(&other.hash, LINEAR_COUNTING_CANARY);
        if ours != theirs {
            return Err(SketchError::HashMismatch(format!(
                "hash functions return {ours:#x} != {theirs:#x} for \"LinearCounting\""
            )));
        }
        let (low, high) = if self.p <= other.p {
            (self, other)
        } else {
            (other, self)
        };
        let folded = high.compress(high.p - low.p);
        let words: Vec<u64> = low
            .bits
            .words
            .iter()
            .zip(&folded.bits.words)
            .map(|(&a, &b)| merge(a, b))
            .collect();
        Ok(LinearCounting {
            p: low.p,
            hash: low.hash.clone(),
            bits: BitVector { words },
        })
    }
}

impl<H: Hash64 + Clone> fmt::Display for LinearCounting<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = self.distinct();
        let delta = (n as f64 * self.expected_error()) as u64;
        write!(f, "LinearCounting N: {n} +/- {delta}")
    }
}
