// Copyright (c) 2026 Adrian Robinson. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.

use crate::traits::{canary_digest, Hash64, SketchError};
use std::fmt;

/// Fixed canary hashed by both sides of a combine to prove the hash
/// functions agree.
const HYPERLOGLOG_CANARY: &[u8] = b"HyperLogLog";

/// Precision bounds for practical register counts.
const MIN_HYPERLOGLOG_P: u8 = 4;
const MAX_HYPERLOGLOG_P: u8 = 16;

/// HyperLogLog cardinality estimator.
///
/// Estimates the number of distinct byte strings seen with `2^p` one-byte
/// registers. Each item's 64-bit digest is split: the top `p` bits select a
/// register and the remaining bits contribute a run-length-of-trailing-zeros
/// statistic; the register keeps the maximum. Includes the HyperLogLog++
/// refinements of a 64-bit hash (no large-range correction needed) and an
/// empirical bias correction for mid-range cardinalities.
///
/// # Key Properties
///
/// - **Fixed memory**: `2^p` bytes regardless of cardinality, `p` in [4, 16].
/// - **Standard error**: approximately `1.04 / sqrt(2^p)`.
/// - **Idempotent**: re-adding an item never changes a register.
/// - **Mergeable**: union takes the element-wise register maximum and is
///   exact, i.e. equal to the sketch of the concatenated streams.
///
/// # Example
///
/// ```
/// use stream_sketches::{Fnv64, HyperLogLog};
///
/// let mut hll = HyperLogLog::new(10, Fnv64::new());
/// hll.add(&1u64.to_le_bytes());
/// hll.add(&2u64.to_le_bytes());
/// hll.add(&3u64.to_le_bytes());
/// hll.add(&1u64.to_le_bytes()); // duplicate
///
/// assert_eq!(hll.distinct(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct HyperLogLog<H> {
    /// Number of index bits; the sketch has `2^p` registers.
    p: u8,
    /// Normalization constant for this register count.
    alpha: f64,
    /// Owned hash capability, mutated on every `add`.
    hash: H,
    /// Registers holding the max trailing-zero rank per bucket.
    data: Vec<u8>,
}

fn alpha_for(m: usize) -> f64 {
    match m {
        16 => 0.673,
        32 => 0.697,
        64 => 0.709,
        _ => 0.7213 / (1.0 + 1.079 / m as f64),
    }
}

impl<H: Hash64 + Clone> HyperLogLog<H> {
    /// Creates a sketch with `2^p` registers, clamping `p` to [4, 16].
    pub fn new(p: u8, hash: H) -> Self {
        let p = p.clamp(MIN_HYPERLOGLOG_P, MAX_HYPERLOGLOG_P);
        let m = 1usize << p;
        Self {
            p,
            alpha: alpha_for(m),
            hash,
            data: vec![0u8; m],
        }
    }

    /// Adds an item to the multiset.
    pub fn add(&mut self, item: &[u8]) {
        self.hash.reset();
        self.hash.write(item);
        let digest = self.hash.sum64();
        let bucket = (digest >> (64 - self.p)) as usize;
        // Rank is the 1-based position of the lowest set bit, clamped so it
        // fits the 64-p bits that do not index the bucket.
        let rank = (digest.trailing_zeros() as u8 + 1).min(64 - self.p);
        if rank > self.data[bucket] {
            self.data[bucket] = rank;
        }
    }

    /// Estimated number of distinct items.
    ///
    /// Selects between three estimators by regime: linear counting while
    /// the raw estimate is small and empty registers remain, the
    /// bias-corrected estimate in the mid range, and the raw harmonic-mean
    /// estimate beyond that.
    pub fn distinct(&self) -> u64 {
        let m = self.data.len() as f64;
        let raw = self.raw_estimate();
        let scale = self.alpha * m;
        let t = (raw - scale) / scale;
        let estimate = if t < 1.0 && self.zero_registers() > 0 {
            self.linear_counting()
        } else if t < 12.0 {
            self.bias_corrected()
        } else {
            raw
        };
        estimate as u64
    }

    /// Raw harmonic-mean estimate `alpha * m^2 / sum(2^-register)`.
    pub fn raw_estimate(&self) -> f64 {
        let m = self.data.len() as f64;
        let sum: f64 = self.data.iter().map(|&v| 1.0 / (1u64 << v) as f64).sum();
        self.alpha * m * m / sum
    }

    /// Raw estimate adjusted by the empirical small-bias curve fitted for
    /// HyperLogLog++. The constants are reproduced from that fit.
    pub fn bias_corrected(&self) -> f64 {
        let m = self.data.len() as f64;
        let raw = self.raw_estimate();
        let scale = self.alpha * m;
        let t = (raw - scale) / scale;
        raw - scale * ((-t).exp() + 0.125 * t * (t - 0.82) * (-1.85 * t).exp())
    }

    /// Linear-counting estimate `m * ln(m / z)` over the `z` empty
    /// registers; saturates at `m` when no register is empty.
    pub fn linear_counting(&self) -> f64 {
        let m = self.data.len() as f64;
        let zeros = self.zero_registers();
        if zeros == 0 {
            return m;
        }
        m * (m / zeros as f64).ln()
    }

    /// Relative standard error of the estimate, `1.04 / sqrt(m)`.
    pub fn expected_error(&self) -> f64 {
        1.04 / (self.data.len() as f64).sqrt()
    }

    /// Zeroes every register, keeping the precision and hash capability.
    pub fn reset(&mut self) {
        self.data.iter_mut().for_each(|v| *v = 0);
    }

    /// Number of index bits.
    pub fn precision(&self) -> u8 {
        self.p
    }

    /// Read-only view of the registers, for callers that serialize.
    pub fn registers(&self) -> &[u8] {
        &self.data
    }

    /// Produces a sketch at a lower precision `new_p`.
    ///
    /// Each new register is the maximum of the `2^(p - new_p)` consecutive
    /// old registers that share its index prefix, so the result is exactly
    /// the sketch that precision would have produced for the same stream.
    /// Raising precision is impossible and returns a precision-mismatch
    /// error; `new_p` below 4 is clamped to 4.
    pub fn reduce_precision(&self, new_p: u8) -> Result<HyperLogLog<H>, SketchError> {
        if new_p > self.p {
            return Err(SketchError::PrecisionMismatch(format!(
                "cannot raise HyperLogLog precision from {} to {}",
                self.p, new_p
            )));
        }
        Ok(self.reduced(new_p.max(MIN_HYPERLOGLOG_P)))
    }

    /// Produces a sketch with precision reduced by `factor` index bits,
    /// clamped to the minimum precision of 4.
    pub fn compress(&self, factor: u8) -> HyperLogLog<H> {
        self.reduced(self.p.saturating_sub(factor).max(MIN_HYPERLOGLOG_P))
    }

    fn reduced(&self, new_p: u8) -> HyperLogLog<H> {
        let stride = 1usize << (self.p - new_p);
        let new_m = 1usize << new_p;
        let data: Vec<u8> = self
            .data
            .chunks(stride)
            .map(|chunk| chunk.iter().copied().max().unwrap_or(0))
            .collect();
        debug_assert_eq!(data.len(), new_m);
        HyperLogLog {
            p: new_p,
            alpha: alpha_for(new_m),
            hash: self.hash.clone(),
            data,
        }
    }

    /// Combines two sketches into one counting the union of their streams.
    ///
    /// The higher-precision side is first reduced to the lower precision,
    /// then registers are merged by element-wise maximum. Fails if the two
    /// hash capabilities disagree on the canary string.
    pub fn union(&self, other: &Self) -> Result<HyperLogLog<H>, SketchError> {
        self.check_hash(other)?;
        let (low, high) = if self.p <= other.p {
            (self, other)
        } else {
            (other, self)
        };
        let folded = high.reduced(low.p);
        let data: Vec<u8> = low
            .data
            .iter()
            .zip(&folded.data)
            .map(|(&a, &b)| a.max(b))
            .collect();
        Ok(HyperLogLog {
            p: low.p,
            alpha: low.alpha,
            hash: low.hash.clone(),
            data,
        })
    }

    /// Estimates the cardinality of the intersection by inclusion-exclusion
    /// over the two inputs and their union, clamped at zero.
    pub fn intersect(&self, other: &Self) -> Result<u64, SketchError> {
        let union = self.union(other)?;
        let estimate =
            self.distinct() as f64 + other.distinct() as f64 - union.distinct() as f64;
        Ok(estimate.max(0.0) as u64)
    }

    fn check_hash(&self, other: &Self) -> Result<(), SketchError> {
        let ours = canary_digest(&self.hash, HYPERLOGLOG_CANARY);
        let theirs = canary_digest(&other.hash, HYPERLOGLOG_CANARY);
        if ours != theirs {
            return Err(SketchError::HashMismatch(format!(
                "hash functions return {ours:#x} != {theirs:#x} for \"HyperLogLog\""
            )));
        }
        Ok(())
    }

    fn zero_registers(&self) -> usize {
        self.data.iter().filter(|&&v| v == 0).count()
    }
}

impl<H: Hash64 + Clone> fmt::Display for HyperLogLog<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = self.distinct();
        let delta = (n as f64 * self.expected_error()) as u64;
        write!(f, "HyperLogLog N: {n} +/- {delta}")
    }
}
