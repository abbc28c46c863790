// Copyright (c) 2026 Adrian Robinson. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};

/// One point of an empirical cumulative distribution: the probability `p`
/// of observing a value less than or equal to `x`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CumulativeDensity {
    pub x: f64,
    pub p: f64,
}

/// Equi-probability histogram estimator using the P² algorithm of Jain and
/// Chlamtac, generalized to `b` buckets.
///
/// Maintains `b + 1` markers whose heights estimate the `i/b` quantiles of
/// the stream. The marker adjustment is the same piecewise-parabolic rule
/// as [`P2Quantile`](crate::P2Quantile), except that a marker's ideal
/// position, `1 + i(N-1)/b`, is computed from the current sample count
/// rather than carried as running state.
///
/// # Key Properties
///
/// - **Constant space**: `b + 1` markers regardless of stream length.
/// - **Whole-distribution view**: `quantile` and `cdf` interpolate between
///   adjacent markers, so one sketch answers queries at any probability.
/// - **Exact extremes**: the outermost markers hold the true min and max.
///
/// # Example
///
/// ```
/// use stream_sketches::P2Histogram;
///
/// let mut hist = P2Histogram::new(4);
/// for x in 1..=100 {
///     hist.add(x as f64);
/// }
///
/// assert_eq!(hist.n(), 100);
/// assert!((hist.quantile(0.5) - 50.0).abs() < 2.0);
/// assert!((hist.cdf(50.0) - 0.5).abs() < 0.02);
/// assert_eq!(hist.histogram().len(), 5);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct P2Histogram {
    /// Number of buckets.
    b: usize,
    /// Actual marker positions; `n[b]` doubles as the sample count.
    n: Vec<u64>,
    /// Marker heights, i.e. the estimated quantile values.
    q: Vec<f64>,
}

impl P2Histogram {
    /// Creates a histogram estimator with `b` equi-probability buckets.
    pub fn new(b: usize) -> Self {
        let mut n = vec![0u64; b + 1];
        for (i, slot) in n.iter_mut().take(b).enumerate() {
            *slot = i as u64 + 1;
        }
        Self {
            b,
            n,
            q: vec![0.0; b + 1],
        }
    }

    /// Adds a sample.
    pub fn add(&mut self, x: f64) {
        let b = self.b;
        if self.n[b] < b as u64 + 1 {
            // Initialization: insertion-sort the first b+1 samples.
            let mut i = self.n[b] as usize;
            self.q[i] = x;
            while i > 0 && self.q[i - 1] > self.q[i] {
                self.q.swap(i - 1, i);
                i -= 1;
            }
            self.n[b] += 1;
            return;
        }

        // Locate the cell holding the new sample, extending min/max in place.
        let k = if x < self.q[0] {
            self.q[0] = x;
            0
        } else if x >= self.q[b] {
            self.q[b] = x;
            b - 1
        } else {
            let mut k = 0;
            for i in 1..=b {
                if x < self.q[i] {
                    k = i - 1;
                    break;
                }
            }
            k
        };

        for i in k + 1..=b {
            self.n[i] += 1;
        }

        let total = self.n[b] as f64;
        for i in 1..b {
            let ideal = 1.0 + i as f64 * (total - 1.0) / b as f64;
            let d = ideal - self.n[i] as f64;
            if (d >= 1.0 && self.n[i] + 1 < self.n[i + 1])
                || (d <= -1.0 && self.n[i - 1] + 1 < self.n[i])
            {
                // The adjustment is always by a single slot.
                let d = if d >= 1.0 { 1.0 } else { -1.0 };
                let n_lo = self.n[i - 1] as f64;
                let n_mid = self.n[i] as f64;
                let n_hi = self.n[i + 1] as f64;
                let parabolic = self.q[i]
                    + d * ((n_mid - n_lo + d) * (self.q[i + 1] - self.q[i]) / (n_hi - n_mid)
                        + (n_hi - n_mid - d) * (self.q[i] - self.q[i - 1]) / (n_mid - n_lo))
                        / (n_hi - n_lo);
                if self.q[i - 1] < parabolic && parabolic < self.q[i + 1] {
                    self.q[i] = parabolic;
                } else {
                    // Linear fallback keeps the marker heights ordered.
                    let j = if d > 0.0 { i + 1 } else { i - 1 };
                    self.q[i] += d * (self.q[j] - self.q[i]) / (self.n[j] as f64 - n_mid);
                }
                if d > 0.0 {
                    self.n[i] += 1;
                } else {
                    self.n[i] -= 1;
                }
            }
        }
    }

    /// Number of buckets.
    pub fn buckets(&self) -> usize {
        self.b
    }

    /// Number of samples seen so far.
    pub fn n(&self) -> u64 {
        self.n[self.b]
    }

    /// Exact minimum seen so far.
    pub fn min(&self) -> f64 {
        self.q[0]
    }

    /// Exact maximum seen so far.
    pub fn max(&self) -> f64 {
        let count = self.n[self.b];
        if count < self.b as u64 + 1 && count > 0 {
            return self.q[count as usize - 1];
        }
        self.q[self.b]
    }

    /// The empirical cumulative distribution: one `(x, p)` point per marker,
    /// with `p` the fraction of samples at or below the marker height.
    /// Always returns `b + 1` pairs, mirroring the raw marker state the way
    /// `heights` and `positions` do regardless of fill level.
    pub fn histogram(&self) -> Vec<CumulativeDensity> {
        let total = self.n[self.b] as f64;
        self.q
            .iter()
            .zip(&self.n)
            .map(|(&x, &position)| CumulativeDensity {
                x,
                p: position as f64 / total,
            })
            .collect()
    }

    /// Linear interpolation of the `p`-quantile between adjacent markers,
    /// clamped to the observed minimum and maximum; 0 before any input.
    pub fn quantile(&self, p: f64) -> f64 {
        let filled = self.filled();
        if filled == 0 {
            return 0.0;
        }
        let last = filled - 1;
        if p <= 0.0 {
            return self.q[0];
        }
        if p >= 1.0 {
            return self.q[last];
        }
        let total = self.n[self.b] as f64;
        if p <= self.n[0] as f64 / total {
            return self.q[0];
        }
        for i in 0..last {
            let p_hi = self.n[i + 1] as f64 / total;
            if p <= p_hi {
                let p_lo = self.n[i] as f64 / total;
                return self.q[i] + (p - p_lo) * (self.q[i + 1] - self.q[i]) / (p_hi - p_lo);
            }
        }
        self.q[last]
    }

    /// Linear interpolation of the cumulative density at `x` between
    /// adjacent markers, clamped to [0, 1]; 0 before any input.
    pub fn cdf(&self, x: f64) -> f64 {
        let filled = self.filled();
        if filled == 0 {
            return 0.0;
        }
        let last = filled - 1;
        if x < self.q[0] {
            return 0.0;
        }
        if x >= self.q[last] {
            return 1.0;
        }
        let total = self.n[self.b] as f64;
        for i in 0..last {
            if x < self.q[i + 1] {
                let width = self.q[i + 1] - self.q[i];
                if width <= 0.0 {
                    return self.n[i + 1] as f64 / total;
                }
                let t = (x - self.q[i]) / width;
                return (self.n[i] as f64 + t * (self.n[i + 1] as f64 - self.n[i] as f64)) / total;
            }
        }
        1.0
    }

    /// Marker heights, lowest to highest, for callers that serialize.
    pub fn heights(&self) -> &[f64] {
        &self.q
    }

    /// Marker positions in the observed sequence.
    pub fn positions(&self) -> &[u64] {
        &self.n
    }

    /// Number of markers holding real samples: b+1 in steady state, the
    /// sample count during initialization.
    fn filled(&self) -> usize {
        let count = self.n[self.b];
        if count < self.b as u64 + 1 {
            count as usize
        } else {
            self.b + 1
        }
    }
}
