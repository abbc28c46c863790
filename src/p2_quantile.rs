// Copyright (c) 2026 Adrian Robinson. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};

/// Single-quantile estimator using the P² algorithm of Jain and Chlamtac.
///
/// Tracks the p-quantile of a stream with five markers: the minimum, the
/// p/2, p and (1+p)/2 quantile estimates, and the maximum. Each marker
/// carries its value, its integer position in the observed sequence and an
/// ideal (real-valued) position; when a marker drifts at least one slot
/// from its ideal position it is nudged along a piecewise-parabolic
/// prediction, falling back to linear interpolation whenever the parabola
/// would break marker ordering.
///
/// # Key Properties
///
/// - **Constant space**: five markers regardless of stream length.
/// - **Order sensitive**: the estimate depends on arrival order, but its
///   accuracy bound does not.
/// - **Exact extremes**: `min` and `max` are exact, not estimates.
///
/// # Example
///
/// ```
/// use stream_sketches::P2Quantile;
///
/// let mut median = P2Quantile::new(0.5);
/// for x in 1..=100 {
///     median.add(x as f64);
/// }
///
/// assert_eq!(median.n(), 100);
/// assert!((median.quantile() - 50.0).abs() < 1.0);
/// assert_eq!(median.min(), 1.0);
/// assert_eq!(median.max(), 100.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct P2Quantile {
    /// The quantile being tracked, in (0, 1).
    p: f64,
    /// Actual marker positions; `n[4]` doubles as the sample count.
    n: [u64; 5],
    /// Ideal marker positions.
    np: [f64; 5],
    /// Per-sample increments to the ideal positions.
    dnp: [f64; 5],
    /// Marker heights, i.e. the estimated quantile values.
    q: [f64; 5],
}

impl P2Quantile {
    /// Creates an estimator for the `p`-quantile, `p` in (0, 1).
    pub fn new(p: f64) -> Self {
        Self {
            p,
            n: [1, 2, 3, 4, 0],
            np: [1.0, 1.0 + 2.0 * p, 1.0 + 4.0 * p, 3.0 + 2.0 * p, 5.0],
            dnp: [0.0, p / 2.0, p, (1.0 + p) / 2.0, 1.0],
            q: [0.0; 5],
        }
    }

    /// Adds a sample.
    pub fn add(&mut self, x: f64) {
        if self.n[4] < 5 {
            // Initialization: insertion-sort the first five samples.
            let mut i = self.n[4] as usize;
            self.q[i] = x;
            while i > 0 && self.q[i - 1] > self.q[i] {
                self.q.swap(i - 1, i);
                i -= 1;
            }
            self.n[4] += 1;
            return;
        }

        // Locate the cell holding the new sample, extending min/max in place.
        let k = if x < self.q[0] {
            self.q[0] = x;
            0
        } else if x < self.q[1] {
            0
        } else if x < self.q[2] {
            1
        } else if x < self.q[3] {
            2
        } else if x < self.q[4] {
            3
        } else {
            self.q[4] = x;
            3
        };

        for i in k + 1..5 {
            self.n[i] += 1;
        }
        for i in 0..5 {
            self.np[i] += self.dnp[i];
        }

        for i in 1..4 {
            let d = self.np[i] - self.n[i] as f64;
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

    /// The quantile being tracked.
    pub fn p(&self) -> f64 {
        self.p
    }

    /// Number of samples seen so far.
    pub fn n(&self) -> u64 {
        self.n[4]
    }

    /// Estimated value of the p-quantile.
    ///
    /// Before five samples have arrived this is the exact median of the
    /// sorted samples held so far; 0 before any input.
    pub fn quantile(&self) -> f64 {
        let count = self.n[4];
        if count < 5 && count > 0 {
            let mid = (count / 2) as usize;
            if count % 2 == 0 {
                return (self.q[mid - 1] + self.q[mid]) / 2.0;
            }
            return self.q[mid];
        }
        self.q[2]
    }

    /// Estimated value of the (1+p)/2 quantile; before five samples, the
    /// midpoint of the running estimate and the maximum.
    pub fn upper_quantile(&self) -> f64 {
        if self.n[4] < 5 && self.n[4] > 0 {
            return (self.quantile() + self.max()) / 2.0;
        }
        self.q[3]
    }

    /// Estimated value of the p/2 quantile; before five samples, the
    /// midpoint of the minimum and the running estimate.
    pub fn lower_quantile(&self) -> f64 {
        if self.n[4] < 5 && self.n[4] > 0 {
            return (self.min() + self.quantile()) / 2.0;
        }
        self.q[1]
    }

    /// Exact maximum seen so far.
    pub fn max(&self) -> f64 {
        if self.n[4] < 5 && self.n[4] > 0 {
            return self.q[self.n[4] as usize - 1];
        }
        self.q[4]
    }

    /// Exact minimum seen so far.
    pub fn min(&self) -> f64 {
        self.q[0]
    }

    /// Marker heights, lowest to highest, for callers that serialize.
    pub fn heights(&self) -> [f64; 5] {
        self.q
    }

    /// Marker positions in the observed sequence.
    pub fn positions(&self) -> [u64; 5] {
        self.n
    }

    /// Ideal marker positions.
    pub fn ideal_positions(&self) -> [f64; 5] {
        self.np
    }
}
